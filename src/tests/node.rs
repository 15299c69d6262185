use super::{NodeId, Tree};
use crate::error::OutlineError;

fn sample() -> (Tree, [NodeId; 3]) {
    let mut tree = Tree::new("root");
    let root = tree.root();
    let a = tree.alloc("a");
    let b = tree.alloc("b");
    let c = tree.alloc("c");
    tree.insert_child(root, 0, a).unwrap();
    tree.insert_child(root, 1, b).unwrap();
    tree.insert_child(a, 0, c).unwrap();
    (tree, [a, b, c])
}

#[test]
fn test_insert_links_parent_and_order() {
    let (tree, [a, b, c]) = sample();
    assert_eq!(tree[tree.root()].children, vec![a, b]);
    assert_eq!(tree[c].parent, Some(a));
    assert!(tree[a].has_children());
    assert!(!tree[b].has_children());
}

#[test]
fn test_insert_past_end_is_index_error() {
    let (mut tree, [_, b, _]) = sample();
    let d = tree.alloc("d");
    let err = tree.insert_child(b, 1, d).unwrap_err();
    assert!(matches!(err, OutlineError::Index { index: 1, len: 0 }));
}

#[test]
fn test_insert_attached_node_is_internal_error() {
    let (mut tree, [a, b, _]) = sample();
    assert!(tree.insert_child(b, 0, a).unwrap_err().is_internal());
    let root = tree.root();
    assert!(tree.insert_child(b, 0, root).unwrap_err().is_internal());
}

#[test]
fn test_remove_child_detaches() {
    let (mut tree, [a, b, _]) = sample();
    let removed = tree.remove_child(tree.root(), 0).unwrap();
    assert_eq!(removed, a);
    assert_eq!(tree[a].parent, None);
    assert_eq!(tree[tree.root()].children, vec![b]);
    assert!(matches!(
        tree.remove_child(b, 0),
        Err(OutlineError::Index { index: 0, len: 0 })
    ));
}

#[test]
fn test_release_frees_subtree_and_reuses_slots() {
    let (mut tree, [a, _, c]) = sample();
    assert_eq!(tree.len(), 4);
    tree.remove_child(tree.root(), 0).unwrap();
    assert_eq!(tree.release(a).unwrap(), 2);
    assert_eq!(tree.len(), 2);
    assert!(!tree.contains(a));
    assert!(!tree.contains(c));

    let reused = tree.alloc("e");
    assert!(reused == a || reused == c);
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_release_refuses_attached_and_root() {
    let (mut tree, [a, _, _]) = sample();
    assert!(tree.release(a).unwrap_err().is_internal());
    let root = tree.root();
    assert!(tree.release(root).unwrap_err().is_internal());
}

#[test]
fn test_analyze_counts_and_depth() {
    let (tree, [a, b, _]) = sample();
    assert_eq!(tree.analyze(tree.root()), (4, 3));
    assert_eq!(tree.analyze(a), (2, 2));
    assert_eq!(tree.analyze(b), (1, 1));
}

#[test]
fn test_ancestry_and_path() {
    let (tree, [a, b, c]) = sample();
    assert!(tree.is_ancestor(tree.root(), c));
    assert!(tree.is_ancestor(a, c));
    assert!(tree.is_ancestor(c, c));
    assert!(!tree.is_ancestor(b, c));
    assert_eq!(tree.path(c), vec!["root", "a", "c"]);
}
