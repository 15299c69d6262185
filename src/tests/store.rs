use super::{OutlineStore, DONE_LABEL, ROOT_LABEL, TRASH_LABEL};
use crate::codec::Decoded;
use crate::node::{NodeId, Tree};
use crate::target::TargetSlot;
use std::collections::HashSet;

impl OutlineStore {
    /// Checks that every reachable node is owned exactly once by the node its `parent`
    /// names, that nothing live is unreachable, that Done and Trash are top-level lists,
    /// and that the cursor sits on an item of the current list.
    pub(crate) fn assert_well_formed(&self) {
        let tree = self.tree();
        let root = tree.root();
        assert_eq!(tree[root].parent, None, "root has a parent");

        let mut seen = HashSet::new();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            assert!(seen.insert(id), "{id:?} is owned twice");
            for &kid in &tree[id].children {
                assert_eq!(tree[kid].parent, Some(id), "{kid:?} has a stale parent link");
                pending.push(kid);
            }
        }
        assert_eq!(seen.len(), tree.len(), "live nodes unreachable from the root");

        for slot in [TargetSlot::Done, TargetSlot::Trash] {
            let list = self.target(slot).expect("built-in list").list;
            assert_eq!(tree[list].parent, Some(root), "{slot:?} is not top-level");
        }
        assert_ne!(
            self.target(TargetSlot::Done).map(|t| t.list),
            self.target(TargetSlot::Trash).map(|t| t.list)
        );

        assert!(seen.contains(&self.current_list()));
        match self.current_item() {
            Some(item) => assert!(self.items().contains(&item), "cursor off its list"),
            None => assert!(self.items().is_empty(), "no selection on a non-empty list"),
        }
    }
}

fn labels(store: &OutlineStore, list: NodeId) -> Vec<String> {
    store
        .node(list)
        .children
        .iter()
        .map(|&id| store.node(id).label.clone())
        .collect()
}

/// A store whose cursor sits in a fresh, empty list called `inbox`.
fn store_in_inbox() -> (OutlineStore, NodeId) {
    let mut store = OutlineStore::new();
    let inbox = store.append_item("inbox").unwrap();
    store.descend().unwrap();
    store.assert_well_formed();
    (store, inbox)
}

fn select(store: &mut OutlineStore, label: &str) {
    let index = store
        .item_labels()
        .iter()
        .position(|l| *l == label)
        .unwrap();
    store.set_current_item(Some(index)).unwrap();
    store.assert_well_formed();
}

#[test]
fn test_new_store_has_builtin_lists() {
    let store = OutlineStore::new();
    assert_eq!(store.item_labels(), vec![DONE_LABEL, TRASH_LABEL]);
    assert_eq!(store.current_label(), Some(DONE_LABEL));
    assert_eq!(store.current_list(), store.root());
    assert!(store.is_dirty());
}

#[test]
fn test_append_and_navigate() {
    let (mut store, inbox) = store_in_inbox();
    assert_eq!(store.current_item(), None);

    store.append_item("buy milk").unwrap();
    store.assert_well_formed();
    store.append_item("walk dog").unwrap();
    store.assert_well_formed();
    assert_eq!(labels(&store, inbox), vec!["buy milk", "walk dog"]);
    assert_eq!(store.current_label(), Some("walk dog"));

    store.prev_item().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_label(), Some("buy milk"));
    store.first_item().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_label(), Some("buy milk"));
    store.prev_item().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_label(), Some("buy milk"));

    store.last_item().unwrap();
    store.assert_well_formed();
    store.next_item().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_label(), Some("walk dog"));
}

#[test]
fn test_append_inserts_after_selection() {
    let (mut store, inbox) = store_in_inbox();
    store.append_item("a").unwrap();
    store.assert_well_formed();
    store.append_item("c").unwrap();
    store.assert_well_formed();
    store.first_item().unwrap();
    store.assert_well_formed();
    store.append_item("b").unwrap();
    store.assert_well_formed();
    assert_eq!(labels(&store, inbox), vec!["a", "b", "c"]);
    assert_eq!(store.current_label(), Some("b"));
}

#[test]
fn test_labels_are_kept_on_one_line() {
    let (mut store, _) = store_in_inbox();
    store.append_item("two\nlines  ").unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_label(), Some("two lines"));
}

#[test]
fn test_descend_and_ascend_restore_cursor() {
    let (mut store, inbox) = store_in_inbox();
    store.append_item("child").unwrap();
    store.assert_well_formed();
    store.ascend().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_list(), store.root());
    assert_eq!(store.current_item(), Some(inbox));

    store.ascend().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_list(), store.root());
}

#[test]
fn test_cursor_past_end_is_internal_error() {
    let (mut store, _) = store_in_inbox();
    store.append_item("only").unwrap();
    store.assert_well_formed();
    assert!(store.set_current_item(Some(5)).unwrap_err().is_internal());
}

#[test]
fn test_replace_without_selection_is_noop() {
    let (mut store, _) = store_in_inbox();
    store.mark_saved();
    store.assert_well_formed();
    store.replace_label("nothing");
    store.assert_well_formed();
    assert!(!store.is_dirty());

    store.append_item("old").unwrap();
    store.assert_well_formed();
    store.replace_label("new");
    store.assert_well_formed();
    assert_eq!(store.current_label(), Some("new"));
}

#[test]
fn test_move_to_done_twice_stacks_newest_first() {
    let mut store = OutlineStore::new();
    store.append_item("task1").unwrap();
    store.assert_well_formed();
    store.append_item("task2").unwrap();
    store.assert_well_formed();
    let done = store.target(TargetSlot::Done).unwrap().list;

    select(&mut store, "task1");
    store.move_current_item_to(TargetSlot::Done).unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_label(), Some("task2"));
    store.move_current_item_to(TargetSlot::Done).unwrap();
    store.assert_well_formed();

    assert_eq!(labels(&store, done), vec!["task2", "task1"]);
    assert_eq!(store.item_labels(), vec![DONE_LABEL, TRASH_LABEL]);
}

#[test]
fn test_moves_to_mark_keep_chronological_order() {
    let mut store = OutlineStore::new();
    let dest = store.append_item("dest").unwrap();
    store.append_item("src").unwrap();
    store.assert_well_formed();
    store.descend().unwrap();
    store.assert_well_formed();
    store.append_item("X").unwrap();
    store.assert_well_formed();
    store.append_item("Y").unwrap();
    store.assert_well_formed();

    store.ascend().unwrap();
    store.assert_well_formed();
    select(&mut store, "dest");
    store.descend().unwrap();
    store.assert_well_formed();
    store.append_item("p").unwrap();
    store.assert_well_formed();
    store.set_mark().unwrap();
    store.assert_well_formed();

    store.ascend().unwrap();
    store.assert_well_formed();
    select(&mut store, "src");
    store.descend().unwrap();
    store.assert_well_formed();
    store.first_item().unwrap();
    store.assert_well_formed();
    store.move_current_item_to(TargetSlot::Mark).unwrap();
    store.assert_well_formed();
    store.move_current_item_to(TargetSlot::Mark).unwrap();
    store.assert_well_formed();

    assert_eq!(labels(&store, dest), vec!["p", "X", "Y"]);
    assert!(store.items().is_empty());
    assert_eq!(store.current_item(), None);
}

#[test]
fn test_move_into_own_subtree_is_refused() {
    let mut store = OutlineStore::new();
    let boxed = store.append_item("box").unwrap();
    store.descend().unwrap();
    store.assert_well_formed();
    store.append_item("inner").unwrap();
    store.assert_well_formed();
    store.set_mark().unwrap();
    store.assert_well_formed();
    store.ascend().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_item(), Some(boxed));

    store.move_current_item_to(TargetSlot::Mark).unwrap();
    store.assert_well_formed();
    assert_eq!(store.item_labels(), vec![DONE_LABEL, "box", TRASH_LABEL]);
    assert_eq!(labels(&store, boxed), vec!["inner"]);
}

#[test]
fn test_builtin_lists_cannot_be_moved() {
    let mut store = OutlineStore::new();
    assert_eq!(store.current_label(), Some(DONE_LABEL));
    store.move_current_item_to(TargetSlot::Trash).unwrap();
    store.assert_well_formed();
    assert_eq!(store.item_labels(), vec![DONE_LABEL, TRASH_LABEL]);
}

#[test]
fn test_move_within_list_clamps() {
    let (mut store, inbox) = store_in_inbox();
    for label in ["a", "b", "c"] {
        store.append_item(label).unwrap();
        store.assert_well_formed();
    }
    store.first_item().unwrap();
    store.assert_well_formed();
    store.move_within_list(10).unwrap();
    store.assert_well_formed();
    assert_eq!(labels(&store, inbox), vec!["b", "c", "a"]);
    assert_eq!(store.current_label(), Some("a"));
}

#[test]
fn test_fold_then_unfold_splices_children_back() {
    let (mut store, inbox) = store_in_inbox();
    for label in ["A", "B", "C"] {
        store.append_item(label).unwrap();
        store.assert_well_formed();
    }
    select(&mut store, "A");
    store.toggle_tag();
    store.assert_well_formed();
    select(&mut store, "C");
    store.toggle_tag();
    store.assert_well_formed();

    store.fold_tagged_under("G").unwrap();
    store.assert_well_formed();
    assert_eq!(labels(&store, inbox), vec!["G", "B"]);
    let fold = store.current_item().unwrap();
    assert_eq!(labels(&store, fold), vec!["A", "C"]);
    assert!(store
        .node(fold)
        .children
        .iter()
        .all(|&id| !store.node(id).tagged));

    store.unfold_current_item().unwrap();
    store.assert_well_formed();
    assert_eq!(labels(&store, inbox), vec!["A", "C", "B"]);
    assert_eq!(store.current_label(), Some("A"));
    assert!(!store.tree().contains(fold));
}

#[test]
fn test_fold_with_nothing_tagged_creates_nothing() {
    let (mut store, inbox) = store_in_inbox();
    store.append_item("A").unwrap();
    store.assert_well_formed();
    let nodes = store.tree().len();
    store.mark_saved();
    store.assert_well_formed();

    store.fold_tagged_under("G").unwrap();
    store.assert_well_formed();
    assert_eq!(labels(&store, inbox), vec!["A"]);
    assert_eq!(store.tree().len(), nodes);
    assert!(!store.is_dirty());
}

#[test]
fn test_unfold_leaf_is_noop() {
    let (mut store, inbox) = store_in_inbox();
    store.append_item("leaf").unwrap();
    store.assert_well_formed();
    store.unfold_current_item().unwrap();
    store.assert_well_formed();
    assert_eq!(labels(&store, inbox), vec!["leaf"]);
}

#[test]
fn test_toggle_all_tags_follows_selection() {
    let (mut store, inbox) = store_in_inbox();
    store.append_item("a").unwrap();
    store.assert_well_formed();
    store.append_item("b").unwrap();
    store.assert_well_formed();
    store.toggle_tag();
    store.assert_well_formed();
    store.toggle_all_tags();
    store.assert_well_formed();
    assert!(store.node(inbox).children.iter().all(|&id| !store.node(id).tagged));
    store.toggle_all_tags();
    store.assert_well_formed();
    assert!(store.node(inbox).children.iter().all(|&id| store.node(id).tagged));
}

#[test]
fn test_expunge_clears_trash_and_stale_mark() {
    let mut store = OutlineStore::new();
    store.append_item("box").unwrap();
    store.assert_well_formed();
    store.descend().unwrap();
    store.assert_well_formed();
    store.append_item("inner").unwrap();
    store.assert_well_formed();
    store.set_mark().unwrap();
    store.assert_well_formed();
    store.ascend().unwrap();
    store.assert_well_formed();
    store.move_current_item_to(TargetSlot::Trash).unwrap();
    store.assert_well_formed();

    let trash = store.target(TargetSlot::Trash).unwrap().list;
    assert_eq!(labels(&store, trash), vec!["box"]);
    let before = store.tree().len();

    store.mark_saved();
    store.assert_well_formed();
    store.expunge_trash().unwrap();
    store.assert_well_formed();
    assert!(labels(&store, trash).is_empty());
    assert_eq!(store.tree().len(), before - 2);
    assert!(store.mark().is_none());
    assert!(store.is_dirty());

    store.mark_saved();
    store.assert_well_formed();
    store.expunge_trash().unwrap();
    store.assert_well_formed();
    assert!(!store.is_dirty());
}

#[test]
fn test_expunge_while_viewing_trash() {
    let mut store = OutlineStore::new();
    store.append_item("junk").unwrap();
    store.assert_well_formed();
    store.move_current_item_to(TargetSlot::Trash).unwrap();
    store.assert_well_formed();
    select(&mut store, TRASH_LABEL);
    store.descend().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_label(), Some("junk"));

    store.expunge_trash().unwrap();
    store.assert_well_formed();
    assert!(store.items().is_empty());
    assert_eq!(store.current_item(), None);
}

#[test]
fn test_go_to_mark_clamps_and_reports_unset() {
    let (mut store, inbox) = store_in_inbox();
    store.go_to_mark().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_list(), inbox);

    store.append_item("a").unwrap();
    store.assert_well_formed();
    store.append_item("b").unwrap();
    store.assert_well_formed();
    store.set_mark().unwrap();
    store.assert_well_formed();
    store.move_current_item_to(TargetSlot::Done).unwrap();
    store.assert_well_formed();
    store.ascend().unwrap();
    store.assert_well_formed();

    store.go_to_mark().unwrap();
    store.assert_well_formed();
    assert_eq!(store.current_list(), inbox);
    assert_eq!(store.current_label(), Some("a"));
}

#[test]
fn test_missing_builtin_list_is_recreated_after_expunge() {
    let mut tree = Tree::new(ROOT_LABEL);
    let root = tree.root();
    let trash = tree.alloc(TRASH_LABEL);
    tree.insert_child(root, 0, trash).unwrap();
    let nested = tree.alloc("nested");
    tree.insert_child(trash, 0, nested).unwrap();
    let mut store = OutlineStore::from_decoded(Decoded {
        tree,
        done: Some(nested),
        trash: Some(trash),
    });

    store.expunge_trash().unwrap();
    store.assert_well_formed();
    assert_eq!(store.item_labels(), vec![TRASH_LABEL, DONE_LABEL]);

    let fresh = store.append_item("fresh").unwrap();
    store.assert_well_formed();
    assert!(!store.is_builtin(fresh));
    store.move_current_item_to(TargetSlot::Done).unwrap();
    store.assert_well_formed();

    let done = store.target(TargetSlot::Done).unwrap().list;
    assert_eq!(store.node(done).label, DONE_LABEL);
    assert_eq!(labels(&store, done), vec!["fresh"]);
}
