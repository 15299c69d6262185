//! Flat-text encoding of an outline.
//!
//! Nodes have no identity of their own in memory, so every encode numbers them afresh
//! (depth-first, root first, starting at 1) and writes one three-line record per node
//! in breadth-first order:
//!
//! ```text
//! ROOT 1
//! DONE 4
//! TRASH 5
//! node 1
//! root
//! 2 4 5
//! node 2
//! groceries
//! 3
//! ...
//! ```
//!
//! Decoding reads every record before linking anything, since a record may list
//! children whose own records come later in the file. Tags are not part of the format.

use crate::error::{OutlineError, OutlineResult};
use crate::node::{NodeId, Tree};
use crate::store::{OutlineStore, DONE_LABEL, ROOT_LABEL, TRASH_LABEL};
use crate::target::TargetSlot;
use log::{debug, warn};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Write;

const ROOT_PREFIX: &str = "ROOT ";
const DONE_PREFIX: &str = "DONE ";
const TRASH_PREFIX: &str = "TRASH ";
const NODE_PREFIX: &str = "node ";

#[derive(Debug)]
/// A tree rebuilt from text, with its resolved built-in lists.
pub struct Decoded {
    /// Reconstructed tree; its root is the file's root record.
    pub tree: Tree,
    /// Node the `DONE` header referred to.
    pub done: Option<NodeId>,
    /// Node the `TRASH` header referred to.
    pub trash: Option<NodeId>,
}

/// Numbers every node reachable from the root, depth-first, children in order.
fn assign_ids(tree: &Tree) -> HashMap<NodeId, usize> {
    let mut ids = HashMap::new();
    let mut pending = vec![tree.root()];
    while let Some(id) = pending.pop() {
        if ids.contains_key(&id) {
            continue;
        }
        ids.insert(id, ids.len() + 1);
        pending.extend(tree[id].children.iter().rev());
    }
    ids
}

#[must_use]
/// Serialises the store's tree and built-in lists.
pub fn encode(store: &OutlineStore) -> String {
    let tree = store.tree();
    let ids = assign_ids(tree);
    let mut out = String::new();

    let _ = writeln!(out, "{ROOT_PREFIX}{}", ids[&tree.root()]);
    for (prefix, slot) in [(DONE_PREFIX, TargetSlot::Done), (TRASH_PREFIX, TargetSlot::Trash)] {
        if let Some(id) = store.target(slot).and_then(|t| ids.get(&t.list)) {
            let _ = writeln!(out, "{prefix}{id}");
        }
    }

    let mut queue = VecDeque::from([tree.root()]);
    let mut written = HashSet::new();
    while let Some(id) = queue.pop_front() {
        if !written.insert(id) {
            continue;
        }
        let node = &tree[id];
        let kids = node
            .children
            .iter()
            .map(|kid| ids[kid].to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{NODE_PREFIX}{}", ids[&id]);
        let _ = writeln!(out, "{}", node.label);
        let _ = writeln!(out, "{kids}");
        queue.extend(node.children.iter().copied());
    }
    out
}

struct Record {
    line: usize,
    label: String,
    kids: Vec<usize>,
}

fn parse_id(line: usize, text: &str) -> OutlineResult<usize> {
    text.trim()
        .parse()
        .map_err(|_| OutlineError::format(line, format!("expected a node id, got {text:?}")))
}

/// Rebuilds a tree from its text encoding.
///
/// # Errors
///
/// Returns [`OutlineError::Format`] for an unknown line prefix, a non-numeric id, a
/// truncated record, a duplicated or unknown id, a node listed under two parents, or a
/// file with no identifiable root.
pub fn decode(text: &str) -> OutlineResult<Decoded> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    let mut records: HashMap<usize, Record> = HashMap::new();
    let mut root_id = None;
    let mut done_id = None;
    let mut trash_id = None;

    while let Some((number, raw)) = lines.next() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix(ROOT_PREFIX) {
            root_id = Some((number, parse_id(number, rest)?));
        } else if let Some(rest) = line.strip_prefix(DONE_PREFIX) {
            done_id = Some((number, parse_id(number, rest)?));
        } else if let Some(rest) = line.strip_prefix(TRASH_PREFIX) {
            trash_id = Some((number, parse_id(number, rest)?));
        } else if let Some(rest) = line.strip_prefix(NODE_PREFIX) {
            let id = parse_id(number, rest)?;
            let (_, label) = lines
                .next()
                .ok_or_else(|| OutlineError::format(number, "record ends before its label"))?;
            let (kids_line, kids) = lines.next().ok_or_else(|| {
                OutlineError::format(number, "record ends before its child list")
            })?;
            let kids = kids
                .split_whitespace()
                .map(|kid| parse_id(kids_line, kid))
                .collect::<OutlineResult<Vec<_>>>()?;
            let record = Record {
                line: number,
                label: label.trim_end_matches('\r').to_string(),
                kids,
            };
            if records.insert(id, record).is_some() {
                return Err(OutlineError::format(number, format!("duplicate node {id}")));
            }
        } else {
            return Err(OutlineError::format(
                number,
                format!("expected node #, got {line:?}"),
            ));
        }
    }

    let root = match root_id {
        Some((line, id)) if !records.contains_key(&id) => {
            return Err(OutlineError::format(line, format!("unknown root node {id}")))
        }
        Some((_, id)) => id,
        None => records
            .iter()
            .filter(|(id, record)| record.label == ROOT_LABEL && **id <= 1)
            .map(|(id, _)| *id)
            .min()
            .ok_or_else(|| OutlineError::format(1, "no root record"))?,
    };

    let (tree, resolved) = link(&records, root)?;
    let resolve = |header: Option<(usize, usize)>| -> OutlineResult<Option<NodeId>> {
        header
            .map(|(line, id)| {
                resolved
                    .get(&id)
                    .copied()
                    .ok_or_else(|| OutlineError::format(line, format!("unknown node {id}")))
            })
            .transpose()
    };
    let done = builtin_list(&tree, resolve(done_id)?, DONE_LABEL, None);
    let trash = builtin_list(&tree, resolve(trash_id)?, TRASH_LABEL, done);
    debug!(
        "decoded {} records, {} reachable from root",
        records.len(),
        resolved.len()
    );
    Ok(Decoded { tree, done, trash })
}

/// Picks the node serving as a built-in list.
///
/// A header only counts if it names a top-level node other than `taken`; otherwise,
/// and for files without the header, the top-level child labelled `label` is used.
fn builtin_list(
    tree: &Tree,
    header: Option<NodeId>,
    label: &str,
    taken: Option<NodeId>,
) -> Option<NodeId> {
    let usable = |id: NodeId| tree[id].parent == Some(tree.root()) && Some(id) != taken;
    match header {
        Some(id) if usable(id) => Some(id),
        Some(_) => {
            warn!("Ignoring {label} header that does not name a top-level list.");
            top_level_named(tree, label).filter(|&id| usable(id))
        }
        None => top_level_named(tree, label).filter(|&id| usable(id)),
    }
}

fn top_level_named(tree: &Tree, label: &str) -> Option<NodeId> {
    tree[tree.root()]
        .children
        .iter()
        .copied()
        .find(|&kid| tree[kid].label == label)
}

/// Builds the arena breadth-first from the root record, resolving child ids.
fn link(
    records: &HashMap<usize, Record>,
    root: usize,
) -> OutlineResult<(Tree, HashMap<usize, NodeId>)> {
    let mut tree = Tree::empty();
    let mut resolved = HashMap::new();
    let root_node = tree.alloc(records[&root].label.clone());
    tree.set_root(root_node);
    resolved.insert(root, root_node);

    let mut queue = VecDeque::from([root]);
    while let Some(file_id) = queue.pop_front() {
        let record = &records[&file_id];
        let parent = resolved[&file_id];
        for &kid in &record.kids {
            let Some(kid_record) = records.get(&kid) else {
                return Err(OutlineError::format(
                    record.line,
                    format!("node {file_id} lists unknown child {kid}"),
                ));
            };
            if resolved.contains_key(&kid) {
                return Err(OutlineError::format(
                    record.line,
                    format!("node {kid} has more than one parent"),
                ));
            }
            let node = tree.alloc(kid_record.label.clone());
            let pos = tree[parent].children.len();
            tree.insert_child(parent, pos, node)?;
            resolved.insert(kid, node);
            queue.push_back(kid);
        }
    }
    Ok((tree, resolved))
}

#[cfg(test)]
#[path = "tests/codec.rs"]
mod tests;
