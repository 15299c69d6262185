//! Node arena for the outline tree.
//!
//! Nodes live in a slot vector and refer to each other by [`NodeId`]. A node owns the
//! ordered list of its children; the `parent` field is only a back-reference used for
//! ascending. Released subtrees give their slots back for reuse, so an id is only
//! meaningful while [`Tree::contains`] says so.

use crate::error::{OutlineError, OutlineResult};
use std::ops::{Index, IndexMut};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Stable handle to a node slot in a [`Tree`].
pub struct NodeId(usize);

#[derive(Clone, Debug)]
/// Labeled element of the outline.
pub struct Node {
    /// Text shown for this item.
    pub label: String,
    /// Owning node, `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,
    /// Ordered child list owned by this node.
    pub children: Vec<NodeId>,
    /// Transient multi-select marker.
    pub tagged: bool,
}

impl Node {
    fn new(label: String) -> Self {
        Self {
            label,
            parent: None,
            children: Vec::new(),
            tagged: false,
        }
    }

    #[must_use]
    /// Whether this item opens onto a non-empty sub-list.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Clone, Debug)]
/// Arena holding every node of one outline.
pub struct Tree {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Tree {
    #[must_use]
    /// Creates a tree containing only a root with the given label.
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            slots: vec![Some(Node::new(root_label.into()))],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    #[must_use]
    /// The unique parentless node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    /// Number of live nodes, detached ones included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[must_use]
    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    /// Whether `id` refers to a live slot.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    #[must_use]
    /// Borrows a node if the id is live.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Mutably borrows a node if the id is live.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Creates a detached node and returns its id.
    pub fn alloc(&mut self, label: impl Into<String>) -> NodeId {
        let node = Node::new(label.into());
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(node);
            NodeId(slot)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Inserts `child` into `parent`'s children at `pos` and links it back.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Index`] if `pos` is past the end of the list, and
    /// [`OutlineError::Internal`] if either id is dead or `child` is still attached.
    pub fn insert_child(&mut self, parent: NodeId, pos: usize, child: NodeId) -> OutlineResult<()> {
        let attached = self
            .get(child)
            .ok_or_else(|| OutlineError::internal(format!("insert of dead node {child:?}")))?
            .parent;
        if attached.is_some() || child == self.root {
            return Err(OutlineError::internal(format!(
                "node {child:?} is already attached"
            )));
        }
        let kids = &mut self
            .get_mut(parent)
            .ok_or_else(|| OutlineError::internal(format!("insert into dead node {parent:?}")))?
            .children;
        if pos > kids.len() {
            return Err(OutlineError::Index {
                index: pos,
                len: kids.len(),
            });
        }
        kids.insert(pos, child);
        self[child].parent = Some(parent);
        Ok(())
    }

    /// Detaches and returns the child at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Index`] if there is no child at `pos`, and
    /// [`OutlineError::Internal`] if `parent` is dead.
    pub fn remove_child(&mut self, parent: NodeId, pos: usize) -> OutlineResult<NodeId> {
        let kids = &mut self
            .get_mut(parent)
            .ok_or_else(|| OutlineError::internal(format!("remove from dead node {parent:?}")))?
            .children;
        if pos >= kids.len() {
            return Err(OutlineError::Index {
                index: pos,
                len: kids.len(),
            });
        }
        let child = kids.remove(pos);
        self[child].parent = None;
        Ok(child)
    }

    /// Frees a detached node together with its whole subtree.
    ///
    /// Returns the number of slots released.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] for the root, a dead id, or a node that is
    /// still attached to a parent.
    pub fn release(&mut self, id: NodeId) -> OutlineResult<usize> {
        match self.get(id) {
            None => return Err(OutlineError::internal(format!("release of dead node {id:?}"))),
            Some(node) if node.parent.is_some() || id == self.root => {
                return Err(OutlineError::internal(format!(
                    "release of attached node {id:?}"
                )))
            }
            Some(_) => {}
        }
        let mut pending = vec![id];
        let mut freed = 0;
        while let Some(next) = pending.pop() {
            if let Some(node) = self.slots[next.0].take() {
                pending.extend(node.children);
                self.free.push(next.0);
                freed += 1;
            }
        }
        Ok(freed)
    }

    #[must_use]
    /// Returns `(node count, max depth)` of the subtree rooted at `id`.
    ///
    /// A lone node counts as depth 1. Dead ids analyse as `(0, 0)`.
    pub fn analyze(&self, id: NodeId) -> (usize, usize) {
        let Some(node) = self.get(id) else {
            return (0, 0);
        };
        node.children
            .iter()
            .map(|&kid| self.analyze(kid))
            .fold((1, 1), |(count, depth), (kid_count, kid_depth)| {
                (count + kid_count, depth.max(kid_depth + 1))
            })
    }

    #[must_use]
    /// True if `ancestor` is `node` itself or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    #[must_use]
    /// Labels from the root down to `id`, inclusive.
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.get(current) else { break };
            parts.push(node.label.as_str());
            cursor = node.parent;
        }
        parts.reverse();
        parts
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub(crate) fn empty() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
        }
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("dead node id {id:?}"),
        }
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("dead node id {id:?}"),
        }
    }
}

#[cfg(test)]
#[path = "tests/node.rs"]
mod tests;
