//! Nested JSON view of an outline, for scripting against the saved file.

use crate::node::{NodeId, Tree};
use serde::Serialize;

#[derive(Serialize, Debug, PartialEq, Eq)]
/// One item and everything beneath it.
pub struct OutlineSnapshot {
    /// Item text.
    pub label: String,
    /// Sub-items in display order; omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineSnapshot>,
}

impl OutlineSnapshot {
    #[must_use]
    /// Captures the subtree rooted at `id`.
    pub fn capture(tree: &Tree, id: NodeId) -> Self {
        let node = &tree[id];
        Self {
            label: node.label.clone(),
            children: node
                .children
                .iter()
                .map(|&kid| Self::capture(tree, kid))
                .collect(),
        }
    }
}
