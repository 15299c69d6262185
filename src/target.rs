//! Gap addresses inside a child list.
//!
//! A target does not point at an item but at the space just before or just after one,
//! which is what makes it usable both as an insertion point and as a bookmark.

use crate::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which gap next to `index` a [`Target`] denotes.
pub enum Side {
    /// The gap immediately before the item at `index`.
    Before,
    /// The gap immediately after the item at `index`.
    After,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// An addressable gap: list, item position, and side of that item.
pub struct Target {
    /// Node whose children are addressed.
    pub list: NodeId,
    /// Item the gap is anchored to; `None` when the list was empty when the target was set.
    pub index: Option<usize>,
    /// Before or after the anchoring item.
    pub side: Side,
}

impl Target {
    #[must_use]
    /// A target that always inserts at the front of `list`.
    pub fn front_of(list: NodeId) -> Self {
        Self {
            list,
            index: Some(0),
            side: Side::Before,
        }
    }

    #[must_use]
    /// A target anchored after `index` in `list`.
    pub fn after(list: NodeId, index: Option<usize>) -> Self {
        Self {
            list,
            index,
            side: Side::After,
        }
    }

    #[must_use]
    /// Position at which an item moved to this target is inserted.
    pub fn insertion_point(&self) -> usize {
        match (self.side, self.index) {
            (Side::Before, Some(i)) => i,
            (Side::After, Some(i)) => i + 1,
            (_, None) => 0,
        }
    }

    /// Moves the anchor past an item just inserted at an `After` target.
    ///
    /// Successive moves to the same `After` target therefore land in chronological order,
    /// while `Before` targets stay put and stack the newest item on top.
    pub fn advance(&mut self) {
        if self.side == Side::After {
            self.index = Some(self.index.map_or(0, |i| i + 1));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Targets owned by the store that commands can move items to.
pub enum TargetSlot {
    /// The user-settable mark.
    Mark,
    /// The built-in Done list.
    Done,
    /// The built-in Trash list.
    Trash,
}
