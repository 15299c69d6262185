//! The outline store: one tree, one cursor, and the targets items can be sent to.
//!
//! Every change to the outline goes through [`OutlineStore`]. Operations that a user can
//! trigger at a bad moment (unfolding a leaf, renaming with nothing selected) are logged
//! and ignored. Operations that find the store's own bookkeeping inconsistent return
//! [`OutlineError::Internal`] instead of guessing.
//!
//! The cursor is a pair: `current_list`, the node whose children are on screen, and
//! `current_item`, the selected child (absent only when that list is empty).

use crate::codec::Decoded;
use crate::error::{OutlineError, OutlineResult};
use crate::node::{Node, NodeId, Tree};
use crate::target::{Target, TargetSlot};
use log::{info, warn};

/// Label of the root node.
pub const ROOT_LABEL: &str = "root";
/// Label of the built-in Done container.
pub const DONE_LABEL: &str = "[[DONE]]";
/// Label of the built-in Trash container.
pub const TRASH_LABEL: &str = "[[TRASH]]";

#[derive(Clone, Debug)]
/// Outline tree plus cursor, bookmarks and dirty tracking.
pub struct OutlineStore {
    tree: Tree,
    current_list: NodeId,
    current_item: Option<NodeId>,
    mark: Option<Target>,
    done: Option<Target>,
    trash: Option<Target>,
    dirty: bool,
}

impl Default for OutlineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineStore {
    #[must_use]
    /// Bootstraps an empty outline holding only the Done and Trash containers.
    pub fn new() -> Self {
        Self::assemble(Tree::new(ROOT_LABEL), None, None)
    }

    pub(crate) fn from_decoded(decoded: Decoded) -> Self {
        Self::assemble(decoded.tree, decoded.done, decoded.trash)
    }

    fn assemble(tree: Tree, done: Option<NodeId>, trash: Option<NodeId>) -> Self {
        let root = tree.root();
        let mut store = Self {
            tree,
            current_list: root,
            current_item: None,
            mark: None,
            done: done.map(Target::front_of),
            trash: trash.map(Target::front_of),
            dirty: false,
        };
        store.init();
        store
    }

    /// Finishes setting up a fresh or freshly loaded store.
    ///
    /// Creates whichever of the Done/Trash containers is missing at the end of the root
    /// list (which leaves the store dirty), then puts the cursor on the root's first item.
    pub fn init(&mut self) {
        self.dirty = false;
        let root = self.tree.root();
        self.ensure_builtin_lists();
        self.current_list = root;
        self.current_item = self.tree[root].children.first().copied();
    }

    /// Creates the Done and Trash containers if they are missing or no longer in the tree.
    fn ensure_builtin_lists(&mut self) {
        let builtins = [(TargetSlot::Done, DONE_LABEL), (TargetSlot::Trash, TRASH_LABEL)];
        for (slot, label) in builtins {
            let live = self.target(slot).map(|target| self.is_live(target.list));
            if live == Some(false) {
                warn!("The {label} list was removed; recreating it.");
            }
            if live != Some(true) {
                let list = self.push_top_level(label);
                *self.target_mut(slot) = Some(Target::front_of(list));
            }
        }
    }

    fn push_top_level(&mut self, label: &str) -> NodeId {
        let root = self.tree.root();
        let id = self.tree.alloc(label);
        self.tree[root].children.push(id);
        self.tree[id].parent = Some(root);
        self.dirty = true;
        id
    }

    // --- Read access ---

    #[must_use]
    /// The underlying node arena.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[must_use]
    /// Borrows a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.tree[id]
    }

    #[must_use]
    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    #[must_use]
    /// Node whose children are currently displayed.
    pub fn current_list(&self) -> NodeId {
        self.current_list
    }

    #[must_use]
    /// Selected item in the current list, if the list is non-empty.
    pub fn current_item(&self) -> Option<NodeId> {
        self.current_item
    }

    #[must_use]
    /// Children of the current list.
    pub fn items(&self) -> &[NodeId] {
        &self.tree[self.current_list].children
    }

    #[must_use]
    /// Labels of the current list's children, in order.
    pub fn item_labels(&self) -> Vec<&str> {
        self.items()
            .iter()
            .map(|&id| self.tree[id].label.as_str())
            .collect()
    }

    #[must_use]
    /// Label of the selected item, if any.
    pub fn current_label(&self) -> Option<&str> {
        self.current_item.map(|id| self.tree[id].label.as_str())
    }

    #[must_use]
    /// Whether the in-memory outline differs from what was last saved or loaded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
    }

    #[must_use]
    /// The user mark, if set.
    pub fn mark(&self) -> Option<&Target> {
        self.mark.as_ref()
    }

    #[must_use]
    /// One of the store-owned targets.
    pub fn target(&self, slot: TargetSlot) -> Option<&Target> {
        match slot {
            TargetSlot::Mark => self.mark.as_ref(),
            TargetSlot::Done => self.done.as_ref(),
            TargetSlot::Trash => self.trash.as_ref(),
        }
    }

    fn target_mut(&mut self, slot: TargetSlot) -> &mut Option<Target> {
        match slot {
            TargetSlot::Mark => &mut self.mark,
            TargetSlot::Done => &mut self.done,
            TargetSlot::Trash => &mut self.trash,
        }
    }

    #[must_use]
    /// Whether `id` is the Done or Trash container.
    pub fn is_builtin(&self, id: NodeId) -> bool {
        [self.done, self.trash]
            .iter()
            .flatten()
            .any(|target| target.list == id)
    }

    #[must_use]
    /// Node count and depth of the whole outline.
    pub fn analyze(&self) -> (usize, usize) {
        self.tree.analyze(self.tree.root())
    }

    fn is_live(&self, id: NodeId) -> bool {
        self.tree.contains(id) && self.tree.is_ancestor(self.tree.root(), id)
    }

    // --- Cursor ---

    /// Selects the item at `index` in the current list.
    ///
    /// `None`, or any index on an empty list, clears the selection.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if `index` is past the end of a non-empty list.
    pub fn set_current_item(&mut self, index: Option<usize>) -> OutlineResult<()> {
        let items = &self.tree[self.current_list].children;
        self.current_item = match index {
            None => None,
            Some(_) if items.is_empty() => None,
            Some(i) if i < items.len() => Some(items[i]),
            Some(i) => {
                return Err(OutlineError::internal(format!(
                    "bad cursor index {i} (len = {})",
                    items.len()
                )))
            }
        };
        Ok(())
    }

    /// Position of the selected item in the current list.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if an item is selected but is not a child of
    /// the current list.
    pub fn current_item_index(&self) -> OutlineResult<Option<usize>> {
        let Some(item) = self.current_item else {
            return Ok(None);
        };
        self.items()
            .iter()
            .position(|&kid| kid == item)
            .map(Some)
            .ok_or_else(|| OutlineError::internal("current item not on current list"))
    }

    fn selected_index(&self) -> OutlineResult<usize> {
        self.current_item_index()?
            .ok_or_else(|| OutlineError::internal("no current item"))
    }

    #[must_use]
    /// Position of `node` in the current list, if it is there.
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.items().iter().position(|&kid| kid == node)
    }

    // --- Mutation ---

    /// Adds an item right after the selection (or at the top of an empty list) and
    /// selects it.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the cursor is inconsistent.
    pub fn append_item(&mut self, label: &str) -> OutlineResult<NodeId> {
        let pos = self.current_item_index()?.map_or(0, |i| i + 1);
        let id = self.tree.alloc(normalize_label(label));
        self.tree.insert_child(self.current_list, pos, id)?;
        self.set_current_item(Some(pos))?;
        self.dirty = true;
        Ok(id)
    }

    /// Overwrites the selected item's label.
    pub fn replace_label(&mut self, text: &str) {
        let Some(item) = self.current_item else {
            info!("No item to replace.");
            return;
        };
        self.tree[item].label = normalize_label(text);
        self.dirty = true;
    }

    /// Flips the tag on the selected item.
    pub fn toggle_tag(&mut self) {
        if let Some(item) = self.current_item {
            let node = &mut self.tree[item];
            node.tagged = !node.tagged;
        }
    }

    /// Sets every item in the list to the opposite of the selected item's tag.
    pub fn toggle_all_tags(&mut self) {
        let Some(item) = self.current_item else {
            return;
        };
        let tagged = !self.tree[item].tagged;
        for kid in self.tree[self.current_list].children.clone() {
            self.tree[kid].tagged = tagged;
        }
    }

    /// Moves the selected item to `new_index` within its own list.
    ///
    /// Indices past the end are clamped to the last position. The item stays selected.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the cursor is inconsistent.
    pub fn move_within_list(&mut self, new_index: usize) -> OutlineResult<()> {
        let Some(index) = self.current_item_index()? else {
            info!("No item to move.");
            return Ok(());
        };
        let kids = &mut self.tree[self.current_list].children;
        let new_index = new_index.min(kids.len() - 1);
        if new_index == index {
            return Ok(());
        }
        let item = kids.remove(index);
        kids.insert(new_index, item);
        self.dirty = true;
        Ok(())
    }

    /// Bookmarks the gap after the selected item.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the cursor is inconsistent.
    pub fn set_mark(&mut self) -> OutlineResult<()> {
        self.mark = Some(Target::after(
            self.current_list,
            self.current_item_index()?,
        ));
        info!("Target set.");
        Ok(())
    }

    /// Moves the cursor to the mark.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the cursor cannot be placed.
    pub fn go_to_mark(&mut self) -> OutlineResult<()> {
        let Some(mark) = self.mark else {
            info!("Target not set.");
            return Ok(());
        };
        if !self.is_live(mark.list) {
            warn!("Target list no longer exists; target cleared.");
            self.mark = None;
            return Ok(());
        }
        self.current_list = mark.list;
        let len = self.items().len();
        let index = match mark.index {
            Some(i) if len > 0 && i >= len => {
                warn!("Target pointing beyond list (idx={i} vs len={len}).");
                Some(len - 1)
            }
            other => other,
        };
        self.set_current_item(index)?;
        info!("Jumped to Target.");
        Ok(())
    }

    /// Relocates the selected item into the gap `target` addresses.
    ///
    /// The item's former successor (or predecessor, if it was last) becomes selected.
    /// `After` targets advance past the inserted item so that repeated moves keep
    /// chronological order; `Before` targets stack the newest item first.
    ///
    /// Refused, with a log message, when there is nothing selected, when the target list
    /// is gone, when it lies inside the item itself, or when the item is the Done or
    /// Trash container.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the cursor is inconsistent.
    pub fn move_current_item_to_target(&mut self, target: &mut Target) -> OutlineResult<()> {
        let Some(item) = self.current_item else {
            info!("No current list or item.");
            return Ok(());
        };
        if !self.is_live(target.list) {
            warn!("Target list no longer exists.");
            return Ok(());
        }
        if self.tree.is_ancestor(item, target.list) {
            info!("Cannot move an item into itself.");
            return Ok(());
        }
        if self.is_builtin(item) {
            info!("Cannot move the {} list.", self.tree[item].label);
            return Ok(());
        }

        let index = self.selected_index()?;
        self.tree.remove_child(self.current_list, index)?;
        let kids = &self.tree[self.current_list].children;
        let successor = kids.get(index).or_else(|| kids.last()).copied();

        let len = self.tree[target.list].children.len();
        let mut pos = target.insertion_point();
        if pos > len {
            if len > 0 {
                warn!("Target pointing beyond list (idx={pos} vs maxidx={len}).");
            }
            pos = len;
        }
        self.tree.insert_child(target.list, pos, item)?;
        target.advance();

        self.current_item = successor;
        self.dirty = true;
        Ok(())
    }

    /// Moves the selected item to one of the store-owned targets.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the cursor is inconsistent.
    pub fn move_current_item_to(&mut self, slot: TargetSlot) -> OutlineResult<()> {
        let Some(mut target) = self.target_mut(slot).take() else {
            info!("Target not set.");
            return Ok(());
        };
        let result = self.move_current_item_to_target(&mut target);
        *self.target_mut(slot) = Some(target);
        result
    }

    /// Groups the tagged items of the current list under a new item labelled `label`.
    ///
    /// The new item takes the place of the first tagged item, holds the tagged items in
    /// their original order, and becomes selected. Tags are cleared. With nothing
    /// tagged this does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the fold node cannot be inserted.
    pub fn fold_tagged_under(&mut self, label: &str) -> OutlineResult<()> {
        let list = self.current_list;
        let kids = self.tree[list].children.clone();
        let Some(first_tagged) = kids.iter().position(|&kid| self.tree[kid].tagged) else {
            info!("Nothing tagged to fold.");
            return Ok(());
        };
        if let Some(&builtin) = kids
            .iter()
            .find(|&&kid| self.tree[kid].tagged && self.is_builtin(kid))
        {
            info!("Cannot fold the {} list.", self.tree[builtin].label);
            return Ok(());
        }

        let (tagged, untagged): (Vec<NodeId>, Vec<NodeId>) =
            kids.into_iter().partition(|&kid| self.tree[kid].tagged);
        let fold = self.tree.alloc(normalize_label(label));
        for &kid in &tagged {
            let node = &mut self.tree[kid];
            node.tagged = false;
            node.parent = Some(fold);
        }
        self.tree[fold].children = tagged;
        self.tree[list].children = untagged;

        let pos = first_tagged.min(self.tree[list].children.len());
        self.tree.insert_child(list, pos, fold)?;
        self.current_item = Some(fold);
        self.dirty = true;
        Ok(())
    }

    /// Replaces the selected item with its children, in order, at the same position.
    ///
    /// The cursor stays on that position, i.e. on the first unfolded child.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the cursor is inconsistent.
    pub fn unfold_current_item(&mut self) -> OutlineResult<()> {
        let Some(item) = self.current_item.filter(|&id| self.tree[id].has_children()) else {
            info!("Cannot unfold, item invalid or has no sublist.");
            return Ok(());
        };
        if self.is_builtin(item) {
            info!("Cannot unfold the {} list.", self.tree[item].label);
            return Ok(());
        }

        let index = self.selected_index()?;
        self.tree.remove_child(self.current_list, index)?;
        let kids = std::mem::take(&mut self.tree[item].children);
        for (offset, kid) in kids.into_iter().enumerate() {
            self.tree[kid].parent = None;
            self.tree.insert_child(self.current_list, index + offset, kid)?;
        }
        self.tree.release(item)?;
        self.current_item = None;
        self.repair_references(self.current_list);
        self.set_current_item(Some(index))?;
        self.dirty = true;
        Ok(())
    }

    /// Permanently deletes everything in the Trash list.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if a trashed node cannot be released.
    pub fn expunge_trash(&mut self) -> OutlineResult<()> {
        let Some(trash) = self.trash.map(|target| target.list) else {
            info!("No Trash list.");
            return Ok(());
        };
        let kids = std::mem::take(&mut self.tree[trash].children);
        if kids.is_empty() {
            return Ok(());
        }
        let mut freed = 0;
        for kid in kids {
            self.tree[kid].parent = None;
            freed += self.tree.release(kid)?;
        }
        self.repair_references(trash);
        self.dirty = true;
        info!("Expunged {freed} items from Trash.");
        Ok(())
    }

    /// Drops references into released subtrees: the mark is cleared and a cursor that
    /// pointed inside them falls back to `fallback`.
    fn repair_references(&mut self, fallback: NodeId) {
        if self.mark.is_some_and(|mark| !self.is_live(mark.list)) {
            warn!("Target was inside removed items; target cleared.");
            self.mark = None;
        }
        self.ensure_builtin_lists();
        if !self.is_live(self.current_list) {
            self.current_list = fallback;
            self.current_item = None;
        }
        if self
            .current_item
            .is_some_and(|item| !self.items().contains(&item))
        {
            self.current_item = None;
        }
        if self.current_item.is_none() {
            self.current_item = self.items().first().copied();
        }
    }

    // --- Navigation ---

    /// Selects the next item, stopping at the last one.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the cursor is inconsistent.
    pub fn next_item(&mut self) -> OutlineResult<()> {
        if let Some(index) = self.current_item_index()? {
            if index + 1 < self.items().len() {
                self.set_current_item(Some(index + 1))?;
            }
        }
        Ok(())
    }

    /// Selects the previous item, stopping at the first one.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Internal`] if the cursor is inconsistent.
    pub fn prev_item(&mut self) -> OutlineResult<()> {
        if let Some(index) = self.current_item_index()? {
            if index > 0 {
                self.set_current_item(Some(index - 1))?;
            }
        }
        Ok(())
    }

    /// Selects the first item of the current list.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the cursor error contract.
    pub fn first_item(&mut self) -> OutlineResult<()> {
        self.set_current_item(Some(0))
    }

    /// Selects the last item of the current list.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the cursor error contract.
    pub fn last_item(&mut self) -> OutlineResult<()> {
        self.set_current_item(self.items().len().checked_sub(1))
    }

    /// Opens the selected item's sub-list.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the cursor error contract.
    pub fn descend(&mut self) -> OutlineResult<()> {
        let Some(item) = self.current_item else {
            return Ok(());
        };
        self.current_list = item;
        self.set_current_item(Some(0))
    }

    /// Returns to the parent list with the cursor on the list just left.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the cursor error contract.
    pub fn ascend(&mut self) -> OutlineResult<()> {
        let Some(parent) = self.tree[self.current_list].parent else {
            return Ok(());
        };
        let left = self.current_list;
        self.current_list = parent;
        self.set_current_item(self.index_of(left))
    }
}

fn normalize_label(text: &str) -> String {
    text.trim_end().replace(['\n', '\r'], " ")
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
