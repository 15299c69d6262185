//! The interactive session bridging the outline store and the terminal.
//!
//! `AppState` owns the store for the whole run together with the file it came from,
//! the input mode, and the text-entry dialog when one is open. Every user command ends
//! up here as a method that calls into the store; the UI then redraws from the store.

use crate::error::OutlineResult;
use crate::logging::MessageLog;
use crate::storage::OutlineFile;
use crate::store::OutlineStore;
use crate::target::TargetSlot;
use edtui::{EditorMode, EditorState, Lines};
use log::{error, info};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Determines how keystrokes are interpreted.
pub enum Mode {
    /// Navigation and single-key commands.
    Normal,
    /// `j`/`k`-style keys reorder the selected item instead of moving the cursor.
    Move,
    /// Keys go to the open text-entry dialog.
    Dialog,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// What a text-entry dialog's result is used for.
pub enum DialogKind {
    /// Add one item per non-blank line.
    Add,
    /// Replace the selected item's label.
    Replace,
    /// Fold tagged items under a new item with this label.
    Fold,
}

impl DialogKind {
    #[must_use]
    /// Title shown on the dialog frame.
    pub fn title(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Replace => "Replace",
            Self::Fold => "Fold",
        }
    }

    #[must_use]
    /// Multi-line dialogs finish on Enter only once the last line is left blank.
    pub fn multiline(self) -> bool {
        matches!(self, Self::Add)
    }
}

/// A text-entry dialog in progress.
pub struct Dialog {
    /// Purpose of the entered text.
    pub kind: DialogKind,
    /// Editor buffer holding the text typed so far.
    pub editor: EditorState,
}

impl Dialog {
    fn new(kind: DialogKind, prefill: &str) -> Self {
        let mut editor = EditorState::new(Lines::from(prefill));
        editor.mode = EditorMode::Insert;
        Self { kind, editor }
    }

    #[must_use]
    /// Current buffer contents, one string per line.
    pub fn lines(&self) -> Vec<String> {
        self.editor
            .lines
            .iter_row()
            .map(|line| line.iter().collect::<String>())
            .collect()
    }

    #[must_use]
    /// Whether pressing Enter now should complete the dialog.
    pub fn completes_on_enter(&self) -> bool {
        if !self.kind.multiline() {
            return true;
        }
        self.lines()
            .last()
            .is_none_or(|line| line.trim().is_empty())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Where move mode sends the selected item.
pub enum MoveStep {
    /// One position up.
    Up,
    /// One position down.
    Down,
    /// To the top of the list.
    Top,
    /// To the bottom of the list.
    Bottom,
}

/// Session state: the outline, its file, and the input mode.
pub struct AppState {
    /// The outline being edited.
    pub store: OutlineStore,
    /// Where the outline is saved and loaded.
    pub file: OutlineFile,
    /// Active input mode.
    pub mode: Mode,
    /// Open text-entry dialog, if any.
    pub dialog: Option<Dialog>,
    /// Messages shown in the message pane.
    pub messages: MessageLog,
    /// Set once the user asked to leave.
    pub should_quit: bool,
}

impl AppState {
    #[must_use]
    /// Starts a session in normal mode.
    pub fn new(store: OutlineStore, file: OutlineFile, messages: MessageLog) -> Self {
        Self {
            store,
            file,
            mode: Mode::Normal,
            dialog: None,
            messages,
            should_quit: false,
        }
    }

    // --- Dialogs ---

    /// Opens a text-entry dialog; replacing is prefilled with the current label.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        let prefill = match kind {
            DialogKind::Replace => match self.store.current_label() {
                Some(label) => label.to_string(),
                None => return,
            },
            DialogKind::Add | DialogKind::Fold => String::new(),
        };
        self.dialog = Some(Dialog::new(kind, &prefill));
        self.mode = Mode::Dialog;
    }

    /// Closes the dialog without applying it.
    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
        self.mode = Mode::Normal;
    }

    /// Closes the dialog and applies the entered text to the outline.
    ///
    /// # Errors
    ///
    /// Propagates internal store errors.
    pub fn finish_dialog(&mut self) -> OutlineResult<()> {
        self.mode = Mode::Normal;
        let Some(dialog) = self.dialog.take() else {
            return Ok(());
        };
        let lines = dialog.lines();
        let first = lines.first().map_or("", String::as_str);
        match dialog.kind {
            DialogKind::Add => {
                for line in &lines {
                    let text = line.trim_end();
                    if !text.is_empty() {
                        self.store.append_item(text)?;
                    }
                }
            }
            DialogKind::Replace => self.store.replace_label(first),
            DialogKind::Fold => self.store.fold_tagged_under(first)?,
        }
        Ok(())
    }

    // --- Commands ---

    /// Tags or untags the selected item, then moves to the next one.
    ///
    /// # Errors
    ///
    /// Propagates internal store errors.
    pub fn toggle_and_advance(&mut self) -> OutlineResult<()> {
        self.store.toggle_tag();
        self.store.next_item()
    }

    /// Sends the selected item to the mark, Done or Trash.
    ///
    /// # Errors
    ///
    /// Propagates internal store errors.
    pub fn send_to(&mut self, slot: TargetSlot) -> OutlineResult<()> {
        self.store.move_current_item_to(slot)
    }

    /// Enters move mode.
    pub fn start_move(&mut self) {
        info!("Switched to MOVE mode.");
        self.mode = Mode::Move;
    }

    /// Returns from move mode to normal mode.
    pub fn finish_move(&mut self) {
        info!("Switched to NORMAL mode.");
        self.mode = Mode::Normal;
    }

    /// Repositions the selected item within its list; the cursor follows it.
    ///
    /// # Errors
    ///
    /// Propagates internal store errors.
    pub fn move_selected(&mut self, step: MoveStep) -> OutlineResult<()> {
        let Some(index) = self.store.current_item_index()? else {
            return Ok(());
        };
        let last = self.store.items().len() - 1;
        let target = match step {
            MoveStep::Up if index > 0 => index - 1,
            MoveStep::Top if index > 0 => 0,
            MoveStep::Down if index < last => index + 1,
            MoveStep::Bottom if index < last => last,
            _ => return Ok(()),
        };
        self.store.move_within_list(target)?;
        self.store.set_current_item(Some(target))
    }

    /// Writes the outline to its file, reporting failures in the message pane.
    pub fn save(&mut self) {
        if let Err(e) = self.file.save(&mut self.store) {
            error!("Error saving: {e}");
        }
    }

    /// Re-reads the outline file, discarding unsaved changes.
    ///
    /// On failure the current outline is kept and the error is reported.
    pub fn reload(&mut self) {
        match self.file.load() {
            Ok(store) => {
                self.store = store;
                self.mode = Mode::Normal;
            }
            Err(e) => error!("Error loading: {e}"),
        }
    }

    /// Requests the end of the session.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
