//! Key bindings: turns a key press into a command on the session.

use crate::app_state::{AppState, DialogKind, Mode, MoveStep};
use crate::error::OutlineResult;
use crate::target::TargetSlot;
use edtui::{EditorEventHandler, EditorMode};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Dispatches one key press according to the current mode.
///
/// # Errors
///
/// Returns [`crate::OutlineError::Internal`] when a command finds the outline
/// inconsistent; the session should stop without saving.
pub fn handle_key(
    app: &mut AppState,
    key: KeyEvent,
    editor_handler: &mut EditorEventHandler,
) -> OutlineResult<()> {
    match app.mode {
        Mode::Normal => handle_normal(app, key),
        Mode::Move => handle_move(app, key),
        Mode::Dialog => handle_dialog(app, key, editor_handler),
    }
}

fn handle_normal(app: &mut AppState, key: KeyEvent) -> OutlineResult<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c' | 'q') => app.quit(),
            KeyCode::Char('t') => app.store.toggle_all_tags(),
            _ => {}
        }
        return Ok(());
    }

    let store = &mut app.store;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => store.next_item()?,
        KeyCode::Char('k') | KeyCode::Up => store.prev_item()?,
        KeyCode::Char('J' | '$' | '-' | 'G') | KeyCode::End => store.last_item()?,
        KeyCode::Char('K' | '0' | 'g') | KeyCode::Home => store.first_item()?,
        KeyCode::Char('<' | 'u') | KeyCode::Left => store.ascend()?,
        KeyCode::Char('>') | KeyCode::Enter | KeyCode::Right => store.descend()?,
        KeyCode::Char(' ') => app.toggle_and_advance()?,
        KeyCode::Char('t') => store.set_mark()?,
        KeyCode::Char('T') => store.go_to_mark()?,
        KeyCode::Char('M') => app.send_to(TargetSlot::Mark)?,
        KeyCode::Char('d') => app.send_to(TargetSlot::Done)?,
        KeyCode::Char('D') => app.send_to(TargetSlot::Trash)?,
        KeyCode::Char('X') => store.expunge_trash()?,
        KeyCode::Char('F') => store.unfold_current_item()?,
        KeyCode::Char('a' | 'o') => app.open_dialog(DialogKind::Add),
        KeyCode::Char('r') => app.open_dialog(DialogKind::Replace),
        KeyCode::Char('f') => app.open_dialog(DialogKind::Fold),
        KeyCode::Char('m') => app.start_move(),
        KeyCode::Char('S') => app.save(),
        KeyCode::Char('L') => app.reload(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
    Ok(())
}

fn handle_move(app: &mut AppState, key: KeyEvent) -> OutlineResult<()> {
    match key.code {
        KeyCode::Char('k') | KeyCode::Up => app.move_selected(MoveStep::Up)?,
        KeyCode::Char('j') | KeyCode::Down => app.move_selected(MoveStep::Down)?,
        KeyCode::Char('K' | '0') | KeyCode::Home => app.move_selected(MoveStep::Top)?,
        KeyCode::Char('J' | 'e' | '-') | KeyCode::End => app.move_selected(MoveStep::Bottom)?,
        KeyCode::Char('q') | KeyCode::Enter | KeyCode::Esc => app.finish_move(),
        _ => {}
    }
    Ok(())
}

fn handle_dialog(
    app: &mut AppState,
    key: KeyEvent,
    editor_handler: &mut EditorEventHandler,
) -> OutlineResult<()> {
    let Some(dialog) = app.dialog.as_mut() else {
        app.mode = Mode::Normal;
        return Ok(());
    };
    match key.code {
        KeyCode::Enter if dialog.completes_on_enter() => app.finish_dialog(),
        KeyCode::Esc if dialog.editor.mode == EditorMode::Normal => {
            app.cancel_dialog();
            Ok(())
        }
        _ => {
            editor_handler.on_key_event(key, &mut dialog.editor);
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "tests/keymap.rs"]
mod tests;
