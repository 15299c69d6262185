//! The UI renders the session into three panes plus an optional dialog.
//!
//! The main pane lists the current list's items, the status pane summarises the
//! outline, and the message pane shows the newest log messages. Narrow terminals
//! stack the panes; wide ones put the list on the left.

use crate::app_state::{AppState, Mode};
use crate::config::Config;
use crate::store::OutlineStore;
use edtui::{EditorTheme, EditorView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Terminals narrower than this stack the panes vertically.
pub const WIDE_LAYOUT_MIN_WIDTH: u16 = 80;

const STATUS_HEIGHT: u16 = 7;
const DIALOG_WIDTH: u16 = 50;

/// Renders every pane, then the dialog on top if one is open.
pub fn draw(f: &mut Frame, app: &mut AppState, cfg: &Config) {
    let (main, status, messages) = pane_areas(f.area(), cfg.main_pane_max_width);
    draw_main(f, &app.store, app.mode == Mode::Move, main);
    draw_status(f, app, status);
    draw_messages(f, app, messages);
    draw_dialog(f, app);
}

/// Splits the screen into the main, status and message areas.
#[must_use]
pub fn pane_areas(area: Rect, main_max_width: u16) -> (Rect, Rect, Rect) {
    if area.width < WIDE_LAYOUT_MIN_WIDTH {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(STATUS_HEIGHT),
                Constraint::Length(8),
            ])
            .split(area);
        return (rows[0], rows[1], rows[2]);
    }

    let main_width = main_max_width.min(area.width.saturating_sub(40));
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(main_width), Constraint::Min(0)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(STATUS_HEIGHT), Constraint::Min(0)])
        .split(cols[1]);
    (cols[0], right[0], right[1])
}

/// Display text for one item: a cursor marker, the label, and a sub-list hint.
#[must_use]
pub fn item_text(
    store: &OutlineStore,
    index: usize,
    selected: Option<usize>,
    moving: bool,
) -> String {
    let id = store.items()[index];
    let node = store.node(id);
    let prefix = match selected {
        Some(i) if i == index && moving => "▲▼",
        Some(i) if i == index => ">>",
        _ => "- ",
    };
    let suffix = if node.has_children() { " ▼" } else { "" };
    format!("{prefix}{}{suffix}", node.label)
}

fn draw_main(f: &mut Frame, store: &OutlineStore, moving: bool, area: Rect) {
    let selected = store.current_item_index().ok().flatten();
    let items: Vec<ListItem> = (0..store.items().len())
        .map(|i| {
            let tagged = store.node(store.items()[i]).tagged;
            let style = if tagged {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(item_text(store, i, selected, moving)).style(style)
        })
        .collect();

    let title = format!("▶ {}", store.node(store.current_list()).label);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    state.select(selected);
    f.render_stateful_widget(list, area, &mut state);
}

/// Status pane lines: dirty flag, mode, outline size, location and mark.
#[must_use]
pub fn status_lines(app: &AppState) -> Vec<String> {
    let store = &app.store;
    let dirty = if store.is_dirty() { "DIRTY" } else { "NOT dirty" };
    let mode = match app.mode {
        Mode::Normal => "NORMAL",
        Mode::Move => "MOVE",
        Mode::Dialog => "DIALOG",
    };
    let (count, depth) = store.analyze();
    let path = store.tree().path(store.current_list()).join(" / ");
    let mark = if store.mark().is_some() {
        "Target set"
    } else {
        "Target not set"
    };
    vec![
        format!("{dirty} | {mode}"),
        format!("{count} items, depth {depth}"),
        path,
        mark.to_string(),
        app.file.path().display().to_string(),
    ]
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect) {
    let lines: Vec<Line> = status_lines(app).into_iter().map(Line::from).collect();
    let status =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_messages(f: &mut Frame, app: &AppState, area: Rect) {
    let visible = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = app
        .messages
        .recent(visible)
        .into_iter()
        .map(Line::from)
        .collect();
    let pane =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Messages"));
    f.render_widget(pane, area);
}

fn draw_dialog(f: &mut Frame, app: &mut AppState) {
    let Some(dialog) = app.dialog.as_mut() else {
        return;
    };
    let height = if dialog.kind.multiline() { 10 } else { 4 };
    let area = centered(f.area(), DIALOG_WIDTH, height);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(dialog.kind.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let editor = EditorView::new(&mut dialog.editor)
        .theme(EditorTheme::default())
        .wrap(true);
    f.render_widget(editor, inner);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
