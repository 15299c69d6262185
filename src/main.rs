//! nestlist: A keyboard-driven outline editor.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::EditorEventHandler;
use nestlist::{app_state, config, export, keymap, logging, storage, ui, OutlineError};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nestlist")]
#[command(about = "Edit an outline of nested lists", long_about = None)]
struct Args {
    /// Outline file to edit
    #[arg(long, short = 'f', value_name = "PATH")]
    file: Option<PathBuf>,

    /// Suffix for the backup written before each save (empty disables backups)
    #[arg(long, short = 'b', value_name = "SUFFIX")]
    backup_suffix: Option<String>,

    /// Print the outline as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Config file to read instead of nestlist.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut cfg = config::Config::load(args.config.as_deref());

    // Override config with command line args
    if let Some(file) = args.file {
        cfg.file = file.to_string_lossy().into_owned();
    }
    if let Some(suffix) = args.backup_suffix {
        cfg.backup_suffix = suffix;
    }

    let messages = logging::MessageLog::new(cfg.message_history);
    if let Err(e) = messages.install(logging::parse_level(&cfg.log_level)) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let file = storage::OutlineFile::new(&cfg.file, &cfg.backup_suffix);
    let store = match file.load_or_init() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.dump {
        let snapshot = export::OutlineSnapshot::capture(store.tree(), store.root());
        return match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let app = app_state::AppState::new(store, file, messages);
    match run_tui(app, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_tui(mut app: app_state::AppState, cfg: &config::Config) -> Result<(), SessionError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, cfg, &mut editor_handler);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Internal errors end the session without touching the file.
    result?;

    if app.store.is_dirty() && confirm_save()? {
        app.file.save(&mut app.store)?;
        println!("Saved to {}.", app.file.path().display());
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
    cfg: &config::Config,
    editor_handler: &mut EditorEventHandler,
) -> Result<(), SessionError> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app, cfg))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            keymap::handle_key(app, key, editor_handler)?;
        }
    }
    Ok(())
}

/// Asks on the restored terminal whether to save unsaved changes.
fn confirm_save() -> io::Result<bool> {
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "Outline has unsaved changes; save first? [y/n] ")?;
        stdout.flush()?;
        enable_raw_mode()?;
        let answer = loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    break key.code;
                }
            }
        };
        disable_raw_mode()?;
        writeln!(stdout)?;
        match answer {
            KeyCode::Char('y' | 'Y') => return Ok(true),
            KeyCode::Char('n' | 'N') => return Ok(false),
            _ => {}
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum SessionError {
    #[error(transparent)]
    Terminal(#[from] io::Error),
    #[error(transparent)]
    Outline(#[from] OutlineError),
}
