//! Terminal shell: raw-mode lifecycle and the single-threaded event loop.
//!
//! Everything interactive funnels through [`run`]. The terminal is restored
//! on normal exit, on error, and on panic; while an external editor runs the
//! alternate screen is left entirely (the editor expects a normal tty).

pub mod app;
mod view;

use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};

pub use app::{App, EditRequest};

use crate::utils::editor;

type Term = Terminal<CrosstermBackend<std::io::Stdout>>;

pub fn run(mut app: App) -> Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| view::draw(frame, app))?;
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if let Some(req) = app.handle_key(key) {
                    run_edit_request(terminal, app, req)?;
                }
            }
            Event::Mouse(ev) => app.handle_mouse(ev),
            _ => {}
        }
    }
    Ok(())
}

/// The editor owns the tty for the duration of the call: leave the alternate
/// screen, run it to completion, then re-enter and force a full redraw.
fn run_edit_request(terminal: &mut Term, app: &mut App, req: EditRequest) -> Result<()> {
    stdout().execute(DisableMouseCapture)?;
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;

    let outcome = editor::edit_text(app.editor(), &req.initial);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    terminal.clear()?;

    app.finish_edit(req.path, outcome);
    Ok(())
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    terminal.show_cursor()?;
    stdout().execute(DisableMouseCapture)?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Keep panics readable: undo raw mode before the default hook prints.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = stdout().execute(DisableMouseCapture);
        let _ = stdout().execute(LeaveAlternateScreen);
        default_hook(info);
    }));
}
