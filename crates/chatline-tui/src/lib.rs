//! chatline-tui: Terminal UI for the chatline chat client
//!
//! This crate provides the TUI layer for chatline, including:
//! - The chat screen (transcript, input line, status bar)
//! - The loading placeholder and smooth auto-scroll
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod text;
mod transcript;
mod ui;

pub use app::App;
pub use chatline_engine;
pub use event::{Action, Event, EventHandler};

use chatline_engine::Transport;
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::debug;

/// Event poll interval. Also paces the scroll animation and spinner.
const TICK_RATE_MS: u64 = 50;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop until the user quits, and
/// restores the terminal on exit. `endpoint` is shown in the status bar.
pub async fn run_tui(
    transport: Arc<dyn Transport>,
    endpoint: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(transport, endpoint);
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.sync_view(area);
            screens::render_app(app, area, frame.buffer_mut());
        })?;

        if app.should_quit {
            break;
        }

        let Some(event) = events.next().await else {
            debug!("event source closed");
            break;
        };

        match event {
            Event::Key(key) => app.handle_action(event::key_to_action(key)),
            Event::Mouse(mouse) => app.handle_action(event::mouse_to_action(mouse)),
            Event::Paste(text) => app.paste(&text),
            Event::Tick => app.tick(),
            // Picked up by the next draw.
            Event::Resize(_, _) => {}
        }

        app.poll_session().await;
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
