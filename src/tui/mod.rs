//! Interactive terminal front end.
//!
//! A single loop multiplexes terminal key presses, generation outcomes and
//! the spinner tick. Every input is applied to the session before the next
//! one is read.

pub mod keymap;
pub mod render;
pub mod terminal;

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tracing::debug;

use crate::app::App;
use crate::error::TuiError;
use terminal::{TerminalGuard, Tui};

const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

/// Run the session interactively until it finishes.
pub async fn run(app: &mut App) -> Result<(), TuiError> {
    terminal::install_panic_hook();
    let mut terminal = terminal::init(render::VIEWPORT_HEIGHT)?;
    let _guard = TerminalGuard;

    let result = event_loop(&mut terminal, app).await;
    let cleanup = clear_viewport(&mut terminal);
    first_error(result, cleanup)
}

fn clear_viewport(terminal: &mut Tui) -> Result<(), TuiError> {
    terminal.clear()?;
    terminal.show_cursor()?;
    Ok(())
}

/// A failed cleanup is only reported when the session itself succeeded.
fn first_error(result: Result<(), TuiError>, cleanup: Result<(), TuiError>) -> Result<(), TuiError> {
    match (result, cleanup) {
        (Err(e), Err(cleanup_err)) => {
            debug!("Terminal cleanup also failed: {}", cleanup_err);
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), cleanup) => cleanup,
    }
}

async fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<(), TuiError> {
    let mut events = EventStream::new();
    let mut spinner = tokio::time::interval(SPINNER_INTERVAL);
    let mut tick = 0usize;

    terminal.draw(|frame| render::render(frame, app.session(), tick))?;
    app.start().await?;

    loop {
        terminal.draw(|frame| render::render(frame, app.session(), tick))?;
        if app.is_finished() {
            debug!("Session finished in state {}", app.session().state().name());
            return Ok(());
        }

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(intent) = keymap::intent_for(app.session().state(), key) {
                        app.dispatch(intent).await?;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(outcome) = app.next_outcome() => {
                app.receive(outcome);
            }
            _ = spinner.tick() => {
                tick = tick.wrapping_add(1);
            }
        }
    }
}
