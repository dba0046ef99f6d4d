//! Terminal lifecycle for the inline viewport.
//!
//! The UI draws to stderr below the shell prompt instead of taking over the
//! screen, so stdout stays free for the commit summary.

use std::io::{self, Stderr, stderr};
use std::panic;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::{Terminal, TerminalOptions, Viewport};

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Enable raw mode and reserve `height` rows for the viewport.
///
/// Call [`restore`] at every exit path; [`TerminalGuard`] does this on drop.
pub fn init(height: u16) -> io::Result<Tui> {
    enable_raw_mode()?;
    Terminal::with_options(
        CrosstermBackend::new(stderr()),
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )
}

/// Leave raw mode. Idempotent.
pub fn restore() -> io::Result<()> {
    disable_raw_mode()
}

/// Restore the terminal before the panic message is printed.
///
/// Chains onto the previously installed hook.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

/// Restores the terminal when dropped, including on early returns.
pub struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore();
    }
}
