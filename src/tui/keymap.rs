//! Key bindings per session state.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::to_input_request;

use crate::session::{Intent, SessionState};

fn is_ctrl(key: KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

pub(crate) fn is_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc) || is_ctrl(key, 'c')
}

pub(crate) fn is_refresh(key: KeyEvent) -> bool {
    is_ctrl(key, 'r')
}

pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter)
}

pub(crate) fn is_up(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::BackTab => true,
        KeyCode::Tab => key.modifiers.contains(KeyModifiers::SHIFT),
        _ => false,
    }
}

pub(crate) fn is_down(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Down => true,
        KeyCode::Tab => !key.modifiers.contains(KeyModifiers::SHIFT),
        _ => false,
    }
}

pub(crate) fn is_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab)
}

/// Map a key press to an intent for the current state.
pub fn intent_for(state: &SessionState, key: KeyEvent) -> Option<Intent> {
    if is_quit(key) {
        return Some(Intent::Quit);
    }

    match state {
        SessionState::Browsing { .. } => {
            // Refresh is checked first so Ctrl+R never doubles as navigation.
            if is_refresh(key) {
                Some(Intent::Refresh)
            } else if is_confirm(key) {
                Some(Intent::Activate)
            } else if is_up(key) {
                Some(Intent::Previous)
            } else if is_down(key) {
                Some(Intent::Next)
            } else {
                None
            }
        }
        SessionState::Editing { .. } => {
            if is_confirm(key) {
                Some(Intent::Activate)
            } else {
                to_input_request(&Event::Key(key)).map(Intent::Type)
            }
        }
        SessionState::Confirming { .. } => {
            if is_confirm(key) {
                Some(Intent::Activate)
            } else if is_toggle(key) {
                Some(Intent::Toggle)
            } else {
                None
            }
        }
        SessionState::Loading | SessionState::Error(_) | SessionState::Done => None,
    }
}
