//! Session state, input intents and the effects transitions request.

use std::fmt;

use tui_input::InputRequest;

use crate::commit::{CommitCandidate, GenerationRequest};
use crate::session::{ConfirmationGate, Editor, Selector};

/// Generation round counter. Results tagged with an older epoch are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the user asked for, independent of the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Next,
    Previous,
    Activate,
    Refresh,
    Toggle,
    /// Replace the editor value.
    Change(String),
    /// One editing keystroke.
    Type(InputRequest),
    Quit,
}

/// Work the runtime must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Generate {
        epoch: Epoch,
        request: GenerationRequest,
    },
    Commit(CommitCandidate),
    /// The session ended without a commit.
    Exit,
}

#[derive(Debug)]
pub enum SessionState {
    /// A generation round is in flight.
    Loading,
    Error(String),
    Browsing {
        candidates: Vec<CommitCandidate>,
        selector: Selector,
    },
    Editing {
        draft: CommitCandidate,
        editor: Editor,
    },
    Confirming {
        pending: CommitCandidate,
        gate: ConfirmationGate,
    },
    /// Committed or declined.
    Done,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Error(_) | SessionState::Done)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::Error(_) => "error",
            SessionState::Browsing { .. } => "browsing",
            SessionState::Editing { .. } => "editing",
            SessionState::Confirming { .. } => "confirming",
            SessionState::Done => "done",
        }
    }
}
