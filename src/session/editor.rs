//! Single-line editor for the commit subject.

use tui_input::{Input, InputRequest};

#[derive(Debug, Clone, Default)]
pub struct Editor {
    input: Input,
}

impl Editor {
    /// Editor pre-filled with `initial`, cursor at the end.
    pub fn new(initial: &str) -> Self {
        Self {
            input: Input::new(initial.to_string()),
        }
    }

    /// Replace the whole value.
    pub fn change(&mut self, value: impl Into<String>) {
        self.input = Input::new(value.into());
    }

    /// Apply one editing keystroke (insert, delete, cursor movement).
    pub fn apply(&mut self, request: InputRequest) {
        self.input.handle(request);
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// The value as typed. No trimming, no length cap.
    pub fn submit(&self) -> String {
        self.input.value().to_string()
    }

    /// Backing input, for cursor placement when rendering.
    pub fn input(&self) -> &Input {
        &self.input
    }
}
