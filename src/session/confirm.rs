//! Yes/no gate shown before committing.

/// Binary choice with a configurable initial answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationGate {
    accepted: bool,
}

impl ConfirmationGate {
    pub fn new(accepted: bool) -> Self {
        Self { accepted }
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn toggle(&mut self) {
        self.accepted = !self.accepted;
    }

    /// Report the current answer. Does not change it.
    pub fn submit(&self) -> bool {
        self.accepted
    }

    pub fn label(&self) -> &'static str {
        if self.accepted { "[Y]es/no" } else { "yes/[N]o" }
    }
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new(true)
    }
}
