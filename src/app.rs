//! Runtime around the session state machine.
//!
//! [`App`] executes the effects returned by [`Session`] transitions: it
//! starts generation rounds on the worker and runs the commit through the
//! git collaborator. The terminal front end only feeds it intents and
//! generation outcomes.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::config::SessionOptions;
use crate::error::ShellError;
use crate::git::Git;
use crate::llm::{CompletionBackend, RetryPolicy};
use crate::session::{
    Effect, GenerationOutcome, GenerationWorker, Intent, Session, SessionState, prepare,
};

/// How a finished session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A commit was made; carries git's summary output.
    Committed(String),
    /// The user declined or quit.
    Declined,
    Failed(String),
}

pub struct App {
    session: Session,
    git: Arc<dyn Git>,
    worker: GenerationWorker,
    outcomes: mpsc::UnboundedReceiver<GenerationOutcome>,
    commit_output: Option<String>,
}

impl App {
    pub fn new(
        options: SessionOptions,
        git: Arc<dyn Git>,
        backend: Arc<dyn CompletionBackend>,
        policy: RetryPolicy,
    ) -> Self {
        let (worker, outcomes) = GenerationWorker::new(backend, policy);
        Self {
            session: Session::new(options),
            git,
            worker,
            outcomes,
            commit_output: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the repository checks and start the first generation round.
    pub async fn start(&mut self) -> Result<(), ShellError> {
        let effect = prepare(&mut self.session, self.git.as_ref()).await;
        self.execute(effect).await
    }

    /// Apply an intent and execute whatever it requires.
    ///
    /// Only a failed commit is an error; everything else is reflected in
    /// the session state.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<(), ShellError> {
        let effect = self.session.apply(intent);
        self.execute(effect).await
    }

    /// Wait for the next generation outcome.
    pub async fn next_outcome(&mut self) -> Option<GenerationOutcome> {
        self.outcomes.recv().await
    }

    /// Hand a generation outcome to the session. Returns false if it was stale.
    pub fn receive(&mut self, outcome: GenerationOutcome) -> bool {
        self.session.on_generated(outcome.epoch, outcome.result)
    }

    pub fn is_finished(&self) -> bool {
        self.session.state().is_terminal()
    }

    /// How the session ended, or `None` while it is still running.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.session.state() {
            SessionState::Error(message) => Some(SessionOutcome::Failed(message.clone())),
            SessionState::Done => Some(match &self.commit_output {
                Some(output) => SessionOutcome::Committed(output.clone()),
                None => SessionOutcome::Declined,
            }),
            _ => None,
        }
    }

    async fn execute(&mut self, effect: Effect) -> Result<(), ShellError> {
        match effect {
            Effect::Generate { epoch, request } => self.worker.spawn(epoch, request),
            Effect::Commit(candidate) => {
                let output = self.git.commit(&candidate).await?;
                info!("Committed: {}", candidate.subject);
                self.commit_output = Some(output);
            }
            Effect::Exit => self.worker.cancel(),
            Effect::None => {}
        }

        if self.is_finished() {
            self.worker.cancel();
        }
        Ok(())
    }
}
