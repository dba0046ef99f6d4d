//! Background generation rounds.
//!
//! Each round runs as its own task and reports `(epoch, result)` over a
//! channel. Starting a round aborts the previous one.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::commit::{CommitCandidate, GenerationRequest, generate};
use crate::error::GenerationError;
use crate::llm::{CompletionBackend, RetryPolicy};
use crate::session::Epoch;

/// Result of one generation round, tagged with the round that produced it.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub epoch: Epoch,
    pub result: Result<Vec<CommitCandidate>, GenerationError>,
}

pub struct GenerationWorker {
    backend: Arc<dyn CompletionBackend>,
    policy: RetryPolicy,
    tx: mpsc::UnboundedSender<GenerationOutcome>,
    task: Option<JoinHandle<()>>,
}

impl GenerationWorker {
    /// Create a worker and the receiver its outcomes arrive on.
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        policy: RetryPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<GenerationOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Self {
            backend,
            policy,
            tx,
            task: None,
        };
        (worker, rx)
    }

    /// Start a round for `epoch`, aborting any round still in flight.
    pub fn spawn(&mut self, epoch: Epoch, request: GenerationRequest) {
        self.cancel();

        let backend = Arc::clone(&self.backend);
        let policy = self.policy;
        let tx = self.tx.clone();

        debug!("Starting generation round {}", epoch);
        self.task = Some(tokio::spawn(async move {
            let result = generate(backend.as_ref(), &policy, &request, epoch.value()).await;
            // The receiver is gone once the session has ended.
            let _ = tx.send(GenerationOutcome { epoch, result });
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}
