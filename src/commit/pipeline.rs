//! The generation pipeline: staged diff in, commit candidates out.

use tracing::{debug, info};

use crate::commit::candidate::{CommitCandidate, parse_candidates};
use crate::commit::prompt::select_template;
use crate::error::GenerationError;
use crate::llm::{CompletionBackend, RetryPolicy, retry_fixed};

/// Input of one generation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub diff: String,
    /// Requested number of candidates. The range is enforced by the caller.
    pub count: u8,
}

impl GenerationRequest {
    pub fn new(diff: impl Into<String>, count: u8) -> Self {
        Self {
            diff: diff.into(),
            count,
        }
    }
}

/// Generate commit candidates for `request`.
///
/// `round` selects the prompt template. Empty or malformed completions are
/// retried according to `policy`; the backend may return fewer candidates
/// than requested.
pub async fn generate<B>(
    backend: &B,
    policy: &RetryPolicy,
    request: &GenerationRequest,
    round: u64,
) -> Result<Vec<CommitCandidate>, GenerationError>
where
    B: CompletionBackend + ?Sized,
{
    if request.diff.trim().is_empty() {
        return Err(GenerationError::EmptyDiff);
    }

    let template = select_template(round);
    info!("Selected prompt: {}", template.id);

    let prompt = template.render(&request.diff, request.count);
    let prompt = prompt.as_str();

    let candidates = retry_fixed(
        policy,
        move |attempt| {
            debug!("Generation attempt {}/{}", attempt, policy.max_retries);
            try_generate(backend, prompt)
        },
        GenerationError::is_transient,
        |attempts, last| GenerationError::Exhausted {
            attempts,
            last: Box::new(last),
        },
    )
    .await?;

    if candidates.len() != request.count as usize {
        debug!(
            "Requested {} commit messages, backend returned {}",
            request.count,
            candidates.len()
        );
    }

    Ok(candidates)
}

/// Single attempt: one backend round-trip and a structural parse.
async fn try_generate<B>(backend: &B, prompt: &str) -> Result<Vec<CommitCandidate>, GenerationError>
where
    B: CompletionBackend + ?Sized,
{
    let choices = backend.complete(prompt).await?;

    let text = choices
        .into_iter()
        .next()
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyCompletion)?;

    parse_candidates(&text)
}
