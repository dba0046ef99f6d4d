//! Commit message candidates and parsing of the backend payload.

use serde::Deserialize;
use tracing::debug;

use crate::error::GenerationError;
use crate::llm::clean_completion;

/// One generated subject/body pair proposed as a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitCandidate {
    pub subject: String,
    pub body: String,
}

impl CommitCandidate {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Copy of this candidate with a replaced subject and the same body.
    pub fn with_subject(&self, subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: self.body.clone(),
        }
    }

    /// Whether the subject carries any non-whitespace text.
    pub fn has_subject(&self) -> bool {
        !self.subject.trim().is_empty()
    }

    /// Format the candidate as a git commit message.
    ///
    /// Produces the subject, then a blank line and the trimmed body when the
    /// body is not blank:
    /// ```text
    /// type(scope): subject
    ///
    /// - Body bullet explaining why.
    /// ```
    pub fn format(&self) -> String {
        let body = self.body.trim();
        if body.is_empty() {
            self.subject.clone()
        } else {
            format!("{}\n\n{}", self.subject, body)
        }
    }
}

/// The structured payload: exactly one property holding the messages.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CandidatePayload {
    commit_messages: Vec<RawCandidate>,
}

/// A payload entry, either `{"subject", "body"}` or a bare message string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCandidate {
    Structured {
        subject: String,
        #[serde(default)]
        body: Option<RawBody>,
    },
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBody {
    Text(String),
    Lines(Vec<String>),
}

impl RawCandidate {
    fn into_candidate(self) -> CommitCandidate {
        match self {
            RawCandidate::Structured { subject, body } => {
                let body = match body {
                    Some(RawBody::Text(text)) => text,
                    Some(RawBody::Lines(lines)) => lines.join("\n"),
                    None => String::new(),
                };
                CommitCandidate::new(subject.trim(), body.trim())
            }
            RawCandidate::Text(text) => {
                let text = text.trim();
                let (subject, body) = text.split_once('\n').unwrap_or((text, ""));
                CommitCandidate::new(subject.trim(), body.trim())
            }
        }
    }
}

/// Parse raw completion text into candidates.
///
/// The text is cleaned of boilerplate prefixes and markdown wrapping first.
/// Entries with a blank subject are dropped; a payload that yields no
/// candidates is malformed.
pub fn parse_candidates(text: &str) -> Result<Vec<CommitCandidate>, GenerationError> {
    let cleaned = clean_completion(text);

    let payload: CandidatePayload = serde_json::from_str(&cleaned).map_err(|e| {
        debug!("Raw completion: {}", text);
        GenerationError::Malformed(format!("Could not parse commit messages JSON: {e}"))
    })?;

    let candidates: Vec<CommitCandidate> = payload
        .commit_messages
        .into_iter()
        .map(RawCandidate::into_candidate)
        .filter(CommitCandidate::has_subject)
        .collect();

    if candidates.is_empty() {
        return Err(GenerationError::Malformed(
            "payload contained no usable commit messages".to_string(),
        ));
    }

    Ok(candidates)
}
