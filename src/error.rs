//! Error types for commitai modules using thiserror.

use thiserror::Error;

/// Errors raised while building the session configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing OPENAI_API_KEY environment variable")]
    MissingCredential,

    #[error("Only 1 to 5 commit messages are allowed (got {0})")]
    CountOutOfRange(u32),
}

/// Errors from the commit message generation pipeline.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("No diff provided. Stage your changes with `git add` first.")]
    EmptyDiff,

    #[error("Backend returned no completion text")]
    EmptyCompletion,

    #[error("Backend returned malformed commit messages: {0}")]
    Malformed(String),

    #[error("Completion request failed: {0}")]
    Backend(String),

    #[error("Failed to generate commit messages after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<GenerationError>,
    },
}

impl GenerationError {
    /// Whether another attempt against the backend could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::EmptyCompletion | GenerationError::Malformed(_)
        )
    }
}

/// Errors from git collaborator operations.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("git executable not found in PATH")]
    NotInstalled,

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {operation} exited with code {code}: {stderr}")]
    NonZeroExit {
        operation: String,
        code: i32,
        stderr: String,
    },

    #[error("Failed to read repository: {0}")]
    Repository(#[source] git2::Error),

    #[error("Failed to write commit message file: {0}")]
    MessageFile(#[source] std::io::Error),
}

/// Errors from the interactive terminal front end.
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Git(#[from] ShellError),
}
