//! commitai - pick, edit and commit AI-generated commit messages.
//!
//! # Overview
//!
//! commitai reads the staged diff, asks an OpenAI-compatible backend for a
//! handful of Conventional Commits messages and lets the user choose one in
//! a small terminal UI, optionally editing the subject and confirming before
//! `git commit` runs.

pub mod app;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod session;
pub mod tui;

// Re-export commonly used types
pub use app::{App, SessionOutcome};
pub use commit::{CommitCandidate, GenerationRequest};
pub use config::{BackendConfig, SessionOptions};
pub use error::{ConfigError, GenerationError, ShellError, TuiError};
pub use git::{Git, SystemGit};
pub use session::{Effect, Epoch, Intent, Session, SessionState};
