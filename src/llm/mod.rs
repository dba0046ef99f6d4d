//! Completion backend access, retry, and JSON recovery.

pub mod backend;
pub mod json;
pub mod retry;

pub use backend::{CompletionBackend, OpenAiBackend};
pub use json::{clean_completion, extract_json, strip_boilerplate};
pub use retry::{RetryPolicy, retry_fixed};
