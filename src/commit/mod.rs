//! Commit message candidates and the generation pipeline.

pub mod candidate;
pub mod pipeline;
pub mod prompt;

pub use candidate::{CommitCandidate, parse_candidates};
pub use pipeline::{GenerationRequest, generate};
pub use prompt::{PromptTemplate, select_template};
