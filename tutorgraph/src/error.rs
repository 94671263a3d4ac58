//! Graph execution error types.
//!
//! Used by `TutorGraph::invoke`, `LlmClient` implementations, and the
//! env-based configuration loader.

use thiserror::Error;

use crate::memory::CheckpointError;

/// Graph execution error.
///
/// Returned by `TutorGraph::invoke` when a turn fails. The server maps
/// `Llm` to an upstream error and `Checkpoint` the same way; `Config` only
/// occurs at startup.
#[derive(Debug, Error)]
pub enum TutorError {
    /// LLM call failed (request build, API error, or empty completion).
    #[error("llm call failed: {0}")]
    Llm(String),
    /// Checkpoint load or save failed.
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    /// Invalid or missing configuration at build time.
    #[error("configuration error: {0}")]
    Config(String),
}
