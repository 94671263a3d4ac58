//! LLM client abstraction for the tutor graph.
//!
//! The graph depends on a callable that turns a message history into the
//! next assistant reply; this module defines the trait and the mock
//! implementations used in tests.

mod mock;

#[cfg(feature = "openai")]
mod openai;

pub use mock::{FailingLlm, MockLlm};

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::TutorError;
use crate::message::Message;

/// Response from one LLM completion turn.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; `TutorGraph` writes
/// `content` into a new assistant message and returns it to the caller.
#[derive(Debug)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
}

/// LLM client: given messages, returns the next assistant reply.
///
/// Implementations: `MockLlm` (fixed or scripted replies), `FailingLlm`
/// (always errors, for failure-path tests), `ChatOpenAI` (real API,
/// feature `openai`).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, TutorError>;
}
