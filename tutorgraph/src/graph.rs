//! TutorGraph: checkpointed single-turn tutor invocation.
//!
//! One invoke is one conversation turn: load the session's conversation
//! from the checkpointer (or seed a fresh one with the system prompt),
//! append the user message, call the LLM, append and persist the reply,
//! return the reply text.
//!
//! **Interaction**: Consumed by the server's chat gateway; the server
//! treats the graph as opaque and only sees `(prompt, session_id) → text`.

use std::sync::Arc;

use tracing::debug;

use crate::error::TutorError;
use crate::llm::LlmClient;
use crate::memory::Checkpointer;
use crate::message::{Conversation, Message};

/// System prompt seeding every fresh tutoring conversation.
pub const TUTOR_SYSTEM_PROMPT: &str = "You are a patient, encouraging tutor. \
Figure out what the student wants (an explanation, a simplified walkthrough, \
or a quiz) and respond accordingly. Keep answers concrete and build on the \
conversation so far.";

/// Checkpointed tutor graph: an LLM client plus a per-session checkpointer.
pub struct TutorGraph {
    llm: Box<dyn LlmClient>,
    checkpointer: Arc<dyn Checkpointer>,
    system_prompt: String,
}

impl TutorGraph {
    /// Build a graph from an LLM client and a checkpointer, with the
    /// default system prompt.
    pub fn new(llm: Box<dyn LlmClient>, checkpointer: Arc<dyn Checkpointer>) -> Self {
        Self {
            llm,
            checkpointer,
            system_prompt: TUTOR_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Override the system prompt seeding fresh conversations.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Run one conversation turn for the session and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::Checkpoint` if loading or saving the session
    /// fails, and `TutorError::Llm` if the completion fails or comes back
    /// empty.
    pub async fn invoke(&self, prompt: &str, session_id: &str) -> Result<String, TutorError> {
        let mut conversation = self
            .checkpointer
            .load(session_id)
            .await?
            .unwrap_or_else(|| Conversation::with_system_prompt(&self.system_prompt));
        conversation.push(Message::user(prompt));

        debug!(
            session_id,
            messages = conversation.len(),
            "invoking llm for session"
        );
        let response = self.llm.invoke(&conversation.messages).await?;
        if response.content.is_empty() {
            return Err(TutorError::Llm("no response generated".into()));
        }

        conversation.push(Message::assistant(response.content.clone()));
        self.checkpointer.save(session_id, &conversation).await?;
        Ok(response.content)
    }

    /// Label of the backing checkpointer, for health reporting.
    pub fn checkpoint_type(&self) -> &'static str {
        self.checkpointer.checkpoint_type()
    }
}
