//! Checkpointer trait and errors: per-session conversation snapshots.

use async_trait::async_trait;
use thiserror::Error;

use crate::message::Conversation;

/// Checkpoint load/save error.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Underlying storage failed (I/O, database).
    #[error("checkpoint storage error: {0}")]
    Storage(String),
    /// State could not be serialized or deserialized.
    #[error("checkpoint serialization error: {0}")]
    Serialization(String),
}

/// Stores and retrieves the conversation for a session.
///
/// Keyed by the opaque session identifier. `load` returns `None` for a
/// session that has never been saved; `save` overwrites the previous
/// snapshot for the session.
///
/// **Interaction**: Called by `TutorGraph::invoke` before and after each
/// LLM turn.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Load the latest conversation snapshot for the session, if any.
    async fn load(&self, session_id: &str) -> Result<Option<Conversation>, CheckpointError>;

    /// Save the conversation snapshot for the session, replacing any prior one.
    async fn save(
        &self,
        session_id: &str,
        conversation: &Conversation,
    ) -> Result<(), CheckpointError>;

    /// Short label for health reporting ("memory", "sqlite").
    fn checkpoint_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Both error variants render their message.
    #[test]
    fn checkpoint_error_display() {
        let s = CheckpointError::Storage("db locked".into()).to_string();
        assert!(s.contains("storage"), "Display: {}", s);
        assert!(s.contains("db locked"), "Display: {}", s);
        let s = CheckpointError::Serialization("bad json".into()).to_string();
        assert!(s.contains("serialization"), "Display: {}", s);
    }
}
