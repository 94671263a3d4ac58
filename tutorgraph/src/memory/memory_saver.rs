//! In-memory checkpointer for dev and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::memory::{CheckpointError, Checkpointer};
use crate::message::Conversation;

/// In-memory checkpointer: a session → conversation map behind a mutex.
///
/// Snapshots are lost on process exit; use `SqliteSaver` for persistence.
#[derive(Default)]
pub struct MemorySaver {
    sessions: Mutex<HashMap<String, Conversation>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn load(&self, session_id: &str) -> Result<Option<Conversation>, CheckpointError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| CheckpointError::Storage("session map lock poisoned".into()))?;
        Ok(sessions.get(session_id).cloned())
    }

    async fn save(
        &self,
        session_id: &str,
        conversation: &Conversation,
    ) -> Result<(), CheckpointError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| CheckpointError::Storage("session map lock poisoned".into()))?;
        sessions.insert(session_id.to_string(), conversation.clone());
        Ok(())
    }

    fn checkpoint_type(&self) -> &'static str {
        "memory"
    }
}
