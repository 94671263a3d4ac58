//! SQLite-backed checkpointer (feature `sqlite`).
//!
//! One row per session in a `checkpoints` table; state is the JSON-encoded
//! conversation. The schema is internal to this saver.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::memory::{CheckpointError, Checkpointer};
use crate::message::Conversation;

/// Persistent checkpointer over a SQLite database file.
///
/// Calls are short synchronous statements behind a mutex; the database is
/// created (with its table) on open if missing.
pub struct SqliteSaver {
    conn: Mutex<Connection>,
}

impl SqliteSaver {
    /// Open (or create) the database at `path` and ensure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let conn = Connection::open(path).map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// In-memory database, for tests that want the SQLite code path.
    pub fn open_in_memory() -> Result<Self, CheckpointError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, CheckpointError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                session_id TEXT PRIMARY KEY,
                state      BLOB NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CheckpointError> {
        self.conn
            .lock()
            .map_err(|_| CheckpointError::Storage("connection lock poisoned".into()))
    }
}

#[async_trait]
impl Checkpointer for SqliteSaver {
    async fn load(&self, session_id: &str) -> Result<Option<Conversation>, CheckpointError> {
        let conn = self.lock()?;
        let state: Option<Vec<u8>> = conn
            .query_row(
                "SELECT state FROM checkpoints WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        match state {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| CheckpointError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        session_id: &str,
        conversation: &Conversation,
    ) -> Result<(), CheckpointError> {
        let bytes = serde_json::to_vec(conversation)
            .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO checkpoints (session_id, state, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(session_id) DO UPDATE SET
                 state = excluded.state,
                 updated_at = excluded.updated_at",
            params![session_id, bytes],
        )
        .map_err(|e| CheckpointError::Storage(e.to_string()))?;
        Ok(())
    }

    fn checkpoint_type(&self) -> &'static str {
        "sqlite"
    }
}
