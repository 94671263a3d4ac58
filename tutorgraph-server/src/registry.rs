//! Active WebSocket connection tracking keyed by (session, client).
//!
//! Each connection is an mpsc sender feeding that connection's writer
//! task, so delivery is FIFO per connection. The map lock is held only to
//! look up or mutate entries; senders are cloned out before any await, so
//! a slow client never blocks the registry.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use crate::error::RegistryError;

/// Outbound frames buffered per connection before senders see backpressure.
const OUTBOUND_BUFFER: usize = 64;

/// Handle to one live WebSocket connection.
///
/// Cloning is cheap (channel sender). When the registry entry and all
/// clones are dropped, the channel closes and the writer task ends.
#[derive(Debug, Clone)]
pub struct Connection {
    tx: mpsc::Sender<String>,
}

impl Connection {
    /// Create a connection handle plus the receiver its writer task drains.
    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        (Self { tx }, rx)
    }

    async fn deliver(&self, text: String) -> Result<(), ()> {
        self.tx.send(text).await.map_err(|_| ())
    }
}

/// Registry of live connections keyed by `(session_id, client_id)`.
///
/// Invariant: at most one entry per key; registering an existing key
/// replaces the entry and hands the prior connection back to the caller.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<(String, String), Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a connection, replacing and returning any prior entry for the
    /// same key. The prior connection is not closed here; the caller
    /// decides (dropping it closes its channel).
    pub async fn register(
        &self,
        session_id: &str,
        client_id: &str,
        connection: Connection,
    ) -> Option<Connection> {
        let mut connections = self.connections.write().await;
        let replaced =
            connections.insert((session_id.to_string(), client_id.to_string()), connection);
        if replaced.is_some() {
            debug!(session_id, client_id, "replacing existing connection");
        }
        replaced
    }

    /// Remove the entry if present; no error if absent.
    pub async fn unregister(&self, session_id: &str, client_id: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(&(session_id.to_string(), client_id.to_string()));
    }

    /// Deliver text to the identified connection.
    ///
    /// # Errors
    ///
    /// `ConnectionNotFound` if the key is absent; `Delivery` if the
    /// connection's channel closed (the caller should unregister).
    pub async fn send(
        &self,
        session_id: &str,
        client_id: &str,
        text: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let connection = {
            let connections = self.connections.read().await;
            connections
                .get(&(session_id.to_string(), client_id.to_string()))
                .cloned()
        };
        let connection = connection.ok_or_else(|| RegistryError::ConnectionNotFound {
            session_id: session_id.to_string(),
            client_id: client_id.to_string(),
        })?;
        connection
            .deliver(text.into())
            .await
            .map_err(|_| RegistryError::Delivery {
                session_id: session_id.to_string(),
                client_id: client_id.to_string(),
            })
    }

    /// Best-effort fan-out to every connection bound to the session,
    /// skipping `skip_client` if given. Returns the number delivered.
    pub async fn broadcast_to_session(
        &self,
        session_id: &str,
        text: &str,
        skip_client: Option<&str>,
    ) -> usize {
        let recipients: Vec<(String, Connection)> = {
            let connections = self.connections.read().await;
            connections
                .iter()
                .filter(|((sid, cid), _)| {
                    sid == session_id && skip_client != Some(cid.as_str())
                })
                .map(|((_, cid), conn)| (cid.clone(), conn.clone()))
                .collect()
        };
        let mut delivered = 0;
        for (client_id, connection) in recipients {
            if connection.deliver(text.to_string()).await.is_ok() {
                delivered += 1;
            } else {
                warn!(session_id, client_id, "broadcast delivery failed");
            }
        }
        delivered
    }

    /// Best-effort fan-out to all connections. Returns the number delivered.
    pub async fn broadcast_all(&self, text: &str) -> usize {
        let recipients: Vec<Connection> = {
            let connections = self.connections.read().await;
            connections.values().cloned().collect()
        };
        let mut delivered = 0;
        for connection in recipients {
            if connection.deliver(text.to_string()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of live entries.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection_with_rx() -> (Connection, mpsc::Receiver<String>) {
        Connection::channel()
    }

    /// **Scenario**: register then send delivers the text to the connection's receiver.
    #[tokio::test]
    async fn register_then_send_delivers() {
        let registry = ConnectionRegistry::new();
        let (conn, mut rx) = connection_with_rx();
        assert!(registry.register("s1", "c1", conn).await.is_none());

        registry.send("s1", "c1", "hello").await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "hello");
    }

    /// **Scenario**: send after the last unregister for a key fails with ConnectionNotFound.
    #[tokio::test]
    async fn send_after_unregister_is_not_found() {
        let registry = ConnectionRegistry::new();
        let (conn, _rx) = connection_with_rx();
        registry.register("s1", "c1", conn).await;
        registry.unregister("s1", "c1").await;

        let err = registry.send("s1", "c1", "hello").await.unwrap_err();
        assert!(matches!(err, RegistryError::ConnectionNotFound { .. }));
    }

    /// **Scenario**: unregister on an absent key is a no-op.
    #[tokio::test]
    async fn unregister_absent_key_is_noop() {
        let registry = ConnectionRegistry::new();
        registry.unregister("s1", "never").await;
        assert_eq!(registry.connection_count().await, 0);
    }

    /// **Scenario**: send on a connection whose receiver is gone fails with Delivery.
    #[tokio::test]
    async fn send_to_closed_channel_is_delivery_error() {
        let registry = ConnectionRegistry::new();
        let (conn, rx) = connection_with_rx();
        registry.register("s1", "c1", conn).await;
        drop(rx);

        let err = registry.send("s1", "c1", "hello").await.unwrap_err();
        assert!(matches!(err, RegistryError::Delivery { .. }));
    }

    /// **Scenario**: registering the same key replaces the entry and returns the prior connection.
    #[tokio::test]
    async fn register_same_key_replaces() {
        let registry = ConnectionRegistry::new();
        let (first, mut first_rx) = connection_with_rx();
        let (second, mut second_rx) = connection_with_rx();

        assert!(registry.register("s1", "c1", first).await.is_none());
        let replaced = registry.register("s1", "c1", second).await;
        assert!(replaced.is_some());
        assert_eq!(registry.connection_count().await, 1);

        registry.send("s1", "c1", "to second").await.unwrap();
        assert_eq!(second_rx.recv().await.unwrap(), "to second");
        assert!(first_rx.try_recv().is_err());

        // The displaced connection still works until the caller drops it.
        replaced.unwrap().deliver("direct".into()).await.unwrap();
        assert_eq!(first_rx.recv().await.unwrap(), "direct");
    }

    /// **Scenario**: session broadcast reaches all session peers except the skipped client,
    /// and never another session.
    #[tokio::test]
    async fn broadcast_to_session_skips_and_isolates() {
        let registry = ConnectionRegistry::new();
        let (c1, mut rx1) = connection_with_rx();
        let (c2, mut rx2) = connection_with_rx();
        let (other, mut other_rx) = connection_with_rx();
        registry.register("s1", "c1", c1).await;
        registry.register("s1", "c2", c2).await;
        registry.register("s2", "c1", other).await;

        let delivered = registry.broadcast_to_session("s1", "note", Some("c1")).await;
        assert_eq!(delivered, 1);
        assert_eq!(rx2.recv().await.unwrap(), "note");
        assert!(rx1.try_recv().is_err());
        assert!(other_rx.try_recv().is_err());
    }

    /// **Scenario**: broadcast_all reaches every connection across sessions.
    #[tokio::test]
    async fn broadcast_all_reaches_everyone() {
        let registry = ConnectionRegistry::new();
        let (c1, mut rx1) = connection_with_rx();
        let (c2, mut rx2) = connection_with_rx();
        registry.register("s1", "c1", c1).await;
        registry.register("s2", "c2", c2).await;

        let delivered = registry.broadcast_all("shutting down").await;
        assert_eq!(delivered, 2);
        assert_eq!(rx1.recv().await.unwrap(), "shutting down");
        assert_eq!(rx2.recv().await.unwrap(), "shutting down");
    }

    /// **Scenario**: broadcast to a session with no connections delivers zero and does not panic.
    #[tokio::test]
    async fn broadcast_empty_session() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.broadcast_to_session("none", "x", None).await, 0);
    }
}
