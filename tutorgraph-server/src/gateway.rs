//! Chat gateway: throttle, invoke the agent graph, respond or deliver.
//!
//! One gateway instance is constructed at startup and injected into every
//! handler through router state; there are no module-level singletons. When graph
//! initialization failed at boot, the gateway runs degraded: `/health`
//! reports it and dispatch returns `GraphUnavailable` instead of hanging.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use tutorgraph::TutorGraph;
use uuid::Uuid;

use crate::error::{GatewayError, RegistryError};
use crate::registry::ConnectionRegistry;
use crate::throttle::Throttle;

/// Snapshot reported by `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub graph_available: bool,
    pub checkpoint_available: bool,
    pub checkpoint_type: &'static str,
}

impl HealthStatus {
    /// Whether the service is fully operational.
    pub fn is_healthy(&self) -> bool {
        self.graph_available && self.checkpoint_available
    }
}

/// Gateway between the HTTP/WebSocket surface and the agent graph.
pub struct ChatGateway {
    graph: Option<Arc<TutorGraph>>,
    graph_error: Option<String>,
    throttle: Throttle,
    registry: ConnectionRegistry,
}

impl ChatGateway {
    /// Gateway with a working graph.
    pub fn new(graph: Arc<TutorGraph>, throttle: Throttle) -> Self {
        Self {
            graph: Some(graph),
            graph_error: None,
            throttle,
            registry: ConnectionRegistry::new(),
        }
    }

    /// Gateway in degraded mode: graph initialization failed at startup.
    /// The reason is echoed in `GraphUnavailable` errors.
    pub fn degraded(reason: impl Into<String>, throttle: Throttle) -> Self {
        Self {
            graph: None,
            graph_error: Some(reason.into()),
            throttle,
            registry: ConnectionRegistry::new(),
        }
    }

    /// The connection registry for the WebSocket surface.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    fn graph(&self) -> Result<&Arc<TutorGraph>, GatewayError> {
        self.graph.as_ref().ok_or_else(|| {
            GatewayError::GraphUnavailable(
                self.graph_error
                    .clone()
                    .unwrap_or_else(|| "not initialized".into()),
            )
        })
    }

    /// Health snapshot for `/health`.
    pub fn health(&self) -> HealthStatus {
        let graph_available = self.graph.is_some();
        // The graph always carries a checkpointer, so availability tracks it.
        HealthStatus {
            status: if graph_available { "healthy" } else { "degraded" },
            graph_available,
            checkpoint_available: graph_available,
            checkpoint_type: self
                .graph
                .as_ref()
                .map(|g| g.checkpoint_type())
                .unwrap_or("none"),
        }
    }

    /// Handle one HTTP chat request.
    ///
    /// Generates a session identifier when none (or an empty one) is
    /// supplied, throttles on the session identifier (the only client
    /// identity on this path), and returns the graph's reply verbatim
    /// together with the session identifier.
    pub async fn handle_chat(
        &self,
        prompt: &str,
        session_id: Option<String>,
    ) -> Result<(String, String), GatewayError> {
        let session_id = session_id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if !self.throttle.allow(&session_id) {
            return Err(GatewayError::RateLimited);
        }
        let response = self
            .graph()?
            .invoke(prompt, &session_id)
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;
        Ok((response, session_id))
    }

    /// Handle one inbound WebSocket message for a registered connection.
    ///
    /// Delivers the reply over the connection and fans the exchange out to
    /// the session's other connections. Upstream failures and throttle
    /// rejections are sent as error frames; the connection stays open.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` only when delivering to the sender's own
    /// connection fails; the caller should close the connection then.
    pub async fn handle_ws_message(
        &self,
        session_id: &str,
        client_id: &str,
        text: &str,
    ) -> Result<(), RegistryError> {
        if !self.throttle.allow(client_id) {
            info!(session_id, client_id, "throttled websocket message");
            return self
                .registry
                .send(
                    session_id,
                    client_id,
                    format!("error: {}", GatewayError::RateLimited),
                )
                .await;
        }

        let reply = match self.graph() {
            Ok(graph) => graph
                .invoke(text, session_id)
                .await
                .map_err(|e| GatewayError::Upstream(e.to_string())),
            Err(e) => Err(e),
        };

        match reply {
            Ok(reply) => {
                self.registry.send(session_id, client_id, reply.clone()).await?;
                self.registry
                    .broadcast_to_session(
                        session_id,
                        &format!("{client_id}: {text}"),
                        Some(client_id),
                    )
                    .await;
                self.registry
                    .broadcast_to_session(session_id, &reply, Some(client_id))
                    .await;
                Ok(())
            }
            Err(e) => {
                warn!(session_id, client_id, error = %e, "websocket dispatch failed");
                self.registry
                    .send(session_id, client_id, format!("error: {e}"))
                    .await
            }
        }
    }
}
