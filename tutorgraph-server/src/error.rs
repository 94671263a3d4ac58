//! Gateway error taxonomy and HTTP mappings.
//!
//! Request- and connection-local failures only; nothing here terminates
//! the process or other connections.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Send failures local to the connection registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No connection registered for this (session, client) pair. Logged, non-fatal.
    #[error("no connection for session {session_id} client {client_id}")]
    ConnectionNotFound {
        session_id: String,
        client_id: String,
    },
    /// The connection's channel closed mid-send; the caller should unregister.
    #[error("delivery to session {session_id} client {client_id} failed: channel closed")]
    Delivery {
        session_id: String,
        client_id: String,
    },
}

/// Request-level failures surfaced to clients.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Throttle rejected the request.
    #[error("rate limit exceeded, try again later")]
    RateLimited,
    /// The agent graph failed to initialize at startup; also visible via /health.
    #[error("agent graph unavailable: {0}")]
    GraphUnavailable(String),
    /// The graph call failed at request time; the connection stays open.
    #[error("upstream agent call failed: {0}")]
    Upstream(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::GraphUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(serde_json::json!({ "error": { "message": self.to_string() } })),
        )
            .into_response()
    }
}
