//! Route handlers: chat, health, frontend, and the WebSocket session loop.
//!
//! Each WebSocket connection is one cooperative task that loops: await the
//! next inbound frame → dispatch through the gateway → await again.
//! Messages on one connection are processed in receipt order; connections
//! never share a task, so one connection's failure cannot abort another.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::gateway::ChatGateway;
use crate::registry::Connection;

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    /// Optional session id for conversation persistence; omitted or empty
    /// means start a new session.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
struct WsQuery {
    #[serde(default)]
    client_id: Option<String>,
}

/// Build the router: REST endpoints, WebSocket endpoint, and the static
/// frontend, all sharing one injected gateway.
pub fn app(gateway: Arc<ChatGateway>, frontend_dir: impl AsRef<FsPath>) -> Router {
    let frontend_dir = frontend_dir.as_ref();
    Router::new()
        .route_service("/", ServeFile::new(frontend_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(frontend_dir.join("static")))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .route("/ws/:session_id", get(ws_upgrade))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                info_span!("request", method = %req.method(), uri = %req.uri())
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

/// `POST /chat`: one tutoring turn with session persistence.
async fn chat(
    State(gateway): State<Arc<ChatGateway>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, crate::error::GatewayError> {
    let (response, session_id) = gateway
        .handle_chat(&request.prompt, request.session_id)
        .await?;
    Ok(Json(ChatResponse {
        response,
        session_id,
    }))
}

/// `GET /health`: 200 when the graph and checkpointer came up, 503 otherwise.
async fn health(State(gateway): State<Arc<ChatGateway>>) -> Response {
    let health = gateway.health();
    let status = if health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health)).into_response()
}

/// `WS /ws/{session_id}?client_id=...`: upgrade and hand off to the session loop.
async fn ws_upgrade(
    State(gateway): State<Arc<ChatGateway>>,
    Path(session_id): Path<String>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let client_id = query
        .client_id
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    ws.on_upgrade(move |socket| session_loop(gateway, session_id, client_id, socket))
}

/// Per-connection task: register, pump frames until disconnect or send
/// failure, then unregister and notify the session.
async fn session_loop(
    gateway: Arc<ChatGateway>,
    session_id: String,
    client_id: String,
    socket: WebSocket,
) {
    let (mut sink, mut stream) = socket.split();
    let (connection, mut outbound) = Connection::channel();

    // Writer task: drains the connection channel into the socket, keeping
    // per-connection FIFO order. Ends when every sender is dropped.
    let writer = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if sink.send(WsMessage::Text(text)).await.is_err() {
                break;
            }
        }
    });

    if let Some(replaced) = gateway
        .registry()
        .register(&session_id, &client_id, connection)
        .await
    {
        // Same (session, client) reconnected; dropping the old handle closes
        // its channel so the stale writer task winds down.
        debug!(session_id, client_id, "dropped superseded connection");
        drop(replaced);
    }
    info!(session_id, client_id, "websocket open");

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                if let Err(e) = gateway
                    .handle_ws_message(&session_id, &client_id, &text)
                    .await
                {
                    warn!(session_id, client_id, error = %e, "send failed, closing");
                    break;
                }
            }
            Ok(WsMessage::Close(_)) | Err(_) => break,
            // Ping/pong are answered by axum; binary frames are ignored.
            Ok(_) => {}
        }
    }

    gateway.registry().unregister(&session_id, &client_id).await;
    gateway
        .registry()
        .broadcast_to_session(
            &session_id,
            &format!("{client_id} has left {session_id}"),
            None,
        )
        .await;
    // All senders are gone now, so the writer drains and exits.
    let _ = writer.await;
    info!(session_id, client_id, "websocket closed");
}
