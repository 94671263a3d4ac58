//! Shared setup for integration tests: a mock-graph gateway and a server
//! bound to an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tutorgraph::{MemorySaver, MockLlm, TutorGraph};
use tutorgraph_server::{routes, ChatGateway, Throttle};

/// Gateway backed by a MockLlm with a fixed reply and an in-memory saver.
pub fn mock_gateway(reply: &str) -> Arc<ChatGateway> {
    let graph = TutorGraph::new(
        Box::new(MockLlm::with_reply(reply)),
        Arc::new(MemorySaver::new()),
    );
    Arc::new(ChatGateway::new(
        Arc::new(graph),
        Throttle::new(100, Duration::from_secs(60)),
    ))
}

/// Gateway backed by a MockLlm with scripted replies.
pub fn scripted_gateway<const N: usize>(replies: [&str; N]) -> Arc<ChatGateway> {
    let graph = TutorGraph::new(
        Box::new(MockLlm::with_replies(replies)),
        Arc::new(MemorySaver::new()),
    );
    Arc::new(ChatGateway::new(
        Arc::new(graph),
        Throttle::new(100, Duration::from_secs(60)),
    ))
}

/// Serve the app for the given gateway on an ephemeral port.
pub async fn spawn_server(gateway: Arc<ChatGateway>) -> SocketAddr {
    let app = routes::app(gateway, "frontend");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}
