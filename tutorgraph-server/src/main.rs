//! tutorgraph-server binary: config, graph, gateway, router, listener.
//!
//! Configure via env: OPENAI_API_KEY, OPENAI_MODEL, OPENAI_API_BASE,
//! DB_PATH, LISTEN, RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS,
//! FRONTEND_DIR. Load .env with dotenv. A graph that fails to initialize
//! puts the server in degraded mode instead of aborting boot.

use std::sync::Arc;

use tracing::{error, info};
use tutorgraph::{build_graph, GraphConfig};
use tutorgraph_server::{routes, ChatGateway, ServerConfig};

/// Load .env from current directory; if not found, try parent (workspace
/// root when run from the crate dir).
fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

/// Initializes tracing to stdout, honoring RUST_LOG when set.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tutorgraph_server=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_dotenv();
    init_tracing();

    let server_config = ServerConfig::from_env();

    // Graph construction failures degrade the service rather than abort it:
    // /health reports the state, /chat and the WS path return errors.
    let gateway = match GraphConfig::from_env().and_then(|config| build_graph(&config)) {
        Ok(graph) => {
            info!(
                checkpoint_type = graph.checkpoint_type(),
                "agent graph ready"
            );
            Arc::new(ChatGateway::new(
                Arc::new(graph),
                server_config.throttle(),
            ))
        }
        Err(e) => {
            error!(error = %e, "graph initialization failed; serving degraded");
            Arc::new(ChatGateway::degraded(
                e.to_string(),
                server_config.throttle(),
            ))
        }
    };

    let app = routes::app(gateway, &server_config.frontend_dir);

    info!("listening on http://{}", server_config.listen);
    let listener = tokio::net::TcpListener::bind(&server_config.listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
