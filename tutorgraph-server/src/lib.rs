//! HTTP and WebSocket gateway for the tutor agent graph.
//!
//! The service surface is small: `POST /chat` for one-shot turns,
//! `WS /ws/{session_id}` for interactive sessions, `GET /health` for the
//! degraded-mode signal, and the static frontend. The pieces with state of
//! their own, the [`registry::ConnectionRegistry`], the
//! [`throttle::Throttle`], and the [`gateway::ChatGateway`] tying them to
//! the graph, live here as library modules so integration tests can build
//! the router the binary serves.

pub mod config;
pub mod error;
pub mod gateway;
pub mod registry;
pub mod routes;
pub mod throttle;

pub use config::ServerConfig;
pub use error::{GatewayError, RegistryError};
pub use gateway::{ChatGateway, HealthStatus};
pub use registry::{Connection, ConnectionRegistry};
pub use routes::app;
pub use throttle::Throttle;
