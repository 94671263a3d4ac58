//! # tutorgraph
//!
//! Checkpointed tutor agent graph: an LLM client plus per-session
//! conversation persistence, behind a single `(prompt, session_id) → text`
//! invocation.
//!
//! ## Design
//!
//! - **One turn per invoke**: [`TutorGraph::invoke`](graph::TutorGraph::invoke)
//!   loads the session's conversation, appends the user message, calls the
//!   LLM, persists the reply, and returns it. Callers never see the
//!   conversation state.
//! - **Seams, not singletons**: the LLM ([`LlmClient`]) and the persistence
//!   ([`Checkpointer`]) are traits; production wires `ChatOpenAI` +
//!   `SqliteSaver`, tests wire `MockLlm` + `MemorySaver`.
//!
//! ## Main Modules
//!
//! - [`graph`]: `TutorGraph`, the invocation type consumed by the server.
//! - [`llm`]: `LlmClient` trait, `MockLlm`, and optional `ChatOpenAI`.
//! - [`memory`]: `Checkpointer` trait, `MemorySaver`, optional `SqliteSaver`.
//! - [`message`]: `Message` / `Conversation` state types.
//! - [`config`]: env-based build configuration.
//!
//! ## Features
//!
//! - `openai` (default): OpenAI-compatible chat via `async-openai`.
//! - `sqlite` (default): persistent checkpointer via `rusqlite`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tutorgraph::{MemorySaver, MockLlm, TutorGraph};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let graph = TutorGraph::new(
//!     Box::new(MockLlm::with_reply("photosynthesis turns light into sugar")),
//!     Arc::new(MemorySaver::new()),
//! );
//! let reply = graph.invoke("explain photosynthesis", "session-1").await.unwrap();
//! assert!(!reply.is_empty());
//! # }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod message;

pub use config::GraphConfig;
#[cfg(all(feature = "openai", feature = "sqlite"))]
pub use config::build_graph;
pub use error::TutorError;
pub use graph::{TutorGraph, TUTOR_SYSTEM_PROMPT};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use llm::{FailingLlm, LlmClient, LlmResponse, MockLlm};
pub use memory::{CheckpointError, Checkpointer, MemorySaver};
#[cfg(feature = "sqlite")]
pub use memory::SqliteSaver;
