//! Graph build configuration, fillable from env / .env.
//!
//! Callers (e.g. tutorgraph-server) load this once at startup and pass it
//! to [`build_graph`]; a failure there puts the server in degraded mode
//! rather than aborting boot.

use crate::error::TutorError;

/// Configuration for building a [`TutorGraph`](crate::graph::TutorGraph).
#[derive(Clone, Debug)]
pub struct GraphConfig {
    /// OpenAI API key.
    pub api_key: String,
    /// OpenAI-compatible base URL, e.g. `https://api.openai.com/v1`. None uses the API default.
    pub api_base: Option<String>,
    /// Model name, e.g. `gpt-4o`.
    pub model: String,
    /// Sampling temperature 0–2, lower is more deterministic. Default: unset (use API default).
    pub temperature: Option<f32>,
    /// SQLite database path for conversation persistence.
    pub db_path: String,
}

impl GraphConfig {
    /// Fill config from env vars (and .env, if the caller loaded it).
    ///
    /// `OPENAI_API_KEY` required; `OPENAI_MODEL` defaults to `gpt-4o`,
    /// `DB_PATH` to `memory.db`. `OPENAI_API_BASE` and `OPENAI_TEMPERATURE`
    /// are optional.
    pub fn from_env() -> Result<Self, TutorError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                TutorError::Config("OPENAI_API_KEY is not set; please configure it in .env".into())
            })?;
        let api_base = std::env::var("OPENAI_API_BASE").ok();
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let temperature = std::env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok());
        let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| "memory.db".to_string());
        Ok(Self {
            api_key,
            api_base,
            model,
            temperature,
            db_path,
        })
    }
}

/// Build a [`TutorGraph`](crate::graph::TutorGraph) from config: a
/// `ChatOpenAI` client plus a `SqliteSaver` checkpointer.
///
/// # Errors
///
/// Returns `TutorError::Checkpoint` when the database cannot be opened.
#[cfg(all(feature = "openai", feature = "sqlite"))]
pub fn build_graph(config: &GraphConfig) -> Result<crate::graph::TutorGraph, TutorError> {
    use std::sync::Arc;

    use crate::llm::ChatOpenAI;
    use crate::memory::SqliteSaver;

    let mut openai_config =
        async_openai::config::OpenAIConfig::new().with_api_key(config.api_key.clone());
    if let Some(ref base) = config.api_base {
        // Strip trailing slash so the client's url(base + "/chat/completions")
        // does not become .../v1//chat/completions (some backends reject it).
        openai_config = openai_config.with_api_base(base.trim_end_matches('/'));
    }
    let mut llm = ChatOpenAI::with_config(openai_config, config.model.clone());
    if let Some(t) = config.temperature {
        llm = llm.with_temperature(t);
    }

    let checkpointer = SqliteSaver::open(&config.db_path)?;
    Ok(crate::graph::TutorGraph::new(
        Box::new(llm),
        Arc::new(checkpointer),
    ))
}
