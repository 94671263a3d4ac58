//! Server config: listen address, rate limit, frontend dir. Filled from env / .env.

use std::path::PathBuf;
use std::time::Duration;

use crate::throttle::Throttle;

/// Server configuration, independent of the graph's own config.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8000`.
    pub listen: String,
    /// Max requests per client within the throttle window.
    pub rate_limit_max_requests: usize,
    /// Throttle window length in seconds.
    pub rate_limit_window_secs: u64,
    /// Directory holding `index.html` and `static/`.
    pub frontend_dir: PathBuf,
}

impl ServerConfig {
    /// Fill config from env vars with defaults: `LISTEN` (`0.0.0.0:8000`),
    /// `RATE_LIMIT_MAX_REQUESTS` (20), `RATE_LIMIT_WINDOW_SECS` (60),
    /// `FRONTEND_DIR` (`frontend`).
    pub fn from_env() -> Self {
        let listen = std::env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let rate_limit_max_requests = std::env::var("RATE_LIMIT_MAX_REQUESTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20);
        let rate_limit_window_secs = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        let frontend_dir = std::env::var("FRONTEND_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("frontend"));
        Self {
            listen,
            rate_limit_max_requests,
            rate_limit_window_secs,
            frontend_dir,
        }
    }

    /// Build the throttle configured by this server config.
    pub fn throttle(&self) -> Throttle {
        Throttle::new(
            self.rate_limit_max_requests,
            Duration::from_secs(self.rate_limit_window_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Serialize env mutation across parallel test threads.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    /// **Scenario**: With no env overrides, defaults are applied.
    #[test]
    fn defaults_apply() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("LISTEN");
        std::env::remove_var("RATE_LIMIT_MAX_REQUESTS");
        std::env::remove_var("RATE_LIMIT_WINDOW_SECS");
        std::env::remove_var("FRONTEND_DIR");
        let config = ServerConfig::from_env();
        assert_eq!(config.listen, "0.0.0.0:8000");
        assert_eq!(config.rate_limit_max_requests, 20);
        assert_eq!(config.rate_limit_window_secs, 60);
        assert_eq!(config.frontend_dir, PathBuf::from("frontend"));
    }

    /// **Scenario**: An unparsable rate-limit value falls back to the default.
    #[test]
    fn garbage_rate_limit_falls_back() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("RATE_LIMIT_MAX_REQUESTS", "not-a-number");
        let config = ServerConfig::from_env();
        assert_eq!(config.rate_limit_max_requests, 20);
        std::env::remove_var("RATE_LIMIT_MAX_REQUESTS");
    }
}
