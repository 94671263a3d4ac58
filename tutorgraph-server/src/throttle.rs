//! Per-client sliding-window rate limiting.
//!
//! Timestamps older than the window are evicted lazily on each check; there
//! is no background sweep. State is process-local; multiple server
//! instances do not share throttle state.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window throttle: at most `max_requests` per client identifier
/// within the trailing `window`.
pub struct Throttle {
    max_requests: usize,
    window: Duration,
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl Throttle {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the current request is permitted for this client. Records
    /// the request when permitted.
    pub fn allow(&self, client_id: &str) -> bool {
        self.allow_at(client_id, Instant::now())
    }

    fn allow_at(&self, client_id: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock();
        let timestamps = windows.entry(client_id.to_string()).or_default();
        while timestamps
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            timestamps.pop_front();
        }
        if timestamps.len() >= self.max_requests {
            false
        } else {
            timestamps.push_back(now);
            true
        }
    }
}
