//! Fixed-window request throttling.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Outcome of asking the limiter to admit one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request is within the window's budget.
    Allowed {
        /// Requests left in the current window.
        remaining: u64,
    },
    /// The window's budget is exhausted.
    Limited {
        /// Time until the current window rolls over.
        retry_after: Duration,
    },
}

#[derive(Debug)]
struct Window {
    count: u64,
    started: Instant,
}

/// A fixed-window rate limiter.
///
/// At most `limit` requests are admitted per `window`; the window rolls over
/// lazily on the first admission attempt at or past its end. Counting happens
/// under a single async lock, so concurrent attempts serialize and every
/// attempt is counted exactly once. Denied attempts count too: a client
/// hammering a limited resource keeps the window full.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u64,
    window: Duration,
    state: Mutex<Window>,
}

impl RateLimiter {
    /// Creates a limiter admitting `limit` requests per `window`.
    pub fn new(limit: u64, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Mutex::new(Window {
                count: 0,
                started: Instant::now(),
            }),
        }
    }

    /// The per-window request budget.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// The window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Counts one request against the current window and reports whether
    /// it is admitted.
    pub async fn admit(&self) -> Admission {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        if now.duration_since(state.started) >= self.window {
            state.started = now;
            state.count = 0;
        }
        state.count += 1;
        if state.count > self.limit {
            Admission::Limited {
                retry_after: self.window.saturating_sub(now.duration_since(state.started)),
            }
        } else {
            Admission::Allowed {
                remaining: self.limit - state.count,
            }
        }
    }
}
