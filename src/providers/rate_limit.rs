//! Admission control for remote backends.
//!
//! [`RateLimiter`] keeps a trailing window of request timestamps and only
//! admits a caller while fewer than `max_requests` of them are younger than
//! `window`. Callers that find the window full are suspended for
//! `retry_delay` and re-evaluated; they are never rejected and there is no
//! overall timeout.
//!
//! Pruning, counting and recording happen in one critical section, so two
//! concurrent callers can never both take the last free slot.
//!
//! Timestamps use [`tokio::time::Instant`], so tests can drive the limiter
//! with a paused runtime clock.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;

/// Admission policy.
///
/// ```rust
/// # use huginn::RateLimitConfig;
/// # use std::time::Duration;
/// let config = RateLimitConfig::new()
///     .max_requests(2)
///     .window(Duration::from_secs(1))
///     .retry_delay(Duration::from_millis(100));
/// assert_eq!(config.max_requests, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests admitted per trailing window. Default: 20.
    pub max_requests: usize,
    /// Length of the trailing window. Default: 60s.
    pub window: Duration,
    /// Pause before re-checking a full window. Default: 3s.
    pub retry_delay: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window: Duration::from_secs(60),
            retry_delay: Duration::from_secs(3),
        }
    }
}

impl RateLimitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of requests admitted per window.
    pub fn max_requests(mut self, n: usize) -> Self {
        self.max_requests = n;
        self
    }

    /// Set the trailing window length.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set the pause between re-checks of a full window.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

struct WindowState {
    config: RateLimitConfig,
    timestamps: VecDeque<Instant>,
}

impl WindowState {
    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.timestamps.front() {
            if now.duration_since(*oldest) > self.config.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Trailing-window admission controller shared by all remote calls.
pub struct RateLimiter {
    state: Mutex<WindowState>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Mutex::new(WindowState {
                config,
                timestamps: VecDeque::new(),
            }),
        }
    }

    /// Replace the active policy. Already-admitted timestamps are kept and
    /// judged against the new window from the next check on.
    pub fn configure(&self, config: RateLimitConfig) {
        self.lock().config = config;
    }

    /// The active policy.
    pub fn config(&self) -> RateLimitConfig {
        self.lock().config.clone()
    }

    /// Wait until the window has room, then record this request.
    pub async fn acquire(&self) {
        loop {
            let retry_delay = {
                let mut state = self.lock();
                let now = Instant::now();
                state.prune(now);
                // max_requests of 0 would never admit anyone; treat it as 1.
                if state.timestamps.len() < state.config.max_requests.max(1) {
                    state.timestamps.push_back(now);
                    return;
                }
                state.config.retry_delay
            };

            metrics::counter!(telemetry::ADMISSION_WAITS_TOTAL).increment(1);
            debug!(
                delay_ms = retry_delay.as_millis() as u64,
                "admission window full, waiting"
            );
            tokio::time::sleep(retry_delay).await;
        }
    }

    /// Acquire a slot, then run `operation` and hand back its output.
    pub async fn run_gated<F, Fut, T>(&self, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.acquire().await;
        operation().await
    }

    /// Number of admitted requests still inside the trailing window.
    pub fn in_window(&self) -> usize {
        let mut state = self.lock();
        state.prune(Instant::now());
        state.timestamps.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WindowState> {
        // The critical sections never panic midway, so a poisoned state is
        // still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
