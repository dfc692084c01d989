//! Fixed-window rate limiting partitioned by client IP.
//!
//! Each partition gets `permit_limit` requests per `window`. Requests past the limit
//! are rejected with 429 immediately; nothing is queued. A window starts with the
//! first request of a partition and is replenished once `window` has elapsed, either
//! lazily on the next request or by the background replenisher.

use crate::error::AppError;
use crate::extractors::ClientIp;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub permit_limit: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            permit_limit: 10,
            window: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    used: u32,
}

#[derive(Debug)]
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    partitions: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            partitions: Mutex::new(HashMap::new()),
        }
    }

    /// Take one permit from `key`'s window. Returns false when the window is exhausted.
    pub fn try_acquire(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut partitions = match self.partitions.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let window = partitions.entry(key.to_string()).or_insert(Window {
            started: now,
            used: 0,
        });
        if now.duration_since(window.started) >= self.config.window {
            window.started = now;
            window.used = 0;
        }
        if window.used >= self.config.permit_limit {
            return false;
        }
        window.used += 1;
        true
    }

    /// Drop partitions whose window has elapsed, which resets them to a full quota.
    pub fn replenish(&self) {
        let now = Instant::now();
        let mut partitions = match self.partitions.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        partitions.retain(|_, w| now.duration_since(w.started) < self.config.window);
    }

    pub fn tracked_partitions(&self) -> usize {
        self.partitions.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Replenish on a timer every `window` until the limiter is dropped.
    pub fn spawn_replenisher(self: &Arc<Self>) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let period = self.config.window;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match weak.upgrade() {
                    Some(limiter) => limiter.replenish(),
                    None => break,
                }
            }
        })
    }
}

/// Middleware: reject with 429 once the caller's partition is out of permits.
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    ClientIp(ip): ClientIp,
    request: Request,
    next: Next,
) -> Response {
    if !limiter.try_acquire(&ip) {
        tracing::warn!(client = %ip, "rate limit exceeded");
        return AppError::RateLimited.into_response();
    }
    next.run(request).await
}
