//! Sliding-window rate limiting.
//!
//! Per-process, in-memory, keyed by client IP. A fronting proxy usually owns
//! coarse limits; this unit is for services that face clients directly or
//! want a second, application-aware budget. State lives and dies with the
//! process — nothing is shared across replicas.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::StatusCode;
use parking_lot::Mutex;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

// ── RateLimiter ───────────────────────────────────────────────────────────────

/// Sliding-window admission counter, one window per key.
///
/// [`allow`](RateLimiter::allow) prunes the key's recorded timestamps to the
/// trailing window, admits if fewer than `limit` remain, and records the
/// admission; a denial records nothing. Pruning is lazy — a quiet key's
/// stale timestamps sit untouched until that key's next call.
///
/// The whole table lives behind one lock: every key serializes through the
/// same critical section, which never blocks on anything slower than the
/// prune itself. Fine for one process in front of handlers doing real I/O;
/// not a building block for cross-replica quotas.
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    requests: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Admission check: `true` records the request, `false` leaves no trace.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.lock();
        let timestamps = requests.entry(key.to_owned()).or_default();

        timestamps.retain(|&t| now.duration_since(t) <= self.window);
        if timestamps.len() < self.limit {
            timestamps.push(now);
            true
        } else {
            false
        }
    }
}

// ── RateLimit ─────────────────────────────────────────────────────────────────

/// Middleware unit that sheds over-budget requests with `429`.
///
/// The key is the peer IP. Behind a proxy every request shares the proxy's
/// IP and therefore one budget — terminate limits at the proxy in that
/// topology, or key on a forwarding header in your own unit.
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    /// `limit` requests per client per minute.
    pub fn per_minute(limit: usize) -> Self {
        Self::with_limiter(Arc::new(RateLimiter::new(limit, Duration::from_secs(60))))
    }

    /// Shares an externally owned limiter — e.g. one budget across several
    /// pipelines.
    pub fn with_limiter(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl Middleware for RateLimit {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let limiter = Arc::clone(&self.limiter);
        (move |req: Request| {
            let next = next.clone();
            let limiter = Arc::clone(&limiter);
            async move {
                let key = req.remote_addr().ip().to_string();
                if limiter.allow(&key) {
                    next.call(req).await
                } else {
                    Response::builder()
                        .status(StatusCode::TOO_MANY_REQUESTS)
                        .text("Too Many Requests")
                }
            }
        })
        .into_boxed_handler()
    }
}
