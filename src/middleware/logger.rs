//! Request logging.
//!
//! One log line per request, emitted after the response is final — whatever
//! produced it: the handler, an auth rejection three layers down, or a
//! recovery substitute. Paths on the exclusion list bypass the unit
//! entirely, so liveness probes do not drown the log.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::{Method, StatusCode};
use tracing::info;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

// ── Observation ───────────────────────────────────────────────────────────────

/// The outbound half of an exchange: final status code and body byte count.
///
/// Starts at `200 OK` / `0` bytes — the state of a response nobody has
/// written yet. Each [`record`](Observation::record) folds in a response:
/// the most recent status wins, byte counts accumulate. Tolerates zero or
/// more recordings per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    status: StatusCode,
    bytes: usize,
}

impl Observation {
    pub fn new() -> Self {
        Self { status: StatusCode::OK, bytes: 0 }
    }

    /// Records the status and body size of `response`.
    pub fn record(&mut self, response: &Response) {
        self.status = response.status_code();
        self.bytes += response.body().len();
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn bytes(&self) -> usize { self.bytes }
}

impl Default for Observation {
    fn default() -> Self {
        Self::new()
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// The request fields that outlive delegation.
///
/// The wrapped handler consumes the [`Request`], so the logging unit
/// snapshots what the log line will need before delegating.
#[derive(Debug, Clone)]
pub struct RequestLine {
    pub method: Method,
    pub path: String,
    pub remote_addr: SocketAddr,
}

/// Signature of the injected log sink: request line, final status, body
/// bytes, elapsed time. Invoked synchronously, after the response is final.
pub type LogFn = dyn Fn(&RequestLine, StatusCode, usize, Duration) + Send + Sync;

/// Configuration for the [`Logger`] unit.
pub struct LoggerConfig {
    /// Sink invoked once per logged request.
    pub log_fn: Arc<LogFn>,
    /// Paths that bypass the unit entirely: no timing, no observation, no
    /// sink call.
    pub exclude_paths: Vec<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_fn: Arc::new(|line, status, bytes, elapsed| {
                info!(
                    remote = %line.remote_addr,
                    method = %line.method,
                    path = %line.path,
                    status = status.as_u16(),
                    bytes,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request completed"
                );
            }),
            exclude_paths: vec!["/healthz".to_owned(), "/readyz".to_owned()],
        }
    }
}

// ── Logger ────────────────────────────────────────────────────────────────────

/// Middleware unit that logs one line per completed request.
pub struct Logger {
    config: Arc<LoggerConfig>,
}

impl Logger {
    /// Default sink (a structured `tracing::info!` event) and default
    /// exclusions (`/healthz`, `/readyz` — see [`crate::health`]).
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    pub fn with_config(config: LoggerConfig) -> Self {
        Self { config: Arc::new(config) }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for Logger {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let config = Arc::clone(&self.config);
        (move |req: Request| {
            let next = next.clone();
            let config = Arc::clone(&config);
            async move {
                if config.exclude_paths.iter().any(|p| p == req.path()) {
                    return next.call(req).await;
                }

                let line = RequestLine {
                    method: req.method().clone(),
                    path: req.path().to_owned(),
                    remote_addr: req.remote_addr(),
                };
                let start = Instant::now();

                let response = next.call(req).await;

                let mut observation = Observation::new();
                observation.record(&response);
                (config.log_fn)(&line, observation.status(), observation.bytes(), start.elapsed());

                response
            }
        })
        .into_boxed_handler()
    }
}
