//! Middleware: the pipeline around your handler.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: panic recovery, request logging, CORS
//! negotiation, credential gates, rate limiting. Each concern is a **unit**
//! — a struct implementing [`Middleware`] — and a [`Chain`] composes units
//! into a [`Pipeline`] around a terminal handler.
//!
//! ## Composing
//!
//! ```rust
//! use lamina::middleware::{Chain, Cors, Logger, Recovery};
//! use lamina::{Request, Response};
//!
//! async fn hello(_req: Request) -> Response { Response::text("hello") }
//!
//! let app = Chain::new()
//!     .layer(Recovery::new())   // outermost: sees the request first
//!     .layer(Logger::new())
//!     .layer(Cors::new())
//!     .apply(hello);            // innermost: the terminal handler
//! ```
//!
//! Order is list order: the first layer sees the request first and the
//! response last. A unit may answer on the spot instead of delegating —
//! that is how auth rejections, preflight answers, and 429s happen without
//! the handler ever running. [`stack`] ships two pre-composed profiles.
//!
//! ## Writing a unit
//!
//! Clone what the closure needs out of `&self`, delegate with
//! `next.call(req).await`, and erase the closure back into a handler:
//!
//! ```rust
//! use lamina::middleware::Middleware;
//! use lamina::{BoxedHandler, Handler, Request, Response};
//!
//! struct ServerHeader;
//!
//! impl Middleware for ServerHeader {
//!     fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
//!         (move |req: Request| {
//!             let next = next.clone();
//!             async move {
//!                 let mut response = next.call(req).await;
//!                 response.headers_mut().insert(
//!                     http::header::SERVER,
//!                     http::header::HeaderValue::from_static("lamina"),
//!                 );
//!                 response
//!             }
//!         })
//!         .into_boxed_handler()
//!     }
//! }
//! ```

use crate::handler::BoxedHandler;

pub mod auth;
pub mod chain;
pub mod cors;
pub mod logger;
pub mod rate_limit;
pub mod recovery;
pub mod stack;

pub use auth::{BasicAuth, BearerAuth};
pub use chain::{Chain, Pipeline};
pub use cors::{Cors, CorsConfig};
pub use logger::{LogFn, Logger, LoggerConfig, Observation, RequestLine};
pub use rate_limit::{RateLimit, RateLimiter};
pub use recovery::{PanicFn, Recovery, RecoveryConfig, panic_message};

/// A composable unit of request-processing behavior.
///
/// `wrap` receives the next handler in line and returns the handler the unit
/// presents in its place: run code before delegating, after delegating, or
/// skip delegation entirely and answer on the spot.
///
/// `wrap` runs once, at composition time — it must not invoke `next` itself,
/// only build the handler that will. The returned handler is shared across
/// concurrent requests, so anything it captures must be `Send + Sync`
/// (configuration goes behind an `Arc`, mutable state behind a lock).
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}
