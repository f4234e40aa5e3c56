//! # lamina
//!
//! Composable HTTP middleware for Rust services: panic recovery, request
//! logging, CORS, credential gates, and rate limiting as an explicit,
//! ordered pipeline. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Your handler owns the business logic. The ring around it — catching
//! panics, logging outcomes, negotiating CORS, checking credentials,
//! shedding load — is cross-cutting plumbing that should be written once,
//! composed explicitly, and kept out of handler code. lamina owns that ring.
//!
//! What lamina deliberately does not ship:
//!
//! - **Routing** — a server serves one [`Pipeline`]; match on
//!   [`Request::path`] in your terminal handler, or put a router crate
//!   behind the pipeline
//! - **TLS termination** — your proxy or ingress already owns it
//! - **Distributed rate-limit state** — the limiter here is per-process;
//!   cross-replica quotas need a shared store, which is a different tool
//! - **JWT verification** — [`BearerAuth`](middleware::BearerAuth) is a
//!   shared-secret gate; bring a JWT crate when you need signatures and
//!   claims
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lamina::{Request, Response, Server, middleware::stack};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Recovery → Logger → CORS around the handler.
//!     let app = stack::standard().apply(hello);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn hello(_req: Request) -> Response {
//!     Response::text("hello")
//! }
//! ```
//!
//! Or compose by hand — the first layer sees the request first and the
//! response last:
//!
//! ```rust
//! use lamina::middleware::{BearerAuth, Chain, Logger, RateLimit, Recovery};
//! use lamina::{Request, Response};
//!
//! async fn hello(_req: Request) -> Response { Response::text("hello") }
//!
//! let app = Chain::new()
//!     .layer(Recovery::new())
//!     .layer(Logger::new())
//!     .layer(RateLimit::per_minute(600))
//!     .layer(BearerAuth::new("s3cr3t"))
//!     .apply(hello);
//! ```

mod error;
mod handler;
mod request;
mod response;
mod server;

pub mod health;
pub mod middleware;

pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use http::{Method, StatusCode};
pub use middleware::{Chain, Middleware, Pipeline};
pub use request::{Request, RequestBuilder};
pub use response::{ContentType, IntoResponse, Response};
pub use server::Server;
