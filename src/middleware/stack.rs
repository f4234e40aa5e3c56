//! Pre-composed middleware stacks.
//!
//! Two profiles cover most services at day one. Both return a plain
//! [`Chain`], so extending one is just more [`layer`](Chain::layer) calls.

use crate::middleware::auth::BasicAuth;
use crate::middleware::chain::Chain;
use crate::middleware::cors::Cors;
use crate::middleware::logger::Logger;
use crate::middleware::rate_limit::RateLimit;
use crate::middleware::recovery::Recovery;

/// Recovery, logging, CORS — in that order, all defaults.
///
/// Recovery sits outermost so a fault anywhere below it, the other layers
/// included, still turns into a response.
///
/// ```rust
/// use lamina::{Request, Response, middleware::stack};
///
/// async fn hello(_req: Request) -> Response { Response::text("hello") }
///
/// let app = stack::standard().apply(hello);
/// ```
pub fn standard() -> Chain {
    Chain::new()
        .layer(Recovery::new())
        .layer(Logger::new())
        .layer(Cors::new())
}

/// [`standard`] plus rate limiting (100 requests per client per minute) and
/// basic-credential auth.
///
/// The credentials are parameters on purpose: bake no secrets into the
/// library. Rate limiting sits in front of auth, so failed guesses spend
/// the caller's budget too.
///
/// ```rust,no_run
/// use lamina::{Request, Response, middleware::stack};
///
/// async fn hello(_req: Request) -> Response { Response::text("hello") }
///
/// let app = stack::full("admin", std::env::var("APP_PASSWORD").unwrap()).apply(hello);
/// ```
pub fn full(username: impl Into<String>, password: impl Into<String>) -> Chain {
    standard()
        .layer(RateLimit::per_minute(100))
        .layer(BasicAuth::new(username, password))
}
