//! Stock Kubernetes health-check handlers.
//!
//! Two probes, two handlers:
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? A failure gets the pod restarted. |
//! | **Readiness** | `/readyz` | Can the pod take traffic? A failure pulls it from the load-balancer. |
//!
//! lamina has no router, so probe paths are the terminal handler's business:
//!
//! ```rust,no_run
//! use lamina::{Request, Response, health};
//!
//! async fn app(req: Request) -> Response {
//!     match req.path() {
//!         "/healthz" => health::liveness(req).await,
//!         "/readyz"  => health::readiness(req).await,
//!         _          => Response::text("hello"),
//!     }
//! }
//! ```
//!
//! These two paths are also the [`Logger`](crate::middleware::Logger) unit's
//! default exclusions — probes answered every few seconds should not drown
//! the request log.
//!
//! The stock `readiness` answer is unconditional. When readiness should gate
//! on dependencies (database connections, downstream services), write your
//! own:
//!
//! ```rust,no_run
//! use lamina::{Request, Response, StatusCode};
//!
//! async fn readiness(_req: Request) -> Response {
//!     if dependencies_are_healthy().await {
//!         Response::text("ready")
//!     } else {
//!         Response::status(StatusCode::SERVICE_UNAVAILABLE)
//!     }
//! }
//!
//! async fn dependencies_are_healthy() -> bool { true }
//! ```

use crate::{Request, Response};

/// Kubernetes liveness probe handler.
///
/// Always `200 OK`, body `"ok"`. Touching nothing else is the point: if the
/// process can answer HTTP at all, it is alive.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Kubernetes readiness probe handler, stock implementation.
///
/// Always `200 OK`, body `"ready"`. Swap in your own handler when the
/// application has a warm-up period or dependencies to check first.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
