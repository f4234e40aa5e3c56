//! Panic recovery.
//!
//! A panic in a handler should cost one request, not the process and not the
//! connection. The [`Recovery`] unit intercepts panics raised anywhere below
//! its position in the chain and substitutes a configured response.
//!
//! The guard is scoped, not global: nothing is installed process-wide, and a
//! panic raised *above* the unit's position is none of its business. Build
//! with the default `panic = "unwind"` — an aborting panic strategy leaves
//! nothing to intercept.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use http::StatusCode;
use tracing::error;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

/// Signature of the injected panic sink: the panic payload and a backtrace
/// captured at the interception point (`RUST_BACKTRACE` applies).
pub type PanicFn = dyn Fn(&(dyn Any + Send), &Backtrace) + Send + Sync;

/// Renders the common panic payloads (`&str`, `String`) for display.
///
/// Payloads of any other type — `panic_any` with something exotic — come out
/// as a placeholder; downcast them yourself in a custom sink if you need
/// more.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

/// Configuration for the [`Recovery`] unit.
pub struct RecoveryConfig {
    /// Sink invoked once per intercepted panic, before the substitute
    /// response is produced.
    pub on_panic: Arc<PanicFn>,
    /// Status of the substitute response.
    pub response_status: StatusCode,
    /// Body of the substitute response.
    pub response_body: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            on_panic: Arc::new(|payload, backtrace| {
                error!(%backtrace, "handler panicked: {}", panic_message(payload));
            }),
            response_status: StatusCode::INTERNAL_SERVER_ERROR,
            response_body: "Internal Server Error".to_owned(),
        }
    }
}

/// Middleware unit that converts downstream panics into responses.
pub struct Recovery {
    config: Arc<RecoveryConfig>,
}

impl Recovery {
    /// Default sink (`tracing::error!` with the payload and backtrace) and a
    /// plain `500 Internal Server Error` substitute.
    pub fn new() -> Self {
        Self::with_config(RecoveryConfig::default())
    }

    pub fn with_config(config: RecoveryConfig) -> Self {
        Self { config: Arc::new(config) }
    }
}

impl Default for Recovery {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for Recovery {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let config = Arc::clone(&self.config);
        (move |req: Request| {
            let next = next.clone();
            let config = Arc::clone(&config);
            async move {
                // The async block keeps the guard around both the eager
                // `call` and every later poll of the returned future.
                let guarded = AssertUnwindSafe(async move { next.call(req).await });
                match guarded.catch_unwind().await {
                    Ok(response) => response,
                    Err(payload) => {
                        let backtrace = Backtrace::capture();
                        (config.on_panic)(&*payload, &backtrace);
                        Response::builder()
                            .status(config.response_status)
                            .text(config.response_body.clone())
                    }
                }
            }
        })
        .into_boxed_handler()
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::middleware::Chain;

    async fn boom(_req: Request) -> Response {
        panic!("boom");
    }

    async fn hello(_req: Request) -> Response {
        Response::text("hello")
    }

    #[tokio::test]
    async fn panicking_handler_yields_the_substitute_response() {
        let pipeline = Chain::new().layer(Recovery::new()).apply(boom);
        let response = pipeline.handle(Request::builder().build()).await;
        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), b"Internal Server Error");
    }

    #[tokio::test]
    async fn custom_sink_receives_the_payload() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let config = RecoveryConfig {
            on_panic: Arc::new(move |payload, _backtrace| {
                sink.lock().push(panic_message(payload).to_owned());
            }),
            response_status: StatusCode::BAD_GATEWAY,
            response_body: "upstream fault".to_owned(),
        };

        let pipeline = Chain::new().layer(Recovery::with_config(config)).apply(boom);
        let response = pipeline.handle(Request::builder().build()).await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.body(), b"upstream fault");
        assert_eq!(*seen.lock(), ["boom"]);
    }

    #[tokio::test]
    async fn pipeline_keeps_serving_after_a_panic() {
        let pipeline = Chain::new().layer(Recovery::new()).apply(boom);
        for _ in 0..3 {
            let response = pipeline.handle(Request::builder().build()).await;
            assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn healthy_responses_pass_through_untouched() {
        let pipeline = Chain::new().layer(Recovery::new()).apply(hello);
        let response = pipeline.handle(Request::builder().build()).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.body(), b"hello");
    }

    #[tokio::test]
    #[should_panic(expected = "above the guard")]
    async fn panics_above_the_unit_are_not_intercepted() {
        /// Post-logic that panics whenever the handler answered 418.
        struct TeapotAllergy;

        impl Middleware for TeapotAllergy {
            fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
                (move |req: Request| {
                    let next = next.clone();
                    async move {
                        let response = next.call(req).await;
                        assert!(
                            response.status_code() != StatusCode::IM_A_TEAPOT,
                            "above the guard"
                        );
                        response
                    }
                })
                .into_boxed_handler()
            }
        }

        async fn teapot(_req: Request) -> Response {
            Response::status(StatusCode::IM_A_TEAPOT)
        }

        let pipeline = Chain::new()
            .layer(TeapotAllergy)
            .layer(Recovery::new())
            .apply(teapot);
        pipeline.handle(Request::builder().build()).await;
    }
}
