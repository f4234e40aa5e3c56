//! End-to-end pipeline behavior, exercised through the public API only.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use lamina::middleware::{
    BearerAuth, Chain, Cors, Logger, LoggerConfig, Middleware, RateLimit, RateLimiter, Recovery,
    stack,
};
use lamina::{BoxedHandler, Handler, Method, Request, Response, StatusCode, health};

/// A unit defined outside the crate, the way embedders write their own.
struct Trace {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Middleware for Trace {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let label = self.label;
        let log = Arc::clone(&self.log);
        (move |req: Request| {
            let next = next.clone();
            let log = Arc::clone(&log);
            async move {
                log.lock().push(format!("{label}:pre"));
                let response = next.call(req).await;
                log.lock().push(format!("{label}:post"));
                response
            }
        })
        .into_boxed_handler()
    }
}

async fn hello(_req: Request) -> Response {
    Response::text("hello")
}

async fn boom(_req: Request) -> Response {
    panic!("boom");
}

/// A logger whose sink records `(status, bytes)` per logged request.
fn capturing_logger() -> (Arc<Mutex<Vec<(StatusCode, usize)>>>, Logger) {
    let seen: Arc<Mutex<Vec<(StatusCode, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let logger = Logger::with_config(LoggerConfig {
        log_fn: Arc::new(move |_line, status, bytes, _elapsed| {
            sink.lock().push((status, bytes));
        }),
        exclude_paths: Vec::new(),
    });
    (seen, logger)
}

#[tokio::test]
async fn units_written_outside_the_crate_compose_in_list_order() {
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let trace = |label| Trace { label, log: Arc::clone(&log) };

    let handler_log = Arc::clone(&log);
    let pipeline = Chain::new()
        .layer(trace("outer"))
        .layer(trace("inner"))
        .apply(move |_req: Request| {
            let log = Arc::clone(&handler_log);
            async move {
                log.lock().push("handler".to_owned());
                Response::text("done")
            }
        });

    pipeline.handle(Request::builder().build()).await;

    assert_eq!(
        *log.lock(),
        ["outer:pre", "inner:pre", "handler", "inner:post", "outer:post"]
    );
}

#[tokio::test]
async fn a_rejection_deep_in_the_chain_is_logged_and_cors_stamped() {
    let (seen, logger) = capturing_logger();
    let pipeline = Chain::new()
        .layer(Recovery::new())
        .layer(logger)
        .layer(Cors::new())
        .layer(BearerAuth::new("s3cr3t"))
        .apply(hello);

    let response = pipeline
        .handle(Request::builder().header("origin", "https://app.example.com").build())
        .await;

    // The 401 came from three layers down; the browser can still read it and
    // the log line still carries its real status and size.
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(*seen.lock(), [(StatusCode::UNAUTHORIZED, "Unauthorized".len())]);
}

#[tokio::test]
async fn a_panic_unwinds_past_an_inner_logger_unlogged() {
    let (seen, logger) = capturing_logger();
    let pipeline = Chain::new().layer(Recovery::new()).layer(logger).apply(boom);

    let response = pipeline.handle(Request::builder().build()).await;

    // The unwind skipped the logger's post-delegation half. Put the logger
    // outside the recovery unit when the substitute must be logged too.
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn a_logger_outside_recovery_records_the_substitute_response() {
    let (seen, logger) = capturing_logger();
    let pipeline = Chain::new().layer(logger).layer(Recovery::new()).apply(boom);

    let response = pipeline.handle(Request::builder().build()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        *seen.lock(),
        [(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".len())]
    );
}

#[tokio::test]
async fn one_limiter_can_back_several_pipelines() {
    let limiter = Arc::new(RateLimiter::new(2, Duration::from_secs(60)));

    let api = Chain::new()
        .layer(RateLimit::with_limiter(Arc::clone(&limiter)))
        .apply(hello);
    let admin = Chain::new()
        .layer(RateLimit::with_limiter(Arc::clone(&limiter)))
        .apply(hello);

    assert_eq!(api.handle(Request::builder().build()).await.status_code(), StatusCode::OK);
    assert_eq!(admin.handle(Request::builder().build()).await.status_code(), StatusCode::OK);

    // Third request from the same client: over budget, whichever pipeline.
    assert_eq!(
        api.handle(Request::builder().build()).await.status_code(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn the_standard_profile_fronts_a_path_matching_handler() {
    let pipeline = stack::standard().apply(|req: Request| async move {
        if req.path() == "/healthz" {
            return health::liveness(req).await;
        }
        match req.path() {
            "/hello" => Response::text("hello"),
            _ => Response::status(StatusCode::NOT_FOUND),
        }
    });

    let ok = pipeline.handle(Request::builder().path("/hello").build()).await;
    assert_eq!(ok.status_code(), StatusCode::OK);
    assert_eq!(ok.headers().get("access-control-allow-origin").unwrap(), "*");

    let live = pipeline.handle(Request::builder().path("/healthz").build()).await;
    assert_eq!(live.status_code(), StatusCode::OK);

    let missing = pipeline.handle(Request::builder().path("/nowhere").build()).await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preflights_never_need_credentials() {
    let pipeline = stack::full("admin", "hunter2").apply(hello);

    let response = pipeline
        .handle(Request::builder().method(Method::OPTIONS).path("/anything").build())
        .await;

    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
}
