//! Minimal lamina example — a composed pipeline over a path-matched app.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example demo
//!
//! Try:
//!   curl http://localhost:3000/hello
//!   curl -i -X OPTIONS http://localhost:3000/hello \
//!        -H 'origin: https://app.example.com'
//!   curl -i http://localhost:3000/admin
//!   curl -i http://localhost:3000/admin -u admin:hunter2
//!   curl -i http://localhost:3000/boom
//!   curl http://localhost:3000/healthz

use lamina::middleware::{BasicAuth, Chain, Cors, Logger, RateLimit, Recovery};
use lamina::{Request, Response, Server, StatusCode, health};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Credentials are demo values — take them from your secret store.
    let admin = Chain::new()
        .layer(BasicAuth::new("admin", "hunter2"))
        .apply(admin_index);

    // First layer sees the request first and the response last, so Recovery
    // guards everything below it.
    let app = Chain::new()
        .layer(Recovery::new())
        .layer(Logger::new())
        .layer(Cors::new())
        .layer(RateLimit::per_minute(600))
        .apply(move |req: Request| {
            let admin = admin.clone();
            async move {
                match req.path() {
                    "/hello" => hello(req).await,
                    "/admin" => admin.handle(req).await,
                    "/boom" => boom(req).await,
                    "/healthz" => health::liveness(req).await,
                    "/readyz" => health::readiness(req).await,
                    _ => Response::status(StatusCode::NOT_FOUND),
                }
            }
        });

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET /hello
async fn hello(_req: Request) -> Response {
    Response::text("hello from lamina")
}

// GET /admin
//
// Guarded by its own sub-pipeline: BasicAuth wraps this handler only, so the
// probe paths above stay reachable without credentials.
async fn admin_index(_req: Request) -> Response {
    Response::json(r#"{"section":"admin","status":"ok"}"#)
}

// GET /boom
//
// Panics on purpose. Recovery turns the panic into a 500 and the process
// keeps serving — watch the log line it emits.
async fn boom(_req: Request) -> Response {
    panic!("demo panic")
}
