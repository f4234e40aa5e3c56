//! HTTP server and graceful shutdown.
//!
//! The server owns exactly two jobs: turn wire traffic into [`Request`]
//! values for one [`Pipeline`], and stop cleanly. Everything in between is
//! the pipeline's business.
//!
//! # Shutdown
//!
//! On SIGTERM or Ctrl-C the listener stops accepting immediately, every
//! in-flight connection runs to completion, and [`Server::serve`] returns.
//! Under Kubernetes this pairs with `terminationGracePeriodSeconds`: give it
//! more headroom than your slowest request, or the kubelet's SIGKILL will cut
//! the drain short.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::Error;
use crate::middleware::Pipeline;
use crate::request::Request;
use crate::response::Response;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use lamina::Server;
    /// let server = Server::bind("0.0.0.0:3000");
    /// ```
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Starts accepting connections and running every request through
    /// `pipeline`.
    ///
    /// Returns only after a full graceful shutdown: signal received, listener
    /// closed, in-flight requests drained.
    pub async fn serve(self, pipeline: Pipeline) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| Error::Bind { addr: self.addr, source })?;

        // Shared across connection tasks; clones share every layer.
        let pipeline = Arc::new(pipeline);

        info!(addr = %self.addr, "lamina listening");

        // Every connection task lands in the JoinSet so the drain below has
        // something to wait on.
        let mut tasks = tokio::task::JoinSet::new();

        // The signal future is polled repeatedly across loop iterations, so
        // it must be pinned once, out here.
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Top-to-bottom arm order: a pending signal beats any number
                // of queued connections.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let pipeline = Arc::clone(&pipeline);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // One service per connection; the closure runs once
                        // per request on it.
                        let svc = service_fn(move |req| {
                            let pipeline = Arc::clone(&pipeline);
                            async move { dispatch(pipeline, req, remote_addr).await }
                        });

                        // HTTP/1.1 or HTTP/2, whichever the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished tasks as we go; otherwise the set grows for
                // the life of the process.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("lamina stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Runs one request through the pipeline. Infallible from hyper's point of
/// view: whatever goes wrong becomes a response.
async fn dispatch(
    pipeline: Arc<Pipeline>,
    req: hyper::Request<hyper::body::Incoming>,
    remote_addr: SocketAddr,
) -> Result<http::Response<http_body_util::Full<bytes::Bytes>>, std::convert::Infallible> {
    let (parts, body) = req.into_parts();

    // Buffer the whole body up front; handlers and middleware see bytes, not
    // a stream. Size limits belong to the fronting proxy.
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            error!(peer = %remote_addr, "failed to read request body: {e}");
            return Ok(Response::status(http::StatusCode::BAD_REQUEST).into_inner());
        }
    };

    let request = Request::from_parts(parts, body, remote_addr);
    Ok(pipeline.handle(request).await.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal: SIGTERM (what Kubernetes and most
/// process managers send) or SIGINT (Ctrl-C in local dev). Windows only has
/// the latter.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    // Never resolves, which disables the arm off Unix.
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
