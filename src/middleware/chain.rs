//! Pipeline composition.

use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

// ── Chain ────────────────────────────────────────────────────────────────────

/// An ordered list of middleware units, waiting for a handler to wrap.
///
/// Layers apply in list order: the first [`layer`](Chain::layer) becomes the
/// outermost wrapper — it sees the request first and the response last.
/// `Chain` implements [`Middleware`] itself, so a chain can be layered into
/// another chain and its units splice in where it sits.
///
/// Building a chain composes nothing and calls nothing; work happens only
/// when a request runs through the [`Pipeline`] produced by
/// [`apply`](Chain::apply).
#[derive(Clone, Default)]
pub struct Chain {
    units: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    /// Appends a unit. Earlier layers wrap later ones.
    pub fn layer(mut self, unit: impl Middleware) -> Self {
        self.units.push(Arc::new(unit));
        self
    }

    /// Wraps `handler` in every unit and returns the runnable result.
    ///
    /// The chain is borrowed, not consumed: one chain can stamp out any
    /// number of pipelines, and the units are shared, not rebuilt.
    pub fn apply(&self, handler: impl Handler) -> Pipeline {
        Pipeline { handler: self.wrap(handler.into_boxed_handler()) }
    }
}

impl Middleware for Chain {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        // Fold from the innermost unit outward so the first-listed unit ends
        // up as the outermost wrapper.
        self.units
            .iter()
            .rev()
            .fold(next, |wrapped, unit| unit.wrap(wrapped))
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

/// A composed, immutable request-processing pipeline.
///
/// This is what [`Server::serve`](crate::Server::serve) runs: middleware
/// layers around a terminal handler, fused into a single handler. Cloning is
/// cheap (one atomic increment) and clones share everything.
///
/// [`handle`](Pipeline::handle) is the per-request entry point — tests use
/// it to drive a pipeline without opening a socket.
#[derive(Clone)]
pub struct Pipeline {
    handler: BoxedHandler,
}

impl Pipeline {
    /// A pipeline with no middleware: every request goes straight to
    /// `handler`.
    pub fn new(handler: impl Handler) -> Self {
        Self { handler: handler.into_boxed_handler() }
    }

    /// Runs one request through every layer and returns the response.
    pub async fn handle(&self, req: Request) -> Response {
        self.handler.call(req).await
    }
}
