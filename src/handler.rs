//! Handler trait and type erasure.
//!
//! A pipeline is a stack of handlers of *different* concrete types: the
//! terminal `async fn` at the bottom, one wrapper closure per middleware
//! layer above it. They all flow through the same composition machinery, so
//! each is erased behind a [`BoxedHandler`] the moment it enters:
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }
//!        │  into_boxed_handler()           (Handler blanket impl)
//!        ▼
//! BoxedHandler ── wrapped by each layer into another BoxedHandler
//!        │  call(req)                      (one vtable dispatch per layer)
//!        ▼
//! BoxFuture ── polled by the runtime to a Response
//! ```
//!
//! Per request, per layer, that costs one `Arc` clone and one virtual call.
//! Next to real network I/O, neither registers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Erased types ──────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future resolving to a [`Response`].
///
/// Boxed so every layer returns the same type; pinned because the runtime
/// polls it in place; `Send + 'static` so tokio may move it across threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface behind [`BoxedHandler`].
pub(crate) trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
///
/// This is the currency middleware trades in: [`Middleware::wrap`] receives
/// the next handler in line as a `BoxedHandler` and returns its replacement
/// as one. Cloning is one atomic reference-count increment — clone it into
/// the closure you hand to [`Handler::into_boxed_handler`].
///
/// [`Middleware::wrap`]: crate::middleware::Middleware::wrap
#[derive(Clone)]
pub struct BoxedHandler(Arc<dyn ErasedHandler + Send + Sync + 'static>);

impl BoxedHandler {
    /// Invokes the handler: one vtable dispatch, then the handler's own
    /// future.
    pub fn call(&self, req: Request) -> BoxFuture {
        self.0.call(req)
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// and for any closure of the same shape — which is how middleware is built:
/// a layer wraps the next [`BoxedHandler`] in a closure and calls
/// [`into_boxed_handler`](Handler::into_boxed_handler) on it.
///
/// The trait is sealed: only the blanket impl below can satisfy it, so the
/// handler contract cannot be widened from outside the crate.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    /// Erases the concrete handler type behind a [`BoxedHandler`].
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

/// `Fn(Request) -> Fut` covers named `async fn` items, closures returning an
/// `async move` block, and any other `Fn` type of that shape.
impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        BoxedHandler(Arc::new(FnHandler(self)))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Holds a concrete handler `F` and implements [`ErasedHandler`] for it,
/// bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        // The concrete future is mapped through IntoResponse and boxed so the
        // signature matches the trait.
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
