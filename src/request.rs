//! Incoming HTTP request type.

use std::net::SocketAddr;

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

/// An incoming HTTP request.
///
/// The server builds one per request from the hyper parts and hands it — by
/// value — to the pipeline. Middleware and handlers read it through the
/// accessors; whoever holds it owns it.
///
/// Tests and embedders build one by hand:
///
/// ```rust
/// use lamina::{Method, Request};
///
/// let req = Request::builder()
///     .method(Method::POST)
///     .path("/login")
///     .header("authorization", "Bearer s3cr3t")
///     .build();
///
/// assert_eq!(req.path(), "/login");
/// ```
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) remote_addr: SocketAddr,
}

impl Request {
    pub(crate) fn from_parts(
        parts: http::request::Parts,
        body: Bytes,
        remote_addr: SocketAddr,
    ) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            remote_addr,
        }
    }

    /// Builder for constructing a request directly (tests, embedding).
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { self.uri.path() }

    /// Full request target, query string included — [`path`](Request::path)
    /// strips the query.
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Address of the peer that sent the request. Behind a proxy this is the
    /// proxy's address — consult the forwarding headers yourself if you need
    /// the original client.
    pub fn remote_addr(&self) -> SocketAddr { self.remote_addr }

    /// Header lookup by name (case-insensitive). Returns `None` for values
    /// that are not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Credentials from an `Authorization: Basic …` header, decoded.
    ///
    /// The scheme is matched case-insensitively; the payload must be valid
    /// base64 over a UTF-8 `username:password` pair. The password may itself
    /// contain colons — the split happens at the first one.
    pub fn basic_auth(&self) -> Option<(String, String)> {
        let header = self.header("authorization")?;
        let (scheme, encoded) = header.split_at_checked(6)?;
        if !scheme.eq_ignore_ascii_case("basic ") {
            return None;
        }
        let decoded = general_purpose::STANDARD.decode(encoded).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some((username.to_owned(), password.to_owned()))
    }
}

// ── RequestBuilder ────────────────────────────────────────────────────────────

/// Fluent builder for [`Request`].
///
/// Obtain via [`Request::builder()`]. Defaults: `GET /`, no headers, empty
/// body, peer `127.0.0.1:0`.
pub struct RequestBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    remote_addr: SocketAddr,
}

impl RequestBuilder {
    fn new() -> Self {
        Self {
            method: Method::GET,
            uri: Uri::from_static("/"),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            remote_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request target, e.g. `/users/42` or `/search?q=rust`.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid URI.
    pub fn path(mut self, path: &str) -> Self {
        self.uri = path.parse().expect("invalid request path");
        self
    }

    /// # Panics
    ///
    /// Panics if `name` or `value` is not valid on the wire.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name: HeaderName = name.parse().expect("invalid header name");
        let value = HeaderValue::from_str(value).expect("invalid header value");
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = addr;
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            uri: self.uri,
            headers: self.headers,
            body: self.body,
            remote_addr: self.remote_addr,
        }
    }
}
