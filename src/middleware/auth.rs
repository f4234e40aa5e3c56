//! Credential gates: HTTP Basic and bearer-token.
//!
//! Two independent units. Pick the one matching how your callers hold
//! credentials; layering both would demand both at once, which no client
//! sends.

use std::sync::Arc;

use http::StatusCode;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

// ── Basic ─────────────────────────────────────────────────────────────────────

/// Guards the pipeline behind a single username/password pair.
///
/// Credentials come from the request's basic-auth encoding (see
/// [`Request::basic_auth`]). Anything else — missing header, wrong scheme,
/// wrong pair — is answered with `401` and a `Basic realm="Restricted"`
/// challenge, without delegating.
pub struct BasicAuth {
    username: Arc<str>,
    password: Arc<str>,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().into(),
            password: password.into().into(),
        }
    }
}

impl Middleware for BasicAuth {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let username = Arc::clone(&self.username);
        let password = Arc::clone(&self.password);
        (move |req: Request| {
            let next = next.clone();
            let username = Arc::clone(&username);
            let password = Arc::clone(&password);
            async move {
                let authorized = req
                    .basic_auth()
                    .is_some_and(|(user, pass)| user == *username && pass == *password);
                if authorized {
                    next.call(req).await
                } else {
                    Response::builder()
                        .status(StatusCode::UNAUTHORIZED)
                        .header("www-authenticate", r#"Basic realm="Restricted""#)
                        .text("Unauthorized")
                }
            }
        })
        .into_boxed_handler()
    }
}

// ── Bearer ────────────────────────────────────────────────────────────────────

/// Guards the pipeline behind a single bearer token.
///
/// The `Authorization` header must carry the literal `Bearer ` scheme — a
/// missing header, any other scheme, or a token that does not equal the
/// configured secret is answered with `401` and a `WWW-Authenticate: Bearer`
/// challenge. The comparison is plain equality: this is a shared-secret
/// gate, not JWT verification — bring a JWT crate when you need signatures
/// and claims.
pub struct BearerAuth {
    secret: Arc<str>,
}

impl BearerAuth {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into().into() }
    }
}

impl Middleware for BearerAuth {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let secret = Arc::clone(&self.secret);
        (move |req: Request| {
            let next = next.clone();
            let secret = Arc::clone(&secret);
            async move {
                let authorized = req
                    .header("authorization")
                    .and_then(|header| header.strip_prefix("Bearer "))
                    .is_some_and(|token| token == secret.as_ref());
                if authorized {
                    next.call(req).await
                } else {
                    Response::builder()
                        .status(StatusCode::UNAUTHORIZED)
                        .header("www-authenticate", "Bearer")
                        .text("Unauthorized")
                }
            }
        })
        .into_boxed_handler()
    }
}
