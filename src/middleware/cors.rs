//! Cross-origin resource sharing.
//!
//! One unit, two jobs: answer `OPTIONS` preflights on the spot with
//! `204 No Content`, and stamp the allow-headers onto every other response
//! flowing back through — including short-circuit responses from inner
//! units, so a `401` from an auth layer is still readable by the browser
//! that needs to see it.

use std::sync::Arc;

use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, HeaderName, HeaderValue,
};
use http::{HeaderMap, Method, StatusCode};

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

/// Configuration for the [`Cors`] unit.
pub struct CorsConfig {
    /// Origins allowed to read responses. A `"*"` anywhere in the list
    /// allows every origin; otherwise a request's `Origin` header must match
    /// an entry exactly to be echoed back, and no allow-origin header is set
    /// at all on a miss.
    pub allow_origins: Vec<String>,
    /// Advertised methods, joined with `", "` on the wire.
    pub allow_methods: Vec<String>,
    /// Advertised request headers, joined with `", "` on the wire.
    pub allow_headers: Vec<String>,
    pub allow_credentials: bool,
    /// How long (seconds) browsers may cache a preflight answer. `0` omits
    /// the header.
    pub max_age_seconds: u32,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_owned()],
            allow_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"].map(String::from).into(),
            allow_headers: ["Origin", "Content-Type", "Accept", "Authorization"]
                .map(String::from)
                .into(),
            allow_credentials: true,
            max_age_seconds: 86_400,
        }
    }
}

impl CorsConfig {
    /// Effective allow-origin for a request: `*` under a wildcard config,
    /// the request's own origin when the list contains it exactly, nothing
    /// otherwise.
    fn allowed_origin(&self, origin: Option<&str>) -> Option<String> {
        if self.allow_origins.iter().any(|o| o == "*") {
            return Some("*".to_owned());
        }
        let origin = origin?;
        self.allow_origins.iter().find(|allowed| *allowed == origin).cloned()
    }

    fn apply_headers(&self, headers: &mut HeaderMap, allow_origin: Option<&str>) {
        if let Some(origin) = allow_origin {
            insert(headers, ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        insert(headers, ACCESS_CONTROL_ALLOW_METHODS, &self.allow_methods.join(", "));
        insert(headers, ACCESS_CONTROL_ALLOW_HEADERS, &self.allow_headers.join(", "));
        if self.allow_credentials {
            insert(headers, ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
        }
        if self.max_age_seconds > 0 {
            insert(headers, ACCESS_CONTROL_MAX_AGE, &self.max_age_seconds.to_string());
        }
    }
}

/// Values come from configuration; one that is not valid on the wire is
/// skipped rather than failing the response.
fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

/// Middleware unit implementing the CORS protocol.
pub struct Cors {
    config: Arc<CorsConfig>,
}

impl Cors {
    /// Wildcard origins with the stock method and header lists.
    pub fn new() -> Self {
        Self::with_config(CorsConfig::default())
    }

    pub fn with_config(config: CorsConfig) -> Self {
        Self { config: Arc::new(config) }
    }
}

impl Default for Cors {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for Cors {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let config = Arc::clone(&self.config);
        (move |req: Request| {
            let next = next.clone();
            let config = Arc::clone(&config);
            async move {
                let allow_origin = config.allowed_origin(req.header("origin"));

                // Preflight: answer here, never delegate.
                if req.method() == Method::OPTIONS {
                    let mut response = Response::status(StatusCode::NO_CONTENT);
                    config.apply_headers(response.headers_mut(), allow_origin.as_deref());
                    return response;
                }

                let mut response = next.call(req).await;
                config.apply_headers(response.headers_mut(), allow_origin.as_deref());
                response
            }
        })
        .into_boxed_handler()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::middleware::Chain;

    async fn hello(_req: Request) -> Response {
        Response::text("hello")
    }

    #[tokio::test]
    async fn preflight_short_circuits_with_204() {
        let called = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&called);
        let pipeline = Chain::new().layer(Cors::new()).apply(move |_req: Request| {
            let seen = Arc::clone(&seen);
            async move {
                seen.store(true, Ordering::SeqCst);
                Response::text("handled")
            }
        });

        let response = pipeline
            .handle(Request::builder().method(Method::OPTIONS).path("/anything").build())
            .await;

        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
        assert!(!called.load(Ordering::SeqCst));
        assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
    }

    #[tokio::test]
    async fn wildcard_config_allows_any_origin() {
        let pipeline = Chain::new().layer(Cors::new()).apply(hello);
        let response = pipeline
            .handle(Request::builder().header("origin", "https://anywhere.example").build())
            .await;
        assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(response.body(), b"hello");
    }

    #[tokio::test]
    async fn listed_origin_is_echoed_exactly() {
        let config = CorsConfig {
            allow_origins: vec!["https://app.example.com".to_owned()],
            ..CorsConfig::default()
        };
        let pipeline = Chain::new().layer(Cors::with_config(config)).apply(hello);
        let response = pipeline
            .handle(Request::builder().header("origin", "https://app.example.com").build())
            .await;
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://app.example.com"
        );
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_allow_origin_header() {
        let config = CorsConfig {
            allow_origins: vec!["https://app.example.com".to_owned()],
            ..CorsConfig::default()
        };
        let pipeline = Chain::new().layer(Cors::with_config(config)).apply(hello);
        let response = pipeline
            .handle(Request::builder().header("origin", "https://evil.example.com").build())
            .await;

        // Still delegated — the unit withholds the header, not the response.
        assert_eq!(response.body(), b"hello");
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn stock_lists_are_joined_on_the_wire() {
        let pipeline = Chain::new().layer(Cors::new()).apply(hello);
        let response = pipeline.handle(Request::builder().build()).await;
        let headers = response.headers();

        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "Origin, Content-Type, Accept, Authorization"
        );
        assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
        assert_eq!(headers.get("access-control-max-age").unwrap(), "86400");
    }

    #[tokio::test]
    async fn credentials_and_max_age_can_be_switched_off() {
        let config = CorsConfig {
            allow_credentials: false,
            max_age_seconds: 0,
            ..CorsConfig::default()
        };
        let pipeline = Chain::new().layer(Cors::with_config(config)).apply(hello);
        let response = pipeline.handle(Request::builder().build()).await;

        assert!(response.headers().get("access-control-allow-credentials").is_none());
        assert!(response.headers().get("access-control-max-age").is_none());
    }
}
