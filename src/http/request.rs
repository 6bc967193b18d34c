//! Request handling and transformation.
//!
//! # Responsibilities
//! - Derive a correlation ID for log events (client's `x-request-id` or UUID v4)
//! - Build the outbound header set for the upstream call
//! - Attach the bearer credential, overwriting any inbound value
//!
//! # Design Decisions
//! - The correlation ID lives in logs only; it is never injected into the
//!   forwarded headers or the relayed response
//! - Inbound headers are cloned, never mutated in place
//! - `Host` is left to the client so it always matches the target URL

use axum::http::header::{AUTHORIZATION, HOST};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use uuid::Uuid;

use crate::http::forward::ForwardError;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Access to the correlation ID of a request.
pub trait RequestIdExt {
    /// The client's `x-request-id` if it is valid UTF-8, else a fresh UUID v4.
    fn request_id(&self) -> String;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> String {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

/// Build the header set for the upstream request.
///
/// With a credential, `Authorization` is replaced by `Bearer <credential>`.
/// Without one, the inbound headers pass unchanged and a warning is logged.
pub fn outbound_headers(
    inbound: &HeaderMap,
    credential: Option<&str>,
    request_id: &str,
) -> Result<HeaderMap, ForwardError> {
    let mut headers = inbound.clone();
    headers.remove(HOST);

    match credential {
        Some(token) => {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ForwardError::InvalidCredential)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        None => {
            tracing::warn!(
                request_id = %request_id,
                "Upstream credential is not set; forwarding without authorization"
            );
        }
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts events at a single level.
    struct LevelCounter {
        level: Level,
        count: Arc<AtomicUsize>,
    }

    impl<S: Subscriber> Layer<S> for LevelCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == self.level {
                self.count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings<F: FnOnce()>(f: F) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(LevelCounter {
            level: Level::WARN,
            count: count.clone(),
        });
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    fn inbound() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("gate.local"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer client-token"));
        headers.insert("accept", HeaderValue::from_static("application/vnd.npm.install-v1+json"));
        headers
    }

    #[test]
    fn test_credential_overwrites_authorization() {
        let headers = outbound_headers(&inbound(), Some("ghp_secret"), "req-1").unwrap();
        let values: Vec<_> = headers.get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values, vec!["Bearer ghp_secret"]);
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers["accept"], "application/vnd.npm.install-v1+json");
    }

    #[test]
    fn test_host_not_forwarded() {
        let headers = outbound_headers(&inbound(), Some("t"), "req-1").unwrap();
        assert!(headers.get(HOST).is_none());
    }

    #[test]
    fn test_missing_credential_keeps_headers_and_warns_once() {
        let mut result = None;
        let warnings = count_warnings(|| {
            result = Some(outbound_headers(&inbound(), None, "req-1"));
        });
        let headers = result.unwrap().unwrap();
        assert_eq!(warnings, 1);
        assert_eq!(headers[AUTHORIZATION], "Bearer client-token");
    }

    #[test]
    fn test_configured_credential_does_not_warn() {
        let warnings = count_warnings(|| {
            outbound_headers(&inbound(), Some("t"), "req-1").unwrap();
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_credential_with_newline_rejected() {
        let err = outbound_headers(&inbound(), Some("bad\ntoken"), "req-1").unwrap_err();
        assert!(matches!(err, ForwardError::InvalidCredential));
    }

    #[test]
    fn test_client_request_id_reused() {
        let req = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(())
            .unwrap();
        assert_eq!(req.request_id(), "abc-123");
    }

    #[test]
    fn test_missing_request_id_generated() {
        let req = Request::builder().body(()).unwrap();
        let a = req.request_id();
        let b = req.request_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_request_id_not_added_to_outbound_headers() {
        let headers = outbound_headers(&inbound(), Some("t"), "req-1").unwrap();
        assert!(headers.get(X_REQUEST_ID).is_none());
    }
}
