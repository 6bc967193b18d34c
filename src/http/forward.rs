//! The forwarding gate.
//!
//! One inbound request produces at most one upstream request:
//!
//! ```text
//! path outside scope  → 404, upstream never contacted
//! path inside scope   → outbound headers (+ credential) → upstream
//!     upstream answers → response passed through verbatim
//!     transport fails  → error logged, generic 500
//! ```
//!
//! No retries, no buffering. The body streams in both directions.

use axum::body::{Body, HttpBody};
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::request::{outbound_headers, RequestIdExt};
use crate::http::response::{internal_error, not_found, pass_through};
use crate::http::server::AppState;

/// Failures after a request has been accepted for forwarding.
///
/// Every variant becomes the same generic 500; the detail stays in the logs.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The configured credential cannot be encoded as a header value.
    #[error("credential is not a valid header value")]
    InvalidCredential,

    /// DNS, connect, TLS, protocol or redirect failure talking to upstream.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        internal_error()
    }
}

/// Catch-all handler: gate, forward, relay.
pub async fn forward_handler(State(state): State<AppState>, request: Request) -> Response {
    let request_id = request.request_id();

    let Some(target) = state.route.resolve(request.uri()) else {
        tracing::debug!(
            request_id = %request_id,
            path = %request.uri().path(),
            "Path outside allowed scope"
        );
        return not_found();
    };

    let method = request.method().clone();
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        target = %target,
        "Forwarding request"
    );

    match forward(&state, request, target.as_str(), &request_id).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                status = %response.status(),
                "Upstream responded"
            );
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                target = %target,
                error = ?e,
                "Error forwarding to upstream"
            );
            e.into_response()
        }
    }
}

async fn forward(
    state: &AppState,
    request: Request,
    target: &str,
    request_id: &str,
) -> Result<Response, ForwardError> {
    let credential = state.credential.credential();
    let (parts, body) = request.into_parts();
    let headers = outbound_headers(&parts.headers, credential.as_deref(), request_id)?;

    let mut outbound = state.client.request(parts.method, target).headers(headers);
    if let Some(body) = streaming_body(body) {
        outbound = outbound.body(body);
    }
    let upstream = outbound.send().await?;

    Ok(pass_through(upstream))
}

/// `None` for bodiless requests so the client does not switch to chunked encoding.
fn streaming_body(body: Body) -> Option<reqwest::Body> {
    if body.is_end_stream() {
        return None;
    }
    Some(reqwest::Body::wrap_stream(body.into_data_stream()))
}
