//! Response handling and transformation.
//!
//! # Responsibilities
//! - Hand the upstream response back to the client untouched
//! - Produce the plain-text rejection and failure responses
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Upstream status, headers and body bytes are never rewritten
//! - Failure responses carry a fixed body, never upstream detail

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Convert an upstream response into a client response without copying.
pub fn pass_through(upstream: reqwest::Response) -> Response {
    let upstream: axum::http::Response<reqwest::Body> = upstream.into();
    let (parts, body) = upstream.into_parts();
    Response::from_parts(parts, Body::new(body))
}

/// Response for a path outside the allow-listed scope.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Response for any failure while forwarding.
pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
