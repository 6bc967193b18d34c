//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;

use registry_gate::config::GateConfig;

pub const SCOPE: &str = "@acme";

/// Body the mock upstream answers with.
pub const UPSTREAM_BODY: &[u8] = b"{\"name\":\"@acme/widgets\",\"versions\":{}}\n";

/// Body of the mock's `404` answer.
pub const MISSING_BODY: &[u8] = b"{\"error\":\"Not found\"}";

/// Body of the mock's `503` answer.
pub const UNAVAILABLE_BODY: &[u8] = b"registry maintenance";

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Handle to a running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }
}

/// Start a mock registry on an ephemeral loopback port.
///
/// Every request is recorded. `/@acme/moved` redirects to `/@acme/landed`,
/// `/@acme/missing` answers `404` and `/@acme/unavailable` answers `503`;
/// everything else answers `203` with fixed headers and [`UPSTREAM_BODY`].
pub async fn start_mock_upstream() -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .fallback(mock_handler)
        .with_state(recorded.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, recorded }
}

async fn mock_handler(
    State(recorded): State<Arc<Mutex<Vec<Recorded>>>>,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();

    recorded.lock().unwrap().push(Recorded {
        method: parts.method,
        path_and_query: path_and_query.clone(),
        headers: parts.headers,
        body: body.to_vec(),
    });

    match path_and_query.as_str() {
        "/@acme/moved" => {
            return (StatusCode::FOUND, [("location", "/@acme/landed")]).into_response();
        }
        "/@acme/missing" => {
            return Response::builder()
                .status(StatusCode::NOT_FOUND)
                .header("content-type", "application/json")
                .header("x-github-request-id", "CAFE:1234")
                .body(Body::from(MISSING_BODY))
                .unwrap();
        }
        "/@acme/unavailable" => {
            return Response::builder()
                .status(StatusCode::SERVICE_UNAVAILABLE)
                .header("content-type", "text/plain")
                .header("retry-after", "30")
                .body(Body::from(UNAVAILABLE_BODY))
                .unwrap();
        }
        _ => {}
    }

    Response::builder()
        .status(StatusCode::NON_AUTHORITATIVE_INFORMATION)
        .header("content-type", "application/vnd.npm.install-v1+json")
        .header("x-upstream", "mock")
        .header("etag", "W/\"abc\"")
        .body(Body::from(UPSTREAM_BODY))
        .unwrap()
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Gate configuration pointing at `base_url` for the `@acme` scope.
pub fn gate_config(base_url: &str) -> GateConfig {
    let mut config = GateConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = base_url.into();
    config.upstream.scope = SCOPE.into();
    config
}
