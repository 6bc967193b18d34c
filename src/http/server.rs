//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all forwarding handler
//! - Wire up middleware (trace spans)
//! - Build the shared upstream client
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::GateConfig;
use crate::http::forward::forward_handler;
use crate::lifecycle::ShutdownSignal;
use crate::routing::ScopeRoute;
use crate::security::{CredentialSource, EnvCredential};

/// Maximum redirects the upstream client follows before giving up.
const MAX_REDIRECTS: usize = 10;

/// Application state injected into handlers.
///
/// Everything here is immutable; concurrent requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub route: Arc<ScopeRoute>,
    pub credential: Arc<dyn CredentialSource>,
    pub client: reqwest::Client,
}

impl AppState {
    /// Build state from configuration and a credential source.
    pub fn new(
        config: &GateConfig,
        credential: Arc<dyn CredentialSource>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            route: Arc::new(ScopeRoute::from_config(&config.upstream)),
            credential,
            client,
        })
    }
}

/// Build the Axum router with all middleware layers.
///
/// Relayed upstream statuses are not failures of the gate, so the trace
/// layer never logs on failure; the handler logs its own errors.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/{*path}", any(forward_handler))
        .route("/", any(forward_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http().on_failure(()))
}

/// HTTP server for the registry gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
}

impl HttpServer {
    /// Create a server whose credential comes from the configured environment variable.
    pub fn new(config: GateConfig) -> Result<Self, reqwest::Error> {
        let credential = Arc::new(EnvCredential::new(config.upstream.credential_env.clone()));
        Self::with_credential(config, credential)
    }

    /// Create a server with an explicit credential source.
    pub fn with_credential(
        config: GateConfig,
        credential: Arc<dyn CredentialSource>,
    ) -> Result<Self, reqwest::Error> {
        let state = AppState::new(&config, credential)?;
        let router = build_router(state);
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            scope = %self.config.upstream.scope,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
