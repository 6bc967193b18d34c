//! Scoped registry gate.
//!
//! Forwards requests under one package scope to an upstream registry with a
//! bearer credential taken from the environment.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ http server ─▶ scope route ──┬── no ─▶ 404 │
//!                         │                                │             │
//!                         │                               yes            │
//!                         │                                ▼             │
//!                         │                  outbound headers + bearer   │
//!                         │                                │             │
//!     Client Response     │                                ▼             │      Upstream
//!     ◀───────────────────┼── pass-through / 500 ◀── upstream client ◀───┼────▶ Registry
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use registry_gate::config::{load_config, validate_config, ConfigError, GateConfig};
use registry_gate::lifecycle::{spawn_signal_handler, Shutdown};
use registry_gate::observability::init_logging;
use registry_gate::security::{CredentialSource, EnvCredential};
use registry_gate::HttpServer;

#[derive(Parser)]
#[command(name = "registry-gate")]
#[command(about = "Forward one package scope to an upstream registry", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<GateConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(&config.observability)?;

    tracing::info!("registry-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        scope_prefix = %config.upstream.scope_prefix(),
        credential_env = %config.upstream.credential_env,
        "Configuration loaded"
    );

    if EnvCredential::new(config.upstream.credential_env.as_str())
        .credential()
        .is_none()
    {
        tracing::warn!(
            credential_env = %config.upstream.credential_env,
            "Credential variable is not set; requests will be forwarded unauthenticated"
        );
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signal();
    spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
