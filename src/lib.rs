//! Scoped registry gate library.
//!
//! Forwards requests for one package scope to an upstream registry,
//! attaching a bearer credential, and rejects everything else.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
