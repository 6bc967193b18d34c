//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! forwarding gate, server, lifecycle:
//!     → tracing events (structured fields, request_id on every gate event)
//!     → logging.rs subscriber (pretty or JSON to stdout)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never interpolated secrets
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_logging;
