//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → scope.rs (strip leading separator, check scope prefix)
//!     → Return: Target (upstream URL) or None (404)
//!
//! Route Compilation (at startup):
//!     UpstreamConfig
//!     → ScopeRoute (prefix + trimmed upstream origin)
//!     → shared immutably by every request
//! ```
//!
//! # Design Decisions
//! - Exactly one allow-listed namespace, one upstream origin
//! - Prefix comparison is byte-exact: no case folding, no percent-decoding
//! - Query strings are carried opaquely, never parsed
//! - Deterministic: same input always yields the same target

pub mod scope;

pub use scope::{ScopeRoute, Target};
