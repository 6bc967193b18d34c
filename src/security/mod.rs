//! Security subsystem.
//!
//! # Responsibilities
//! - Resolve the upstream bearer credential for each request
//!
//! # Design Decisions
//! - The credential is looked up per request, never cached
//! - The value is never logged and is marked sensitive on the header

pub mod credential;

pub use credential::{CredentialSource, EnvCredential, StaticCredential};
