//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the listener address and upstream origin are usable
//! - Check the scope can form an unambiguous path prefix
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GateConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("upstream.base_url {0:?} is not an absolute URL")]
    BaseUrlUnparseable(String),

    #[error("upstream.base_url scheme must be http or https, got {0:?}")]
    BaseUrlScheme(String),

    #[error("upstream.base_url must be a bare origin without path, query or fragment")]
    BaseUrlNotOrigin,

    #[error("upstream.scope must not be empty")]
    EmptyScope,

    #[error("upstream.scope {0:?} must not contain '/'")]
    ScopeSeparator(String),

    #[error("upstream.credential_env must not be empty")]
    EmptyCredentialEnv,
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::BaseUrlScheme(url.scheme().to_string()));
            }
            if !url.has_host() {
                errors.push(ValidationError::BaseUrlUnparseable(
                    config.upstream.base_url.clone(),
                ));
            }
            if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::BaseUrlNotOrigin);
            }
        }
        Err(_) => errors.push(ValidationError::BaseUrlUnparseable(
            config.upstream.base_url.clone(),
        )),
    }

    if config.upstream.scope.is_empty() {
        errors.push(ValidationError::EmptyScope);
    } else if config.upstream.scope.contains('/') {
        errors.push(ValidationError::ScopeSeparator(config.upstream.scope.clone()));
    }

    if config.upstream.credential_env.is_empty() {
        errors.push(ValidationError::EmptyCredentialEnv);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
