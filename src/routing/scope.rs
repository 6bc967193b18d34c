//! Scope matching and upstream target construction.
//!
//! # Responsibilities
//! - Strip a single leading `/` from the request path
//! - Match the remaining path against the scope prefix (case-sensitive)
//! - Join the upstream origin, the path and the raw query string
//!
//! # Design Decisions
//! - A `Target` can only be obtained through a successful scope match
//! - The query is appended as received; `?` with nothing after it is dropped

use std::fmt;

use axum::http::Uri;

use crate::config::UpstreamConfig;

/// Upstream URL for a request that passed the scope check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: String,
}

impl Target {
    /// The full upstream URL.
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// The single allow-listed route: one scope prefix, one upstream origin.
#[derive(Debug, Clone)]
pub struct ScopeRoute {
    prefix: String,
    base_url: String,
}

impl ScopeRoute {
    /// Create a route from a scope prefix (e.g. `"@acme/"`) and upstream origin.
    pub fn new(prefix: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            prefix: prefix.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the route from validated upstream configuration.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(config.scope_prefix(), config.base_url.as_str())
    }

    /// Returns the package path (leading separator removed) if it is in scope.
    pub fn match_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        let package = path.strip_prefix('/').unwrap_or(path);
        package.starts_with(&self.prefix).then_some(package)
    }

    /// Resolve the upstream target for a request URI.
    ///
    /// Returns `None` when the path is outside the scope; no target exists
    /// for such a request.
    pub fn resolve(&self, uri: &Uri) -> Option<Target> {
        let package = self.match_path(uri.path())?;
        let url = match uri.query() {
            Some(query) if !query.is_empty() => {
                format!("{}/{}?{}", self.base_url, package, query)
            }
            _ => format!("{}/{}", self.base_url, package),
        };
        Some(Target { url })
    }
}
