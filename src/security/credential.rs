//! Upstream credential lookup.

use std::env;
use std::fmt;

/// Source of the bearer credential attached to forwarded requests.
///
/// Implementations are consulted once per request.
pub trait CredentialSource: Send + Sync {
    /// The current credential, or `None` when none is configured.
    fn credential(&self) -> Option<String>;
}

/// Reads the credential from a process environment variable.
///
/// An unset or empty variable counts as no credential.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredential {
    fn credential(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|value| !value.is_empty())
    }
}

/// A fixed credential, for embedding and tests.
#[derive(Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.0.as_ref().map(|_| "<redacted>");
        f.debug_tuple("StaticCredential").field(&shown).finish()
    }
}

impl CredentialSource for StaticCredential {
    fn credential(&self) -> Option<String> {
        self.0.clone()
    }
}
