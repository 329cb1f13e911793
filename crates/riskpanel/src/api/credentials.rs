//! Bearer credential sources.
//!
//! Session management lives outside this crate. Requests obtain a token
//! through a [`CredentialProvider`] on every call, so a token rotated by the
//! session owner (a new file, a new environment) is picked up without
//! rebuilding the client.

use crate::error::{Error, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;

/// Environment variable read by [`EnvToken::default`]
pub const TOKEN_ENV_VAR: &str = "RISKPANEL_TOKEN";

/// Supplies the bearer token attached to each request.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Token for the next request.
    ///
    /// # Errors
    ///
    /// Returns `Error::Credentials` when no usable token is available.
    async fn bearer(&self) -> Result<SecretString>;
}

/// A fixed token, mostly useful in tests and scripts.
pub struct StaticToken(SecretString);

impl StaticToken {
    /// Wrap a literal token
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticToken").field(&"<redacted>").finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer(&self) -> Result<SecretString> {
        Ok(SecretString::from(self.0.expose_secret().to_string()))
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    /// Read from `var`
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(TOKEN_ENV_VAR)
    }
}

#[async_trait]
impl CredentialProvider for EnvToken {
    async fn bearer(&self) -> Result<SecretString> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(SecretString::from(token.trim().to_string())),
            _ => Err(Error::Credentials(format!("{} is not set", self.var))),
        }
    }
}

/// Reads the token from a file on every call.
///
/// Surrounding whitespace (typically a trailing newline) is ignored.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    /// Read from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialProvider for TokenFile {
    async fn bearer(&self) -> Result<SecretString> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::Credentials(format!(
                "cannot read token file {}: {e}",
                self.path.display()
            ))
        })?;

        let token = content.trim();
        if token.is_empty() {
            return Err(Error::Credentials(format!(
                "token file {} is empty",
                self.path.display()
            )));
        }
        Ok(SecretString::from(token.to_string()))
    }
}
