//! Configuration management for riskpanel.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. `riskpanel.yaml`, found in the working directory or one of its parents
//!    (or given explicitly with `--config`)
//! 2. Environment: `RISKPANEL_API_URL`, `RISKPANEL_TOKEN`
//! 3. Command-line flags
//!
//! ```yaml
//! api-url: http://localhost:8000
//! token-file: /home/me/.config/riskpanel/token
//! connect-timeout-secs: 10
//! request-timeout-secs: 30
//! ```

use crate::api::credentials::TOKEN_ENV_VAR;
use crate::api::http::DEFAULT_API_URL;
use crate::api::{CredentialProvider, EnvToken, Timeouts, TokenFile};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "riskpanel.yaml";

/// Environment variable overriding the backend address
pub const API_URL_ENV_VAR: &str = "RISKPANEL_API_URL";

/// Maximum directory depth to traverse when searching for a config file
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure for riskpanel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct PanelConfig {
    /// Backend base address
    pub api_url: String,

    /// File holding the bearer token, re-read on every request
    pub token_file: Option<PathBuf>,

    /// Seconds allowed to establish a connection
    pub connect_timeout_secs: u64,

    /// Seconds allowed for a whole request
    pub request_timeout_secs: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        let timeouts = Timeouts::default();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_file: None,
            connect_timeout_secs: timeouts.connect.as_secs(),
            request_timeout_secs: timeouts.request.as_secs(),
        }
    }
}

impl PanelConfig {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// - `Error::Io` if the file cannot be read
    /// - `Error::Config` if it is not valid YAML or fails [`PanelConfig::validate`]
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let mut config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;

        // Relative token paths are relative to the config file, not the cwd.
        let resolved = match (&config.token_file, path.parent()) {
            (Some(token_file), Some(dir)) if token_file.is_relative() => Some(dir.join(token_file)),
            _ => None,
        };
        if resolved.is_some() {
            config.token_file = resolved;
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if serialization fails, `Error::Io` if the
    /// file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load `riskpanel.yaml` from `start_dir` or its nearest ancestor that has
    /// one, falling back to defaults when there is none.
    ///
    /// # Errors
    ///
    /// Returns whatever [`PanelConfig::load`] returns for the file found.
    pub async fn discover(start_dir: &Path) -> Result<Self> {
        match find_config_file(start_dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                Self::load(&path).await
            }
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply environment overrides read through `lookup`.
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV_VAR).filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        self
    }

    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an empty `api-url` or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(Error::Config("api-url cannot be empty".to_string()));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(Error::Config("timeouts must be at least 1 second".to_string()));
        }
        Ok(())
    }

    /// Timeouts for the HTTP client
    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Pick the credential source.
    ///
    /// `RISKPANEL_TOKEN` wins over `token-file`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Credentials` when neither is configured.
    pub fn credential_provider<F>(&self, lookup: F) -> Result<Arc<dyn CredentialProvider>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup(TOKEN_ENV_VAR).is_some_and(|t| !t.trim().is_empty()) {
            return Ok(Arc::new(EnvToken::default()));
        }
        if let Some(path) = &self.token_file {
            return Ok(Arc::new(TokenFile::new(path)));
        }
        Err(Error::Credentials(format!(
            "no credential configured: set {TOKEN_ENV_VAR} or token-file in {CONFIG_FILE_NAME}"
        )))
    }
}

/// Find the nearest `riskpanel.yaml`, starting at `start_dir` and walking up.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
