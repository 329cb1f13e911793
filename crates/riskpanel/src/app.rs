//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that resolves configuration,
//! picks the credential source and builds the HTTP client the panel talks
//! through.
//!
//! # Example
//!
//! ```no_run
//! use riskpanel::app::{App, Overrides};
//! use riskpanel::domain::{ProjectId, Viewer};
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new("."), &Overrides::default()).await?;
//!     let mut panel = app.into_panel(ProjectId::from("42"), Viewer::Owner);
//!     panel.mount().await;
//!     Ok(())
//! }
//! ```

use crate::api::{HttpApi, RiskIssueApi};
use crate::config::PanelConfig;
use crate::domain::{ProjectId, Viewer};
use crate::error::Result;
use crate::panel::Panel;
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Explicit configuration file instead of discovery
    pub config_path: Option<PathBuf>,
    /// Backend address
    pub api_url: Option<String>,
}

/// Application context for CLI operations.
pub struct App {
    config: PanelConfig,
    api: Box<dyn RiskIssueApi>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("api", &"<dyn RiskIssueApi>")
            .finish()
    }
}

impl App {
    /// Create an App for the given working directory.
    ///
    /// Loads `--config` if given, otherwise the nearest `riskpanel.yaml`,
    /// then applies environment and command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be read or is invalid
    /// - No credential source is configured
    /// - The API URL is not usable
    pub async fn from_directory(working_dir: &Path, overrides: &Overrides) -> Result<Self> {
        let config = match &overrides.config_path {
            Some(path) => PanelConfig::load(path).await?,
            None => PanelConfig::discover(working_dir).await?,
        };

        let mut config = config.with_env(|name| std::env::var(name).ok());
        if let Some(url) = &overrides.api_url {
            config.api_url.clone_from(url);
        }
        config.validate()?;

        Self::from_config(config)
    }

    /// Create an App from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no credential source is configured or the API
    /// URL is not usable.
    pub fn from_config(config: PanelConfig) -> Result<Self> {
        let credentials = config.credential_provider(|name| std::env::var(name).ok())?;
        let api = HttpApi::new(&config.api_url, credentials, config.timeouts())?;
        tracing::debug!(api_url = %api.base_url(), "Backend client ready");

        Ok(Self {
            config,
            api: Box::new(api),
        })
    }

    /// Create an App around an existing client.
    #[must_use]
    pub fn with_api(config: PanelConfig, api: Box<dyn RiskIssueApi>) -> Self {
        Self { config, api }
    }

    /// Resolved configuration
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Build an unmounted panel for `project`.
    #[must_use]
    pub fn into_panel(self, project: ProjectId, viewer: Viewer) -> Panel {
        Panel::new(self.api, project, viewer)
    }
}
