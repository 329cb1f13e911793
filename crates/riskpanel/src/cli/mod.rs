//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for riskpanel using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `list`: Render the panel for a project
//! - `report`: Report a new risk or issue
//! - `toggle`: Flip a record between open and closed
//! - `set-status`: Set a record's status explicitly
//! - `shell`: Interactive panel session
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--project`: Project to display (required by every command)
//! - `--owner`: Act as the project owner
//! - `--config`, `--api-url`: Override configuration discovery
//!
//! # Example
//!
//! ```bash
//! riskpanel --project 42 list
//! riskpanel --project 42 --owner report --title "Vendor may slip" --type risk --impact high
//! riskpanel --project 42 toggle 17
//! riskpanel --project 42 set-status 17 open
//! ```

mod args;
mod execute;
pub mod shell;
mod types;
mod validators;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Re-export argument structs
pub use args::{ListArgs, ReportArgs, SetStatusArgs, ShellArgs, ToggleArgs};

// Re-export types
pub use types::{ImpactLevelArg, RecordKindArg, StatusArg};

// Re-export validators for external use
pub use validators::{validate_project_id, validate_record_id};

/// Riskpanel - project risks and issues from the terminal
///
/// Lists, reports and updates the risks and issues of a project through its
/// REST backend. The backend address and credential come from `riskpanel.yaml`,
/// `RISKPANEL_API_URL` and `RISKPANEL_TOKEN`.
#[derive(Parser, Debug)]
#[command(name = "riskpanel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: nearest riskpanel.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend address, overriding file and environment
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Project whose risks and issues are shown
    #[arg(short, long, global = true, value_name = "ID", value_parser = validate_project_id)]
    pub project: Option<String>,

    /// Act as the project owner (may act on risks and choose the record type)
    #[arg(long, global = true)]
    pub owner: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the risks & issues panel
    ///
    /// Shows every record of the project with its status badge, type and
    /// impact level. Records the viewer may act on carry a "Change Status" marker.
    List(ListArgs),

    /// Report a new risk or issue
    ///
    /// Submits the creation form. Only the project owner may choose `--type risk`.
    Report(ReportArgs),

    /// Flip a record between open and closed
    ///
    /// A closed record is reopened; any other status becomes closed.
    Toggle(ToggleArgs),

    /// Set a record's status explicitly
    SetStatus(SetStatusArgs),

    /// Interactive panel session
    ///
    /// Reads panel actions from stdin, one per line. Type `help` for the list.
    Shell(ShellArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown or invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Fails when `--project` is missing, configuration or credentials are
    /// unusable, or the command itself fails. Panel failures lead with the
    /// message the panel would show.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::{App, Overrides};
        use crate::domain::{ProjectId, Viewer};
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Riskpanel - project risks and issues");
            println!("Use --help for more information");
            return Ok(());
        };

        let project = self
            .project
            .clone()
            .context("--project <ID> is required")?;
        let overrides = Overrides {
            config_path: self.config.clone(),
            api_url: self.api_url.clone(),
        };
        let app = App::from_directory(&std::env::current_dir()?, &overrides).await?;
        let mut panel = app.into_panel(ProjectId::from(project), Viewer::from_owner_flag(self.owner));

        match command {
            Commands::List(args) => execute::execute_list(&mut panel, args, output_mode).await,
            Commands::Report(args) => execute::execute_report(&mut panel, args, output_mode).await,
            Commands::Toggle(args) => execute::execute_toggle(&mut panel, args, output_mode).await,
            Commands::SetStatus(args) => {
                execute::execute_set_status(&mut panel, args, output_mode).await
            }
            Commands::Shell(args) => execute::execute_shell(&mut panel, args).await,
        }
    }
}
