//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;

use super::types::{ImpactLevelArg, RecordKindArg, StatusArg};
use super::validators::validate_record_id;

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone, Default)]
pub struct ListArgs {
    /// Open the status popover for this record in the rendered panel
    #[arg(long, value_name = "RECORD_ID", value_parser = validate_record_id)]
    pub popover: Option<String>,
}

/// Arguments for the `report` command
#[derive(Parser, Debug, Clone)]
pub struct ReportArgs {
    /// Short title
    #[arg(long)]
    pub title: String,

    /// Record type (only the project owner may choose `risk`)
    #[arg(short = 't', long = "type", value_enum, default_value_t)]
    pub kind: RecordKindArg,

    /// Free-text description
    #[arg(short = 'D', long)]
    pub description: Option<String>,

    /// Impact level
    #[arg(short, long, value_enum, default_value_t)]
    pub impact: ImpactLevelArg,
}

/// Arguments for the `toggle` command
#[derive(Parser, Debug, Clone)]
pub struct ToggleArgs {
    /// Record to flip between open and closed
    #[arg(value_parser = validate_record_id)]
    pub record_id: String,
}

/// Arguments for the `set-status` command
#[derive(Parser, Debug, Clone)]
pub struct SetStatusArgs {
    /// Record to update
    #[arg(value_parser = validate_record_id)]
    pub record_id: String,

    /// New status
    #[arg(value_enum)]
    pub status: StatusArg,
}

/// Arguments for the `shell` command
#[derive(Parser, Debug, Clone, Default)]
pub struct ShellArgs {
    /// Do not print the prompt (for piped input)
    #[arg(short, long)]
    pub quiet: bool,
}
