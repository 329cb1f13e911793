//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Each one
//! drives a [`Panel`] the way a user would, so the CLI shows exactly what
//! the panel shows.

use anyhow::{Result, bail};
use std::io::{self, IsTerminal};

use super::args::{ListArgs, ReportArgs, SetStatusArgs, ShellArgs, ToggleArgs};
use super::shell::{self, ShellSettings};
use crate::domain::{DraftField, RecordKind, RecordStatus, RiskIssue};
use crate::error::Error;
use crate::output::{self, OutputConfig, OutputMode};
use crate::panel::{LoadState, Panel};

/// Execute the list command
pub async fn execute_list(panel: &mut Panel, args: &ListArgs, output_mode: OutputMode) -> Result<()> {
    load(panel).await?;

    if let Some(id) = &args.popover {
        panel.toggle_popover(id)?;
    }

    output::print_panel(&panel.view(), output_mode)?;
    Ok(())
}

/// Execute the report command
pub async fn execute_report(
    panel: &mut Panel,
    args: &ReportArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let kind = RecordKind::from(args.kind);
    if kind != panel.draft().kind && !panel.update_draft(DraftField::Kind(kind)) {
        bail!("Only the project owner can report a {kind} (use --owner)");
    }
    panel.update_draft(DraftField::Title(args.title.clone()));
    panel.update_draft(DraftField::Description(
        args.description.clone().unwrap_or_default(),
    ));
    panel.update_draft(DraftField::ImpactLevel(args.impact.into()));
    panel.open_modal();

    let outcome = panel.submit().await.cloned();
    let created = outcome.map_err(|e| with_alert(panel, e))?;

    match output_mode {
        OutputMode::Json => output::print_json(&created)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            output::print_message(&output::success(
                &format!("Reported {} #{}", created.kind, created.id),
                &config,
            ))?;
            output::print_record(&created, output_mode)?;
        }
    }
    Ok(())
}

/// Execute the toggle command
pub async fn execute_toggle(
    panel: &mut Panel,
    args: &ToggleArgs,
    output_mode: OutputMode,
) -> Result<()> {
    load(panel).await?;

    let outcome = panel.toggle_status(&args.record_id).await;
    outcome.map_err(|e| with_alert(panel, e))?;
    ensure_reloaded(panel)?;

    print_status_result(panel, &args.record_id, output_mode)
}

/// Execute the set-status command
pub async fn execute_set_status(
    panel: &mut Panel,
    args: &SetStatusArgs,
    output_mode: OutputMode,
) -> Result<()> {
    load(panel).await?;

    let outcome = panel
        .change_status(&args.record_id, RecordStatus::from(args.status))
        .await;
    outcome.map_err(|e| with_alert(panel, e))?;
    ensure_reloaded(panel)?;

    print_status_result(panel, &args.record_id, output_mode)
}

/// Execute the shell command
pub async fn execute_shell(panel: &mut Panel, args: &ShellArgs) -> Result<()> {
    panel.mount().await;

    let stdin = io::stdin();
    let output = OutputConfig::from_env();
    let settings = ShellSettings {
        prompt: !args.quiet && stdin.is_terminal(),
        width: output::text_width(&output),
        output,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    shell::run(panel, stdin.lock(), &mut out, &settings).await?;
    Ok(())
}

/// Mount the panel and fail if the list could not be loaded.
async fn load(panel: &mut Panel) -> Result<()> {
    panel.mount().await;
    if let LoadState::Failed(message) = panel.load_state() {
        bail!("{message}");
    }
    Ok(())
}

/// Fail if the reload that follows a status change did not succeed.
fn ensure_reloaded(panel: &Panel) -> Result<()> {
    if let LoadState::Failed(message) = panel.load_state() {
        bail!("Status updated, but the list could not be reloaded: {message}");
    }
    Ok(())
}

/// Put the panel's alert in front of the underlying error.
fn with_alert(panel: &Panel, err: Error) -> anyhow::Error {
    match panel.alert() {
        Some(alert) => anyhow::Error::new(err).context(alert.to_string()),
        None => err.into(),
    }
}

fn print_status_result(panel: &Panel, id: &str, output_mode: OutputMode) -> Result<()> {
    let Some(record) = panel.find(id) else {
        output::print_message(&format!("Status updated; #{id} is no longer listed"))?;
        return Ok(());
    };

    match output_mode {
        OutputMode::Json => output::print_json(record)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            output::print_message(&output::success(&status_summary(record), &config))?;
        }
    }
    Ok(())
}

fn status_summary(record: &RiskIssue) -> String {
    format!(
        "{} #{} is now {}",
        capitalize(&record.kind.to_string()),
        record.id,
        record.status
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
