//! Output formatting for CLI commands.
//!
//! This module renders a [`PanelView`] either as human-readable text or as
//! JSON for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)

pub mod color;

use crate::domain::RiskIssue;
use crate::panel::{ModalView, PanelView, RowView};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success};

use color::{
    badge_icon, bold, colorize_badge, colorize_id, colorize_impact, colorize_kind, dimmed,
};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Placeholder shown while the list request is in flight
pub const LOADING_TEXT: &str = "Loading Risks/Issues...";

/// Shown when the project has no records
pub const EMPTY_TEXT: &str = "No risks or issues reported for this project.";

/// Configuration for output formatting.
///
/// This struct holds settings that control how output is formatted,
/// including terminal width limits, ASCII fallback mode, and color output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `RISKPANEL_MAX_WIDTH`: Maximum content width (default: 80)
    /// - `RISKPANEL_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `RISKPANEL_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same as [`OutputConfig::from_env`], reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_width = match lookup("RISKPANEL_MAX_WIDTH") {
            Some(s) if !s.is_empty() => match s.parse() {
                Ok(width) => width,
                Err(_) => {
                    tracing::warn!(
                        env_var = "RISKPANEL_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match lookup("RISKPANEL_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "RISKPANEL_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("RISKPANEL_COLOR")
                .is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map_or(DEFAULT_TERMINAL_WIDTH as usize, |(w, _)| w.0 as usize)
}

/// Width text output wraps at: the terminal width, capped by `config`.
pub(crate) fn text_width(config: &OutputConfig) -> usize {
    get_terminal_width().min(config.max_width)
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print the panel in the specified format
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_panel(view: &PanelView<'_>, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let width = text_width(&config);
            render_panel_text(&mut handle, view, width, &config)
        }
        OutputMode::Json => write_json(&mut handle, view),
    }
}

/// Print a single record in the specified format
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_record(record: &RiskIssue, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let width = text_width(&config);
            render_record(&mut handle, record, width, &config)
        }
        OutputMode::Json => write_json(&mut handle, record),
    }
}

/// Print a simple message
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{msg}")
}

/// Print a JSON-formatted result for any serializable value
///
/// # Errors
///
/// Returns an error if serialization or writing to stdout fails.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

/// Render the panel as text into `w`, wrapping long text at `width`.
pub fn render_panel_text<W: Write>(
    w: &mut W,
    view: &PanelView<'_>,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    match view {
        PanelView::Loading => writeln!(w, "{LOADING_TEXT}"),
        PanelView::Failed { message } => writeln!(w, "{}", error(message, config)),
        PanelView::Ready {
            project,
            rows,
            modal,
            alert,
            ..
        } => {
            writeln!(
                w,
                "{}  {}",
                bold("Project Risks & Issues", config),
                dimmed(&format!("(project {project})"), config)
            )?;
            writeln!(w)?;

            if rows.is_empty() {
                writeln!(w, "{EMPTY_TEXT}")?;
            }
            for row in rows {
                render_row(w, row, width, config)?;
            }

            if let Some(modal) = modal {
                writeln!(w)?;
                render_modal(w, modal, config)?;
            }

            if let Some(alert) = alert {
                writeln!(w)?;
                writeln!(w, "{} {}", bold(&error("Alert:", config), config), alert)?;
            }
            Ok(())
        }
    }
}

fn render_record<W: Write>(
    w: &mut W,
    record: &RiskIssue,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    let tone = record.status.badge_tone();
    writeln!(
        w,
        "{} {}  {}  {}",
        badge_icon(tone, config),
        colorize_id(&record.id.to_string(), config),
        bold(&record.title, config),
        colorize_badge(&record.status, tone, config),
    )?;
    render_details(w, record, width, config)
}

fn render_details<W: Write>(
    w: &mut W,
    record: &RiskIssue,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    for line in wrap_text(record.description_text(), width.saturating_sub(4)) {
        writeln!(w, "    {}", dimmed(&line, config))?;
    }
    writeln!(
        w,
        "    {} {} | {} {}",
        dimmed("Type:", config),
        colorize_kind(record.kind, config),
        dimmed("Impact:", config),
        colorize_impact(record.impact_level, config)
    )
}

fn render_row<W: Write>(
    w: &mut W,
    row: &RowView<'_>,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    let record = row.record;
    let control = if row.can_change_status {
        format!("  {}", info("(Change Status)", config))
    } else {
        String::new()
    };
    writeln!(
        w,
        "{} {}  {}  {}{}",
        badge_icon(row.badge, config),
        colorize_id(&record.id.to_string(), config),
        bold(&record.title, config),
        colorize_badge(&record.status, row.badge, config),
        control
    )?;
    render_details(w, record, width, config)?;

    if let Some(popover) = &row.popover {
        let corner = if config.use_ascii { "+-" } else { "└─" };
        writeln!(
            w,
            "    {} {}",
            dimmed(corner, config),
            info(&popover.action_label(), config)
        )?;
    }
    Ok(())
}

fn render_modal<W: Write>(w: &mut W, modal: &ModalView<'_>, config: &OutputConfig) -> io::Result<()> {
    let draft = modal.draft;
    let lock = if modal.type_locked {
        format!(" {}", dimmed("(locked)", config))
    } else {
        String::new()
    };

    writeln!(w, "{}", bold("Report Risk/Issue", config))?;
    writeln!(w, "  {} {}{}", dimmed("Type:        ", config), draft.kind, lock)?;
    writeln!(w, "  {} {}", dimmed("Title:       ", config), draft.title)?;
    writeln!(w, "  {} {}", dimmed("Description: ", config), draft.description)?;
    writeln!(w, "  {} {}", dimmed("Impact Level:", config), draft.impact_level)
}

/// Wrap text to fit within a given width, preserving existing line breaks.
/// Uses textwrap to handle edge cases like long words (URLs, file paths).
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width.max(1))
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;
    use crate::domain::{DraftField, ProjectId, RecordKind, Viewer};
    use crate::panel::Panel;
    use std::collections::HashMap;

    fn plain() -> OutputConfig {
        OutputConfig::new(80, false, false)
    }

    fn render(view: &PanelView<'_>, config: &OutputConfig) -> String {
        let mut buffer = Vec::new();
        render_panel_text(&mut buffer, view, 80, config).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    async fn panel_with(records: Vec<RiskIssue>, viewer: Viewer) -> Panel {
        let mock = MockApi::new();
        mock.seed("p1", records);
        let mut panel = Panel::new(Box::new(mock), ProjectId::from("p1"), viewer);
        panel.mount().await;
        panel
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_output_config_from_vars() {
        let config = OutputConfig::from_vars(vars(&[
            ("RISKPANEL_MAX_WIDTH", "120"),
            ("RISKPANEL_ASCII", "1"),
        ]));
        assert_eq!(config.max_width, 120);
        assert!(config.use_ascii);
        assert!(config.use_colors);

        let config = OutputConfig::from_vars(vars(&[
            ("RISKPANEL_MAX_WIDTH", "invalid"),
            ("RISKPANEL_ASCII", "false"),
        ]));
        assert_eq!(config.max_width, DEFAULT_MAX_CONTENT_WIDTH);
        assert!(!config.use_ascii);

        let config = OutputConfig::from_vars(vars(&[("NO_COLOR", "1")]));
        assert!(!config.use_colors, "NO_COLOR should disable colors");

        let config = OutputConfig::from_vars(vars(&[("RISKPANEL_COLOR", "false")]));
        assert!(!config.use_colors, "RISKPANEL_COLOR=false should disable colors");

        let config = OutputConfig::from_vars(vars(&[]));
        assert_eq!(config, OutputConfig::default());
    }

    #[test]
    fn test_loading_view() {
        assert_eq!(render(&PanelView::Loading, &plain()), format!("{LOADING_TEXT}\n"));
    }

    #[tokio::test]
    async fn test_failed_view_shows_only_error() {
        let mock = MockApi::new();
        mock.fail_list(500);
        let mut panel = Panel::new(Box::new(mock), ProjectId::from("p1"), Viewer::Owner);
        panel.mount().await;
        panel.open_modal();

        let output = render(&panel.view(), &plain());
        assert_eq!(output, "Failed to load risks/issues.\n");
    }

    #[tokio::test]
    async fn test_empty_list() {
        let panel = panel_with(vec![], Viewer::Member).await;
        let output = render(&panel.view(), &plain());
        assert!(output.contains("Project Risks & Issues"));
        assert!(output.contains(EMPTY_TEXT));
    }

    #[tokio::test]
    async fn test_rows_show_badges_and_gate() {
        let panel = panel_with(
            vec![
                MockApi::record(1, RecordKind::Issue, "open"),
                MockApi::record(2, RecordKind::Risk, "closed"),
            ],
            Viewer::Member,
        )
        .await;

        let output = render(&panel.view(), &plain());
        let lines: Vec<&str> = output.lines().collect();
        let issue_line = lines.iter().find(|l| l.contains("#1")).unwrap();
        let risk_line = lines.iter().find(|l| l.contains("#2")).unwrap();

        assert!(issue_line.contains("[open]"));
        assert!(issue_line.contains("(Change Status)"));
        assert!(risk_line.contains("[closed]"));
        assert!(!risk_line.contains("(Change Status)"));
        assert!(output.contains("Type: risk | Impact: medium"));
        assert!(output.contains("Description of record 1"));
    }

    #[tokio::test]
    async fn test_popover_and_modal_rendering() {
        let mut panel = panel_with(
            vec![MockApi::record(1, RecordKind::Issue, "open")],
            Viewer::Member,
        )
        .await;
        panel.toggle_popover("1").unwrap();
        panel.open_modal();
        panel.update_draft(DraftField::Title("Late delivery".to_string()));

        let output = render(&panel.view(), &OutputConfig::new(80, true, false));
        assert!(output.contains("+- Change to \"closed\""));
        assert!(output.contains("Report Risk/Issue"));
        assert!(output.contains("Late delivery"));
        assert!(output.contains("issue (locked)"));
    }

    #[tokio::test]
    async fn test_alert_rendering() {
        let mock = MockApi::new();
        mock.fail_create(400, Some("Title required"));
        let mut panel = Panel::new(Box::new(mock), ProjectId::from("p1"), Viewer::Owner);
        panel.mount().await;
        panel.open_modal();
        let _ = panel.submit().await;

        let output = render(&panel.view(), &plain());
        assert!(output.contains("Alert: Title required"));
        assert!(output.contains("Report Risk/Issue"));
        assert!(!output.contains("(locked)"));
    }

    #[test]
    fn test_render_record_json() {
        let record = MockApi::record(7, RecordKind::Risk, "open");
        let mut buffer = Vec::new();
        write_json(&mut buffer, &record).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["id"], 7);
        assert_eq!(parsed["type"], "risk");
    }

    #[test]
    fn test_wrap_text() {
        let text = "This is a test of text wrapping functionality";
        let wrapped = wrap_text(text, 20);
        assert!(!wrapped.is_empty());
        for line in &wrapped {
            assert!(line.len() <= 20, "Line too long: '{line}'");
        }
    }

    #[test]
    fn test_wrap_text_preserves_newlines() {
        let wrapped = wrap_text("Line one\nLine two\nLine three", 50);
        assert_eq!(wrapped.len(), 3);
    }

    #[test]
    fn test_wrap_text_empty_input() {
        assert!(wrap_text("", 80).is_empty());
    }
}
