//! Interactive panel session.
//!
//! Reads one command per line and re-renders the panel after each. The
//! commands map onto the panel's user actions: opening a popover, clicking
//! elsewhere, editing the creation form and so on.
//!
//! While an alert is pending it blocks every command that would act on the
//! panel; only `dismiss`, `show`, `help` and `quit` get through.

use std::io::{self, BufRead, Write};

use crate::domain::{DraftField, ImpactLevel, ProjectId, RecordKind};
use crate::output::{OutputConfig, render_panel_text};
use crate::panel::{Panel, PointerTarget};

const HELP: &str = "\
Commands:
  list | refresh            reload the list
  show                      render the panel again
  popover <id>              open or close the status popover of a record
  click outside | <id>      pointer-down outside, or inside a record's popover
  apply                     press the open popover's button
  toggle <id>               flip a record's status directly
  report                    open the creation form
  set type issue|risk       edit the form (owners only)
  set title <text>
  set description <text>
  set impact low|medium|high
  submit                    send the form
  cancel                    close the form, keeping its contents
  dismiss                   acknowledge the alert
  project <id>              switch project
  help                      show this help
  quit                      leave the session";

/// One parsed line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Reload the list
    Refresh,
    /// Render without changing anything
    Show,
    /// Toggle the popover of a record
    Popover(String),
    /// Pointer-down; `None` is outside any popover
    Click(Option<String>),
    /// Trigger the open popover's action
    Apply,
    /// Toggle a record's status without the popover
    Toggle(String),
    /// Open the creation modal
    Report,
    /// Edit one draft field
    Set(DraftField),
    /// Submit the draft
    Submit,
    /// Close the creation modal
    Cancel,
    /// Clear the alert
    Dismiss,
    /// Switch project
    Project(String),
    /// Print the command list
    Help,
    /// End the session
    Quit,
}

impl ShellCommand {
    /// Parse a line of input. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a message suitable for the user if the line is not a command.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "list" | "refresh" => Self::Refresh,
            "show" => Self::Show,
            "popover" => Self::Popover(required(rest, "popover <id>")?),
            "click" => match rest {
                "" | "outside" => Self::Click(None),
                id => Self::Click(Some(id.to_string())),
            },
            "apply" => Self::Apply,
            "toggle" => Self::Toggle(required(rest, "toggle <id>")?),
            "report" => Self::Report,
            "set" => Self::Set(parse_field(rest)?),
            "submit" => Self::Submit,
            "cancel" => Self::Cancel,
            "dismiss" => Self::Dismiss,
            "project" => Self::Project(required(rest, "project <id>")?),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("Unknown command '{other}' (try 'help')")),
        };
        Ok(Some(command))
    }

    fn allowed_during_alert(&self) -> bool {
        matches!(self, Self::Dismiss | Self::Help | Self::Quit | Self::Show)
    }
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        return Err(format!("Usage: {usage}"));
    }
    Ok(rest.to_string())
}

fn parse_field(rest: &str) -> Result<DraftField, String> {
    let (field, value) = match rest.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim()),
        None => (rest, ""),
    };

    match field {
        "type" => match value {
            "issue" => Ok(DraftField::Kind(RecordKind::Issue)),
            "risk" => Ok(DraftField::Kind(RecordKind::Risk)),
            _ => Err("Usage: set type issue|risk".to_string()),
        },
        "title" => Ok(DraftField::Title(value.to_string())),
        "description" => Ok(DraftField::Description(value.to_string())),
        "impact" => match value {
            "low" => Ok(DraftField::ImpactLevel(ImpactLevel::Low)),
            "medium" => Ok(DraftField::ImpactLevel(ImpactLevel::Medium)),
            "high" => Ok(DraftField::ImpactLevel(ImpactLevel::High)),
            _ => Err("Usage: set impact low|medium|high".to_string()),
        },
        _ => Err("Usage: set type|title|description|impact <value>".to_string()),
    }
}

/// Rendering settings for a session
#[derive(Debug, Clone)]
pub struct ShellSettings {
    /// Print a prompt before reading each line
    pub prompt: bool,
    /// Width long text wraps at
    pub width: usize,
    /// Colors and glyphs
    pub output: OutputConfig,
}

/// Run a session until `quit` or end of input.
///
/// The panel is rendered once on entry and after every command.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails; panel
/// errors are reported inline and the session continues.
pub async fn run<R, W>(
    panel: &mut Panel,
    input: R,
    out: &mut W,
    settings: &ShellSettings,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    render(panel, out, settings)?;

    let mut lines = input.lines();
    loop {
        if settings.prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        if panel.alert().is_some() && !command.allowed_during_alert() {
            writeln!(out, "An alert is pending; acknowledge it with 'dismiss'.")?;
            continue;
        }

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            command => dispatch(panel, command, out).await?,
        }
        render(panel, out, settings)?;
    }

    tracing::debug!("Shell session ended");
    Ok(())
}

async fn dispatch<W: Write>(panel: &mut Panel, command: ShellCommand, out: &mut W) -> io::Result<()> {
    let result = match command {
        ShellCommand::Refresh => {
            panel.load().await;
            Ok(())
        }
        ShellCommand::Show | ShellCommand::Help | ShellCommand::Quit => Ok(()),
        ShellCommand::Popover(id) => panel.toggle_popover(&id),
        ShellCommand::Click(target) => {
            let target = target
                .and_then(|id| panel.find(&id).map(|record| record.id.clone()))
                .map_or(PointerTarget::Outside, PointerTarget::Popover);
            panel.handle_pointer_down(&target);
            Ok(())
        }
        ShellCommand::Apply => panel.apply_popover_action().await,
        ShellCommand::Toggle(id) => panel.toggle_status(&id).await,
        ShellCommand::Report => {
            panel.open_modal();
            Ok(())
        }
        ShellCommand::Set(field) => {
            if !panel.update_draft(field) {
                writeln!(out, "Only the project owner can choose the record type.")?;
            }
            Ok(())
        }
        ShellCommand::Submit => panel.submit().await.map(|_| ()),
        ShellCommand::Cancel => {
            panel.close_modal();
            Ok(())
        }
        ShellCommand::Dismiss => {
            panel.dismiss_alert();
            Ok(())
        }
        ShellCommand::Project(id) => {
            panel.set_project(ProjectId::from(id)).await;
            Ok(())
        }
    };

    // Backend failures surface through the alert, which the render shows.
    if let Err(e) = result
        && panel.alert().is_none()
    {
        writeln!(out, "Error: {e}")?;
    }
    Ok(())
}

fn render<W: Write>(panel: &Panel, out: &mut W, settings: &ShellSettings) -> io::Result<()> {
    writeln!(out)?;
    render_panel_text(out, &panel.view(), settings.width, &settings.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockApi, MockCall};
    use crate::domain::{RecordStatus, Viewer};
    use rstest::rstest;
    use std::io::Cursor;

    fn settings() -> ShellSettings {
        ShellSettings {
            prompt: false,
            width: 80,
            output: OutputConfig::new(80, true, false),
        }
    }

    async fn session(mock: &MockApi, viewer: Viewer, script: &str) -> (Panel, String) {
        let mut panel = Panel::new(Box::new(mock.clone()), ProjectId::from("p"), viewer);
        panel.mount().await;
        let mut out = Vec::new();
        run(&mut panel, Cursor::new(script), &mut out, &settings())
            .await
            .unwrap();
        (panel, String::from_utf8(out).unwrap())
    }

    fn seeded() -> MockApi {
        let mock = MockApi::new();
        mock.seed(
            "p",
            vec![
                MockApi::record(1, RecordKind::Issue, "open"),
                MockApi::record(2, RecordKind::Risk, "closed"),
            ],
        );
        mock
    }

    // ========== Parsing ==========

    #[rstest]
    #[case("list", ShellCommand::Refresh)]
    #[case("  refresh  ", ShellCommand::Refresh)]
    #[case("popover 12", ShellCommand::Popover("12".to_string()))]
    #[case("click", ShellCommand::Click(None))]
    #[case("click outside", ShellCommand::Click(None))]
    #[case("click 7", ShellCommand::Click(Some("7".to_string())))]
    #[case("set type risk", ShellCommand::Set(DraftField::Kind(RecordKind::Risk)))]
    #[case("set title Vendor may slip", ShellCommand::Set(DraftField::Title("Vendor may slip".to_string())))]
    #[case("set description", ShellCommand::Set(DraftField::Description(String::new())))]
    #[case("set impact high", ShellCommand::Set(DraftField::ImpactLevel(ImpactLevel::High)))]
    #[case("QUIT", ShellCommand::Quit)]
    #[case("?", ShellCommand::Help)]
    fn test_parse(#[case] line: &str, #[case] expected: ShellCommand) {
        assert_eq!(ShellCommand::parse(line).unwrap(), Some(expected));
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
    }

    #[rstest]
    #[case("popover", "Usage: popover <id>")]
    #[case("set impact huge", "Usage: set impact")]
    #[case("set colour red", "Usage: set type|title")]
    #[case("frobnicate", "Unknown command 'frobnicate'")]
    fn test_parse_errors(#[case] line: &str, #[case] expected: &str) {
        let err = ShellCommand::parse(line).unwrap_err();
        assert!(err.contains(expected), "unexpected error: {err}");
    }

    // ========== Sessions ==========

    #[tokio::test]
    async fn test_popover_apply_flow() {
        let mock = seeded();
        let (panel, out) = session(&mock, Viewer::Member, "popover 1\napply\n").await;

        assert!(out.contains("+- Change to \"closed\""));
        assert_eq!(panel.find("1").unwrap().status, RecordStatus::Closed);
        assert!(panel.popover().active().is_none());
    }

    #[tokio::test]
    async fn test_click_outside_closes_popover() {
        let mock = seeded();
        let (panel, _) = session(&mock, Viewer::Member, "popover 1\nclick outside\n").await;
        assert!(!panel.popover().listener_attached());
    }

    #[tokio::test]
    async fn test_click_inside_keeps_popover() {
        let mock = seeded();
        let (panel, _) = session(&mock, Viewer::Member, "popover 1\nclick 1\n").await;
        assert!(panel.popover().listener_attached());
    }

    #[tokio::test]
    async fn test_forbidden_is_reported_inline() {
        let mock = seeded();
        let (_, out) = session(&mock, Viewer::Member, "popover 2\n").await;
        assert!(out.contains("Error: Not permitted"), "output was: {out}");
    }

    #[tokio::test]
    async fn test_report_flow() {
        let mock = seeded();
        let script = "report\nset type risk\nset title Supplier delay\nset impact high\nsubmit\n";
        let (panel, _) = session(&mock, Viewer::Owner, script).await;

        assert_eq!(panel.records().len(), 3);
        assert_eq!(panel.records()[0].title, "Supplier delay");
        assert_eq!(panel.records()[0].kind, RecordKind::Risk);
        assert!(!panel.modal_open());
    }

    #[tokio::test]
    async fn test_member_type_change_refused() {
        let mock = seeded();
        let (panel, out) = session(&mock, Viewer::Member, "report\nset type risk\n").await;

        assert!(out.contains("Only the project owner can choose the record type."));
        assert_eq!(panel.draft().kind, RecordKind::Issue);
    }

    #[tokio::test]
    async fn test_alert_blocks_until_dismissed() {
        let mock = seeded();
        mock.fail_create(400, Some("Title required"));
        let script = "report\nsubmit\npopover 1\ndismiss\npopover 1\n";
        let (panel, out) = session(&mock, Viewer::Member, script).await;

        assert!(out.contains("Alert: Title required"));
        assert!(out.contains("An alert is pending"));
        assert!(panel.alert().is_none());
        assert!(panel.modal_open());
        assert!(panel.popover().listener_attached());
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let mock = seeded();
        let (_, _) = session(&mock, Viewer::Member, "quit\nrefresh\n").await;

        let lists = mock
            .calls()
            .iter()
            .filter(|c| matches!(c, MockCall::List(_)))
            .count();
        assert_eq!(lists, 1);
    }

    #[tokio::test]
    async fn test_prompt_printed() {
        let mock = seeded();
        let mut panel = Panel::new(Box::new(mock), ProjectId::from("p"), Viewer::Member);
        panel.mount().await;
        let mut out = Vec::new();
        let settings = ShellSettings {
            prompt: true,
            ..settings()
        };

        run(&mut panel, Cursor::new("help\n"), &mut out, &settings)
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("> "));
        assert!(out.contains("Commands:"));
    }
}
