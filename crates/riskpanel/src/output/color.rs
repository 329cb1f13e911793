//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Danger:        red     (open status badge, high impact, alerts)
//!   - Success:       green   (closed and other status badges)
//!   - Warning:       yellow  (medium impact, issues)
//!   - Info/Reference: cyan   (record IDs, popover actions)
//!   - Accent:        magenta (risks)
//!   - Muted:         dimmed  (field labels, low impact, descriptions)
//!   - Emphasis:      bold    (panel and modal headers, titles)

use crate::domain::{BadgeTone, ImpactLevel, RecordKind, RecordStatus};
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Render a status badge in its tone's color.
pub(crate) fn colorize_badge(status: &RecordStatus, tone: BadgeTone, config: &OutputConfig) -> String {
    let text = format!("[{status}]");
    if !config.use_colors {
        return text;
    }
    match tone {
        BadgeTone::Danger => text.white().on_red().to_string(),
        BadgeTone::Success => text.white().on_green().to_string(),
    }
}

/// Apply color to the record kind.
pub(crate) fn colorize_kind(kind: RecordKind, config: &OutputConfig) -> String {
    let text = kind.to_string();
    if !config.use_colors {
        return text;
    }
    match kind {
        RecordKind::Issue => text.yellow().to_string(),
        RecordKind::Risk => text.magenta().to_string(),
    }
}

/// Apply color to the impact level.
pub(crate) fn colorize_impact(level: ImpactLevel, config: &OutputConfig) -> String {
    let text = level.to_string();
    if !config.use_colors {
        return text;
    }
    match level {
        ImpactLevel::High => text.red().bold().to_string(),
        ImpactLevel::Medium => text.yellow().to_string(),
        ImpactLevel::Low => text.dimmed().to_string(),
    }
}

/// Colorize a record ID (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return format!("#{id}");
    }
    format!("#{id}").cyan().to_string()
}

/// Icon for a status tone, with ASCII fallback support.
pub(crate) fn badge_icon(tone: BadgeTone, config: &OutputConfig) -> String {
    let icon = match (tone, config.use_ascii) {
        (BadgeTone::Danger, true) => "!",
        (BadgeTone::Success, true) => "+",
        (BadgeTone::Danger, false) => "●",
        (BadgeTone::Success, false) => "✓",
    };
    if !config.use_colors {
        return icon.to_string();
    }
    match tone {
        BadgeTone::Danger => icon.red().to_string(),
        BadgeTone::Success => icon.green().to_string(),
    }
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
