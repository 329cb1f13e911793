//! Domain types for project risks and issues.
//!
//! This module contains the record shape returned by the backend, the
//! creation draft, and the two client-side policies that drive the panel:
//! the binary status toggle and the "Change Status" visibility gate.

pub mod draft;

pub use draft::{Draft, DraftField};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the project whose records are displayed.
///
/// Opaque to the client: it is only ever placed into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a new project ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Server-assigned identifier of a risk/issue record.
///
/// Backends hand out either numeric or string identifiers; the original
/// JSON representation is kept so it can be echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric identifier (e.g. a database serial)
    Number(u64),
    /// Textual identifier (e.g. a UUID)
    Text(String),
}

impl RecordId {
    /// Whether this ID matches user-supplied text.
    ///
    /// Comparison is on the displayed form, so `"12"` matches both
    /// `Number(12)` and `Text("12")`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Number(n) => text.trim().parse::<u64>().is_ok_and(|t| t == *n),
            Self::Text(s) => s == text.trim(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Kind of record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Something that has already gone wrong
    #[default]
    Issue,

    /// Something that might go wrong
    Risk,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issue => write!(f, "issue"),
            Self::Risk => write!(f, "risk"),
        }
    }
}

/// Impact level of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    /// Low impact
    Low,

    /// Medium impact
    #[default]
    Medium,

    /// High impact
    High,
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Status of a record.
///
/// Only `open` and `closed` are produced by this client. Any other value the
/// server sends is kept verbatim in [`RecordStatus::Other`] and rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    /// Still needs attention
    Open,

    /// Resolved
    Closed,

    /// Status this client does not transition through
    Other(String),
}

impl RecordStatus {
    /// Target of the status toggle.
    ///
    /// `closed` flips to `open`; everything else, including unrecognized
    /// values, flips to `closed`.
    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open | Self::Other(_) => Self::Closed,
        }
    }

    /// Badge tone used when rendering this status.
    #[must_use]
    pub fn badge_tone(&self) -> BadgeTone {
        match self {
            Self::Open => BadgeTone::Danger,
            Self::Closed | Self::Other(_) => BadgeTone::Success,
        }
    }

    /// The wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for RecordStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "open" => Self::Open,
            "closed" => Self::Closed,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for RecordStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Open => "open".to_string(),
            RecordStatus::Closed => "closed".to_string(),
            RecordStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone of the status badge shown next to each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    /// Needs attention (open records)
    Danger,

    /// Everything else
    Success,
}

/// Role of the person viewing the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewer {
    /// Project owner: may act on every record and choose the record type
    Owner,

    /// Any other project member
    #[default]
    Member,
}

impl Viewer {
    /// Build a viewer from an ownership flag
    #[must_use]
    pub fn from_owner_flag(is_owner: bool) -> Self {
        if is_owner { Self::Owner } else { Self::Member }
    }

    /// Whether this viewer owns the project
    #[must_use]
    pub fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

/// A risk or issue as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIssue {
    /// Unique identifier
    pub id: RecordId,

    /// Risk or issue
    #[serde(rename = "type")]
    pub kind: RecordKind,

    /// Short title
    pub title: String,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Impact level
    pub impact_level: ImpactLevel,

    /// Current status
    pub status: RecordStatus,

    /// Fields this client does not interpret (project ID, timestamps, ...).
    ///
    /// Kept so status updates can send the record's full representation.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RiskIssue {
    /// Whether `viewer` is shown the "Change Status" control for this record.
    ///
    /// Owners may act on every record; other viewers only on issues. This is
    /// a display gate; the backend enforces its own rules.
    #[must_use]
    pub fn status_change_allowed(&self, viewer: Viewer) -> bool {
        viewer.is_owner() || self.kind == RecordKind::Issue
    }

    /// Copy of this record with only the status replaced.
    #[must_use]
    pub fn with_status(&self, status: RecordStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Description, or the empty string when absent
    #[must_use]
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}
