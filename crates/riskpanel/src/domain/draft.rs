//! Draft of a new risk/issue, as edited in the creation form.

use super::{ImpactLevel, RecordKind};
use serde::Serialize;

/// Form state for reporting a new record.
///
/// Serializes to the body of the create request. No client-side validation
/// is applied; the backend decides what it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Draft {
    /// Risk or issue
    #[serde(rename = "type")]
    pub kind: RecordKind,

    /// Short title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Impact level
    pub impact_level: ImpactLevel,
}

/// A single-field edit to a [`Draft`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    /// Set the record kind
    Kind(RecordKind),
    /// Set the title
    Title(String),
    /// Set the description
    Description(String),
    /// Set the impact level
    ImpactLevel(ImpactLevel),
}

impl DraftField {
    /// Name of the form field this edit targets
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kind(_) => "type",
            Self::Title(_) => "title",
            Self::Description(_) => "description",
            Self::ImpactLevel(_) => "impact_level",
        }
    }
}

impl Draft {
    /// Apply one field edit, leaving every other field untouched.
    pub fn update(&mut self, field: DraftField) {
        match field {
            DraftField::Kind(kind) => self.kind = kind,
            DraftField::Title(title) => self.title = title,
            DraftField::Description(description) => self.description = description,
            DraftField::ImpactLevel(level) => self.impact_level = level,
        }
    }

    /// Restore the defaults: an empty medium-impact issue.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_draft() {
        let draft = Draft::default();
        assert_eq!(draft.kind, RecordKind::Issue);
        assert!(draft.title.is_empty());
        assert!(draft.description.is_empty());
        assert_eq!(draft.impact_level, ImpactLevel::Medium);
    }

    #[test]
    fn test_update_retains_other_fields() {
        let mut draft = Draft::default();
        draft.update(DraftField::Title("Supplier insolvency".to_string()));
        draft.update(DraftField::ImpactLevel(ImpactLevel::High));
        draft.update(DraftField::Description("Single source".to_string()));

        assert_eq!(draft.title, "Supplier insolvency");
        assert_eq!(draft.description, "Single source");
        assert_eq!(draft.impact_level, ImpactLevel::High);
        assert_eq!(draft.kind, RecordKind::Issue);
    }

    #[test]
    fn test_reset() {
        let mut draft = Draft {
            kind: RecordKind::Risk,
            title: "T".to_string(),
            description: "D".to_string(),
            impact_level: ImpactLevel::Low,
        };
        draft.reset();
        assert_eq!(draft, Draft::default());
    }

    #[test]
    fn test_request_body_shape() {
        let draft = Draft {
            kind: RecordKind::Risk,
            title: "T".to_string(),
            description: "D".to_string(),
            impact_level: ImpactLevel::High,
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"type": "risk", "title": "T", "description": "D", "impact_level": "high"})
        );
    }
}
