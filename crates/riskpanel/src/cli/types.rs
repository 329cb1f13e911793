//! CLI value enums and domain type conversions.
//!
//! This module contains the value enums used for CLI argument parsing
//! and their conversions to domain types.

use clap::ValueEnum;

use crate::domain::{ImpactLevel, RecordKind, RecordStatus};

// ============================================================================
// Value Enums
// ============================================================================

/// Record type for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordKindArg {
    /// Something that has already gone wrong
    #[default]
    Issue,
    /// Something that might go wrong
    Risk,
}

impl std::fmt::Display for RecordKindArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        RecordKind::from(*self).fmt(f)
    }
}

/// Impact level for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImpactLevelArg {
    /// Low impact
    Low,
    /// Medium impact
    #[default]
    Medium,
    /// High impact
    High,
}

impl std::fmt::Display for ImpactLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ImpactLevel::from(*self).fmt(f)
    }
}

/// Target status for `set-status`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    /// Still being tracked
    Open,
    /// Resolved
    Closed,
}

impl std::fmt::Display for StatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

// ============================================================================
// Domain Conversions
// ============================================================================

impl From<RecordKindArg> for RecordKind {
    fn from(arg: RecordKindArg) -> Self {
        match arg {
            RecordKindArg::Issue => RecordKind::Issue,
            RecordKindArg::Risk => RecordKind::Risk,
        }
    }
}

impl From<ImpactLevelArg> for ImpactLevel {
    fn from(arg: ImpactLevelArg) -> Self {
        match arg {
            ImpactLevelArg::Low => ImpactLevel::Low,
            ImpactLevelArg::Medium => ImpactLevel::Medium,
            ImpactLevelArg::High => ImpactLevel::High,
        }
    }
}

impl From<StatusArg> for RecordStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Open => RecordStatus::Open,
            StatusArg::Closed => RecordStatus::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RecordKindArg::Issue, RecordKind::Issue)]
    #[case(RecordKindArg::Risk, RecordKind::Risk)]
    fn test_kind_conversion(#[case] arg: RecordKindArg, #[case] expected: RecordKind) {
        assert_eq!(RecordKind::from(arg), expected);
        assert_eq!(arg.to_string(), expected.to_string());
    }

    #[rstest]
    #[case(ImpactLevelArg::Low, ImpactLevel::Low)]
    #[case(ImpactLevelArg::Medium, ImpactLevel::Medium)]
    #[case(ImpactLevelArg::High, ImpactLevel::High)]
    fn test_impact_conversion(#[case] arg: ImpactLevelArg, #[case] expected: ImpactLevel) {
        assert_eq!(ImpactLevel::from(arg), expected);
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(RecordStatus::from(StatusArg::Open), RecordStatus::Open);
        assert_eq!(RecordStatus::from(StatusArg::Closed), RecordStatus::Closed);
        assert_eq!(StatusArg::Closed.to_string(), "closed");
    }

    #[test]
    fn test_defaults_match_empty_draft() {
        let draft = crate::domain::Draft::default();
        assert_eq!(RecordKind::from(RecordKindArg::default()), draft.kind);
        assert_eq!(
            ImpactLevel::from(ImpactLevelArg::default()),
            draft.impact_level
        );
    }
}
