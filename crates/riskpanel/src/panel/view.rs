//! Render-ready snapshot of a [`Panel`].

use super::{LoadState, Panel};
use crate::domain::{BadgeTone, Draft, ProjectId, RecordStatus, RiskIssue, Viewer};
use serde::Serialize;

/// What the panel shows right now.
///
/// While loading, or after a failed load, nothing but the placeholder or
/// the error is shown: no list, no modal.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PanelView<'a> {
    /// Placeholder while the list request is in flight
    Loading,

    /// The list could not be loaded
    Failed {
        /// User-facing error message
        message: &'a str,
    },

    /// The list and any open overlays
    Ready {
        /// Project being displayed
        project: &'a ProjectId,
        /// Role of the viewer
        viewer: Viewer,
        /// One row per record, in display order
        rows: Vec<RowView<'a>>,
        /// Creation modal, when open
        modal: Option<ModalView<'a>>,
        /// Blocking alert, when set
        alert: Option<&'a str>,
    },
}

/// One record in the list
#[derive(Debug, Serialize)]
pub struct RowView<'a> {
    /// The record as loaded
    #[serde(flatten)]
    pub record: &'a RiskIssue,
    /// Status badge tone
    pub badge: BadgeTone,
    /// Whether the "Change Status" control is shown
    pub can_change_status: bool,
    /// The status popover, when open on this row
    pub popover: Option<PopoverView>,
}

/// Status popover contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopoverView {
    /// Status the popover's button changes to
    pub next_status: RecordStatus,
}

impl PopoverView {
    /// Label of the popover's button
    #[must_use]
    pub fn action_label(&self) -> String {
        format!("Change to \"{}\"", self.next_status)
    }
}

/// Creation modal contents
#[derive(Debug, Serialize)]
pub struct ModalView<'a> {
    /// Current draft
    pub draft: &'a Draft,
    /// Whether the type selector is disabled
    pub type_locked: bool,
}

impl<'a> PanelView<'a> {
    pub(super) fn of(panel: &'a Panel) -> Self {
        match panel.load_state() {
            LoadState::Loading => Self::Loading,
            LoadState::Failed(message) => Self::Failed { message },
            LoadState::Ready => {
                let viewer = panel.viewer();
                let rows = panel
                    .records()
                    .iter()
                    .map(|record| RowView {
                        record,
                        badge: record.status.badge_tone(),
                        can_change_status: record.status_change_allowed(viewer),
                        popover: panel.popover().is_open_for(&record.id).then(|| PopoverView {
                            next_status: record.status.toggled(),
                        }),
                    })
                    .collect();
                let modal = panel.modal_open().then(|| ModalView {
                    draft: panel.draft(),
                    type_locked: !viewer.is_owner(),
                });

                Self::Ready {
                    project: panel.project(),
                    viewer,
                    rows,
                    modal,
                    alert: panel.alert(),
                }
            }
        }
    }

    /// Rows shown; empty unless the list is loaded.
    #[must_use]
    pub fn rows(&self) -> &[RowView<'a>] {
        match self {
            Self::Ready { rows, .. } => rows,
            Self::Loading | Self::Failed { .. } => &[],
        }
    }
}
