//! The risks & issues panel.
//!
//! [`Panel`] owns everything the panel displays: the loaded records, the
//! load state, the creation draft and modal, the status popover and the
//! blocking alert. It is mutated only through the operations below and talks
//! to the backend through an injected [`RiskIssueApi`].
//!
//! # Loading
//!
//! Each list request is tagged with a [`LoadTicket`]. Only the result for the
//! most recently issued ticket is applied; a response that arrives after the
//! project changed again is dropped instead of overwriting newer state.
//!
//! # Failure policy
//!
//! - list failure: the panel shows an error in place of the list
//! - create failure: blocking alert with the server's message, or
//!   "Failed to submit."; modal and draft are kept
//! - status failure: blocking alert; popover and list are kept
//!
//! # Example
//!
//! ```no_run
//! use riskpanel::api::{EnvToken, HttpApi, Timeouts};
//! use riskpanel::domain::{ProjectId, Viewer};
//! use riskpanel::panel::Panel;
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let api = HttpApi::new(
//!         "http://localhost:8000",
//!         Arc::new(EnvToken::default()),
//!         Timeouts::default(),
//!     )?;
//!     let mut panel = Panel::new(Box::new(api), ProjectId::from("42"), Viewer::Member);
//!     panel.mount().await;
//!     println!("{} record(s)", panel.records().len());
//!     Ok(())
//! }
//! ```

pub mod popover;
mod view;

pub use popover::{PointerTarget, Popover};
pub use view::{ModalView, PanelView, PopoverView, RowView};

use crate::api::RiskIssueApi;
use crate::domain::{Draft, DraftField, ProjectId, RecordStatus, RiskIssue, Viewer};
use crate::error::{Error, Result};
use tracing::{debug, error, warn};

/// Message shown in place of the list when loading fails
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load risks/issues.";

/// Alert shown when creation fails without a server message
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit.";

/// Alert shown when a status change fails without a server message
pub const STATUS_FAILED_MESSAGE: &str = "Failed to update status.";

/// Progress of the most recent list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// A list request is in flight (or the panel is not mounted yet)
    Loading,
    /// The list reflects the last successful response
    Ready,
    /// The last list request failed
    Failed(String),
}

/// Tag identifying one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    project: ProjectId,
    sequence: u64,
}

impl LoadTicket {
    /// Project the request was issued for
    #[must_use]
    pub fn project(&self) -> &ProjectId {
        &self.project
    }
}

/// State and behavior of the risks & issues panel.
pub struct Panel {
    api: Box<dyn RiskIssueApi>,
    project: ProjectId,
    viewer: Viewer,
    records: Vec<RiskIssue>,
    load_state: LoadState,
    load_sequence: u64,
    popover: Popover,
    modal_open: bool,
    draft: Draft,
    alert: Option<String>,
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("project", &self.project)
            .field("viewer", &self.viewer)
            .field("records", &self.records.len())
            .field("load_state", &self.load_state)
            .field("popover", &self.popover.active())
            .field("modal_open", &self.modal_open)
            .field("alert", &self.alert)
            .field("api", &"<dyn RiskIssueApi>")
            .finish_non_exhaustive()
    }
}

impl Panel {
    /// Create an unmounted panel. Call [`Panel::mount`] to load records.
    #[must_use]
    pub fn new(api: Box<dyn RiskIssueApi>, project: ProjectId, viewer: Viewer) -> Self {
        Self {
            api,
            project,
            viewer,
            records: Vec::new(),
            load_state: LoadState::Loading,
            load_sequence: 0,
            popover: Popover::new(),
            modal_open: false,
            draft: Draft::default(),
            alert: None,
        }
    }

    // ========== Accessors ==========

    /// Project being displayed
    #[must_use]
    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    /// Role of the viewer
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        self.viewer
    }

    /// Records in display order
    #[must_use]
    pub fn records(&self) -> &[RiskIssue] {
        &self.records
    }

    /// Progress of the last list request
    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Status popover state
    #[must_use]
    pub fn popover(&self) -> &Popover {
        &self.popover
    }

    /// Whether the creation modal is open
    #[must_use]
    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    /// Current creation draft
    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Pending blocking alert, if any
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Find a loaded record by its displayed ID
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&RiskIssue> {
        self.records.iter().find(|r| r.id.matches(id))
    }

    /// Whether the viewer gets the "Change Status" control for `record`
    #[must_use]
    pub fn status_change_allowed(&self, record: &RiskIssue) -> bool {
        record.status_change_allowed(self.viewer)
    }

    // ========== Data Loader ==========

    /// Initial load.
    pub async fn mount(&mut self) {
        self.load().await;
    }

    /// Switch to another project and reload.
    ///
    /// Setting the current project again is not a change and sends nothing.
    pub async fn set_project(&mut self, project: ProjectId) {
        if project == self.project {
            debug!(project = %project, "Project unchanged, not reloading");
            return;
        }
        debug!(from = %self.project, to = %project, "Switching project");
        self.project = project;
        self.popover.close();
        self.load().await;
    }

    /// Fetch the list for the current project and apply it.
    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let result = self.api.list(ticket.project()).await;
        self.finish_load(&ticket, result);
    }

    /// Start a list request: mark the panel as loading and issue a ticket
    /// that supersedes every earlier one.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_sequence += 1;
        self.load_state = LoadState::Loading;
        debug!(project = %self.project, sequence = self.load_sequence, "Loading records");
        LoadTicket {
            project: self.project.clone(),
            sequence: self.load_sequence,
        }
    }

    /// Apply the outcome of the request identified by `ticket`.
    ///
    /// Returns `false` (and changes nothing) if a newer request has been
    /// issued since, or the project changed. A failure clears the list and
    /// closes the popover.
    pub fn finish_load(&mut self, ticket: &LoadTicket, result: Result<Vec<RiskIssue>>) -> bool {
        if ticket.sequence != self.load_sequence || ticket.project != self.project {
            debug!(
                project = %ticket.project,
                sequence = ticket.sequence,
                latest = self.load_sequence,
                "Discarding stale list response"
            );
            return false;
        }

        match result {
            Ok(records) => {
                debug!(count = records.len(), "Records loaded");
                self.records = records;
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                error!(project = %ticket.project, error = %e, "Failed to load risks/issues");
                // A failed load hides the list, so nothing may act on it either.
                self.records.clear();
                self.popover.close();
                self.load_state = LoadState::Failed(LOAD_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    // ========== Status Popover ==========

    /// Open the status popover for `id`, or close it if already open there.
    ///
    /// # Errors
    ///
    /// - `Error::RecordNotFound` if `id` is not in the list
    /// - `Error::Forbidden` if the viewer has no "Change Status" control on it
    pub fn toggle_popover(&mut self, id: &str) -> Result<()> {
        let record = self.require_actionable(id)?;
        let record_id = record.id.clone();
        self.popover.toggle(&record_id);
        Ok(())
    }

    /// Forward a pointer-down to the popover. Returns `true` if it closed.
    pub fn handle_pointer_down(&mut self, target: &PointerTarget) -> bool {
        self.popover.handle_pointer_down(target)
    }

    /// Trigger the action offered by the open popover: toggle that record.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoPopover` if no popover is open, otherwise whatever
    /// [`Panel::toggle_status`] returns.
    pub async fn apply_popover_action(&mut self) -> Result<()> {
        let id = self.popover.active().ok_or(Error::NoPopover)?.to_string();
        self.toggle_status(&id).await
    }

    // ========== Status Mutator ==========

    /// Flip a record between `open` and `closed`.
    ///
    /// # Errors
    ///
    /// See [`Panel::change_status`].
    pub async fn toggle_status(&mut self, id: &str) -> Result<()> {
        let target = self.require_actionable(id)?.status.toggled();
        self.change_status(id, target).await
    }

    /// Send the record's full representation with `target` as its status,
    /// then reload the list and close the popover.
    ///
    /// On failure the alert is set, the popover stays open and the list is
    /// untouched.
    ///
    /// # Errors
    ///
    /// - `Error::RecordNotFound` / `Error::Forbidden` before any request
    /// - the backend error if the update fails
    pub async fn change_status(&mut self, id: &str, target: RecordStatus) -> Result<()> {
        let body = self.require_actionable(id)?.with_status(target);

        let outcome = self.api.update(&body).await;
        match outcome {
            Ok(()) => {
                debug!(id = %body.id, status = %body.status, "Status changed");
                self.load().await;
                self.popover.close();
                Ok(())
            }
            Err(e) => {
                error!(id = %body.id, error = %e, "Failed to update status");
                self.alert = Some(
                    e.server_message()
                        .unwrap_or(STATUS_FAILED_MESSAGE)
                        .to_string(),
                );
                Err(e)
            }
        }
    }

    fn require_actionable(&self, id: &str) -> Result<&RiskIssue> {
        let record = self
            .find(id)
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
        if !self.status_change_allowed(record) {
            return Err(Error::Forbidden(format!(
                "only the project owner can change the status of {} {}",
                record.kind, record.id
            )));
        }
        Ok(record)
    }

    // ========== Creation Submitter ==========

    /// Show the creation modal. The draft is kept from last time.
    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    /// Hide the creation modal without resetting the draft.
    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    /// Edit one draft field.
    ///
    /// Returns `false` when the edit is refused: the type selector is locked
    /// for viewers who do not own the project.
    pub fn update_draft(&mut self, field: DraftField) -> bool {
        if matches!(field, DraftField::Kind(_)) && !self.viewer.is_owner() {
            debug!(field = field.name(), "Type selector is locked for non-owners");
            return false;
        }
        self.draft.update(field);
        true
    }

    /// Submit the draft.
    ///
    /// On success the returned record is prepended, the modal closes and the
    /// draft resets. On failure the alert carries the server's message (or
    /// a generic one) and modal and draft are left as they were.
    ///
    /// # Errors
    ///
    /// Returns the backend error if creation fails.
    pub async fn submit(&mut self) -> Result<&RiskIssue> {
        let outcome = self.api.create(&self.project, &self.draft).await;
        match outcome {
            Ok(record) => {
                debug!(id = %record.id, "Record created");
                self.records.insert(0, record);
                self.modal_open = false;
                self.draft.reset();
                Ok(&self.records[0])
            }
            Err(e) => {
                warn!(error = %e, "Failed to submit record");
                self.alert = Some(
                    e.server_message()
                        .unwrap_or(SUBMIT_FAILED_MESSAGE)
                        .to_string(),
                );
                Err(e)
            }
        }
    }

    /// Acknowledge and clear the blocking alert.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Snapshot of what the panel currently shows.
    #[must_use]
    pub fn view(&self) -> PanelView<'_> {
        PanelView::of(self)
    }
}
