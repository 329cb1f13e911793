//! Status popover: at most one open at a time, keyed by record ID.

use crate::domain::RecordId;
use tracing::trace;

/// Where a pointer-down landed, relative to popovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// Inside the rendered popover region of the given record
    Popover(RecordId),
    /// Anywhere else
    Outside,
}

/// Registration of the outside-click handler.
///
/// Exists exactly while a popover is open; dropping it detaches the handler.
#[derive(Debug)]
struct OutsideClickListener {
    record: RecordId,
}

impl OutsideClickListener {
    fn attach(record: RecordId) -> Self {
        trace!(record = %record, "Outside-click listener attached");
        Self { record }
    }
}

impl Drop for OutsideClickListener {
    fn drop(&mut self) {
        trace!(record = %self.record, "Outside-click listener detached");
    }
}

/// Single-instance popover state.
#[derive(Debug, Default)]
pub struct Popover {
    active: Option<OutsideClickListener>,
}

impl Popover {
    /// A closed popover
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the popover is open for, if any.
    #[must_use]
    pub fn active(&self) -> Option<&RecordId> {
        self.active.as_ref().map(|listener| &listener.record)
    }

    /// Whether the popover is open for `id`.
    #[must_use]
    pub fn is_open_for(&self, id: &RecordId) -> bool {
        self.active() == Some(id)
    }

    /// Whether an outside-click handler is currently registered.
    #[must_use]
    pub fn listener_attached(&self) -> bool {
        self.active.is_some()
    }

    /// Toggle the popover for `id`.
    ///
    /// Closes it when already open for `id`; otherwise opens it for `id`,
    /// replacing any popover open for another record.
    pub fn toggle(&mut self, id: &RecordId) {
        if self.is_open_for(id) {
            self.close();
        } else {
            // Drop the old listener before attaching the new one.
            self.active = None;
            self.active = Some(OutsideClickListener::attach(id.clone()));
        }
    }

    /// Close the popover. No-op when nothing is open.
    pub fn close(&mut self) {
        self.active = None;
    }

    /// Handle a pointer-down anywhere on the panel.
    ///
    /// Returns `true` when this dismissed an open popover.
    pub fn handle_pointer_down(&mut self, target: &PointerTarget) -> bool {
        let Some(active) = self.active() else {
            return false;
        };
        let inside = matches!(target, PointerTarget::Popover(id) if id == active);
        if inside {
            return false;
        }
        self.close();
        true
    }
}
