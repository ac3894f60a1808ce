//! Where issue records come from and where date changes go.
//!
//! The scheduling core never talks to an issue tracker directly. It reads
//! records through [`IssueSource`] and hands proposed date changes back
//! through [`IssueSource::set_dates`]. Two implementations ship here:
//!
//! - [`InMemorySource`]: a map of records, with switches for making
//!   particular lookups or writes fail.
//! - [`SnapshotSource`]: records loaded from a JSONL snapshot file, with
//!   date writes saved back to that file atomically.
//!
//! The trait is object-safe; callers pass `&dyn IssueSource` around.

mod memory;
mod snapshot;

pub use memory::InMemorySource;
pub use snapshot::{LoadWarning, SnapshotSource};

use crate::domain::{IssueRecord, ItemKey};
use crate::error::Result;
use cadence_calendar::CalendarDate;

/// Blocking access to an issue tracker.
pub trait IssueSource {
    /// Look up one issue by key.
    fn issue(&self, key: &ItemKey) -> Result<IssueRecord>;

    /// All epics belonging to `project`, in key order.
    fn epics_in_project(&self, project: &str) -> Result<Vec<IssueRecord>>;

    /// All non-epic issues of `project` that are not finished, in key order.
    fn open_issues_in_project(&self, project: &str) -> Result<Vec<IssueRecord>>;

    /// Persist new start and end dates for one issue.
    fn set_dates(&mut self, key: &ItemKey, start: CalendarDate, end: CalendarDate) -> Result<()>;
}
