//! Domain types for epic scheduling.
//!
//! This module contains the identity, status and record types shared by the
//! graph, the issue sources and the renderers.

use cadence_calendar::CalendarDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Stable identity of an item: a project namespace plus a number.
///
/// Displays and parses as `PEACH-1234`. Namespaces are stored upper case.
/// Keys order by namespace, then number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKey {
    namespace: String,
    number: u32,
}

impl ItemKey {
    /// Create a key; the namespace is upper-cased.
    pub fn new(namespace: impl AsRef<str>, number: u32) -> Self {
        Self {
            namespace: namespace.as_ref().to_uppercase(),
            number,
        }
    }

    /// Project namespace, e.g. `PEACH`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Number within the namespace.
    pub fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.namespace, self.number)
    }
}

impl FromStr for ItemKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidKey(s.to_string());
        let (namespace, number) = s.trim().split_once('-').ok_or_else(invalid)?;
        if namespace.is_empty() || !namespace.chars().all(char::is_alphanumeric) {
            return Err(invalid());
        }
        let number = number.parse().map_err(|_| invalid())?;
        Ok(Self::new(namespace, number))
    }
}

impl TryFrom<String> for ItemKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ItemKey> for String {
    fn from(key: ItemKey) -> Self {
        key.to_string()
    }
}

/// Workflow status of an issue, as named by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    /// Not yet scheduled for work.
    Backlog,
    /// Work finished.
    Done,
    /// Closed.
    Closed,
    /// Closed without any work done.
    #[serde(rename = "Closed Without Action")]
    ClosedWithoutAction,
    /// Being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Queued for work.
    #[serde(rename = "In Queue")]
    InQueue,
    /// Awaiting release.
    #[serde(rename = "Release Candidate")]
    ReleaseCandidate,
    /// Being validated.
    #[serde(rename = "In Validation")]
    InValidation,
    /// Validation.
    Validation,
    /// Ready to be picked up.
    #[serde(rename = "Ready for Development")]
    ReadyForDevelopment,
    /// Waiting on review.
    #[serde(rename = "Ready for Review")]
    ReadyForReview,
    /// Anything the tracker reports that we do not recognize.
    #[serde(other)]
    Unknown,
}

impl IssueStatus {
    /// True when the work is effectively over and its dates are frozen.
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            IssueStatus::Done | IssueStatus::Closed | IssueStatus::ClosedWithoutAction
        )
    }

    /// The tracker's name for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Backlog => "Backlog",
            IssueStatus::Done => "Done",
            IssueStatus::Closed => "Closed",
            IssueStatus::ClosedWithoutAction => "Closed Without Action",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::InQueue => "In Queue",
            IssueStatus::ReleaseCandidate => "Release Candidate",
            IssueStatus::InValidation => "In Validation",
            IssueStatus::Validation => "Validation",
            IssueStatus::ReadyForDevelopment => "Ready for Development",
            IssueStatus::ReadyForReview => "Ready for Review",
            IssueStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inbound "blocks" link: `blocker` must finish before this issue starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingLink {
    /// The issue doing the blocking.
    pub blocker: ItemKey,
}

/// An issue as supplied by the tracker.
///
/// Dates are kept as the tracker's text (`YYYY-MM-DD`, empty when unset)
/// and parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Identity.
    pub key: ItemKey,

    /// Current status.
    pub status: IssueStatus,

    /// Summary line.
    pub title: String,

    /// Start date text; empty when unset.
    #[serde(default)]
    pub start_date: String,

    /// Target end date text; empty when unset.
    #[serde(default)]
    pub end_date: String,

    /// Whether the issue is an epic.
    #[serde(default)]
    pub is_epic: bool,

    /// Owning project; empty means the key's namespace.
    #[serde(default)]
    pub project: String,

    /// Issues that block this one.
    #[serde(default)]
    pub blocked_by: Vec<BlockingLink>,

    /// Assignee (optional).
    #[serde(default)]
    pub assignee: Option<String>,
}

impl IssueRecord {
    /// A record with no dates, links or assignee.
    pub fn new(key: ItemKey, title: impl Into<String>, status: IssueStatus) -> Self {
        Self {
            key,
            status,
            title: title.into(),
            start_date: String::new(),
            end_date: String::new(),
            is_epic: false,
            project: String::new(),
            blocked_by: Vec::new(),
            assignee: None,
        }
    }

    /// Mark this record as an epic.
    #[must_use]
    pub fn epic(mut self) -> Self {
        self.is_epic = true;
        self
    }

    /// Set the start and end date fields.
    #[must_use]
    pub fn with_dates(mut self, start: CalendarDate, end: CalendarDate) -> Self {
        self.set_dates(start, end);
        self
    }

    /// Add a blocker.
    #[must_use]
    pub fn blocked_by(mut self, blocker: ItemKey) -> Self {
        self.blocked_by.push(BlockingLink { blocker });
        self
    }

    /// Set the assignee.
    #[must_use]
    pub fn assigned_to(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Overwrite both date fields in tracker format.
    pub fn set_dates(&mut self, start: CalendarDate, end: CalendarDate) {
        self.start_date = start.tracker_format();
        self.end_date = end.tracker_format();
    }

    /// The project this record belongs to.
    pub fn project(&self) -> &str {
        if self.project.is_empty() {
            self.key.namespace()
        } else {
            &self.project
        }
    }

    /// Parsed start date; `None` when unset.
    ///
    /// # Errors
    ///
    /// Fails when the field holds text that is not a date.
    pub fn start(&self) -> Result<Option<CalendarDate>> {
        Ok(CalendarDate::parse_optional(&self.start_date)?)
    }

    /// Parsed end date; `None` when unset.
    ///
    /// # Errors
    ///
    /// Fails when the field holds text that is not a date.
    pub fn end(&self) -> Result<Option<CalendarDate>> {
        Ok(CalendarDate::parse_optional(&self.end_date)?)
    }

    /// Assignee or the empty string.
    pub fn assignee_name(&self) -> &str {
        self.assignee.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::upper("PEACH-1234", "PEACH", 1234)]
    #[case::lower("peach-7", "PEACH", 7)]
    #[case::padded(" ABC-1 ", "ABC", 1)]
    fn test_parse_key(#[case] text: &str, #[case] namespace: &str, #[case] number: u32) {
        let key: ItemKey = text.parse().unwrap();
        assert_eq!(key.namespace(), namespace);
        assert_eq!(key.number(), number);
    }

    #[rstest]
    #[case::no_dash("PEACH1234")]
    #[case::extra_dash("PE-ACH-1")]
    #[case::no_number("PEACH-")]
    #[case::no_namespace("-12")]
    #[case::negative("PEACH--3")]
    fn test_parse_key_rejects(#[case] text: &str) {
        assert!(matches!(text.parse::<ItemKey>(), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_key_display_round_trips() {
        let key = ItemKey::new("peach", 42);
        assert_eq!(key.to_string(), "PEACH-42");
        assert_eq!(key.to_string().parse::<ItemKey>().unwrap(), key);
    }

    #[test]
    fn test_key_ordering_is_namespace_then_number() {
        let mut keys = vec![
            ItemKey::new("B", 1),
            ItemKey::new("A", 10),
            ItemKey::new("A", 2),
        ];
        keys.sort();
        let shown: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(shown, ["A-2", "A-10", "B-1"]);
    }

    #[test]
    fn test_status_finished() {
        assert!(IssueStatus::Done.is_finished());
        assert!(IssueStatus::Closed.is_finished());
        assert!(IssueStatus::ClosedWithoutAction.is_finished());
        assert!(!IssueStatus::InProgress.is_finished());
        assert!(!IssueStatus::Unknown.is_finished());
    }

    #[test]
    fn test_record_json_shape() {
        let json = r#"{
            "key": "PEACH-3",
            "status": "In Progress",
            "title": "Ship it",
            "start_date": "2025-04-07",
            "end_date": "",
            "is_epic": true,
            "blocked_by": [{"blocker": "PEACH-1"}]
        }"#;
        let record: IssueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.key, ItemKey::new("PEACH", 3));
        assert_eq!(record.status, IssueStatus::InProgress);
        assert_eq!(record.project(), "PEACH");
        assert_eq!(record.start().unwrap(), CalendarDate::from_ymd(2025, 4, 7));
        assert_eq!(record.end().unwrap(), None);
        assert_eq!(record.blocked_by[0].blocker, ItemKey::new("PEACH", 1));
    }

    #[test]
    fn test_unrecognized_status_is_unknown() {
        let status: IssueStatus = serde_json::from_str(r#""Someday Maybe""#).unwrap();
        assert_eq!(status, IssueStatus::Unknown);
    }
}
