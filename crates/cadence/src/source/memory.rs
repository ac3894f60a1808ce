//! Map-backed issue source.

use super::IssueSource;
use crate::domain::{IssueRecord, ItemKey};
use crate::error::{Error, Result};
use cadence_calendar::CalendarDate;
use std::collections::{BTreeMap, BTreeSet};

/// Issue records held in memory.
///
/// Lookups and writes for chosen keys can be made to fail, which is how
/// the graph builder and write-back are exercised against a flaky tracker.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: BTreeMap<ItemKey, IssueRecord>,
    failing_lookups: BTreeSet<ItemKey>,
    failing_writes: BTreeSet<ItemKey>,
}

impl InMemorySource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: IssueRecord) {
        self.records.insert(record.key.clone(), record);
    }

    /// Builder-style [`InMemorySource::insert`].
    #[must_use]
    pub fn with(mut self, record: IssueRecord) -> Self {
        self.insert(record);
        self
    }

    /// Make every lookup of `key` fail.
    pub fn fail_lookup(&mut self, key: ItemKey) {
        self.failing_lookups.insert(key);
    }

    /// Make every date write to `key` fail.
    pub fn fail_write(&mut self, key: ItemKey) {
        self.failing_writes.insert(key);
    }

    /// Records in key order.
    pub fn records(&self) -> impl Iterator<Item = &IssueRecord> {
        self.records.values()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn select(&self, keep: impl Fn(&IssueRecord) -> bool) -> Vec<IssueRecord> {
        self.records.values().filter(|r| keep(r)).cloned().collect()
    }
}

impl IssueSource for InMemorySource {
    fn issue(&self, key: &ItemKey) -> Result<IssueRecord> {
        if self.failing_lookups.contains(key) {
            return Err(Error::IssueNotFound(key.clone()));
        }
        self.records
            .get(key)
            .cloned()
            .ok_or_else(|| Error::IssueNotFound(key.clone()))
    }

    fn epics_in_project(&self, project: &str) -> Result<Vec<IssueRecord>> {
        Ok(self.select(|r| r.is_epic && r.project().eq_ignore_ascii_case(project)))
    }

    fn open_issues_in_project(&self, project: &str) -> Result<Vec<IssueRecord>> {
        Ok(self.select(|r| {
            !r.is_epic && !r.status.is_finished() && r.project().eq_ignore_ascii_case(project)
        }))
    }

    fn set_dates(&mut self, key: &ItemKey, start: CalendarDate, end: CalendarDate) -> Result<()> {
        if self.failing_writes.contains(key) {
            return Err(Error::WriteFailed {
                key: key.clone(),
                reason: "write rejected".to_string(),
            });
        }
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| Error::IssueNotFound(key.clone()))?;
        record.set_dates(start, end);
        Ok(())
    }
}
