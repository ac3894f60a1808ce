//! Issue records persisted as a JSONL snapshot.
//!
//! One [`IssueRecord`] per line. Blank lines are ignored and lines that do
//! not parse are skipped with a [`LoadWarning`], so one bad export line
//! does not make the whole snapshot unusable.
//!
//! Date writes rewrite the whole file: records go to a sibling `.tmp` file
//! which is then renamed over the snapshot. A crash mid-write leaves the
//! old snapshot intact.

use super::{InMemorySource, IssueSource};
use crate::domain::{IssueRecord, ItemKey};
use crate::error::{Error, Result};
use cadence_calendar::CalendarDate;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A non-fatal problem found while loading a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The line was not a valid record and was skipped.
    MalformedJson {
        /// 1-based line number.
        line_number: usize,
        /// Parser message.
        error: String,
    },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::MalformedJson { line_number, error } => {
                write!(f, "skipped malformed record at line {line_number}: {error}")
            }
        }
    }
}

/// Records loaded from, and saved back to, a JSONL file.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
    records: InMemorySource,
}

impl SnapshotSource {
    /// Load a snapshot file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened or read. Malformed lines are
    /// returned as warnings instead.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, Vec<LoadWarning>)> {
        let path = path.as_ref().to_path_buf();
        let reader = BufReader::new(File::open(&path)?);
        let mut records = InMemorySource::new();
        let mut warnings = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<IssueRecord>(&line) {
                Ok(record) => records.insert(record),
                Err(e) => warnings.push(LoadWarning::MalformedJson {
                    line_number: i + 1,
                    error: e.to_string(),
                }),
            }
        }

        info!(path = %path.display(), records = records.len(), "Loaded snapshot");
        Ok((Self { path, records }, warnings))
    }

    /// Write `records` as a new snapshot at `path`.
    ///
    /// # Errors
    ///
    /// Fails on any I/O or serialization error.
    pub fn create(path: impl AsRef<Path>, records: InMemorySource) -> Result<Self> {
        let snapshot = Self {
            path: path.as_ref().to_path_buf(),
            records,
        };
        snapshot.save()?;
        Ok(snapshot)
    }

    /// Snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in key order.
    pub fn records(&self) -> impl Iterator<Item = &IssueRecord> {
        self.records.records()
    }

    /// Rewrite the snapshot file from memory via temp file and rename.
    ///
    /// # Errors
    ///
    /// Fails on any I/O or serialization error; the existing file is left
    /// untouched in that case.
    pub fn save(&self) -> Result<()> {
        let temp_path = self.path.with_extension("jsonl.tmp");
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            for (i, record) in self.records.records().enumerate() {
                serde_json::to_writer(&mut writer, record).map_err(|source| Error::Json {
                    path: self.path.clone(),
                    line_number: i + 1,
                    source,
                })?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), "Saved snapshot");
        Ok(())
    }
}

impl IssueSource for SnapshotSource {
    fn issue(&self, key: &ItemKey) -> Result<IssueRecord> {
        self.records.issue(key)
    }

    fn epics_in_project(&self, project: &str) -> Result<Vec<IssueRecord>> {
        self.records.epics_in_project(project)
    }

    fn open_issues_in_project(&self, project: &str) -> Result<Vec<IssueRecord>> {
        self.records.open_issues_in_project(project)
    }

    fn set_dates(&mut self, key: &ItemKey, start: CalendarDate, end: CalendarDate) -> Result<()> {
        self.records.set_dates(key, start, end)?;
        self.save()
    }
}
