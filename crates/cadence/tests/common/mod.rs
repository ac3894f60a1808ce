//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use cadence::domain::{IssueRecord, IssueStatus, ItemKey};
use cadence::source::{InMemorySource, SnapshotSource};
use cadence_calendar::CalendarDate;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Shorthand for a valid date.
pub fn date(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(y, m, d).unwrap()
}

/// Key in the PEACH project.
pub fn key(n: u32) -> ItemKey {
    ItemKey::new("PEACH", n)
}

/// A PEACH epic with dates.
pub fn epic(n: u32, status: IssueStatus, start: CalendarDate, end: CalendarDate) -> IssueRecord {
    IssueRecord::new(key(n), format!("epic {n}"), status)
        .epic()
        .with_dates(start, end)
}

/// Write `records` as a snapshot in `dir` and return its path.
pub fn write_snapshot(dir: &Path, records: impl IntoIterator<Item = IssueRecord>) -> PathBuf {
    let path = dir.join("issues.jsonl");
    let mut source = InMemorySource::new();
    for record in records {
        source.insert(record);
    }
    SnapshotSource::create(&path, source).unwrap();
    path
}

/// Run the cadence binary in `dir` with colors and logging quiet.
pub fn run_cadence_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cadence"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "cadence=warn")
        .output()
        .expect("Failed to execute cadence binary")
}
