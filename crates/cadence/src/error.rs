//! Error types for cadence operations.

use crate::domain::ItemKey;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for cadence operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A line of an issue snapshot was not a valid record.
    #[error("JSON error at {path}:{line_number}: {source}")]
    Json {
        /// Snapshot file.
        path: PathBuf,
        /// 1-based line number.
        line_number: usize,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Date or range error from the calendar engine.
    #[error(transparent)]
    Calendar(#[from] cadence_calendar::Error),

    /// Text that should have been an item key, like `PEACH-1234`.
    #[error("expected something like PEACH-1234, but got {0:?}")]
    InvalidKey(String),

    /// Issue not found in the source.
    #[error("Issue not found: {0}")]
    IssueNotFound(ItemKey),

    /// A lookup answered with a different issue than the one requested.
    #[error("looked up {requested}, got {returned}")]
    KeyMismatch {
        /// Key asked for.
        requested: ItemKey,
        /// Key received.
        returned: ItemKey,
    },

    /// An issue expected to be an epic is not one.
    #[error("{0} is not an epic")]
    NotAnEpic(ItemKey),

    /// An edge names a node that is not in the graph.
    #[error("edge {dependent} -> {dependency} names a node missing from the graph")]
    DanglingEdge {
        /// Dependent end of the edge.
        dependent: ItemKey,
        /// Dependency end of the edge.
        dependency: ItemKey,
    },

    /// A propagation pass revisited a node too often; the graph has a cycle
    /// or an unreasonable fan-in.
    #[error(
        "visited {key} {visits} times; run `cadence dot` to examine the graph for a cycle, \
         then remove the offending blocks link"
    )]
    CycleDetected {
        /// Node whose visit ceiling tripped.
        key: ItemKey,
        /// Visits counted when the ceiling tripped.
        visits: u32,
    },

    /// Epic validation found problems; nothing was written.
    #[error("aborting write: {0}")]
    Validation(String),

    /// The source refused a write.
    #[error("failed to write dates for {key}: {reason}")]
    WriteFailed {
        /// Issue being written.
        key: ItemKey,
        /// Why it failed.
        reason: String,
    },
}

/// A specialized Result type for cadence operations.
pub type Result<T> = std::result::Result<T, Error>;
