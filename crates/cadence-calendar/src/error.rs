//! Error types for cadence-calendar operations.

use thiserror::Error;

/// The error type for calendar operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Date text matched none of the accepted formats.
    #[error("bad date value {value:?}, use formats {options}")]
    BadDate {
        /// The text that failed to parse.
        value: String,
        /// Human readable list of accepted formats.
        options: String,
    },

    /// A day range was requested with fewer than one day.
    #[error("day count of {0} is not >= 1")]
    BadDayCount(i64),

    /// A day range was requested whose end precedes its start.
    #[error("end {end} precedes start {start}")]
    EndBeforeStart {
        /// Requested start, display form.
        start: String,
        /// Requested end, display form.
        end: String,
    },

    /// A `start:end` pair could not be split or needed correction.
    #[error("bad day range {value:?}: {reason}")]
    BadRange {
        /// The text that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A duration such as `6m`, `24w` or `180d` could not be parsed.
    #[error("unable to parse {value:?} as {unit}")]
    BadDuration {
        /// The numeric part that failed to parse.
        value: String,
        /// The unit the value was read as.
        unit: &'static str,
    },

    /// A duration parsed but is too long to schedule with.
    #[error("duration {value:?} is out of range; the limit is {max} days")]
    DurationOutOfRange {
        /// The duration as written.
        value: String,
        /// Longest accepted duration, in days.
        max: i64,
    },

    /// Shifting a date would leave the supported calendar.
    #[error("{start} shifted by {days} days is outside the calendar")]
    DateOutOfRange {
        /// The date being shifted, display form.
        start: String,
        /// The requested shift.
        days: i64,
    },
}

/// A specialized Result type for calendar operations.
pub type Result<T> = std::result::Result<T, Error>;
