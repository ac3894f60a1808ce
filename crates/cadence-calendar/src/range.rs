//! Contiguous inclusive spans of calendar days.
//!
//! There are two ways to get a [`DayRange`]:
//!
//! - strictly, with [`DayRange::new`] or [`DayRange::between`], which refuse
//!   anything with fewer than one day;
//! - gently, with [`DayRange::repaired`], which always hands back a usable
//!   range and says what it had to fix in a [`RangeProblem`].

use crate::date::CalendarDate;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Days used when one end of a range has to be invented.
pub const DEFAULT_SPAN_DAYS: i64 = 4 * 7;

/// A start day plus a count of days, at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayRange {
    start: CalendarDate,
    day_count: i64,
}

/// What the gentle constructor had to correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeProblem {
    /// End came before start; the two were swapped.
    #[error("end {end} precedes start {start}; swapped them")]
    EndBeforeStart {
        /// Start as given.
        start: CalendarDate,
        /// End as given.
        end: CalendarDate,
    },

    /// No end date; one was invented from the start.
    #[error("end undefined, using ~28 days")]
    EndUndefined,

    /// No start date; one was invented from the end.
    #[error("bad start date; using end minus ~28 days")]
    StartUndefined,

    /// Neither date; the range was pushed out from today.
    #[error("both end and start dates undefined, pushed to one month from now")]
    BothUndefined,
}

impl DayRange {
    /// Build a range from a start day and a day count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadDayCount`] when `day_count < 1`, and
    /// [`Error::DateOutOfRange`] when the last day would not exist.
    pub fn new(start: CalendarDate, day_count: i64) -> Result<Self> {
        if day_count < 1 {
            return Err(Error::BadDayCount(day_count));
        }
        start.try_add_days(day_count - 1)?;
        Ok(Self { start, day_count })
    }

    /// Build a range spanning `start` through `end`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndBeforeStart`] when `end` precedes `start`.
    pub fn between(start: CalendarDate, end: CalendarDate) -> Result<Self> {
        if end.is_before(start) {
            return Err(Error::EndBeforeStart {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Self::new(start, start.day_count(end))
    }

    /// Always produce a usable range from a possibly broken pair.
    ///
    /// The returned range matches the arguments only when they make sense;
    /// otherwise a default span is substituted and the problem is returned
    /// alongside. `today` anchors the range when both ends are missing.
    #[must_use]
    pub fn repaired(
        start: Option<CalendarDate>,
        end: Option<CalendarDate>,
        today: CalendarDate,
    ) -> (Self, Option<RangeProblem>) {
        let (start, end, problem) = match (start, end) {
            (Some(start), Some(end)) if end.is_before(start) => {
                (end, start, Some(RangeProblem::EndBeforeStart { start, end }))
            }
            (Some(start), Some(end)) => (start, end, None),
            (Some(start), None) => (
                start,
                start.add_days(DEFAULT_SPAN_DAYS).slide_before_weekend(),
                Some(RangeProblem::EndUndefined),
            ),
            (None, Some(end)) => (
                end.add_days(-DEFAULT_SPAN_DAYS).slide_over_weekend(),
                end,
                Some(RangeProblem::StartUndefined),
            ),
            (None, None) => {
                let start = today.add_days(DEFAULT_SPAN_DAYS).slide_over_weekend();
                let end = start.add_days(DEFAULT_SPAN_DAYS).slide_before_weekend();
                (start, end, Some(RangeProblem::BothUndefined))
            }
        };
        if let Some(problem) = &problem {
            debug!(%start, %end, %problem, "Repaired day range");
        }
        let range = Self {
            start,
            day_count: start.day_count(end).max(1),
        };
        (range, problem)
    }

    /// Parse `start:end`, e.g. `2025-Apr-08:2025-Apr-10`.
    ///
    /// # Errors
    ///
    /// Fails when there is no colon, either date is bad, or the pair would
    /// need correction.
    pub fn from_pair(text: &str) -> Result<Self> {
        let Some((start, end)) = text.split_once(':') else {
            return Err(Error::BadRange {
                value: text.to_string(),
                reason: "no colon".to_string(),
            });
        };
        let start = CalendarDate::parse(start)?;
        let end = CalendarDate::parse(end)?;
        let (range, problem) = Self::repaired(Some(start), Some(end), start);
        match problem {
            None => Ok(range),
            Some(problem) => Err(Error::BadRange {
                value: text.to_string(),
                reason: problem.to_string(),
            }),
        }
    }

    /// First day.
    #[must_use]
    pub fn start(&self) -> CalendarDate {
        self.start
    }

    /// Last day, `start + day_count - 1`.
    #[must_use]
    pub fn end(&self) -> CalendarDate {
        self.start.add_days(self.day_count - 1)
    }

    /// Number of days covered, always at least one.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        self.day_count
    }

    /// True when `date` lies in the range, endpoints included.
    #[must_use]
    pub fn contains(&self, date: CalendarDate) -> bool {
        date >= self.start && date <= self.end()
    }

    /// True when this range starts strictly before `other` does.
    #[must_use]
    pub fn starts_before(&self, other: &Self) -> bool {
        self.start.is_before(other.start)
    }

    /// True when this range ends strictly after `other` does.
    #[must_use]
    pub fn ends_after(&self, other: &Self) -> bool {
        self.end().is_after(other.end())
    }

    /// Widen to the enclosing Monday through Friday business weeks.
    #[must_use]
    pub fn round_to_monday_and_friday(&self) -> Self {
        let start = self.start.slide_over_weekend().back_to_monday();
        let end = self.end().slide_before_weekend().forward_to_friday();
        Self::repaired(Some(start), Some(end), start).0
    }

    /// Short human summary with a week count.
    ///
    /// The year is printed only when the endpoints straddle a year or the
    /// range is not in `today`'s year:
    ///
    /// - `Mar 18, 2020 (one day)`
    /// - `Apr 8-10 (1w)`
    /// - `Mar 30 - Apr 3 2020 (1w)`
    /// - `Dec 30, 2020 - Jan 3, 2021 (1w)`
    #[must_use]
    pub fn pretty_range(&self, today: CalendarDate) -> String {
        let start = self.start;
        let end = self.end();
        let weeks = start.week_count(end);
        if start.year() != end.year() {
            const F: &str = "%b %-d, %Y";
            return format!("{} - {} ({weeks}w)", start.format(F), end.format(F));
        }
        let this_year = today.year() == start.year();
        if start.month() != end.month() {
            const F: &str = "%b %-d";
            if this_year {
                return format!("{} - {} ({weeks}w)", start.format(F), end.format(F));
            }
            return format!(
                "{} - {} {} ({weeks}w)",
                start.format(F),
                end.format(F),
                end.year()
            );
        }
        if start.day() != end.day() {
            let head = start.format("%b %-d");
            if this_year {
                return format!("{head}-{} ({weeks}w)", end.day());
            }
            return format!("{head}-{} {} ({weeks}w)", end.day(), end.year());
        }
        format!("{} (one day)", start.format("%b %-d, %Y"))
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end())
    }
}

impl FromStr for DayRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_pair(s)
    }
}
