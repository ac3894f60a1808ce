//! The epic calendar: one row per epic, one column per business day.
//!
//! ```text
//!                  April                     May
//!                 3_       1        2       3_
//! PEACH            11234 78901 45678 12345 89012
//!     7 Billing │     │-----│-----│     │     │
//!    12  Search │     │     │   --│-----│---- │
//! ```

use super::color::{self, OutputConfig};
use super::ellipsis;
use crate::domain::{IssueRecord, ItemKey};
use crate::error::Result;
use cadence_calendar::{BarStyle, CalendarDate, DayRange, RangeProblem};
use std::io::Write;
use tracing::warn;

const FIELD_SIZE_ID: usize = 5;
const BLANK: &str = " ";

/// Default width of the title column.
pub const DEFAULT_NAME_SIZE: usize = 70;

/// Default number of rows between blank separator lines.
pub const DEFAULT_LINE_SET_SIZE: usize = 3;

/// The title column never shrinks below this.
pub const MIN_NAME_SIZE: usize = 12;

/// How to draw the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarParams {
    /// Shown left of the day-number header row.
    pub project: String,
    /// The window to draw, rounded out to whole business weeks.
    pub outer: DayRange,
    /// Colored bars, spelled with the assignee's name.
    pub output: OutputConfig,
    /// Width of the title column.
    pub name_size: usize,
    /// Print the month and day header rows.
    pub show_headers: bool,
    /// Rows per group; zero means no grouping.
    pub line_set_size: usize,
    /// Spell colored bars with the assignee's name.
    pub show_assignee: bool,
}

impl CalendarParams {
    /// Defaults for everything but the project and window.
    pub fn new(project: impl Into<String>, outer: DayRange) -> Self {
        Self {
            project: project.into(),
            outer,
            output: OutputConfig::new(false),
            name_size: DEFAULT_NAME_SIZE,
            show_headers: true,
            line_set_size: DEFAULT_LINE_SET_SIZE,
            show_assignee: false,
        }
    }
}

/// The window shown by `cal`: `prev_days` before today (or the Monday
/// after, on a weekend) through `day_count` days after.
///
/// # Errors
///
/// Fails when the total day count is less than one, or when the window
/// runs off the calendar.
pub fn calendar_window(today: CalendarDate, day_count: i64, prev_days: i64) -> Result<DayRange> {
    let back = prev_days
        .checked_neg()
        .ok_or(cadence_calendar::Error::BadDayCount(prev_days))?;
    let start = today.slide_over_weekend().try_add_days(back)?;
    let total = day_count.saturating_add(prev_days);
    Ok(DayRange::new(start, total)?)
}

/// Narrow `requested` so a calendar row fits the terminal.
///
/// Unchanged when stdout is not a terminal.
pub fn fit_name_size(requested: usize, outer: &DayRange) -> usize {
    match terminal_size::terminal_size() {
        Some((terminal_size::Width(width), _)) => {
            let bar_width = outer.day_headers().0.chars().count();
            fit_to_width(requested, bar_width, usize::from(width))
        }
        None => requested,
    }
}

fn fit_to_width(requested: usize, bar_width: usize, width: usize) -> usize {
    // id, name and bar are separated by single spaces
    let room = width.saturating_sub(FIELD_SIZE_ID + bar_width + 2);
    requested.min(room).max(MIN_NAME_SIZE)
}

fn parsed_or_none(record: &IssueRecord, text: &str, which: &str) -> Option<CalendarDate> {
    CalendarDate::parse_optional(text).unwrap_or_else(|e| {
        warn!(key = %record.key, error = %e, "Ignoring malformed {which} date");
        None
    })
}

/// Write the calendar for `epics`, sorted by start date.
///
/// Epics with unusable dates are drawn with repaired dates; the problems
/// are returned for the caller to report.
///
/// # Errors
///
/// Fails when `out` cannot be written.
pub fn write_calendar<W: Write>(
    out: &mut W,
    epics: &[IssueRecord],
    params: &CalendarParams,
    today: CalendarDate,
) -> Result<Vec<(ItemKey, RangeProblem)>> {
    let name_size = params.name_size;
    let id_size = FIELD_SIZE_ID;
    if params.show_headers {
        let (tens, ones) = params.outer.day_headers();
        let rows = [
            (BLANK, params.outer.month_header()),
            (BLANK, tens),
            (params.project.as_str(), ones),
        ];
        for (label, row) in rows {
            let line = format!("{label:>id_size$} {:>name_size$} {row}", BLANK);
            writeln!(out, "{}", color::dimmed(&line, &params.output))?;
        }
    }

    let mut rows: Vec<(CalendarDate, &IssueRecord, DayRange, Option<RangeProblem>)> = epics
        .iter()
        .map(|epic| {
            let start = parsed_or_none(epic, &epic.start_date, "start");
            let end = parsed_or_none(epic, &epic.end_date, "end");
            let (range, problem) = DayRange::repaired(start, end, today);
            (start.unwrap_or(today), epic, range, problem)
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.key.cmp(&b.1.key)));

    let mut problems = Vec::new();
    for (i, (_, epic, range, problem)) in rows.into_iter().enumerate() {
        if let Some(problem) = problem {
            problems.push((epic.key.clone(), problem));
        }
        let style = if params.output.use_colors {
            let name = if params.show_assignee {
                epic.assignee_name()
            } else {
                ""
            };
            BarStyle::colored(color::terminal_color(epic.status), name)
        } else {
            BarStyle::plain()
        };
        writeln!(
            out,
            "{:>id_size$} {:>name_size$} {}",
            epic.key.number(),
            ellipsis(&epic.title, name_size),
            range.as_intersect(&params.outer, today, &style)
        )?;
        if params.line_set_size > 0 && (i + 1) % params.line_set_size == 0 {
            writeln!(out)?;
        }
    }
    Ok(problems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IssueStatus;
    use crate::error::Error;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    fn epic(n: u32, title: &str, start: &str, end: &str) -> IssueRecord {
        let mut r = IssueRecord::new(ItemKey::new("PEACH", n), title, IssueStatus::Backlog).epic();
        r.start_date = start.to_string();
        r.end_date = end.to_string();
        r
    }

    fn params() -> CalendarParams {
        let mut p = CalendarParams::new(
            "PEACH",
            DayRange::from_pair("2025-Mar-30:2025-Apr-24").unwrap(),
        );
        p.name_size = 6;
        p.line_set_size = 2;
        p
    }

    #[test]
    fn test_rows_sorted_by_start_with_headers() {
        let epics = [
            epic(7, "Billing", "2025-04-06", "2025-04-12"),
            epic(12, "Search", "2025-04-01", "2025-04-12"),
        ];
        let mut out = Vec::new();
        let problems = write_calendar(&mut out, &epics, &params(), date(2024, 4, 10)).unwrap();
        assert!(problems.is_empty());

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "               April                 ");
        assert_eq!(lines[1], "              3_       1        2     ");
        assert_eq!(lines[2], "PEACH         11234 78901 45678 12345 ");
        assert_eq!(lines[3], "   12 Search │ ----│-----│     │     │");
        assert_eq!(lines[4], "    7 Billi… │     │-----│     │     │");
        assert_eq!(lines[5], "");
    }

    #[test]
    fn test_problems_returned_and_rows_still_drawn() {
        let epics = [epic(3, "Loose", "", ""), epic(4, "Half", "2025-04-07", "")];
        let mut p = params();
        p.show_headers = false;
        let mut out = Vec::new();
        let problems = write_calendar(&mut out, &epics, &p, date(2025, 4, 1)).unwrap();

        assert_eq!(
            problems,
            [
                (ItemKey::new("PEACH", 3), RangeProblem::BothUndefined),
                (ItemKey::new("PEACH", 4), RangeProblem::EndUndefined),
            ]
        );
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_fit_to_width() {
        assert_eq!(fit_to_width(70, 100, 200), 70);
        assert_eq!(fit_to_width(70, 100, 150), 43);
        assert_eq!(fit_to_width(70, 100, 80), MIN_NAME_SIZE);
    }

    #[test]
    fn test_calendar_window() {
        // Sunday Apr 13 slides to Monday Apr 14
        let window = calendar_window(date(2025, 4, 13), 28, 7).unwrap();
        assert_eq!(window.start(), date(2025, 4, 7));
        assert_eq!(window.day_count(), 35);
        assert!(calendar_window(date(2025, 4, 13), 0, 0).is_err());
    }

    #[rstest]
    #[case::far_ahead(99_999_999_999, 35)]
    #[case::far_back(28, 99_999_999_999)]
    #[case::both_maxed(i64::MAX, i64::MAX)]
    fn test_calendar_window_off_the_calendar_is_an_error(
        #[case] day_count: i64,
        #[case] prev_days: i64,
    ) {
        let err = calendar_window(date(2025, 4, 13), day_count, prev_days).unwrap_err();
        assert!(matches!(
            err,
            Error::Calendar(cadence_calendar::Error::DateOutOfRange { .. })
        ));
    }
}
