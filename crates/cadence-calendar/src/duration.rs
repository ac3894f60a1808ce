//! Rough durations written as days, weeks or months.

use crate::error::{Error, Result};

/// Days per month in duration approximations.
pub const DAYS_PER_MONTH: i64 = 30;

/// Longest accepted duration, about a century.
pub const MAX_DAY_COUNT: i64 = 100 * 366;

/// Parse a duration into a day count.
///
/// A trailing `d` means days, `m` means months of 30 days, and `w` or no
/// unit at all means weeks. These are estimates: start and end dates slide
/// off weekends anyway, so a day gained or lost does not matter.
///
/// # Errors
///
/// Returns [`Error::BadDuration`] when the number does not parse, and
/// [`Error::DurationOutOfRange`] when it is longer than [`MAX_DAY_COUNT`]
/// days in either direction.
pub fn parse_day_count(text: &str) -> Result<i64> {
    let text = text.trim();
    let (number, unit, days_per_unit) = if let Some(months) = text.strip_suffix('m') {
        (months, "months", DAYS_PER_MONTH)
    } else if let Some(days) = text.strip_suffix('d') {
        (days, "days", 1)
    } else {
        (text.strip_suffix('w').unwrap_or(text), "weeks", 7)
    };
    parse_number(number, unit)?
        .checked_mul(days_per_unit)
        .filter(|days| (-MAX_DAY_COUNT..=MAX_DAY_COUNT).contains(days))
        .ok_or_else(|| Error::DurationOutOfRange {
            value: text.to_string(),
            max: MAX_DAY_COUNT,
        })
}

fn parse_number(value: &str, unit: &'static str) -> Result<i64> {
    value.parse().map_err(|_| Error::BadDuration {
        value: value.to_string(),
        unit,
    })
}
