//! Calendar days with weekend-aware arithmetic.
//!
//! A [`CalendarDate`] is a single day with no time-of-day component. Two
//! dates built from different sources compare equal whenever they name the
//! same calendar day. Missing schedule data is modeled as
//! `Option<CalendarDate>`; see [`CalendarDate::parse_optional`].

use crate::error::{Error, Result};
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Tracker wire format, e.g. `2025-04-06`.
pub const DAY_FORMAT_TRACKER: &str = "%Y-%m-%d";

/// Human format, e.g. `2025-Apr-06`.
pub const DAY_FORMAT_HUMAN: &str = "%Y-%b-%d";

/// Every format accepted by [`CalendarDate::parse`], in the order tried.
///
/// chrono accepts a single digit for `%d` when parsing, so `2025-Apr-6`
/// is covered by the human format.
pub const ALL_DAY_FORMATS: [&str; 2] = [DAY_FORMAT_TRACKER, DAY_FORMAT_HUMAN];

/// A single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from year, month (1-12) and day of month.
    ///
    /// Returns `None` when the triple names no real day.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The current local calendar day.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The underlying chrono date.
    #[must_use]
    pub fn naive(self) -> NaiveDate {
        self.0
    }

    /// Calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month number, 1-12.
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Day of month, 1-31.
    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Day of the week.
    #[must_use]
    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// Full English month name, e.g. `April`.
    #[must_use]
    pub fn month_name(self) -> String {
        self.0.format("%B").to_string()
    }

    /// Shift by `count` calendar days; negative counts move backward.
    ///
    /// Saturates at the first or last day chrono can represent.
    #[must_use]
    pub fn add_days(self, count: i64) -> Self {
        match self.checked_add_days(count) {
            Some(day) => day,
            None if count < 0 => Self(NaiveDate::MIN),
            None => Self(NaiveDate::MAX),
        }
    }

    /// Shift by `count` calendar days, or `None` past the supported calendar.
    #[must_use]
    pub fn checked_add_days(self, count: i64) -> Option<Self> {
        if count == 0 {
            return Some(self);
        }
        let delta = Duration::try_days(count)?;
        self.0.checked_add_signed(delta).map(Self)
    }

    /// Like [`checked_add_days`](Self::checked_add_days), as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DateOutOfRange`] when the shifted day does not exist.
    pub fn try_add_days(self, count: i64) -> Result<Self> {
        self.checked_add_days(count).ok_or_else(|| Error::DateOutOfRange {
            start: self.to_string(),
            days: count,
        })
    }

    /// True on Saturday and Sunday.
    #[must_use]
    pub fn is_weekend(self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Move a weekend day forward to the following Monday.
    ///
    /// Used for start dates. Weekdays are returned unchanged.
    #[must_use]
    pub fn slide_over_weekend(self) -> Self {
        match self.weekday() {
            Weekday::Sat => self.add_days(2),
            Weekday::Sun => self.add_days(1),
            _ => self,
        }
    }

    /// Move a weekend day back to the preceding Friday.
    ///
    /// Used for end dates. Weekdays are returned unchanged.
    #[must_use]
    pub fn slide_before_weekend(self) -> Self {
        match self.weekday() {
            Weekday::Sat => self.add_days(-1),
            Weekday::Sun => self.add_days(-2),
            _ => self,
        }
    }

    /// Same rule as [`slide_before_weekend`](Self::slide_before_weekend):
    /// an end date never lands on a weekend.
    #[must_use]
    pub fn slide_off_weekend(self) -> Self {
        self.slide_before_weekend()
    }

    /// Walk back to the nearest Monday, staying put on a Monday.
    #[must_use]
    pub fn back_to_monday(self) -> Self {
        let mut day = self;
        while day.weekday() != Weekday::Mon {
            day = day.add_days(-1);
        }
        day
    }

    /// Walk forward to the nearest Friday, staying put on a Friday.
    #[must_use]
    pub fn forward_to_friday(self) -> Self {
        let mut day = self;
        while day.weekday() != Weekday::Fri {
            day = day.add_days(1);
        }
        day
    }

    /// Inclusive number of days from `self` to `end`.
    ///
    /// A day counted against itself is 1. Counting is done on whole days,
    /// so there is no intraday offset to round away. The result is zero or
    /// negative when `end` precedes `self`.
    #[must_use]
    pub fn day_count(self, end: Self) -> i64 {
        (end.0 - self.0).num_days() + 1
    }

    /// Rounded number of weeks from `self` to `end`.
    ///
    /// 3.4 weeks is 3, 3.5 is 4, and zero is reported as 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn week_count(self, end: Self) -> i64 {
        let weeks = (self.day_count(end) as f64 / 7.0).round() as i64;
        if weeks == 0 { 1 } else { weeks }
    }

    /// Strictly after `other`.
    #[must_use]
    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    /// Strictly before `other`.
    #[must_use]
    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    /// Tracker wire form, e.g. `2025-04-06`.
    #[must_use]
    pub fn tracker_format(self) -> String {
        self.0.format(DAY_FORMAT_TRACKER).to_string()
    }

    /// Short form for diagnostics: `Apr-06`, or `2025-Apr-06` when the
    /// year is not `today`'s.
    #[must_use]
    pub fn brief(self, today: Self) -> String {
        if self.year() == today.year() {
            self.format("%b-%d")
        } else {
            self.to_string()
        }
    }

    /// Format with an arbitrary chrono format string.
    #[must_use]
    pub fn format(self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }

    /// Parse a date in any of [`ALL_DAY_FORMATS`].
    ///
    /// When nothing matches, the current year is prepended and the formats
    /// are tried again, so `apr-1` means April 1 of this year.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadDate`] when no format matches.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_year(text, Self::today().year())
    }

    /// Like [`parse`](Self::parse), with an explicit fallback year.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadDate`] when no format matches.
    pub fn parse_with_year(text: &str, fallback_year: i32) -> Result<Self> {
        let text = text.trim();
        if let Some(date) = Self::try_formats(text) {
            return Ok(date);
        }
        let with_year = format!("{fallback_year}-{text}");
        if let Some(date) = Self::try_formats(&with_year) {
            debug!(text, year = fallback_year, "Parsed date using fallback year");
            return Ok(date);
        }
        Err(Error::BadDate {
            value: text.to_string(),
            options: date_options(),
        })
    }

    /// Parse a tracker date field where the empty string means "no date".
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadDate`] when non-empty text fails to parse.
    pub fn parse_optional(text: &str) -> Result<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(text).map(Some)
    }

    fn try_formats(text: &str) -> Option<Self> {
        ALL_DAY_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
            .map(Self)
    }
}

/// Accepted date formats as a readable list.
#[must_use]
pub fn date_options() -> String {
    "2006-01-02 or 2006-Jan-02".to_string()
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT_HUMAN))
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn d(text: &str) -> CalendarDate {
        CalendarDate::parse_with_year(text, 2025).unwrap()
    }

    #[rstest]
    #[case::same_day("2020-Mar-18", "2020-Mar-18", 1)]
    #[case::next_day("2020-Mar-18", "2020-Mar-19", 2)]
    #[case::month_boundary("2023-May-31", "2023-Jun-03", 4)]
    #[case::dst_span("2023-Jan-01", "2023-Jun-23", 174)]
    #[case::across_march_dst("2025-Mar-04", "2025-Mar-12", 9)]
    fn test_day_count_inclusive(#[case] start: &str, #[case] end: &str, #[case] expected: i64) {
        assert_eq!(d(start).day_count(d(end)), expected);
    }

    #[rstest]
    #[case::one_day("2025-Apr-21", 1)]
    #[case::partial_week("2025-Apr-25", 1)]
    #[case::full_week("2025-Apr-27", 1)]
    #[case::four_weeks("2025-May-16", 4)]
    #[case::six_weeks("2025-May-31", 6)]
    #[case::rounds_down("2025-Jul-22", 13)]
    #[case::rounds_up("2025-Jul-23", 14)]
    #[case::stays_up("2025-Jul-24", 14)]
    fn test_week_count(#[case] end: &str, #[case] expected: i64) {
        assert_eq!(d("2025-Apr-20").week_count(d(end)), expected);
    }

    #[test]
    fn test_brief_drops_current_year() {
        let today = d("2025-Oct-18");
        assert_eq!(d("2025-Apr-06").brief(today), "Apr-06");
        assert_eq!(d("2024-Dec-30").brief(today), "2024-Dec-30");
    }

    #[test]
    fn test_week_count_same_day_is_one() {
        let day = d("2025-Apr-20");
        assert_eq!(day.week_count(day), 1);
    }

    #[rstest]
    #[case::saturday("2025-Apr-05", "2025-Apr-07")]
    #[case::sunday("2025-Apr-06", "2025-Apr-07")]
    #[case::friday("2025-Apr-04", "2025-Apr-04")]
    #[case::monday("2025-Apr-07", "2025-Apr-07")]
    fn test_slide_over_weekend(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(d(input).slide_over_weekend(), d(expected));
    }

    #[rstest]
    #[case::saturday("2025-Apr-05", "2025-Apr-04")]
    #[case::sunday("2025-Apr-06", "2025-Apr-04")]
    #[case::wednesday("2025-Apr-09", "2025-Apr-09")]
    fn test_slide_before_weekend(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(d(input).slide_before_weekend(), d(expected));
        assert_eq!(d(input).slide_off_weekend(), d(expected));
    }

    #[rstest]
    #[case::monday("2025-Apr-07", "2025-Apr-07")]
    #[case::thursday("2025-Apr-10", "2025-Apr-07")]
    #[case::sunday("2025-Apr-13", "2025-Apr-07")]
    fn test_back_to_monday(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(d(input).back_to_monday(), d(expected));
    }

    #[rstest]
    #[case::friday("2025-Apr-11", "2025-Apr-11")]
    #[case::tuesday("2025-Apr-08", "2025-Apr-11")]
    #[case::saturday("2025-Apr-12", "2025-Apr-18")]
    fn test_forward_to_friday(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(d(input).forward_to_friday(), d(expected));
    }

    #[rstest]
    #[case::tracker("2025-04-06")]
    #[case::human("2025-Apr-06")]
    #[case::human_short_day("2025-Apr-6")]
    #[case::lowercase_month("2025-apr-06")]
    #[case::year_omitted("Apr-06")]
    fn test_parse_formats(#[case] text: &str) {
        let expected = CalendarDate::from_ymd(2025, 4, 6).unwrap();
        assert_eq!(CalendarDate::parse_with_year(text, 2025).unwrap(), expected);
    }

    #[rstest]
    #[case::garbage("not a date")]
    #[case::glued("2Apr-08")]
    #[case::no_such_day("2025-Feb-30")]
    fn test_parse_rejects(#[case] text: &str) {
        let err = CalendarDate::parse_with_year(text, 2025).unwrap_err();
        assert!(matches!(err, Error::BadDate { .. }));
    }

    #[test]
    fn test_parse_optional_empty_is_undefined() {
        assert_eq!(CalendarDate::parse_optional("").unwrap(), None);
        assert_eq!(CalendarDate::parse_optional("   ").unwrap(), None);
        assert!(CalendarDate::parse_optional("2025-04-06").unwrap().is_some());
    }

    #[test]
    fn test_display_and_tracker_format() {
        let day = CalendarDate::from_ymd(2025, 4, 6).unwrap();
        assert_eq!(day.to_string(), "2025-Apr-06");
        assert_eq!(day.tracker_format(), "2025-04-06");
        assert_eq!(day.month_name(), "April");
    }

    #[test]
    fn test_add_zero_days_is_identity() {
        let day = d("2025-Apr-06");
        assert_eq!(day.add_days(0), day);
    }

    #[rstest]
    #[case::far_future(99_999_999_999)]
    #[case::far_past(-99_999_999_999)]
    #[case::beyond_duration(i64::MAX)]
    #[case::beyond_duration_back(i64::MIN)]
    fn test_huge_shifts_do_not_panic(#[case] count: i64) {
        let day = d("2025-Apr-06");
        assert_eq!(day.checked_add_days(count), None);
        assert!(matches!(
            day.try_add_days(count),
            Err(Error::DateOutOfRange { days, .. }) if days == count
        ));
        let saturated = day.add_days(count);
        if count < 0 {
            assert_eq!(saturated.naive(), NaiveDate::MIN);
        } else {
            assert_eq!(saturated.naive(), NaiveDate::MAX);
        }
    }

    #[test]
    fn test_checked_add_days_in_range() {
        let day = d("2025-Apr-06");
        assert_eq!(day.checked_add_days(7), Some(d("2025-Apr-13")));
        assert_eq!(day.try_add_days(-6).unwrap(), d("2025-Mar-31"));
    }

    fn any_date() -> impl Strategy<Value = CalendarDate> {
        (1990i32..2100, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, day)| CalendarDate::from_ymd(y, m, day).unwrap())
    }

    proptest! {
        #[test]
        fn prop_add_days_round_trips(day in any_date(), n in -5000i64..5000) {
            prop_assert_eq!(day.add_days(n).add_days(-n), day);
        }

        #[test]
        fn prop_slide_over_weekend_never_weekend(day in any_date()) {
            let slid = day.slide_over_weekend();
            prop_assert!(!slid.is_weekend());
            if !day.is_weekend() {
                prop_assert_eq!(slid, day);
            }
        }

        #[test]
        fn prop_day_count_monotonic_in_end(day in any_date(), n in 0i64..3000) {
            prop_assert_eq!(day.day_count(day), 1);
            prop_assert!(day.day_count(day.add_days(n + 1)) > day.day_count(day.add_days(n)));
        }

        #[test]
        fn prop_week_count_never_zero(day in any_date(), n in -400i64..400) {
            prop_assert_ne!(day.week_count(day.add_days(n)), 0);
        }
    }
}
