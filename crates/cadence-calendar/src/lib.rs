//! Calendar days, day ranges and fixed-width calendar text.
//!
//! This crate is the date engine behind cadence's schedule repair:
//!
//! - [`CalendarDate`]: a whole calendar day with weekend sliding rules and
//!   inclusive day counting.
//! - [`DayRange`]: an inclusive span of days, built strictly or repaired
//!   from a broken start/end pair (see [`RangeProblem`]).
//! - Rendering: month and day headers plus intersection bars, one column
//!   per business day, for calendar reports.
//!
//! # Example
//!
//! ```
//! use cadence_calendar::{BarStyle, CalendarDate, DayRange};
//!
//! let outer = DayRange::from_pair("2025-Mar-30:2025-Apr-24")?;
//! let inner = DayRange::from_pair("2025-Apr-06:2025-Apr-12")?;
//! let today = CalendarDate::from_ymd(2024, 4, 10).unwrap();
//! assert_eq!(
//!     inner.as_intersect(&outer, today, &BarStyle::plain()),
//!     "│     │-----│     │     │"
//! );
//! # Ok::<(), cadence_calendar::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod date;
pub mod duration;
pub mod error;
pub mod range;
pub mod render;

pub use date::CalendarDate;
pub use duration::parse_day_count;
pub use error::{Error, Result};
pub use range::{DayRange, RangeProblem};
pub use render::BarStyle;
