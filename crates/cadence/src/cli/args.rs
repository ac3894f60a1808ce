//! CLI argument structs for all commands.

use cadence_calendar::duration::MAX_DAY_COUNT;
use clap::Parser;

use super::validators::validate_duration;
use crate::render::calendar::{DEFAULT_LINE_SET_SIZE, DEFAULT_NAME_SIZE};

/// Arguments for the `fix-dates` command
#[derive(Parser, Debug, Clone, Default)]
pub struct FixDatesArgs {
    /// Also pull epics earlier to close gaps after their tardiest dependency
    #[arg(long)]
    pub tighten: bool,

    /// Actually write the new dates, rather than just report them
    #[arg(long = "go")]
    pub go: bool,

    /// Largest acceptable gap in days before tightening moves an epic
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_DAY_COUNT))]
    pub slack_days: Option<i64>,

    /// Visits per epic before a dependency cycle is assumed
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_visits: Option<u32>,
}

/// Arguments for the `dot` command
#[derive(Parser, Debug, Clone, Default)]
pub struct DotArgs {
    /// Flip the diagram so the end goal is at the top
    #[arg(long)]
    pub flip: bool,
}

/// Arguments for the `cal` command
#[derive(Parser, Debug, Clone)]
pub struct CalArgs {
    /// How far ahead to show: e.g. 6m, 24w, 180d, or a bare number of weeks
    #[arg(default_value = "5m", value_parser = validate_duration)]
    pub duration: i64,

    /// How far back to show, in the same units as DURATION
    #[arg(long, default_value = "1m", value_parser = validate_duration)]
    pub prev: i64,

    /// Draw plain bars even when colors are available
    #[arg(long)]
    pub no_color: bool,

    /// Omit the month and day header rows
    #[arg(long)]
    pub no_header: bool,

    /// Width of the title column
    #[arg(long, default_value_t = DEFAULT_NAME_SIZE)]
    pub name_size: usize,

    /// Rows per group, separated by blank lines
    #[arg(long, default_value_t = DEFAULT_LINE_SET_SIZE)]
    pub line_set_size: usize,

    /// Spell each colored bar with the assignee's name
    #[arg(long)]
    pub assignee: bool,
}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone, Default)]
pub struct CheckArgs {}
