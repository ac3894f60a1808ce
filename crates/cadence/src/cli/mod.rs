//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `fix-dates`: Report and repair epic dates that disagree with their blockers
//! - `dot`: Print the epic dependency graph in Graphviz format
//! - `cal`: Draw a calendar of epics in the project
//! - `check`: Validate the epics of the project
//!
//! # Global Flags
//!
//! - `--project`: Project namespace, e.g. `PEACH`
//! - `--source`: Issue snapshot to read and update
//! - `--config`: Config file to use instead of `.cadence/config.yaml`
//!
//! # Example
//!
//! ```bash
//! cadence --project PEACH fix-dates
//! cadence --project PEACH fix-dates --tighten --go
//! cadence --project PEACH dot --flip | dot -Tsvg > epics.svg
//! cadence --project PEACH cal 3m --prev 2w
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

pub use args::{CalArgs, CheckArgs, DotArgs, FixDatesArgs};
pub use execute::{execute_cal, execute_check, execute_dot, execute_fix_dates};
pub use validators::{validate_duration, validate_project};

use crate::app::{App, Overrides};

/// Cadence - keeps epic dates consistent with their blocking dependencies
///
/// Epics are read from a JSONL issue snapshot. Dates are only written back
/// when `fix-dates --go` is given.
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project namespace, e.g. PEACH
    #[arg(long, short = 'p', global = true, value_parser = validate_project)]
    pub project: Option<String>,

    /// Issue snapshot to read and update
    #[arg(long, global = true)]
    pub source: Option<PathBuf>,

    /// Config file to use instead of .cadence/config.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Report and repair epic dates
    ///
    /// Reports epics that start before a blocker ends or sit on a weekend,
    /// then pushes dependents later (and with `--tighten`, pulls them
    /// earlier) until every epic starts after its blockers end. Nothing is
    /// written without `--go`.
    FixDates(FixDatesArgs),

    /// Print the epic dependency graph in Graphviz format
    ///
    /// The graph goes to stdout; date warnings go to stderr.
    Dot(DotArgs),

    /// Draw a calendar of the project's epics
    ///
    /// One row per epic, one column per business day, from `--prev` before
    /// today through DURATION after.
    Cal(CalArgs),

    /// Validate the project's epics
    ///
    /// Checks that every epic can be looked up and has a title and a known
    /// status, then counts the open non-epic issues.
    Check(CheckArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns clap's error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Command-line values that override the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            source: self.source.clone(),
            project: self.project.clone(),
        }
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns the first configuration, snapshot, scheduling or write error.
    pub fn execute(&self) -> Result<()> {
        let mut app = App::load(&self.overrides())?;
        let mut stdout = io::stdout().lock();
        let mut stderr = io::stderr().lock();

        match &self.command {
            Commands::FixDates(args) => execute::execute_fix_dates(&mut app, args, &mut stderr),
            Commands::Dot(args) => execute::execute_dot(&app, args, &mut stdout, &mut stderr),
            Commands::Cal(args) => execute::execute_cal(&app, args, &mut stdout, &mut stderr),
            Commands::Check(args) => execute::execute_check(&app, args, &mut stdout),
        }
    }
}
