//! Command execution logic.
//!
//! Each command writes its primary output to `out` and diagnostics to
//! `diag`; the binary passes stdout and stderr.

use anyhow::Result;
use std::io::Write;
use tracing::info;

use super::args::{CalArgs, CheckArgs, DotArgs, FixDatesArgs};
use crate::app::App;
use crate::graph::{GraphBuilder, validate_epics};
use crate::render::{
    self, CalendarParams, OutputConfig, calendar::{calendar_window, fit_name_size}, color, write_calendar,
};
use crate::schedule;
use crate::writeback::write_dates;

/// Execute the fix-dates command
pub fn execute_fix_dates<W: Write>(app: &mut App, args: &FixDatesArgs, diag: &mut W) -> Result<()> {
    let today = app.today();
    let mut config = app.scheduling();
    if let Some(slack) = args.slack_days {
        config.slack_days = slack;
    }
    if let Some(max) = args.max_visits {
        config.max_visits_per_node = max;
    }

    let mut graph = GraphBuilder::new(app.source(), app.project(), today).build_project()?;
    render::report_nodes(&graph, diag)?;
    render::report_misordering(&graph, diag, today)?;
    render::repair_weekends(&mut graph, diag, today)?;
    schedule::repair_dates(&mut graph, args.tighten, &config)?;

    if args.go {
        let epics = app.source().epics_in_project(app.project())?;
        validate_epics(app.source(), &epics)?;
    }
    let summary = write_dates(&graph, app.source_mut(), args.go, diag)?;
    summary.into_result()?;
    Ok(())
}

/// Execute the dot command
pub fn execute_dot<O: Write, D: Write>(
    app: &App,
    args: &DotArgs,
    out: &mut O,
    diag: &mut D,
) -> Result<()> {
    let today = app.today();
    let graph = GraphBuilder::new(app.source(), app.project(), today).build_project()?;
    render::write_digraph(&graph, out, args.flip, today)?;
    render::report_misordering(&graph, diag, today)?;
    render::report_weekends(&graph, diag, today)?;
    Ok(())
}

/// Execute the cal command
pub fn execute_cal<O: Write, D: Write>(
    app: &App,
    args: &CalArgs,
    out: &mut O,
    diag: &mut D,
) -> Result<()> {
    let today = app.today();
    let epics = app.source().epics_in_project(app.project())?;
    let outer = calendar_window(today, args.duration, args.prev)?;

    let mut params = CalendarParams::new(app.project(), outer);
    params.output = if args.no_color {
        OutputConfig::new(false)
    } else {
        app.output()
    };
    params.show_headers = !args.no_header;
    params.name_size = fit_name_size(args.name_size, &outer);
    params.line_set_size = args.line_set_size;
    params.show_assignee = args.assignee;

    let problems = write_calendar(out, &epics, &params, today)?;
    if !problems.is_empty() {
        for (key, problem) in &problems {
            writeln!(diag, "{key}; {problem}")?;
        }
        writeln!(
            diag,
            "{}",
            color::warning(
                &format!(
                    "detected {} date errors; use the 'fix-dates' command to see and repair them",
                    problems.len()
                ),
                &app.output()
            )
        )?;
    }
    Ok(())
}

/// Execute the check command
pub fn execute_check<O: Write>(app: &App, _args: &CheckArgs, out: &mut O) -> Result<()> {
    let epics = app.source().epics_in_project(app.project())?;
    validate_epics(app.source(), &epics)?;
    let open = app.source().open_issues_in_project(app.project())?;
    info!(epics = epics.len(), open = open.len(), "Checked project");

    writeln!(
        out,
        "{}",
        color::success(
            &format!("{} epics in {} look good.", epics.len(), app.project()),
            &app.output()
        )
    )?;
    writeln!(out, "{} open non-epic issues.", open.len())?;
    Ok(())
}
