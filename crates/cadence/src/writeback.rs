//! Reporting and persisting date changes.

use crate::error::{Error, Result};
use crate::graph::{Graph, Node};
use crate::source::IssueSource;
use cadence_calendar::CalendarDate;
use std::io::Write;
use tracing::{info, warn};

/// Outcome of [`write_dates`].
#[derive(Debug, Default)]
pub struct WriteSummary {
    /// Nodes whose dates differ from what was fetched.
    pub proposed: usize,
    /// Writes the source accepted.
    pub succeeded: usize,
    /// Writes the source rejected.
    pub failed: usize,
    /// The most recent rejection.
    pub last_error: Option<Error>,
}

impl WriteSummary {
    /// `Err` with the last write failure, if there was one.
    ///
    /// # Errors
    ///
    /// Returns the last error recorded while writing.
    pub fn into_result(self) -> Result<()> {
        match self.last_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn show(date: Option<CalendarDate>) -> String {
    date.map_or_else(|| "undefined".to_string(), |d| d.to_string())
}

fn describe(node: &Node, verb: &str) -> String {
    let delta = node
        .original_start()
        .map(|orig| format!(" ({:+} days)", orig.day_count(node.start) - 1))
        .unwrap_or_default();
    format!(
        "{:>12} {verb} from {}:{} to {}:{}{delta}",
        node.key().to_string(),
        show(node.original_start()),
        show(node.original_end()),
        node.start,
        node.end,
    )
}

/// Report every proposed date change to `out` and, when `authorized`,
/// persist each one through `source`.
///
/// A rejected write is logged and counted; the remaining writes are still
/// attempted. Check [`WriteSummary::last_error`] or call
/// [`WriteSummary::into_result`] afterwards.
///
/// # Errors
///
/// Fails only when `out` cannot be written.
pub fn write_dates<W: Write>(
    graph: &Graph,
    source: &mut dyn IssueSource,
    authorized: bool,
    out: &mut W,
) -> Result<WriteSummary> {
    let verb = if authorized { "moves" } else { "could move" };
    let mut summary = WriteSummary::default();

    for node in graph.nodes().filter(|n| n.has_moved()) {
        summary.proposed += 1;
        writeln!(out, "{}", describe(node, verb))?;
        if !authorized {
            continue;
        }
        match source.set_dates(node.key(), node.start, node.end) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                warn!(key = %node.key(), error = %e, "Date write failed");
                summary.failed += 1;
                summary.last_error = Some(e);
            }
        }
    }

    if summary.proposed == 0 {
        writeln!(out, "No changes proposed.")?;
    } else if authorized {
        writeln!(
            out,
            "Succeeded in {} of {} date moves.",
            summary.succeeded, summary.proposed
        )?;
        info!(succeeded = summary.succeeded, failed = summary.failed, "Wrote dates");
    } else {
        writeln!(
            out,
            "\nRerun with --go to move these {} dates.",
            summary.proposed
        )?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueRecord, IssueStatus, ItemKey};
    use crate::graph::GraphBuilder;
    use crate::source::InMemorySource;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    fn key(n: u32) -> ItemKey {
        ItemKey::new("PEACH", n)
    }

    fn source() -> InMemorySource {
        InMemorySource::new()
            .with(
                IssueRecord::new(key(1), "one", IssueStatus::Backlog)
                    .epic()
                    .with_dates(date(2026, 3, 2), date(2026, 3, 6)),
            )
            .with(
                IssueRecord::new(key(2), "two", IssueStatus::Backlog)
                    .epic()
                    .with_dates(date(2026, 3, 9), date(2026, 3, 13)),
            )
    }

    fn graph_with_moves(source: &InMemorySource) -> Graph {
        let mut g = GraphBuilder::new(source, "PEACH", date(2026, 10, 18))
            .build_project()
            .unwrap();
        for k in [key(1), key(2)] {
            let node = g.node_mut(&k).unwrap();
            let start = node.start.add_days(7);
            node.move_start(start);
        }
        g
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let mut s = source();
        let g = graph_with_moves(&s);
        let mut out = Vec::new();

        let summary = write_dates(&g, &mut s, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(summary.proposed, 2);
        assert_eq!(summary.succeeded, 0);
        assert!(text.contains("PEACH-1 could move from 2026-Mar-02:2026-Mar-06 to 2026-Mar-09:2026-Mar-13 (+7 days)"));
        assert!(text.contains("Rerun with --go to move these 2 dates."));
        assert_eq!(s.issue(&key(1)).unwrap().start_date, "2026-03-02");
    }

    #[test]
    fn test_authorized_run_continues_past_failures() {
        let mut s = source();
        let g = graph_with_moves(&s);
        s.fail_write(key(1));
        let mut out = Vec::new();

        let summary = write_dates(&g, &mut s, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(summary.proposed, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert!(text.contains("Succeeded in 1 of 2 date moves."));
        assert_eq!(s.issue(&key(2)).unwrap().start_date, "2026-03-16");
        assert!(matches!(summary.into_result(), Err(Error::WriteFailed { .. })));
    }

    #[test]
    fn test_nothing_to_do() {
        let mut s = source();
        let g = GraphBuilder::new(&s, "PEACH", date(2026, 10, 18))
            .build_project()
            .unwrap();
        let mut out = Vec::new();
        let summary = write_dates(&g, &mut s, true, &mut out).unwrap();
        assert_eq!(summary.proposed, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "No changes proposed.\n");
        summary.into_result().unwrap();
    }
}
