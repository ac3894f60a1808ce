//! Text output for a dependency graph.
//!
//! - [`write_digraph`]: Graphviz `dot` source, one statement per node and
//!   per edge, meant for stdout.
//! - [`report_misordering`], [`report_weekends`], [`repair_weekends`] and
//!   [`report_nodes`]: operator diagnostics, meant for stderr.
//! - [`calendar`]: the fixed-width epic calendar.

pub mod calendar;
pub mod color;

pub use calendar::{CalendarParams, write_calendar};
pub use color::OutputConfig;

use crate::graph::{Graph, Node};
use cadence_calendar::CalendarDate;
use std::io::{self, Write};

const ELLIPSIS: char = '…';
const LABEL_WIDTH: usize = 28;
const PROBLEM_WIDTH: usize = 20;

/// Shorten `text` to at most `size` characters, marking the cut with `…`.
pub fn ellipsis(text: &str, size: usize) -> String {
    if text.chars().count() <= size {
        return text.to_string();
    }
    let mut out: String = text.chars().take(size.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}

// Escape for a double-quoted dot string.
fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn digraph_label(node: &Node, today: CalendarDate) -> String {
    let dates = match node.date_problem() {
        Some(problem) => format!("({})", ellipsis(&problem.to_string(), PROBLEM_WIDTH)),
        None => node.range().pretty_range(today),
    };
    let title = textwrap::wrap(node.title(), LABEL_WIDTH).join("\n");
    let text = format!("{}\n{} {}\n{}", node.key(), dates, node.assignee(), title);
    dot_escape(&text).replace('\n', "\\n")
}

/// Write the graph as Graphviz source.
///
/// Edges are drawn from dependency to dependent, so with `flip == false`
/// work flows top to bottom.
///
/// # Errors
///
/// Fails when `out` cannot be written.
pub fn write_digraph<W: Write>(
    graph: &Graph,
    out: &mut W,
    flip: bool,
    today: CalendarDate,
) -> io::Result<()> {
    writeln!(out, "digraph dependencies {{")?;
    writeln!(out, "  rankdir={};", if flip { "BT" } else { "TB" })?;
    writeln!(out, "  node [shape=ellipse];")?;
    for node in graph.nodes() {
        writeln!(
            out,
            "  \"{}\" [label=\"{}\" style=filled fillcolor={}];",
            node.key(),
            digraph_label(node, today),
            color::dot_fill(node.status())
        )?;
    }
    for edge in graph.edges() {
        writeln!(out, "  \"{}\" -> \"{}\";", edge.dependency, edge.dependent)?;
    }
    writeln!(out, "}}")
}

/// Report every edge whose dependent starts on or before its dependency
/// ends. Returns how many were found.
///
/// # Errors
///
/// Fails when `out` cannot be written.
pub fn report_misordering<W: Write>(
    graph: &Graph,
    out: &mut W,
    today: CalendarDate,
) -> io::Result<usize> {
    let mut count = 0;
    for edge in graph.edges() {
        let (Some(child), Some(parent)) = (graph.node(&edge.dependent), graph.node(&edge.dependency))
        else {
            continue;
        };
        let start = child.start;
        let end = parent.end;
        if start.is_after(end) {
            continue;
        }
        count += 1;
        writeln!(
            out,
            "{:>10} depends on {:>10}, but {} starts on {}, {} days before {} ends on {}.",
            edge.dependent.to_string(),
            edge.dependency.to_string(),
            edge.dependent.number(),
            start.brief(today),
            start.day_count(end),
            edge.dependency.number(),
            end.brief(today),
        )?;
    }
    Ok(count)
}

fn weekend_lines(node: &Node, today: CalendarDate) -> Vec<String> {
    let mut lines = Vec::new();
    if node.start.is_weekend() {
        lines.push(format!(
            "{:>12} starts on a {} ({}), pushing to Mon.",
            node.key().to_string(),
            node.start.format("%A"),
            node.start.brief(today)
        ));
    }
    if node.end.is_weekend() {
        lines.push(format!(
            "{:>12} ends on a {} ({}), pulling to Fri.",
            node.key().to_string(),
            node.end.format("%A"),
            node.end.brief(today)
        ));
    }
    lines
}

/// Report nodes that start or end on a weekend. Returns how many lines
/// were written.
///
/// # Errors
///
/// Fails when `out` cannot be written.
pub fn report_weekends<W: Write>(
    graph: &Graph,
    out: &mut W,
    today: CalendarDate,
) -> io::Result<usize> {
    let mut count = 0;
    for node in graph.nodes() {
        for line in weekend_lines(node, today) {
            writeln!(out, "{line}")?;
            count += 1;
        }
    }
    Ok(count)
}

/// Like [`report_weekends`], and also slide each offending date onto a
/// weekday: starts forward to Monday, ends back to Friday.
///
/// A one-weekend item (Saturday to Sunday) would end before it starts;
/// its end is moved to the Friday after its new start.
///
/// # Errors
///
/// Fails when `out` cannot be written.
pub fn repair_weekends<W: Write>(
    graph: &mut Graph,
    out: &mut W,
    today: CalendarDate,
) -> io::Result<usize> {
    let mut lines = Vec::new();
    graph.for_each_node_mut(|node| {
        lines.extend(weekend_lines(node, today));
        node.start = node.start.slide_over_weekend();
        node.end = node.end.slide_before_weekend();
        if node.end.is_before(node.start) {
            node.end = node.start.forward_to_friday();
        }
    });
    for line in &lines {
        writeln!(out, "{line}")?;
    }
    Ok(lines.len())
}

/// One line per node: dependency and dependent counts, a ROOT, LEAF or
/// isolated marker, and any problem found in the fetched dates.
///
/// # Errors
///
/// Fails when `out` cannot be written.
pub fn report_nodes<W: Write>(graph: &Graph, out: &mut W) -> io::Result<()> {
    for node in graph.nodes() {
        let parents = graph.depends_on(node.key()).len();
        let children = graph.depended_on_by(node.key()).len();
        let kind = match (parents, children) {
            (0, 0) => "Isolated epic!",
            (0, _) => "ROOT",
            (_, 0) => "LEAF",
            _ => "",
        };
        let problem = node.date_problem().map(|p| p.to_string()).unwrap_or_default();
        let line = format!(
            "{:>12} has {parents:>3} parents, {children:>3} children {kind} {problem}",
            node.key().to_string()
        );
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
