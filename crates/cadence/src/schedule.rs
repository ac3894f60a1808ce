//! Date repair over the dependency graph.
//!
//! Two passes, both depth first with revisits:
//!
//! - [`push_later`] walks from each root towards its dependents and moves
//!   any dependent that starts on or before its dependency's end to the
//!   next business day after that end.
//! - [`tighten`] walks from each leaf towards its dependencies and pulls a
//!   node earlier when its tardiest dependency leaves more than
//!   `slack_days` of gap.
//!
//! A node is revisited once per path that reaches it, so the latest
//! constraint wins under fan-in. Every entry into a node bumps its visit
//! counter; passing `max_visits_per_node` aborts the pass with
//! [`Error::CycleDetected`](crate::Error::CycleDetected).
//!
//! Finished nodes keep their dates. A moved node starts on a weekday and
//! ends its old inclusive day count after the new start, pulled back off
//! any weekend.
//!
//! Both passes use an explicit stack, so a long chain cannot overflow the
//! call stack.

use crate::error::{Error, Result};
use crate::graph::Graph;
use cadence_calendar::duration::MAX_DAY_COUNT;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Largest gap, in days, tolerated between a node and its tardiest
/// dependency before [`tighten`] pulls it in.
pub const DEFAULT_SLACK_DAYS: i64 = 3;

/// Visits allowed per node per pass before a cycle is assumed.
pub const DEFAULT_MAX_VISITS_PER_NODE: u32 = 100;

// Any real gap is smaller.
const GAP_SENTINEL: i64 = 10_000;

/// Knobs for the propagation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SchedulingConfig {
    /// See [`DEFAULT_SLACK_DAYS`].
    pub slack_days: i64,
    /// See [`DEFAULT_MAX_VISITS_PER_NODE`].
    pub max_visits_per_node: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            slack_days: DEFAULT_SLACK_DAYS,
            max_visits_per_node: DEFAULT_MAX_VISITS_PER_NODE,
        }
    }
}

impl SchedulingConfig {
    /// Reject knobs the passes cannot honor.
    ///
    /// Slack below one day would let [`tighten`] start a node on the day
    /// its dependency ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DAY_COUNT).contains(&self.slack_days) {
            return Err(Error::Config(format!(
                "scheduling.slack-days must be between 1 and {MAX_DAY_COUNT}, got {}",
                self.slack_days
            )));
        }
        if self.max_visits_per_node < 1 {
            return Err(Error::Config(
                "scheduling.max-visits-per-node must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Run [`push_later`], then [`tighten`] when asked.
///
/// # Errors
///
/// Propagates [`Error::CycleDetected`](crate::Error::CycleDetected) from
/// either pass.
pub fn repair_dates(graph: &mut Graph, tighten_schedule: bool, config: &SchedulingConfig) -> Result<()> {
    push_later(graph, config)?;
    if tighten_schedule {
        tighten(graph, config)?;
    }
    Ok(())
}

// One DFS frame: a node and the neighbors still to walk.
struct Frame {
    node: NodeIndex,
    next: Vec<NodeIndex>,
    pos: usize,
}

impl Frame {
    fn advance(&mut self) -> Option<NodeIndex> {
        let n = self.next.get(self.pos).copied();
        self.pos += 1;
        n
    }
}

/// Move dependents later so none starts before a dependency ends.
///
/// Walks from every root. Nodes left unvisited afterwards (reachable only
/// through finished nodes, or sitting on a cycle with no root) are walked
/// from as well.
///
/// # Errors
///
/// Returns [`Error::CycleDetected`](crate::Error::CycleDetected) when a node
/// is entered more than `max_visits_per_node` times.
pub fn push_later(graph: &mut Graph, config: &SchedulingConfig) -> Result<()> {
    graph.reset_visits();
    let mut seeds: Vec<NodeIndex> = graph
        .roots()
        .iter()
        .filter_map(|key| graph.index_of(key))
        .collect();
    seeds.extend(graph.indices());

    let mut moves = 0;
    for seed in seeds {
        if graph.at(seed).visit_count() > 0 {
            continue;
        }
        moves += shift_dependents_later(graph, seed, config.max_visits_per_node)?;
    }
    info!(moves, "Pushed dependents later");
    Ok(())
}

fn shift_dependents_later(graph: &mut Graph, start: NodeIndex, max_visits: u32) -> Result<usize> {
    let mut moves = 0;
    graph.record_visit(start, max_visits)?;
    let mut stack = vec![Frame {
        node: start,
        next: graph.dependents_of(start),
        pos: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let parent = frame.node;
        let Some(child) = frame.advance() else {
            stack.pop();
            continue;
        };
        if graph.at(child).is_finished() {
            continue;
        }
        let parent_end = graph.at(parent).end;
        let node = graph.at_mut(child);
        if !node.start.is_after(parent_end) {
            let from = node.start;
            node.move_start(parent_end.add_days(1).slide_over_weekend());
            debug!(
                key = %node.key(),
                dependency_end = %parent_end,
                from = %from,
                to = %node.start,
                "Moving dependent later"
            );
            moves += 1;
        }
        graph.record_visit(child, max_visits)?;
        stack.push(Frame {
            node: child,
            next: graph.dependents_of(child),
            pos: 0,
        });
    }
    Ok(moves)
}

/// Pull nodes earlier so each starts soon after its tardiest dependency.
///
/// Walks from every leaf, then from anything left unvisited.
///
/// # Errors
///
/// Returns [`Error::CycleDetected`](crate::Error::CycleDetected) when a node
/// is entered more than `max_visits_per_node` times.
pub fn tighten(graph: &mut Graph, config: &SchedulingConfig) -> Result<()> {
    graph.reset_visits();
    let mut seeds: Vec<NodeIndex> = graph
        .leaves()
        .iter()
        .filter_map(|key| graph.index_of(key))
        .collect();
    seeds.extend(graph.indices());

    let mut moves = 0;
    for seed in seeds {
        if graph.at(seed).visit_count() > 0 {
            continue;
        }
        moves += shift_earlier(graph, seed, config)?;
    }
    info!(moves, "Tightened schedule");
    Ok(())
}

fn shift_earlier(graph: &mut Graph, start: NodeIndex, config: &SchedulingConfig) -> Result<usize> {
    let mut moves = 0;
    let mut stack = Vec::new();
    enter_for_tighten(graph, start, config, &mut stack, &mut moves)?;

    while let Some(frame) = stack.last_mut() {
        let Some(parent) = frame.advance() else {
            stack.pop();
            continue;
        };
        enter_for_tighten(graph, parent, config, &mut stack, &mut moves)?;
    }
    Ok(moves)
}

fn enter_for_tighten(
    graph: &mut Graph,
    idx: NodeIndex,
    config: &SchedulingConfig,
    stack: &mut Vec<Frame>,
    moves: &mut usize,
) -> Result<()> {
    graph.record_visit(idx, config.max_visits_per_node)?;
    if graph.at(idx).is_finished() {
        return Ok(());
    }
    let parents = graph.dependencies_of(idx);

    let start = graph.at(idx).start;
    let mut min_gap = GAP_SENTINEL;
    let mut tardiest = None;
    for &p in &parents {
        let gap = graph.at(p).end.day_count(start);
        if gap < min_gap {
            min_gap = gap;
            tardiest = Some(p);
        }
    }
    if let Some(p) = tardiest {
        if min_gap > config.slack_days {
            let new_start = graph.at(p).end.add_days(config.slack_days).slide_over_weekend();
            let node = graph.at_mut(idx);
            debug!(key = %node.key(), gap = min_gap, from = %node.start, to = %new_start, "Pulling earlier");
            node.move_start(new_start);
            *moves += 1;
        }
    }

    stack.push(Frame {
        node: idx,
        next: parents,
        pos: 0,
    });
    Ok(())
}
