//! Dependency graph over epics using petgraph.
//!
//! Nodes are owned by the graph and addressed by [`ItemKey`]. Each
//! [`Edge`] reads "dependent cannot start until dependency finishes".
//! Internally petgraph edges point from **dependent -> dependency**, so:
//!
//! - `Direction::Outgoing` neighbors are a node's dependencies (parents),
//! - `Direction::Incoming` neighbors are its dependents (children).
//!
//! Both adjacency views are derived from the one edge set, so they can
//! never disagree.

pub mod builder;

pub use builder::{GraphBuilder, validate_epics};

use crate::domain::{IssueRecord, IssueStatus, ItemKey};
use crate::error::{Error, Result};
use cadence_calendar::{CalendarDate, DayRange, RangeProblem};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// One epic in the graph.
///
/// Identity, status and title are fixed at construction. Only the dates
/// and the visit counter change, during propagation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    key: ItemKey,
    status: IssueStatus,
    title: String,
    assignee: String,
    /// Working start date; propagation rewrites it.
    pub start: CalendarDate,
    /// Working end date; propagation rewrites it.
    pub end: CalendarDate,
    original_start: Option<CalendarDate>,
    original_end: Option<CalendarDate>,
    date_problem: Option<RangeProblem>,
    visit_count: u32,
}

impl Node {
    /// Snapshot a record into a node.
    ///
    /// The record's dates become the originals. Unparseable date text is
    /// logged and treated as unset. The working dates are the originals
    /// run through [`DayRange::repaired`], and whatever had to be fixed is
    /// kept as [`Node::date_problem`].
    pub fn from_record(record: &IssueRecord, today: CalendarDate) -> Self {
        let original_start = record.start().unwrap_or_else(|e| {
            warn!(key = %record.key, error = %e, "Ignoring malformed start date");
            None
        });
        let original_end = record.end().unwrap_or_else(|e| {
            warn!(key = %record.key, error = %e, "Ignoring malformed end date");
            None
        });
        let (range, date_problem) = DayRange::repaired(original_start, original_end, today);
        Self {
            key: record.key.clone(),
            status: record.status,
            title: record.title.clone(),
            assignee: record.assignee_name().to_string(),
            start: range.start(),
            end: range.end(),
            original_start,
            original_end,
            date_problem,
            visit_count: 0,
        }
    }

    /// Issue key.
    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    /// Workflow status.
    pub fn status(&self) -> IssueStatus {
        self.status
    }

    /// Issue title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Display name of the assignee, empty when unassigned.
    pub fn assignee(&self) -> &str {
        &self.assignee
    }

    /// Start date as fetched; `None` when it was unset or unreadable.
    pub fn original_start(&self) -> Option<CalendarDate> {
        self.original_start
    }

    /// End date as fetched; `None` when it was unset or unreadable.
    pub fn original_end(&self) -> Option<CalendarDate> {
        self.original_end
    }

    /// What was wrong with the fetched dates, if anything.
    pub fn date_problem(&self) -> Option<RangeProblem> {
        self.date_problem
    }

    /// Finished work keeps its dates.
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// True when either working date differs from what was fetched.
    pub fn has_moved(&self) -> bool {
        self.original_start != Some(self.start) || self.original_end != Some(self.end)
    }

    /// The working dates as a range; an inverted pair is swapped.
    pub fn range(&self) -> DayRange {
        DayRange::repaired(Some(self.start), Some(self.end), self.start).0
    }

    /// Inclusive day count of the working dates, at least one.
    pub fn span_days(&self) -> i64 {
        self.start.day_count(self.end).max(1)
    }

    /// Move the node to start on `start`, ending its inclusive day count
    /// later and off the weekend.
    pub fn move_start(&mut self, start: CalendarDate) {
        let span = self.span_days();
        self.start = start;
        self.end = start.add_days(span).slide_before_weekend();
        if self.end.is_before(self.start) {
            self.end = self.start;
        }
    }

    /// Visits recorded during the current propagation pass.
    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }
}

/// A dependency between two epics.
///
/// Edges order by dependent, then dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// The blocked epic.
    pub dependent: ItemKey,
    /// The epic that must finish first.
    pub dependency: ItemKey,
}

impl Edge {
    /// Edge from `dependent` to the `dependency` it waits on.
    pub fn new(dependent: ItemKey, dependency: ItemKey) -> Self {
        Self {
            dependent,
            dependency,
        }
    }
}

/// The epics of one operation and the edges between them.
#[derive(Debug, Clone)]
pub struct Graph {
    graph: DiGraph<Node, ()>,
    node_map: BTreeMap<ItemKey, NodeIndex>,
    edges: BTreeSet<Edge>,
}

impl Graph {
    /// Wrap nodes and edges, deriving adjacency from the edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DanglingEdge`] when an edge names a key with no node.
    pub fn new(nodes: BTreeMap<ItemKey, Node>, edges: BTreeSet<Edge>) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut node_map = BTreeMap::new();
        for (key, node) in nodes {
            let idx = graph.add_node(node);
            node_map.insert(key, idx);
        }
        for edge in &edges {
            let (Some(&from), Some(&to)) =
                (node_map.get(&edge.dependent), node_map.get(&edge.dependency))
            else {
                return Err(Error::DanglingEdge {
                    dependent: edge.dependent.clone(),
                    dependency: edge.dependency.clone(),
                });
            };
            graph.add_edge(from, to, ());
        }
        Ok(Self {
            graph,
            node_map,
            edges,
        })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// True when there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Node for `key`, if present.
    pub fn node(&self, key: &ItemKey) -> Option<&Node> {
        self.node_map.get(key).map(|&idx| &self.graph[idx])
    }

    /// Mutable node for `key`, if present.
    pub fn node_mut(&mut self, key: &ItemKey) -> Option<&mut Node> {
        self.node_map.get(key).map(|&idx| &mut self.graph[idx])
    }

    /// Nodes in key order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_map.values().map(|&idx| &self.graph[idx])
    }

    /// Visit every node mutably, in key order.
    pub fn for_each_node_mut(&mut self, mut f: impl FnMut(&mut Node)) {
        for &idx in self.node_map.values() {
            f(&mut self.graph[idx]);
        }
    }

    /// Edges in (dependent, dependency) order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Direct dependencies of `key`, in key order.
    pub fn depends_on(&self, key: &ItemKey) -> Vec<&Node> {
        self.neighbors_of(key, Direction::Outgoing)
    }

    /// Direct dependents of `key`, in key order.
    pub fn depended_on_by(&self, key: &ItemKey) -> Vec<&Node> {
        self.neighbors_of(key, Direction::Incoming)
    }

    /// Keys of nodes that depend on nothing.
    pub fn roots(&self) -> Vec<ItemKey> {
        self.keys_without(Direction::Outgoing)
    }

    /// Keys of nodes nothing depends on.
    pub fn leaves(&self) -> Vec<ItemKey> {
        self.keys_without(Direction::Incoming)
    }

    fn neighbors_of(&self, key: &ItemKey, dir: Direction) -> Vec<&Node> {
        match self.node_map.get(key) {
            Some(&idx) => self
                .sorted_neighbors(idx, dir)
                .into_iter()
                .map(|n| &self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    fn keys_without(&self, dir: Direction) -> Vec<ItemKey> {
        self.node_map
            .iter()
            .filter(|&(_, &idx)| self.graph.neighbors_directed(idx, dir).next().is_none())
            .map(|(key, _)| key.clone())
            .collect()
    }

    // Index-level access for the propagation passes.

    pub(crate) fn index_of(&self, key: &ItemKey) -> Option<NodeIndex> {
        self.node_map.get(key).copied()
    }

    /// All node indices, in key order.
    pub(crate) fn indices(&self) -> Vec<NodeIndex> {
        self.node_map.values().copied().collect()
    }

    pub(crate) fn at(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    pub(crate) fn at_mut(&mut self, idx: NodeIndex) -> &mut Node {
        &mut self.graph[idx]
    }

    pub(crate) fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Outgoing)
    }

    pub(crate) fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Incoming)
    }

    // petgraph yields neighbors newest-edge first; sort for stable traversal.
    fn sorted_neighbors(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, dir).collect();
        out.sort_by(|a, b| self.graph[*a].key.cmp(&self.graph[*b].key));
        out.dedup();
        out
    }

    pub(crate) fn reset_visits(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.visit_count = 0;
        }
    }

    /// Count a visit to `idx`, failing once the count passes `max_visits`.
    pub(crate) fn record_visit(&mut self, idx: NodeIndex, max_visits: u32) -> Result<()> {
        let node = &mut self.graph[idx];
        node.visit_count += 1;
        if node.visit_count > max_visits {
            return Err(Error::CycleDetected {
                key: node.key.clone(),
                visits: node.visit_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    fn today() -> CalendarDate {
        date(2026, 10, 18)
    }

    fn key(n: u32) -> ItemKey {
        ItemKey::new("PEACH", n)
    }

    fn node(n: u32) -> Node {
        let record = IssueRecord::new(key(n), format!("epic {n}"), IssueStatus::Backlog)
            .epic()
            .with_dates(date(2026, 3, 2), date(2026, 3, 13));
        Node::from_record(&record, today())
    }

    fn graph(count: u32, links: &[(u32, u32)]) -> Graph {
        let nodes = (1..=count).map(|n| (key(n), node(n))).collect();
        let edges = links
            .iter()
            .map(|&(dependent, dependency)| Edge::new(key(dependent), key(dependency)))
            .collect();
        Graph::new(nodes, edges).unwrap()
    }

    #[test]
    fn test_adjacency_is_transposed() {
        // 3 depends on 1 and 2; 4 depends on 3
        let g = graph(4, &[(3, 1), (3, 2), (4, 3)]);

        let parents: Vec<_> = g.depends_on(&key(3)).iter().map(|n| n.key().clone()).collect();
        assert_eq!(parents, [key(1), key(2)]);
        let children: Vec<_> = g.depended_on_by(&key(3)).iter().map(|n| n.key().clone()).collect();
        assert_eq!(children, [key(4)]);

        for edge in g.edges() {
            assert!(g.depends_on(&edge.dependent).iter().any(|n| n.key() == &edge.dependency));
            assert!(g.depended_on_by(&edge.dependency).iter().any(|n| n.key() == &edge.dependent));
        }
    }

    #[test]
    fn test_roots_and_leaves() {
        let g = graph(5, &[(3, 1), (3, 2), (4, 3)]);
        assert_eq!(g.roots(), [key(1), key(2), key(5)]);
        assert_eq!(g.leaves(), [key(4), key(5)]);
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let nodes = BTreeMap::from([(key(1), node(1))]);
        let edges = BTreeSet::from([Edge::new(key(1), key(9))]);
        let err = Graph::new(nodes, edges).unwrap_err();
        assert!(matches!(err, Error::DanglingEdge { dependency, .. } if dependency == key(9)));
    }

    #[test]
    fn test_visit_ceiling() {
        let mut g = graph(1, &[]);
        let idx = g.index_of(&key(1)).unwrap();
        for _ in 0..3 {
            g.record_visit(idx, 3).unwrap();
        }
        let err = g.record_visit(idx, 3).unwrap_err();
        assert!(matches!(err, Error::CycleDetected { visits: 4, .. }));
        g.reset_visits();
        assert_eq!(g.at(idx).visit_count(), 0);
    }

    #[rstest]
    #[case::both_set("2026-03-02", "2026-03-13", None)]
    #[case::no_end("2026-03-02", "", Some(RangeProblem::EndUndefined))]
    #[case::no_start("", "2026-03-13", Some(RangeProblem::StartUndefined))]
    #[case::garbage_start("soon", "2026-03-13", Some(RangeProblem::StartUndefined))]
    #[case::neither("", "", Some(RangeProblem::BothUndefined))]
    fn test_node_dates_are_repaired(
        #[case] start: &str,
        #[case] end: &str,
        #[case] problem: Option<RangeProblem>,
    ) {
        let mut record = IssueRecord::new(key(1), "x", IssueStatus::Backlog);
        record.start_date = start.to_string();
        record.end_date = end.to_string();
        let node = Node::from_record(&record, today());
        assert_eq!(node.date_problem(), problem);
        assert!(node.start.day_count(node.end) >= 1);
        assert_eq!(node.has_moved(), problem.is_some());
    }

    #[test]
    fn test_move_start_adds_day_count() {
        let mut n = node(1);
        // Mon 2026-03-02 .. Fri 2026-03-13 is 12 days
        assert_eq!(n.span_days(), 12);
        // 12 days after Mon 03-09 is a Saturday, pulled back to Friday
        n.move_start(date(2026, 3, 9));
        assert_eq!(n.start, date(2026, 3, 9));
        assert_eq!(n.end, date(2026, 3, 20));
        n.move_start(date(2026, 3, 4));
        assert_eq!(n.end, date(2026, 3, 16));
    }

    #[rstest]
    #[case::week_behind_friday((2026, 3, 11), (2026, 3, 17), (2026, 3, 16), (2026, 3, 23))]
    #[case::short_run((2026, 2, 2), (2026, 2, 4), (2026, 1, 12), (2026, 1, 15))]
    fn test_move_start_end_follows_day_count(
        #[case] from: (i32, u32, u32),
        #[case] to: (i32, u32, u32),
        #[case] start: (i32, u32, u32),
        #[case] end: (i32, u32, u32),
    ) {
        let mut n = node(1);
        n.start = date(from.0, from.1, from.2);
        n.end = date(to.0, to.1, to.2);
        n.move_start(date(start.0, start.1, start.2));
        assert_eq!(n.start, date(start.0, start.1, start.2));
        assert_eq!(n.end, date(end.0, end.1, end.2));
    }
}
