//! Discovering the epics reachable over "blocks" links.
//!
//! Starting from a project's epics, every blocker that is itself an epic
//! is pulled in, depth first, each key expanded once. Epics from other
//! projects become boundary nodes: they are recorded with their dates but
//! their own blockers are not followed.

use super::{Edge, Graph, Node};
use crate::domain::{IssueRecord, IssueStatus, ItemKey};
use crate::error::{Error, Result};
use crate::source::IssueSource;
use cadence_calendar::CalendarDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Builds a [`Graph`] by walking blocks links through an [`IssueSource`].
pub struct GraphBuilder<'a> {
    source: &'a dyn IssueSource,
    project: String,
    today: CalendarDate,
}

impl<'a> GraphBuilder<'a> {
    /// `project` is the namespace in scope; `today` anchors dates that
    /// have to be invented.
    pub fn new(source: &'a dyn IssueSource, project: impl Into<String>, today: CalendarDate) -> Self {
        Self {
            source,
            project: project.into().to_uppercase(),
            today,
        }
    }

    /// Build from all epics the source lists for the project.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::build`].
    pub fn build_project(&self) -> Result<Graph> {
        let epics = self.source.epics_in_project(&self.project)?;
        info!(project = %self.project, epics = epics.len(), "Building dependency graph");
        self.build(&epics)
    }

    /// Build from the given starting epics.
    ///
    /// Each starting epic is fetched again from the source, so its dates
    /// and links are current. Failed blocker lookups are logged and the
    /// link is dropped. Blockers that are not epics are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAnEpic`] when a starting record is not an epic,
    /// [`Error::IssueNotFound`] (or the source's own error) when a starting
    /// epic cannot be fetched again, and [`Error::KeyMismatch`] when the
    /// source answers a lookup with a different issue.
    pub fn build(&self, epics: &[IssueRecord]) -> Result<Graph> {
        let mut nodes = BTreeMap::new();
        let mut edges = BTreeSet::new();
        for epic in epics {
            if !epic.is_epic {
                return Err(Error::NotAnEpic(epic.key.clone()));
            }
            debug!(key = %epic.key, "Considering epic");
            let fetched = self.source.issue(&epic.key)?;
            if fetched.key != epic.key {
                return Err(Error::KeyMismatch {
                    requested: epic.key.clone(),
                    returned: fetched.key,
                });
            }
            if !fetched.is_epic {
                return Err(Error::NotAnEpic(fetched.key));
            }
            self.consider(fetched, &mut nodes, &mut edges)?;
        }
        debug!(nodes = nodes.len(), edges = edges.len(), "Graph discovered");
        Graph::new(nodes, edges)
    }

    fn consider(
        &self,
        epic: IssueRecord,
        nodes: &mut BTreeMap<ItemKey, Node>,
        edges: &mut BTreeSet<Edge>,
    ) -> Result<()> {
        let mut pending = vec![epic];
        while let Some(epic) = pending.pop() {
            if nodes.contains_key(&epic.key) {
                continue;
            }
            nodes.insert(epic.key.clone(), Node::from_record(&epic, self.today));
            if epic.key.namespace() != self.project {
                debug!(key = %epic.key, "Not expanding epic from another project");
                continue;
            }
            // Reversed so the first link is expanded first.
            for link in epic.blocked_by.iter().rev() {
                let blocker = match self.source.issue(&link.blocker) {
                    Ok(blocker) => blocker,
                    Err(e) => {
                        warn!(
                            epic = %epic.key,
                            blocker = %link.blocker,
                            error = %e,
                            "Unable to look up blocker; dropping link"
                        );
                        continue;
                    }
                };
                if blocker.key != link.blocker {
                    return Err(Error::KeyMismatch {
                        requested: link.blocker.clone(),
                        returned: blocker.key,
                    });
                }
                if !blocker.is_epic {
                    debug!(
                        epic = %epic.key,
                        blocker = %blocker.key,
                        status = %blocker.status,
                        "Ignoring blockage by non-epic"
                    );
                    continue;
                }
                edges.insert(Edge::new(epic.key.clone(), blocker.key.clone()));
                pending.push(blocker);
            }
        }
        Ok(())
    }
}

/// Re-check a set of epics against the source before any write.
///
/// Every problem is logged; the first pass collects them all so the
/// operator sees the full list.
///
/// # Errors
///
/// Returns [`Error::Validation`] when any epic cannot be looked up, comes
/// back under a different key, has no title, is not an epic, or has a
/// status that is not recognized.
pub fn validate_epics(source: &dyn IssueSource, epics: &[IssueRecord]) -> Result<()> {
    let mut lookup_errors = 0;
    let mut epic_errors = 0;
    for epic in epics {
        let fetched = match source.issue(&epic.key) {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(key = %epic.key, error = %e, "Could not find epic");
                lookup_errors += 1;
                continue;
            }
        };
        if fetched.key != epic.key {
            warn!(requested = %epic.key, returned = %fetched.key, "Key mismatch");
            lookup_errors += 1;
            continue;
        }
        if fetched.title.trim().is_empty() {
            warn!(key = %fetched.key, "Epic should have a title");
            epic_errors += 1;
        }
        if !fetched.is_epic {
            warn!(key = %fetched.key, "Issue is not an epic");
            epic_errors += 1;
        }
        if fetched.status == IssueStatus::Unknown {
            warn!(key = %fetched.key, "Epic has an unrecognized status");
            epic_errors += 1;
        }
    }
    if lookup_errors > 0 {
        return Err(Error::Validation(format!(
            "{lookup_errors} lookup error(s); fix issue numbers or create placeholder issues"
        )));
    }
    if epic_errors > 0 {
        return Err(Error::Validation(format!(
            "{epic_errors} epic error(s); fix the epics listed above"
        )));
    }
    Ok(())
}
