//! Edge-predicate sub-views of a [`GraphStore`].
//!
//! A filtered store keeps only the matching edges and the nodes they touch.
//! Declared-but-isolated nodes never survive a filter. Edge order and the
//! relative node order of the parent store are preserved.

use std::collections::HashSet;

use tracing::debug;

use crate::graph::build::{EdgeRecord, GraphStore};

impl GraphStore {
    /// New store containing only edges for which `keep(source, target,
    /// record)` returns `true`. Endpoints are passed in stored order.
    #[must_use]
    pub fn filter(&self, keep: impl Fn(&str, &str, &EdgeRecord) -> bool) -> Self {
        let filtered = Self::from_parts(
            std::iter::empty(),
            self.edges()
                .filter(|(s, t, record)| keep(*s, *t, *record))
                .map(|(s, t, record)| (s, t, record.clone())),
        );
        debug!(
            nodes = filtered.node_count(),
            edges = filtered.edge_count(),
            of_edges = self.edge_count(),
            "filtered graph"
        );
        filtered
    }

    /// The graph as of `time`: edges stamped `<= time`. Unstamped edges are
    /// dropped.
    #[must_use]
    pub fn up_to(&self, time: i64) -> Self {
        self.filter(|_, _, e| e.time.is_some_and(|t| t <= time))
    }

    /// Only edges of relation type `relation`.
    #[must_use]
    pub fn with_relation(&self, relation: &str) -> Self {
        self.filter(|_, _, e| e.relation == relation)
    }

    /// Only edges whose relation type is in `relations`.
    #[must_use]
    pub fn with_relations<S: AsRef<str>>(&self, relations: &[S]) -> Self {
        let wanted: HashSet<&str> = relations.iter().map(|r| r.as_ref()).collect();
        self.filter(|_, _, e| wanted.contains(e.relation.as_str()))
    }
}
