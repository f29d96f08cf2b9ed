//! Centrality metrics for the relationship graph.
//!
//! # Overview
//!
//! Each metric answers a different question about an actor's influence:
//!
//! - **Degree centrality** (`degree`): how many direct connections does the
//!   actor have, relative to everyone else in the graph?
//! - **Betweenness centrality** (`betweenness`): how often does the actor
//!   sit on the shortest route between two others (brokerage)?
//!
//! # Usage
//!
//! [`CentralityEngine::compute`] runs both over a [`GraphStore`] and returns a
//! [`CentralityResult`] keyed by node label. Both scores lie in `[0, 1]`.
//!
//! ```rust
//! use netsight_core::centrality::CentralityEngine;
//! use netsight_core::config::CentralityConfig;
//! use netsight_core::graph::{EdgeRow, GraphStore};
//!
//! let store = GraphStore::build(&[
//!     EdgeRow::new("A", "B", 5.0, "alliance"),
//!     EdgeRow::new("B", "C", 3.0, "conflict"),
//!     EdgeRow::new("A", "C", 10.0, "alliance"),
//! ])?;
//!
//! let result = CentralityEngine::new(CentralityConfig::default()).compute(&store);
//! assert!(result["B"].betweenness > 0.0);
//! assert_eq!(result["A"].betweenness, 0.0);
//! # Ok::<(), netsight_core::Error>(())
//! ```

pub mod betweenness;
pub mod degree;

use std::collections::BTreeMap;
use std::ops::Index;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::CentralityConfig;
use crate::graph::GraphStore;

/// Scores for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeCentrality {
    /// Normalized degree, `[0, 1]`.
    pub degree: f64,
    /// Normalized betweenness, `[0, 1]`.
    pub betweenness: f64,
}

/// Per-node centrality, keyed by label.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct CentralityResult {
    scores: BTreeMap<String, NodeCentrality>,
}

impl CentralityResult {
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&NodeCentrality> {
        self.scores.get(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate `(label, scores)` in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeCentrality)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The `n` highest-degree nodes, ties broken by label.
    #[must_use]
    pub fn top_by_degree(&self, n: usize) -> Vec<(&str, f64)> {
        self.top_by(n, |c| c.degree)
    }

    /// The `n` highest-betweenness nodes, ties broken by label.
    #[must_use]
    pub fn top_by_betweenness(&self, n: usize) -> Vec<(&str, f64)> {
        self.top_by(n, |c| c.betweenness)
    }

    fn top_by(&self, n: usize, metric: impl Fn(&NodeCentrality) -> f64) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().map(|(k, c)| (k, metric(c))).collect();
        // Labels iterate in order already; a stable sort keeps that for ties.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl Index<&str> for CentralityResult {
    type Output = NodeCentrality;

    fn index(&self, label: &str) -> &Self::Output {
        &self.scores[label]
    }
}

impl FromIterator<(String, NodeCentrality)> for CentralityResult {
    fn from_iter<I: IntoIterator<Item = (String, NodeCentrality)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Computes degree and betweenness centrality over a [`GraphStore`].
#[derive(Debug, Clone, Default)]
pub struct CentralityEngine {
    config: CentralityConfig,
}

impl CentralityEngine {
    #[must_use]
    pub const fn new(config: CentralityConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CentralityConfig {
        &self.config
    }

    /// Score every node in `store`. An empty store yields an empty result.
    #[must_use]
    #[instrument(skip(self, store), fields(nodes = store.node_count(), weighted = self.config.weighted))]
    pub fn compute(&self, store: &GraphStore) -> CentralityResult {
        let degree = degree::degree_scores(store);
        let betweenness = betweenness::betweenness_scores(store, self.config.weighted);

        let result: CentralityResult = store
            .nodes()
            .zip(degree.into_iter().zip(betweenness))
            .map(|(label, (degree, betweenness))| {
                (
                    label.to_string(),
                    NodeCentrality {
                        degree,
                        betweenness,
                    },
                )
            })
            .collect();

        debug!(scored = result.len(), "centrality computed");
        result
    }
}
