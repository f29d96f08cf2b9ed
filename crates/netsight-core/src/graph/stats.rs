//! Basic summary statistics for a [`GraphStore`].
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: as stored (parallel edges counted).
//! - **linked_pair_count**: distinct unordered node pairs joined by at least
//!   one edge.
//! - **density**: `linked_pair_count / (N * (N - 1) / 2)`, in `[0, 1]`.
//!   Zero for graphs with fewer than two nodes.
//! - **component_count**: connected components (isolated nodes count as one
//!   each).
//! - **isolated_node_count**: nodes without any incident edge.
//! - **max_degree** / **mean_degree**: over raw incident-edge counts.
//! - **relation_counts**: edges per relation type.

use std::collections::{BTreeMap, HashSet};

use petgraph::algo::connected_components;
use petgraph::visit::{EdgeRef, IntoNodeIdentifiers};
use serde::Serialize;

use crate::graph::build::GraphStore;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a relationship graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Distinct unordered pairs with at least one edge between them.
    pub linked_pair_count: usize,
    /// `linked_pair_count / (N * (N - 1) / 2)`. Zero for 0 or 1 node.
    pub density: f64,
    pub component_count: usize,
    pub isolated_node_count: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
    /// Edge count per relation type.
    pub relation_counts: BTreeMap<String, usize>,
}

impl GraphStats {
    /// Compute statistics from a [`GraphStore`].
    #[must_use]
    pub fn from_store(store: &GraphStore) -> Self {
        let g = store.graph();
        let node_count = store.node_count();
        let edge_count = store.edge_count();

        let linked_pair_count = g
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                (a.min(b), a.max(b))
            })
            .collect::<HashSet<_>>()
            .len();

        let degrees: Vec<usize> = g
            .node_identifiers()
            .map(|idx| store.degree_of(idx))
            .collect();

        let mut relation_counts = BTreeMap::new();
        for e in g.edge_weights() {
            *relation_counts.entry(e.relation.clone()).or_insert(0) += 1;
        }

        Self {
            node_count,
            edge_count,
            linked_pair_count,
            density: compute_density(node_count, linked_pair_count),
            component_count: connected_components(g),
            isolated_node_count: degrees.iter().filter(|&&d| d == 0).count(),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            mean_degree: if node_count == 0 {
                0.0
            } else {
                (2 * edge_count) as f64 / node_count as f64
            },
            relation_counts,
        }
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }

    /// Return `true` if every node can reach every other node.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.component_count <= 1
    }
}

impl GraphStore {
    /// Summary statistics for this store.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        GraphStats::from_store(self)
    }
}

fn compute_density(node_count: usize, linked_pairs: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_pairs = (node_count * (node_count - 1) / 2) as f64;
    linked_pairs as f64 / max_pairs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
