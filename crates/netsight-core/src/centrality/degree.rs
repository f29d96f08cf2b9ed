//! Degree centrality.
//!
//! `degree(v) / (N - 1)`, where `degree(v)` counts incident edge records
//! (parallel edges count once each) and `N` is the node count. Weights play
//! no part. Graphs with one node or none score 0.
//!
//! Parallel edges can push a raw degree above `N - 1`; the normalized score
//! is capped at 1.0.

use std::collections::HashMap;

use petgraph::visit::IntoNodeIdentifiers;

use crate::graph::GraphStore;

/// Compute degree centrality for every node, keyed by label.
#[must_use]
pub fn degree_centrality(store: &GraphStore) -> HashMap<String, f64> {
    store
        .nodes()
        .zip(degree_scores(store))
        .map(|(label, score)| (label.to_string(), score))
        .collect()
}

/// Normalized degree, indexed by node index.
pub(crate) fn degree_scores(store: &GraphStore) -> Vec<f64> {
    let n = store.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }

    let denom = (n - 1) as f64;
    store
        .graph()
        .node_identifiers()
        .map(|idx| (store.degree_of(idx) as f64 / denom).min(1.0))
        .collect()
}
