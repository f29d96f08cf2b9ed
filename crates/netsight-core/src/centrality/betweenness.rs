//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. High-betweenness actors are brokers: many
//! connections between others run through them.
//!
//! # Algorithm
//!
//! Brandes (2001), generalised to weighted undirected graphs:
//!
//! 1. For each source node `s`, compute shortest-path distances and path
//!    counts (`sigma`). Weighted mode runs Dijkstra; unweighted mode runs BFS.
//! 2. Accumulate pair dependencies in reverse settle order (farthest nodes
//!    first) through the shortest-path DAG.
//! 3. Sum the per-source dependency vectors in source order.
//!
//! All tied shortest paths are counted, so credit splits fractionally across
//! them. Distances within a relative `1e-9` of each other count as ties.
//!
//! Parallel edges collapse to the cheapest one for traversal. Edge weight is
//! a **distance**: a lower weight sum is a shorter path. Callers whose
//! weights mean "stronger tie" must invert them before building the graph.
//!
//! Complexity: O(V · E log V) weighted, O(V · E) unweighted.
//!
//! # Output
//!
//! Scores are normalized for undirected graphs: the sum over unordered pairs
//! is multiplied by `2 / ((n-1)(n-2))`, giving a value in `[0, 1]`. Graphs
//! with two or fewer nodes score 0 everywhere.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use petgraph::visit::{EdgeRef, IntoNodeIdentifiers, NodeIndexable};
use tracing::instrument;

use crate::graph::GraphStore;

/// Relative tolerance under which two path lengths count as equal.
const TIE_EPSILON: f64 = 1e-9;

/// Compute normalized betweenness centrality for every node.
///
/// With `weighted = false`, every edge has length 1 (hop count).
///
/// # Returns
///
/// A `HashMap<String, f64>` mapping each node label to its score.
/// Disconnected nodes and nodes with no shortest paths through them receive
/// a score of 0.0.
#[must_use]
#[instrument(skip(store), fields(nodes = store.node_count()))]
pub fn betweenness_centrality(store: &GraphStore, weighted: bool) -> HashMap<String, f64> {
    let scores = betweenness_scores(store, weighted);
    store
        .nodes()
        .zip(scores)
        .map(|(label, score)| (label.to_string(), score))
        .collect()
}

/// Normalized betweenness, indexed by node index.
pub(crate) fn betweenness_scores(store: &GraphStore, weighted: bool) -> Vec<f64> {
    let n = store.node_count();
    if n == 0 {
        return Vec::new();
    }
    if n <= 2 {
        return vec![0.0; n];
    }

    let adjacency = collapsed_adjacency(store, weighted);

    // One dependency vector per source, reduced in source order so the
    // floating-point sum is the same however the sources were scheduled.
    #[cfg(feature = "parallel")]
    let partials: Vec<Vec<f64>> = {
        use rayon::prelude::*;
        (0..n)
            .into_par_iter()
            .map(|s| single_source_dependency(&adjacency, s, weighted))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let partials: Vec<Vec<f64>> = (0..n)
        .map(|s| single_source_dependency(&adjacency, s, weighted))
        .collect();

    let mut cb: Vec<f64> = vec![0.0; n];
    for partial in partials {
        for (acc, delta) in cb.iter_mut().zip(partial) {
            *acc += delta;
        }
    }

    // Every unordered pair was counted from both ends, so dividing the
    // ordered sum by (n-1)(n-2) equals 2/((n-1)(n-2)) over unordered pairs.
    let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
    cb.into_iter()
        .map(|raw| (raw * scale).clamp(0.0, 1.0))
        .collect()
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Simple-graph adjacency list: for each node, `(neighbour, length)` with
/// parallel edges collapsed to the minimum weight. Neighbours keep the
/// order in which they were first seen.
fn collapsed_adjacency(store: &GraphStore, weighted: bool) -> Vec<Vec<(usize, f64)>> {
    let g = store.graph();
    let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); g.node_count()];

    for v in g.node_identifiers() {
        let vi = g.to_index(v);
        let mut slots: HashMap<usize, usize> = HashMap::new();

        for e in g.edges(v) {
            let other = if e.source() == v { e.target() } else { e.source() };
            let wi = g.to_index(other);
            let length = if weighted { e.weight().weight } else { 1.0 };

            match slots.get(&wi) {
                Some(&slot) => {
                    let entry = &mut adjacency[vi][slot].1;
                    if length < *entry {
                        *entry = length;
                    }
                }
                None => {
                    slots.insert(wi, adjacency[vi].len());
                    adjacency[vi].push((wi, length));
                }
            }
        }
    }

    adjacency
}

/// Shortest-path DAG rooted at one source.
struct ShortestPaths {
    /// Nodes in non-decreasing distance order (settle order).
    order: Vec<usize>,
    /// `predecessors[w]`: nodes immediately preceding `w` on shortest paths.
    predecessors: Vec<Vec<usize>>,
    /// `sigma[w]`: number of shortest paths from the source to `w`.
    sigma: Vec<f64>,
}

fn single_source_dependency(adjacency: &[Vec<(usize, f64)>], s: usize, weighted: bool) -> Vec<f64> {
    let paths = if weighted {
        dijkstra_paths(adjacency, s)
    } else {
        bfs_paths(adjacency, s)
    };

    let n = adjacency.len();
    let mut delta: Vec<f64> = vec![0.0; n];
    let mut partial: Vec<f64> = vec![0.0; n];

    // Accumulate dependencies in reverse settle order.
    for &w in paths.order.iter().rev() {
        for &v in &paths.predecessors[w] {
            if paths.sigma[w] > 0.0 {
                delta[v] += (paths.sigma[v] / paths.sigma[w]) * (1.0 + delta[w]);
            }
        }
        if w != s {
            partial[w] += delta[w];
        }
    }

    partial
}

fn bfs_paths(adjacency: &[Vec<(usize, f64)>], s: usize) -> ShortestPaths {
    let n = adjacency.len();
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma: Vec<f64> = vec![0.0; n];
    sigma[s] = 1.0;

    // dist[t]: hop distance from s to t (None = unvisited).
    let mut dist: Vec<Option<usize>> = vec![None; n];
    dist[s] = Some(0);

    let mut queue: VecDeque<usize> = VecDeque::new();
    queue.push_back(s);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        let Some(dv) = dist[v] else { continue };

        for &(w, _) in &adjacency[v] {
            // First visit to w?
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }

            // Shortest path to w via v?
            if dist[w] == Some(dv + 1) {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    ShortestPaths {
        order,
        predecessors,
        sigma,
    }
}

/// Min-heap entry keyed on tentative distance, ties broken by node index.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    dist: f64,
    node: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Equal within `TIE_EPSILON * max(|a|, |b|)`. Purely relative, so the
/// verdict does not depend on the unit weights are expressed in.
fn same_length(a: f64, b: f64) -> bool {
    a.is_finite() && b.is_finite() && (a - b).abs() <= TIE_EPSILON * a.abs().max(b.abs())
}

fn dijkstra_paths(adjacency: &[Vec<(usize, f64)>], s: usize) -> ShortestPaths {
    let n = adjacency.len();
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma: Vec<f64> = vec![0.0; n];
    let mut dist: Vec<f64> = vec![f64::INFINITY; n];
    let mut settled: Vec<bool> = vec![false; n];

    sigma[s] = 1.0;
    dist[s] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(Frontier { dist: 0.0, node: s });

    while let Some(Frontier { dist: d, node: v }) = heap.pop() {
        // Stale entry: v was settled through a shorter path already.
        if settled[v] || d > dist[v] {
            continue;
        }
        settled[v] = true;
        order.push(v);

        for &(w, length) in &adjacency[v] {
            if settled[w] {
                continue;
            }
            let candidate = dist[v] + length;

            if same_length(candidate, dist[w]) {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            } else if candidate < dist[w] {
                dist[w] = candidate;
                sigma[w] = sigma[v];
                predecessors[w].clear();
                predecessors[w].push(v);
                heap.push(Frontier {
                    dist: candidate,
                    node: w,
                });
            }
        }
    }

    ShortestPaths {
        order,
        predecessors,
        sigma,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeRow;

    fn make_store(edges: &[(&str, &str, f64)]) -> GraphStore {
        let rows: Vec<EdgeRow> = edges
            .iter()
            .map(|(a, b, w)| EdgeRow::new(*a, *b, *w, "link"))
            .collect();
        GraphStore::build(&rows).expect("build")
    }

    fn unit(edges: &[(&str, &str)]) -> GraphStore {
        let weighted: Vec<(&str, &str, f64)> = edges.iter().map(|(a, b)| (*a, *b, 1.0)).collect();
        make_store(&weighted)
    }

    #[test]
    fn empty_graph_returns_empty() {
        let bc = betweenness_centrality(&unit(&[]), true);
        assert!(bc.is_empty());
    }

    #[test]
    fn pair_has_zero_betweenness() {
        let bc = betweenness_centrality(&unit(&[("A", "B")]), true);
        assert_eq!(bc["A"], 0.0);
        assert_eq!(bc["B"], 0.0);
    }

    #[test]
    fn linear_chain_middle_node_has_betweenness() {
        // A - B - C: B lies on the only A..C path.
        // Unordered pairs through B: 1. Normalized: 1 * 2 / (2 * 1) = 1.0
        let bc = betweenness_centrality(&unit(&[("A", "B"), ("B", "C")]), true);

        assert!((bc["A"] - 0.0).abs() < 1e-10, "A is a leaf");
        assert!((bc["B"] - 1.0).abs() < 1e-10, "B bridges A and C");
        assert!((bc["C"] - 0.0).abs() < 1e-10, "C is a leaf");
    }

    #[test]
    fn star_center_has_full_betweenness() {
        // Every leaf-to-leaf path goes through the hub.
        let bc = betweenness_centrality(&unit(&[("H", "A"), ("H", "B"), ("H", "C")]), true);

        assert!((bc["H"] - 1.0).abs() < 1e-10, "hub = {}", bc["H"]);
        for id in ["A", "B", "C"] {
            assert!(bc[id].abs() < 1e-10, "{id} is a leaf");
        }
    }

    #[test]
    fn four_cycle_splits_credit_evenly() {
        // A-B-C-D-A: each opposite pair has two shortest paths, one through
        // each of the other two nodes. B only sits between A and C, on half
        // of their paths: 0.5 * 2 / (3 * 2) = 1/6.
        let bc = betweenness_centrality(
            &unit(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]),
            true,
        );

        for id in ["A", "B", "C", "D"] {
            assert!(
                (bc[id] - 1.0 / 6.0).abs() < 1e-12,
                "{id} betweenness = {}",
                bc[id]
            );
        }
    }

    #[test]
    fn weights_reroute_shortest_paths() {
        // Direct A-C (10) is longer than A-B-C (5 + 3).
        let g = make_store(&[("A", "B", 5.0), ("B", "C", 3.0), ("A", "C", 10.0)]);
        let bc = betweenness_centrality(&g, true);

        assert!((bc["B"] - 1.0).abs() < 1e-10, "B = {}", bc["B"]);
        assert_eq!(bc["A"], 0.0);
        assert_eq!(bc["C"], 0.0);
    }

    #[test]
    fn unweighted_mode_ignores_weights() {
        let g = make_store(&[("A", "B", 5.0), ("B", "C", 3.0), ("A", "C", 10.0)]);
        let bc = betweenness_centrality(&g, false);

        for id in ["A", "B", "C"] {
            assert!(bc[id].abs() < 1e-10, "{id} = {}", bc[id]);
        }
    }

    #[test]
    fn parallel_edges_use_cheapest_link() {
        // The second A-C record (weight 1) makes the direct hop shortest.
        let g = make_store(&[
            ("A", "B", 5.0),
            ("B", "C", 3.0),
            ("A", "C", 10.0),
            ("C", "A", 1.0),
        ]);
        let bc = betweenness_centrality(&g, true);

        assert!(bc["B"].abs() < 1e-10, "B = {}", bc["B"]);
    }

    #[test]
    fn floating_point_ties_are_detected() {
        // 0.1 + 0.2 != 0.3 in binary floating point, but the two routes from
        // A to D are the same length.
        let g = make_store(&[("A", "B", 0.1), ("B", "D", 0.2), ("A", "D", 0.3)]);
        let paths = dijkstra_paths(&collapsed_adjacency(&g, true), 0);
        let d = g.node_index("D").expect("D").index();
        assert!((paths.sigma[d] - 2.0).abs() < 1e-12, "sigma = {}", paths.sigma[d]);

        // B carries half of the single A..D pair: 0.5 * 2 / (2 * 1) = 0.5
        let bc = betweenness_centrality(&g, true);
        assert!((bc["B"] - 0.5).abs() < 1e-12, "B = {}", bc["B"]);
    }

    #[test]
    fn tie_tolerance_is_scale_free() {
        assert!(same_length(0.1e-12 + 0.2e-12, 0.3e-12));
        assert!(same_length(0.1e12 + 0.2e12, 0.3e12));
        assert!(!same_length(2e-12, 3e-12));

        // Both routes are shorter than 1 but differ by half; only one counts.
        let g = make_store(&[("A", "B", 1e-12), ("B", "D", 1e-12), ("A", "D", 3e-12)]);
        let paths = dijkstra_paths(&collapsed_adjacency(&g, true), 0);
        let d = g.node_index("D").expect("D").index();
        assert_eq!(paths.sigma[d], 1.0);
    }

    #[test]
    fn disconnected_components_no_cross_betweenness() {
        let bc = betweenness_centrality(&unit(&[("A", "B"), ("C", "D")]), true);

        for id in ["A", "B", "C", "D"] {
            assert!(
                (bc[id] - 0.0).abs() < 1e-10,
                "{id} betweenness = 0 in disconnected pairs"
            );
        }
    }

    #[test]
    fn bfs_and_dijkstra_agree_on_unit_weights() {
        let g = unit(&[("A", "B"), ("B", "C"), ("C", "D"), ("B", "E"), ("E", "D"), ("D", "F")]);
        let weighted = betweenness_scores(&g, true);
        let hops = betweenness_scores(&g, false);
        for (w, h) in weighted.iter().zip(&hops) {
            assert!((w - h).abs() < 1e-12, "{w} vs {h}");
        }
    }
}
