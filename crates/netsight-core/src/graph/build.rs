//! Graph construction from flat edge rows.
//!
//! # Overview
//!
//! A [`GraphStore`] is an undirected multigraph backed by a [`petgraph`]
//! `UnGraph`. It is built once from a sequence of [`EdgeRow`]s and never
//! mutated afterwards; sub-views are produced by
//! [`GraphStore::filter`](crate::graph::GraphStore::filter), which builds a
//! fresh store.
//!
//! ## Edge Rows
//!
//! Each row is `(source, target, weight, type, time?)`. Rows are validated
//! before anything is inserted:
//!
//! - `source != target` (no self-loops);
//! - `weight` is finite and strictly positive;
//! - neither label is blank.
//!
//! Parallel edges between the same pair are kept as distinct records, even
//! when they share a relation type.
//!
//! ## Node Order
//!
//! Nodes are indexed in order of first appearance (source before target,
//! row by row). Every query iterates in that order, which keeps downstream
//! results such as the seeded layout reproducible.
//!
//! ## Cache Invalidation
//!
//! The store carries a BLAKE3 hash of its edge list. Callers that cache
//! analysis results can key them on [`GraphStore::content_hash`].

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::error::{Error, InvalidEdgeReason};

// ---------------------------------------------------------------------------
// Input / edge types
// ---------------------------------------------------------------------------

/// One raw input row.
///
/// The relation column is called `type` on the wire (`relation` is accepted
/// too) and the time column may be called `time` or `year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub source: String,
    pub target: String,
    /// Distance-like weight. Must be `> 0`.
    pub weight: f64,
    #[serde(rename = "type", alias = "relation")]
    pub relation: String,
    #[serde(default, alias = "year", skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

impl EdgeRow {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        weight: f64,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            relation: relation.into(),
            time: None,
        }
    }

    /// Attach a time stamp (e.g. a year) to the row.
    #[must_use]
    pub fn at(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    /// Check the row against the edge invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated [`InvalidEdgeReason`].
    pub fn validate(&self) -> Result<(), InvalidEdgeReason> {
        if self.source.trim().is_empty() || self.target.trim().is_empty() {
            return Err(InvalidEdgeReason::EmptyLabel);
        }
        if self.source == self.target {
            return Err(InvalidEdgeReason::SelfLoop);
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(InvalidEdgeReason::NonPositiveWeight(self.weight));
        }
        Ok(())
    }
}

impl fmt::Display for EdgeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -- {} [{}, w={}]",
            self.source, self.target, self.relation, self.weight
        )?;
        if let Some(t) = self.time {
            write!(f, " @{t}")?;
        }
        Ok(())
    }
}

/// Edge payload stored in the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub weight: f64,
    pub relation: String,
    pub time: Option<i64>,
}

impl From<&EdgeRow> for EdgeRecord {
    fn from(row: &EdgeRow) -> Self {
        Self {
            weight: row.weight,
            relation: row.relation.clone(),
            time: row.time,
        }
    }
}

/// A row refused by [`GraphStore::build_lenient`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    /// Zero-based position in the input sequence.
    pub index: usize,
    pub row: EdgeRow,
    pub reason: InvalidEdgeReason,
}

impl From<RejectedRow> for Error {
    fn from(r: RejectedRow) -> Self {
        Self::InvalidEdge {
            index: r.index,
            row: r.row,
            reason: r.reason,
        }
    }
}

// ---------------------------------------------------------------------------
// GraphStore
// ---------------------------------------------------------------------------

/// Immutable undirected multigraph of labelled nodes and weighted, typed edges.
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: UnGraph<String, EdgeRecord>,
    node_map: HashMap<String, NodeIndex>,
    content_hash: String,
}

impl GraphStore {
    /// Build a store from `rows`, failing on the first invalid row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEdge`] naming the offending row's index and
    /// content. Nothing is built in that case.
    #[instrument(skip(rows), fields(rows = rows.len()))]
    pub fn build(rows: &[EdgeRow]) -> crate::Result<Self> {
        Self::build_with_nodes::<&str>(&[], rows)
    }

    /// Build a store that also contains `nodes`, whether or not any row
    /// touches them. Declared nodes come first in node order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEdge`] on the first invalid row.
    pub fn build_with_nodes<S: AsRef<str>>(nodes: &[S], rows: &[EdgeRow]) -> crate::Result<Self> {
        for (index, row) in rows.iter().enumerate() {
            if let Err(reason) = row.validate() {
                return Err(Error::InvalidEdge {
                    index,
                    row: row.clone(),
                    reason,
                });
            }
        }

        Ok(Self::from_parts(
            nodes.iter().map(|n| n.as_ref()),
            rows.iter()
                .map(|r| (r.source.as_str(), r.target.as_str(), EdgeRecord::from(r))),
        ))
    }

    /// Build a store from every valid row, returning the refused rows
    /// alongside it instead of failing.
    #[must_use]
    #[instrument(skip(rows), fields(rows = rows.len()))]
    pub fn build_lenient(rows: &[EdgeRow]) -> (Self, Vec<RejectedRow>) {
        let mut rejected = Vec::new();
        let mut accepted = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            match row.validate() {
                Ok(()) => accepted.push(row),
                Err(reason) => {
                    warn!(index, %row, %reason, "skipping invalid edge row");
                    rejected.push(RejectedRow {
                        index,
                        row: row.clone(),
                        reason,
                    });
                }
            }
        }

        let store = Self::from_parts(
            std::iter::empty(),
            accepted
                .into_iter()
                .map(|r| (r.source.as_str(), r.target.as_str(), EdgeRecord::from(r))),
        );
        (store, rejected)
    }

    /// Assemble a store from pre-validated parts.
    pub(crate) fn from_parts<'a>(
        nodes: impl IntoIterator<Item = &'a str>,
        edges: impl IntoIterator<Item = (&'a str, &'a str, EdgeRecord)>,
    ) -> Self {
        let mut graph = UnGraph::<String, EdgeRecord>::default();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
        let mut hasher = blake3::Hasher::new();

        for label in nodes {
            intern(&mut graph, &mut node_map, label);
        }

        for (source, target, record) in edges {
            let a = intern(&mut graph, &mut node_map, source);
            let b = intern(&mut graph, &mut node_map, target);
            hash_edge(&mut hasher, source, target, &record);
            graph.add_edge(a, b, record);
        }

        Self {
            graph,
            node_map,
            content_hash: format!("blake3:{}", hasher.finalize()),
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edge records (parallel edges counted individually).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node labels in node order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Edges as `(source, target, record)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeRecord)> {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()].as_str(),
                self.graph[e.target()].as_str(),
                e.weight(),
            )
        })
    }

    #[must_use]
    pub fn contains_node(&self, label: &str) -> bool {
        self.node_map.contains_key(label)
    }

    /// Look up the `NodeIndex` for a label.
    #[must_use]
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.node_map.get(label).copied()
    }

    /// Return the label of a node.
    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Distinct neighbours of `label`, in order of first encounter.
    /// Unknown labels have no neighbours.
    #[must_use]
    pub fn neighbors(&self, label: &str) -> Vec<&str> {
        let Some(idx) = self.node_index(label) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        self.graph
            .neighbors(idx)
            .filter(|other| seen.insert(*other))
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Number of incident edge records (multi-edges counted individually).
    #[must_use]
    pub fn degree(&self, label: &str) -> usize {
        self.node_index(label)
            .map_or(0, |idx| self.degree_of(idx))
    }

    pub(crate) fn degree_of(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }

    /// Relation types in order of first appearance.
    #[must_use]
    pub fn relation_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for e in self.graph.edge_weights() {
            if !types.contains(&e.relation.as_str()) {
                types.push(e.relation.as_str());
            }
        }
        types
    }

    /// Distinct edge times, ascending. Edges without a time are ignored.
    #[must_use]
    pub fn times(&self) -> Vec<i64> {
        let mut times: Vec<i64> = self.graph.edge_weights().filter_map(|e| e.time).collect();
        times.sort_unstable();
        times.dedup();
        times
    }

    /// BLAKE3 content hash of the edge list.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Underlying petgraph graph, for read-only traversal.
    #[must_use]
    pub const fn graph(&self) -> &UnGraph<String, EdgeRecord> {
        &self.graph
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn intern(
    graph: &mut UnGraph<String, EdgeRecord>,
    node_map: &mut HashMap<String, NodeIndex>,
    label: &str,
) -> NodeIndex {
    if let Some(&idx) = node_map.get(label) {
        return idx;
    }
    let idx = graph.add_node(label.to_string());
    node_map.insert(label.to_string(), idx);
    idx
}

fn hash_edge(hasher: &mut blake3::Hasher, source: &str, target: &str, record: &EdgeRecord) {
    hasher.update(source.as_bytes());
    hasher.update(b"\x00");
    hasher.update(target.as_bytes());
    hasher.update(b"\x00");
    hasher.update(&record.weight.to_bits().to_le_bytes());
    hasher.update(record.relation.as_bytes());
    hasher.update(b"\x00");
    if let Some(t) = record.time {
        hasher.update(&t.to_le_bytes());
    }
    hasher.update(b"\x01");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
