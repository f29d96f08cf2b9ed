//! Analysis orchestration.
//!
//! # Overview
//!
//! An [`AnalysisSession`] turns edge rows into [`AnalysisResult`]s:
//!
//! ```text
//! EdgeRow[] ──► load (InvalidRowPolicy) ──► GraphStore
//!                                              │  SliceFilter?
//!                                              ▼
//!                      CentralityEngine ║ LayoutEngine   (independent)
//!                                              ▼
//!                                       AnalysisResult
//! ```
//!
//! Besides a single snapshot, a session can cut the graph into frames:
//!
//! - [`AnalysisSession::timeline`]: one frame per distinct edge time,
//!   ascending, each over the cumulative graph up to that time. Layout is
//!   recomputed for every frame.
//! - [`AnalysisSession::by_relation`]: one frame per relation type in order
//!   of first appearance. Centrality is computed on each relation's graph;
//!   layout is computed once on the full graph so that frames share
//!   coordinates.
//!
//! With the `parallel` feature the two engines run under `rayon::join` and
//! frames are evaluated on the rayon pool. Frames are always returned in key
//! order.

use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::centrality::{CentralityEngine, CentralityResult};
use crate::config::{AnalysisConfig, InvalidRowPolicy};
use crate::graph::{EdgeRow, GraphStats, GraphStore, RejectedRow};
use crate::layout::{LayoutEngine, LayoutResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Restricts an analysis to part of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceFilter {
    /// Edges with `time <= T`. Edges without a time are dropped.
    UpTo(i64),
    /// Edges whose relation type is in the set.
    Relations(Vec<String>),
}

impl SliceFilter {
    /// Apply the filter, producing a new store.
    #[must_use]
    pub fn apply(&self, store: &GraphStore) -> GraphStore {
        match self {
            Self::UpTo(t) => store.up_to(*t),
            Self::Relations(set) => store.with_relations(set),
        }
    }
}

/// Identifies the slice a [`Frame`] was computed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SliceKey {
    /// Cumulative graph up to and including this time.
    Time(i64),
    /// Edges of one relation type.
    Relation(String),
}

impl fmt::Display for SliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time(t) => write!(f, "up to {t}"),
            Self::Relation(r) => write!(f, "relation {r}"),
        }
    }
}

/// Centrality and layout for one graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisResult {
    pub centrality: CentralityResult,
    pub layout: LayoutResult,
}

/// One slice of a time-sliced or relation-sliced analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub key: SliceKey,
    pub stats: GraphStats,
    pub result: AnalysisResult,
}

/// A built store plus whatever rows were skipped on the way.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub store: GraphStore,
    /// Always empty under [`InvalidRowPolicy::Abort`].
    pub rejected: Vec<RejectedRow>,
}

// ---------------------------------------------------------------------------
// AnalysisSession
// ---------------------------------------------------------------------------

/// Runs the centrality and layout engines over edge rows.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    config: AnalysisConfig,
}

impl AnalysisSession {
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// has out-of-range values.
    pub fn new(config: AnalysisConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Build a store from `rows` according to the invalid-row policy.
    ///
    /// # Errors
    ///
    /// Under [`InvalidRowPolicy::Abort`], returns
    /// [`Error::InvalidEdge`](crate::Error::InvalidEdge) for the first bad row.
    pub fn load(&self, rows: &[EdgeRow]) -> crate::Result<LoadedGraph> {
        match self.config.session.on_invalid {
            InvalidRowPolicy::Abort => Ok(LoadedGraph {
                store: GraphStore::build(rows)?,
                rejected: Vec::new(),
            }),
            InvalidRowPolicy::Skip => {
                let (store, rejected) = GraphStore::build_lenient(rows);
                Ok(LoadedGraph { store, rejected })
            }
        }
    }

    /// Load `rows` and analyse them, optionally restricted by `filter`.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn analyze(
        &self,
        rows: &[EdgeRow],
        filter: Option<&SliceFilter>,
    ) -> crate::Result<AnalysisResult> {
        let loaded = self.load(rows)?;
        Ok(self.analyze_store(&loaded.store, filter))
    }

    /// Analyse an existing store, optionally restricted by `filter`.
    #[must_use]
    #[instrument(skip(self, store), fields(nodes = store.node_count(), edges = store.edge_count()))]
    pub fn analyze_store(&self, store: &GraphStore, filter: Option<&SliceFilter>) -> AnalysisResult {
        match filter {
            Some(f) => {
                let sliced = f.apply(store);
                debug!(nodes = sliced.node_count(), "slice applied");
                self.run_engines(&sliced)
            }
            None => self.run_engines(store),
        }
    }

    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn timeline(&self, rows: &[EdgeRow]) -> crate::Result<Vec<Frame>> {
        let loaded = self.load(rows)?;
        Ok(self.timeline_store(&loaded.store))
    }

    /// One frame per distinct edge time, ascending. Each frame covers every
    /// edge with `time <= T`.
    #[must_use]
    #[instrument(skip(self, store), fields(nodes = store.node_count()))]
    pub fn timeline_store(&self, store: &GraphStore) -> Vec<Frame> {
        let times = store.times();
        debug!(frames = times.len(), "building timeline");

        let frame = |t: &i64| {
            let slice = store.up_to(*t);
            Frame {
                key: SliceKey::Time(*t),
                stats: slice.stats(),
                result: self.run_engines(&slice),
            }
        };

        #[cfg(feature = "parallel")]
        let frames = times.par_iter().map(frame).collect();
        #[cfg(not(feature = "parallel"))]
        let frames = times.iter().map(frame).collect();

        frames
    }

    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn by_relation(&self, rows: &[EdgeRow]) -> crate::Result<Vec<Frame>> {
        let loaded = self.load(rows)?;
        Ok(self.by_relation_store(&loaded.store))
    }

    /// One frame per relation type, in order of first appearance. Every
    /// frame's layout is the full graph's layout restricted to that frame's
    /// nodes.
    #[must_use]
    #[instrument(skip(self, store), fields(nodes = store.node_count()))]
    pub fn by_relation_store(&self, store: &GraphStore) -> Vec<Frame> {
        let relations = store.relation_types();
        debug!(frames = relations.len(), "building relation frames");

        let union_layout = self.layout_engine().compute(store);
        let centrality = self.centrality_engine();

        let frame = |relation: &&str| {
            let slice = store.with_relation(relation);
            Frame {
                key: SliceKey::Relation((*relation).to_string()),
                stats: slice.stats(),
                result: AnalysisResult {
                    centrality: centrality.compute(&slice),
                    layout: union_layout.restrict_to(&slice),
                },
            }
        };

        #[cfg(feature = "parallel")]
        let frames = relations.par_iter().map(frame).collect();
        #[cfg(not(feature = "parallel"))]
        let frames = relations.iter().map(frame).collect();

        frames
    }

    fn centrality_engine(&self) -> CentralityEngine {
        CentralityEngine::new(self.config.centrality.clone())
    }

    fn layout_engine(&self) -> LayoutEngine {
        LayoutEngine::new(self.config.layout.clone())
    }

    fn run_engines(&self, store: &GraphStore) -> AnalysisResult {
        let centrality = self.centrality_engine();
        let layout = self.layout_engine();

        #[cfg(feature = "parallel")]
        let (centrality, layout) =
            rayon::join(|| centrality.compute(store), || layout.compute(store));
        #[cfg(not(feature = "parallel"))]
        let (centrality, layout) = (centrality.compute(store), layout.compute(store));

        AnalysisResult { centrality, layout }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
