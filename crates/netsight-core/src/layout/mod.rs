//! Force-directed 2-D layout.
//!
//! # Overview
//!
//! [`LayoutEngine`] places every node of a [`GraphStore`] on the plane with a
//! Fruchterman-Reingold spring model: all pairs repel, edges attract, and a
//! cooling temperature caps how far a node may move per round.
//!
//! ## Determinism
//!
//! Initial positions are drawn from a `StdRng` seeded with
//! [`LayoutConfig::seed`], in node order. The same seed over the same store
//! yields bit-identical coordinates.
//!
//! ## Output
//!
//! Coordinates are centered on their mean and scaled so the largest absolute
//! coordinate is 1. An empty store gives an empty layout; a single node sits
//! at the origin.
//!
//! ```rust
//! use netsight_core::config::LayoutConfig;
//! use netsight_core::graph::{EdgeRow, GraphStore};
//! use netsight_core::layout::LayoutEngine;
//!
//! let store = GraphStore::build(&[EdgeRow::new("A", "B", 1.0, "alliance")])?;
//! let layout = LayoutEngine::new(LayoutConfig::default()).compute(&store);
//! assert_eq!(layout.len(), 2);
//! assert!(layout["A"].x.abs() <= 1.0);
//! # Ok::<(), netsight_core::Error>(())
//! ```

mod spring;

use std::collections::BTreeMap;
use std::ops::Index;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::cancel::CancellationToken;
use crate::config::LayoutConfig;
use crate::error::Error;
use crate::graph::GraphStore;

use spring::{Simulation, Spring};

/// A point on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Node label → position.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct LayoutResult {
    positions: BTreeMap<String, Position>,
}

impl LayoutResult {
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Position> {
        self.positions.get(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Position)> {
        self.positions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the nodes present in `store`, with unchanged coordinates.
    #[must_use]
    pub fn restrict_to(&self, store: &GraphStore) -> Self {
        store
            .nodes()
            .filter_map(|label| {
                self.positions
                    .get(label)
                    .map(|p| (label.to_string(), *p))
            })
            .collect()
    }
}

impl Index<&str> for LayoutResult {
    type Output = Position;

    fn index(&self, label: &str) -> &Self::Output {
        &self.positions[label]
    }
}

impl FromIterator<(String, Position)> for LayoutResult {
    fn from_iter<I: IntoIterator<Item = (String, Position)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Seeded spring-model layout engine.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    #[must_use]
    pub const fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out every node in `store`, running the full round budget (or
    /// until the configured tolerance is met).
    #[must_use]
    #[instrument(skip(self, store), fields(nodes = store.node_count(), seed = self.config.seed))]
    pub fn compute(&self, store: &GraphStore) -> LayoutResult {
        let mut sim = self.simulation(store);
        while !sim.is_done() {
            sim.step();
        }
        debug!(rounds = sim.round(), "layout settled");
        collect(store, sim)
    }

    /// Like [`compute`](Self::compute), but checks `token` before every round.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LayoutCancelled`] with the number of rounds completed
    /// once the token is cancelled. No partial layout is returned.
    #[instrument(skip(self, store, token), fields(nodes = store.node_count(), seed = self.config.seed))]
    pub fn compute_cancellable(
        &self,
        store: &GraphStore,
        token: &CancellationToken,
    ) -> crate::Result<LayoutResult> {
        let mut sim = self.simulation(store);
        loop {
            if token.is_cancelled() {
                debug!(round = sim.round(), "layout cancelled");
                return Err(Error::LayoutCancelled { round: sim.round() });
            }
            if sim.is_done() {
                break;
            }
            sim.step();
        }
        debug!(rounds = sim.round(), "layout settled");
        Ok(collect(store, sim))
    }

    fn simulation(&self, store: &GraphStore) -> Simulation {
        let n = store.node_count();
        let k = self
            .config
            .k
            .unwrap_or_else(|| 1.0 / (n.max(1) as f64).sqrt());

        let springs = store
            .graph()
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = store.graph().edge_endpoints(e)?;
                let strength = if self.config.weighted {
                    store.graph()[e].weight
                } else {
                    1.0
                };
                Some(Spring {
                    a: a.index(),
                    b: b.index(),
                    strength,
                })
            })
            .collect();

        Simulation::new(
            spring::initial_positions(n, self.config.seed),
            springs,
            k,
            self.config.iterations,
            self.config.tolerance,
        )
    }
}

fn collect(store: &GraphStore, sim: Simulation) -> LayoutResult {
    store
        .nodes()
        .zip(sim.into_positions())
        .map(|(label, [x, y])| (label.to_string(), Position { x, y }))
        .collect()
}
