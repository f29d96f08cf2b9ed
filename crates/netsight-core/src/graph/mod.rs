//! Relationship graph module.
//!
//! # Overview
//!
//! This module owns the canonical in-memory graph every analysis runs over:
//! an undirected multigraph of labelled actors joined by weighted, typed
//! (and optionally time-stamped) edges.
//!
//! ## Pipeline
//!
//! ```text
//! EdgeRow[]
//!        ↓  build::GraphStore::build() / build_lenient()
//! GraphStore (immutable)
//!        ↓  filter::GraphStore::{filter, up_to, with_relation}()
//! GraphStore (slice: only matching edges and the nodes they touch)
//!        ↓  stats::GraphStats::from_store()
//! GraphStats (density, components, max degree, …)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use netsight_core::graph::{EdgeRow, GraphStore};
//!
//! let store = GraphStore::build(&[
//!     EdgeRow::new("A", "B", 5.0, "alliance").at(2008),
//!     EdgeRow::new("B", "C", 3.0, "conflict").at(2010),
//! ])?;
//!
//! let as_of_2008 = store.up_to(2008);
//! assert_eq!(as_of_2008.edge_count(), 1);
//! assert_eq!(store.stats().component_count, 1);
//! # Ok::<(), netsight_core::Error>(())
//! ```

pub mod build;
pub mod filter;
pub mod stats;

pub use build::{EdgeRecord, EdgeRow, GraphStore, RejectedRow};
pub use stats::GraphStats;
