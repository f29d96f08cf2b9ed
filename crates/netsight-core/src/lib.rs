#![forbid(unsafe_code)]
//! netsight-core library.
//!
//! Builds an undirected, weighted, typed multigraph from flat edge rows and
//! derives two artifacts from it: per-node centrality (degree and weighted
//! betweenness) and a seeded force-directed 2-D layout.
//!
//! ```text
//! EdgeRow[] ──► GraphStore::build ──┬──► CentralityEngine::compute ──┐
//!                                   └──► LayoutEngine::compute ──────┴──► AnalysisResult
//! ```
//!
//! # Conventions
//!
//! - **Errors**: typed [`Error`] for graph construction, layout cancellation
//!   and configuration; `anyhow::Result` at file-loading boundaries.
//! - **Logging**: `tracing` macros (`debug!`, `warn!`) and `#[instrument]` on
//!   engine entry points. No subscriber is installed by the library.

pub mod cancel;
pub mod centrality;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod session;

pub use cancel::CancellationToken;
pub use centrality::{CentralityEngine, CentralityResult, NodeCentrality};
pub use config::{
    AnalysisConfig, CentralityConfig, InvalidRowPolicy, LayoutConfig, SessionConfig, load_config,
};
pub use error::{Error, ErrorCode, InvalidEdgeReason};
pub use graph::{EdgeRecord, EdgeRow, GraphStats, GraphStore, RejectedRow};
pub use layout::{LayoutEngine, LayoutResult, Position};
pub use session::{AnalysisResult, AnalysisSession, Frame, LoadedGraph, SliceFilter, SliceKey};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
