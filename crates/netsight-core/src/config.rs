//! Analysis configuration.
//!
//! Every section and field has a default, so an empty (or missing) TOML file
//! yields [`AnalysisConfig::default`]:
//!
//! ```toml
//! [layout]
//! seed = 42
//! k = 2.0
//! iterations = 50
//! weighted = true
//! # tolerance = 1e-4
//!
//! [centrality]
//! weighted = true
//!
//! [session]
//! on_invalid = "abort"   # or "skip"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub centrality: CentralityConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AnalysisConfig {
    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first bad value.
    pub fn validate(&self) -> crate::Result<()> {
        self.layout.validate()
    }
}

/// Force-directed layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// RNG seed for the initial placement. Same seed and same graph give
    /// bit-identical positions.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Characteristic spacing between nodes. `None` uses `1 / sqrt(N)`.
    #[serde(default)]
    pub k: Option<f64>,
    /// Number of simulation rounds.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Scale the spring pull along an edge by its weight. Heavier edges pull
    /// harder in the layout (unlike betweenness, where weight is a distance).
    #[serde(default = "default_true")]
    pub weighted: bool,
    /// Stop early once no node moves further than this in a round.
    /// `None` always runs the full iteration budget.
    #[serde(default)]
    pub tolerance: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            k: None,
            iterations: default_iterations(),
            weighted: default_true(),
            tolerance: None,
        }
    }
}

impl LayoutConfig {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `k` is not a positive finite number or
    /// `tolerance` is negative or not finite.
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(k) = self.k.filter(|k| !k.is_finite() || *k <= 0.0) {
            return Err(Error::Config(format!("layout.k must be > 0, got {k}")));
        }
        if let Some(tol) = self.tolerance.filter(|t| !t.is_finite() || *t < 0.0) {
            return Err(Error::Config(format!(
                "layout.tolerance must be >= 0, got {tol}"
            )));
        }
        Ok(())
    }
}

/// Centrality parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralityConfig {
    /// Use edge weights as path lengths for betweenness. When `false`,
    /// shortest paths are counted in hops.
    #[serde(default = "default_true")]
    pub weighted: bool,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            weighted: default_true(),
        }
    }
}

/// What to do with rows that violate the edge invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRowPolicy {
    /// Fail the whole analysis on the first bad row.
    #[default]
    Abort,
    /// Drop bad rows, log them, and analyse the rest.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub on_invalid: InvalidRowPolicy,
}

const fn default_true() -> bool {
    true
}

const fn default_seed() -> u64 {
    42
}

const fn default_iterations() -> usize {
    50
}

/// Load an [`AnalysisConfig`] from a TOML file. A missing file yields the
/// defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed, or
/// validated.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<AnalysisConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("Invalid values in {}", path.display()))?;

    Ok(config)
}
