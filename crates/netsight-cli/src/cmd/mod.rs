//! Subcommand handlers and the arguments they share.

pub mod analyze;
pub mod frames;
pub mod report;

use std::path::{Path, PathBuf};

use clap::Args;
use netsight_core::{AnalysisConfig, AnalysisSession, ErrorCode, InvalidRowPolicy, LoadedGraph};

use crate::input;
use crate::output::{CliError, OutputMode, render_error};

/// Spring constant used when neither `--k` nor the config file sets one.
pub const DEFAULT_K: f64 = 2.0;

/// Input and engine tuning flags accepted by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// JSON file with an array of edge rows. Use `-` for stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Layout RNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Layout spring constant (node spacing).
    #[arg(long)]
    pub k: Option<f64>,

    /// Layout rounds.
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Count shortest paths in hops and give every spring equal pull.
    #[arg(long)]
    pub unweighted: bool,

    /// Drop invalid rows (with a warning) instead of failing.
    #[arg(long)]
    pub skip_invalid: bool,
}

impl AnalysisArgs {
    /// Layer the flags over a config loaded from file.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(seed) = self.seed {
            config.layout.seed = seed;
        }
        config.layout.k = self.k.or(config.layout.k).or(Some(DEFAULT_K));
        if let Some(iterations) = self.iterations {
            config.layout.iterations = iterations;
        }
        if self.unweighted {
            config.layout.weighted = false;
            config.centrality.weighted = false;
        }
        if self.skip_invalid {
            config.session.on_invalid = InvalidRowPolicy::Skip;
        }
    }
}

/// Render `error` for the user and hand back an error for `main` to return.
pub fn fail(output: OutputMode, error: &CliError) -> anyhow::Error {
    if let Err(e) = render_error(output, error) {
        return e;
    }
    anyhow::anyhow!("{}", error.message)
}

/// Load config, apply flags, read the rows and build the graph.
pub fn prepare(
    args: &AnalysisArgs,
    config_path: &Path,
    output: OutputMode,
) -> anyhow::Result<(AnalysisSession, LoadedGraph)> {
    let mut config = netsight_core::load_config(config_path).map_err(|e| {
        let code = e
            .downcast_ref::<netsight_core::Error>()
            .map_or(ErrorCode::ConfigParseError, netsight_core::Error::code);
        fail(output, &CliError::coded(format!("{e:#}"), code))
    })?;
    args.apply(&mut config);

    let session = AnalysisSession::new(config).map_err(|e| fail(output, &CliError::from(&e)))?;

    let rows = input::read_rows(&args.input)
        .map_err(|e| fail(output, &CliError::coded(format!("{e:#}"), ErrorCode::InputParseError)))?;

    let loaded = session
        .load(&rows)
        .map_err(|e| fail(output, &CliError::from(&e)))?;

    tracing::info!(
        nodes = loaded.store.node_count(),
        edges = loaded.store.edge_count(),
        rejected = loaded.rejected.len(),
        "graph loaded"
    );
    Ok((session, loaded))
}
