//! `nsight analyze`: per-node centrality and layout coordinates.
//!
//! - `nsight analyze edges.json`: the whole graph
//! - `nsight analyze edges.json --up-to 2010`: edges stamped at or before 2010
//! - `nsight analyze edges.json --relation alliance --relation command`

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use netsight_core::{AnalysisResult, GraphStats, RejectedRow, SliceFilter};
use serde::Serialize;

use super::AnalysisArgs;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `nsight analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Only use edges with `time <= T`.
    #[arg(long, value_name = "T", conflicts_with = "relation")]
    pub up_to: Option<i64>,

    /// Only use edges of this relation type (repeatable).
    #[arg(long, value_name = "TYPE")]
    pub relation: Vec<String>,
}

impl AnalyzeArgs {
    fn filter(&self) -> Option<SliceFilter> {
        if let Some(t) = self.up_to {
            return Some(SliceFilter::UpTo(t));
        }
        if self.relation.is_empty() {
            None
        } else {
            Some(SliceFilter::Relations(self.relation.clone()))
        }
    }
}

/// Output payload for `nsight analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub content_hash: String,
    pub stats: GraphStats,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub rejected: Vec<RejectedRow>,
}

/// Execute `nsight analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
    config_path: &Path,
    output: OutputMode,
) -> anyhow::Result<()> {
    let (session, loaded) = super::prepare(&args.analysis, config_path, output)?;

    let filter = args.filter();
    let sliced = filter.as_ref().map(|f| f.apply(&loaded.store));
    let store = sliced.as_ref().unwrap_or(&loaded.store);

    let payload = AnalyzeOutput {
        content_hash: store.content_hash().to_string(),
        stats: store.stats(),
        result: session.analyze_store(store, None),
        rejected: loaded.rejected,
    };

    render_mode(output, &payload, render_text, render_pretty)
}

/// One `label degree betweenness x y` row per node.
pub fn write_rows(w: &mut dyn Write, prefix: &str, result: &AnalysisResult) -> io::Result<()> {
    for (label, c) in result.centrality.iter() {
        write!(w, "{prefix}{label} {:.6} {:.6}", c.degree, c.betweenness)?;
        match result.layout.get(label) {
            Some(p) => writeln!(w, " {:.6} {:.6}", p.x, p.y)?,
            None => writeln!(w)?,
        }
    }
    Ok(())
}

fn render_text(out: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    write_rows(w, "", &out.result)
}

fn render_pretty(out: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Graph")?;
    pretty_kv(w, "Nodes", out.stats.node_count.to_string())?;
    pretty_kv(w, "Edges", out.stats.edge_count.to_string())?;
    if !out.rejected.is_empty() {
        pretty_kv(w, "Skipped rows", out.rejected.len().to_string())?;
    }
    writeln!(w)?;
    write_table(w, &out.result)
}

/// Aligned node table shared with the frame commands.
pub fn write_table(w: &mut dyn Write, result: &AnalysisResult) -> io::Result<()> {
    writeln!(
        w,
        "  {:<20} {:>8} {:>12} {:>8} {:>8}",
        "NODE", "DEGREE", "BETWEENNESS", "X", "Y"
    )?;
    for (label, c) in result.centrality.iter() {
        let (x, y) = result.layout.get(label).map_or((0.0, 0.0), |p| (p.x, p.y));
        writeln!(
            w,
            "  {label:<20} {:>8.4} {:>12.4} {x:>8.3} {y:>8.3}",
            c.degree, c.betweenness
        )?;
    }
    Ok(())
}
