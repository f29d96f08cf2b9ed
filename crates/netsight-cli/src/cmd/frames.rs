//! `nsight timeline` and `nsight relations`: frame sequences.
//!
//! A timeline has one frame per distinct edge time, each over everything
//! stamped up to that time. Relation frames cover one relation type each and
//! share coordinates with the full graph's layout.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use netsight_core::{Frame, RejectedRow};
use serde::Serialize;

use super::AnalysisArgs;
use super::analyze::{write_rows, write_table};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `nsight timeline` / `nsight relations`.
#[derive(Args, Debug)]
pub struct FramesArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Limit the pretty table to the top N nodes by betweenness per frame.
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Timeline,
    Relations,
}

/// Output payload for frame commands.
#[derive(Debug, Serialize)]
pub struct FramesOutput {
    pub frames: Vec<Frame>,
    pub rejected: Vec<RejectedRow>,
    #[serde(skip)]
    top: Option<usize>,
}

/// Execute `nsight timeline` or `nsight relations`.
pub fn run_frames(
    args: &FramesArgs,
    kind: FrameKind,
    config_path: &Path,
    output: OutputMode,
) -> anyhow::Result<()> {
    let (session, loaded) = super::prepare(&args.analysis, config_path, output)?;

    let frames = match kind {
        FrameKind::Timeline => session.timeline_store(&loaded.store),
        FrameKind::Relations => session.by_relation_store(&loaded.store),
    };
    tracing::debug!(frames = frames.len(), ?kind, "frames computed");

    let payload = FramesOutput {
        frames,
        rejected: loaded.rejected,
        top: args.top,
    };
    render_mode(output, &payload, render_text, render_pretty)
}

fn render_text(out: &FramesOutput, w: &mut dyn Write) -> io::Result<()> {
    for frame in &out.frames {
        let prefix = match &frame.key {
            netsight_core::SliceKey::Time(t) => format!("{t} "),
            netsight_core::SliceKey::Relation(r) => format!("{r} "),
        };
        write_rows(w, &prefix, &frame.result)?;
    }
    Ok(())
}

fn render_pretty(out: &FramesOutput, w: &mut dyn Write) -> io::Result<()> {
    if out.frames.is_empty() {
        writeln!(w, "No frames: the graph has no matching edges.")?;
        return Ok(());
    }

    for (i, frame) in out.frames.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        pretty_section(w, &format!("Frame {}: {}", i + 1, frame.key))?;
        pretty_kv(
            w,
            "Graph",
            format!(
                "{} nodes, {} edges, {} components",
                frame.stats.node_count, frame.stats.edge_count, frame.stats.component_count
            ),
        )?;
        if let Some(n) = out.top {
            let leaders: Vec<String> = frame
                .result
                .centrality
                .top_by_betweenness(n)
                .into_iter()
                .map(|(node, score)| format!("{node} ({score:.3})"))
                .collect();
            pretty_kv(w, "Brokers", leaders.join(", "))?;
        } else {
            write_table(w, &frame.result)?;
        }
    }
    Ok(())
}
