//! `nsight report`: graph summary plus top actors by degree and betweenness.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use netsight_core::{CentralityEngine, GraphStats, RejectedRow};
use serde::Serialize;

use super::AnalysisArgs;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `nsight report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// How many actors to list per ranking.
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

#[derive(Debug, Serialize)]
pub struct Ranked {
    pub node: String,
    pub score: f64,
}

/// Report payload for `nsight report`.
#[derive(Debug, Serialize)]
pub struct GraphReport {
    pub content_hash: String,
    pub stats: GraphStats,
    pub top_degree: Vec<Ranked>,
    pub top_betweenness: Vec<Ranked>,
    pub rejected: Vec<RejectedRow>,
}

fn ranked(list: Vec<(&str, f64)>) -> Vec<Ranked> {
    list.into_iter()
        .map(|(node, score)| Ranked {
            node: node.to_string(),
            score,
        })
        .collect()
}

/// Execute `nsight report`.
pub fn run_report(args: &ReportArgs, config_path: &Path, output: OutputMode) -> anyhow::Result<()> {
    let (session, loaded) = super::prepare(&args.analysis, config_path, output)?;
    let store = loaded.store;

    let centrality = CentralityEngine::new(session.config().centrality.clone()).compute(&store);

    let report = GraphReport {
        content_hash: store.content_hash().to_string(),
        stats: store.stats(),
        top_degree: ranked(centrality.top_by_degree(args.top)),
        top_betweenness: ranked(centrality.top_by_betweenness(args.top)),
        rejected: loaded.rejected,
    };

    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &GraphReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "nodes {}", report.stats.node_count)?;
    writeln!(w, "edges {}", report.stats.edge_count)?;
    for r in &report.top_degree {
        writeln!(w, "degree {} {:.4}", r.node, r.score)?;
    }
    for r in &report.top_betweenness {
        writeln!(w, "betweenness {} {:.4}", r.node, r.score)?;
    }
    for r in &report.rejected {
        writeln!(w, "rejected {} {}", r.index, r.reason)?;
    }
    Ok(())
}

fn render_pretty(report: &GraphReport, w: &mut dyn Write) -> io::Result<()> {
    let stats = &report.stats;
    pretty_section(w, "Graph")?;
    pretty_kv(w, "Nodes", stats.node_count.to_string())?;
    pretty_kv(w, "Edges", stats.edge_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.3}", stats.density))?;
    pretty_kv(w, "Components", stats.component_count.to_string())?;
    pretty_kv(w, "Isolated", stats.isolated_node_count.to_string())?;
    let relations: Vec<String> = stats
        .relation_counts
        .iter()
        .map(|(r, n)| format!("{r}={n}"))
        .collect();
    pretty_kv(w, "Relations", relations.join(", "))?;
    pretty_kv(w, "Hash", &report.content_hash)?;

    writeln!(w)?;
    pretty_section(w, &format!("Top {} by degree", report.top_degree.len()))?;
    for r in &report.top_degree {
        writeln!(w, "  {:<24} {:.4}", r.node, r.score)?;
    }

    writeln!(w)?;
    pretty_section(
        w,
        &format!("Top {} by betweenness", report.top_betweenness.len()),
    )?;
    for r in &report.top_betweenness {
        writeln!(w, "  {:<24} {:.4}", r.node, r.score)?;
    }

    if !report.rejected.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Skipped rows")?;
        for r in &report.rejected {
            writeln!(w, "  #{:<4} {} ({})", r.index, r.row, r.reason)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsight_core::{EdgeRow, GraphStore};

    fn report() -> GraphReport {
        let store = GraphStore::build(&[
            EdgeRow::new("A", "B", 5.0, "alliance"),
            EdgeRow::new("B", "C", 3.0, "conflict"),
            EdgeRow::new("A", "C", 10.0, "alliance"),
        ])
        .expect("build");
        let centrality = CentralityEngine::default().compute(&store);
        GraphReport {
            content_hash: store.content_hash().to_string(),
            stats: store.stats(),
            top_degree: ranked(centrality.top_by_degree(2)),
            top_betweenness: ranked(centrality.top_by_betweenness(1)),
            rejected: Vec::new(),
        }
    }

    #[test]
    fn text_lists_rankings() {
        let mut buf = Vec::new();
        render_text(&report(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("nodes 3"));
        assert!(text.contains("betweenness B 1.0000"));
        assert_eq!(text.lines().filter(|l| l.starts_with("degree")).count(), 2);
    }

    #[test]
    fn pretty_has_sections() {
        let mut buf = Vec::new();
        render_pretty(&report(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Top 2 by degree"));
        assert!(text.contains("Top 1 by betweenness"));
        assert!(text.contains("alliance=2"));
        assert!(!text.contains("Skipped rows"));
    }
}
