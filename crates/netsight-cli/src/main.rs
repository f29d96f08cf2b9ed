#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cmd::frames::FrameKind;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "nsight: centrality and layout for weighted relationship graphs",
    long_about = None
)]
struct Cli {
    /// Output format. Defaults to pretty on a terminal and text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// TOML config file with [layout], [centrality] and [session] tables.
    #[arg(long, global = true, value_name = "PATH", default_value = "netsight.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Summarize a graph and rank its actors",
        long_about = "Print node and edge counts, graph statistics, and the top actors by degree and by betweenness centrality.",
        after_help = "EXAMPLES:\n    # Top 5 actors by degree and betweenness\n    nsight report edges.json\n\n    # Top 10, reading rows from stdin\n    cat edges.json | nsight report - --top 10"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        about = "Compute centrality and layout for every node",
        long_about = "Compute degree centrality, weighted betweenness centrality and a seeded force-directed layout for every node, optionally restricted to a time or relation slice.",
        after_help = "EXAMPLES:\n    # Whole graph, JSON output\n    nsight analyze edges.json --format json\n\n    # Cumulative graph up to 2010\n    nsight analyze edges.json --up-to 2010\n\n    # Only alliance and command edges, hop-count paths\n    nsight analyze edges.json --relation alliance --relation command --unweighted"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Analyze the graph as it grows over time",
        long_about = "Emit one frame per distinct edge time, ascending. Each frame covers every edge stamped at or before that time.",
        after_help = "EXAMPLES:\n    # Frame-by-frame brokers\n    nsight timeline edges.json --top 3\n\n    # Full frames as JSON\n    nsight timeline edges.json --format json"
    )]
    Timeline(cmd::frames::FramesArgs),

    #[command(
        about = "Analyze each relation type separately",
        long_about = "Emit one frame per relation type in order of first appearance. Frames share the coordinates of the full graph's layout.",
        after_help = "EXAMPLES:\n    # One table per relation type\n    nsight relations edges.json\n\n    # Skip malformed rows instead of failing\n    nsight relations edges.json --skip-invalid"
    )]
    Relations(cmd::frames::FramesArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NETSIGHT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "netsight=debug,info"
        } else {
            "netsight=info,warn"
        })
    });

    let format = env::var("NETSIGHT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output; logs go to stderr.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();

    match &cli.command {
        Commands::Report(args) => cmd::report::run_report(args, &cli.config, output),
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, &cli.config, output),
        Commands::Timeline(args) => {
            cmd::frames::run_frames(args, FrameKind::Timeline, &cli.config, output)
        }
        Commands::Relations(args) => {
            cmd::frames::run_frames(args, FrameKind::Relations, &cli.config, output)
        }
    }
}
