//! Compass CLI — annotate an exported graph document with alignment scores.
//!
//! Usage:
//!   compass align graph.json --collection characters=<collection-id> [--output out.json]
//!
//! No inference service is wired in here, so the CLI runs the offline
//! stages only: explicit extraction, behavioral aggregation over any
//! relationship evidence already present, and propagation.

use clap::{Parser, Subcommand};
use compass::{AlignmentPipeline, Graph, PipelineConfig};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "compass",
    version,
    about = "Behavioral alignment engine for knowledge graphs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the alignment pipeline over a graph document
    Align {
        /// Input graph JSON ({"nodes": [...], "links": [...]})
        input: PathBuf,
        /// Output path; defaults to overwriting the input
        #[arg(long)]
        output: Option<PathBuf>,
        /// Eligible collection as name=collection-id (repeatable)
        #[arg(long = "collection", value_parser = parse_collection)]
        collections: Vec<(String, String)>,
        /// Classification cache location
        #[arg(long)]
        cache: Option<PathBuf>,
    },
}

fn parse_collection(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, id)| (name.to_string(), id.to_string()))
        .ok_or_else(|| format!("expected name=collection-id, got '{}'", raw))
}

/// Default cache path (~/.local/share/compass/alignment_cache.json)
fn default_cache_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("compass").join("alignment_cache.json")
}

async fn cmd_align(
    input: PathBuf,
    output: Option<PathBuf>,
    collections: Vec<(String, String)>,
    cache: Option<PathBuf>,
) -> i32 {
    let raw = match std::fs::read_to_string(&input) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: could not read {}: {}", input.display(), e);
            return 1;
        }
    };
    let mut graph: Graph = match serde_json::from_str(&raw) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error: could not parse {}: {}", input.display(), e);
            return 1;
        }
    };

    let collections: HashMap<String, String> = collections.into_iter().collect();
    let config = PipelineConfig::new(collections, cache.unwrap_or_else(default_cache_path));
    let report = AlignmentPipeline::new(config).run(&mut graph).await;

    let out_path = output.unwrap_or(input);
    let serialized = match serde_json::to_string_pretty(&graph) {
        Ok(serialized) => serialized,
        Err(e) => {
            eprintln!("Error: could not serialize graph: {}", e);
            return 1;
        }
    };
    if let Err(e) = std::fs::write(&out_path, serialized) {
        eprintln!("Error: could not write {}: {}", out_path.display(), e);
        return 1;
    }

    println!(
        "Annotated {} nodes ({} explicit, {} propagated over {} rounds, {} skipped) -> {}",
        report.eligible + report.skipped,
        report.explicit,
        report.propagated,
        report.propagation_rounds,
        report.skipped,
        out_path.display()
    );
    0
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Align {
            input,
            output,
            collections,
            cache,
        } => cmd_align(input, output, collections, cache).await,
    };
    std::process::exit(code);
}
