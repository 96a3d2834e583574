//! Supply-Chain Filtering CLI
//!
//! Loads a supply-chain dataset, applies the multi-criteria filter, and
//! writes the filtered view plus summary statistics. Optionally exports
//! the view as an SVG world map or GeoJSON.
//!
//! Usage:
//!   filter-network --dataset data/supply_chain.json \
//!                  --search tsmc --risk-level high --risk-level critical \
//!                  --output out/filtered_view.json --svg

use anyhow::Result;
use chain_filter::{filter, loader, summary, FilterState, SummaryStats};
use clap::Parser;
use map_export::{ExportFormat, Exporter, MapScene, WorldMap};
use risk_model::{NodeType, RiskLevel, Severity};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "filter-network",
    about = "Filter a supply-chain dataset and export the resulting view"
)]
struct Args {
    /// Path to the dataset JSON file
    #[arg(short, long, default_value = "data/supply_chain.json")]
    dataset: PathBuf,

    /// Free-text search over node name/type/id and disruption fields
    #[arg(short, long)]
    search: Option<String>,

    /// Node type allow-list (repeatable); all types when omitted
    #[arg(long = "node-type")]
    node_types: Vec<NodeType>,

    /// Risk level allow-list (repeatable); all levels when omitted
    #[arg(long = "risk-level")]
    risk_levels: Vec<RiskLevel>,

    /// Disruption severity allow-list (repeatable); all when omitted
    #[arg(long = "severity")]
    severities: Vec<Severity>,

    /// Disruption source substring allow-list (repeatable)
    #[arg(long = "source")]
    sources: Vec<String>,

    /// Minimum route trade value in USD (inclusive)
    #[arg(long, default_value_t = 0.0)]
    min_trade_value: f64,

    /// Output JSON file for the filtered view + summary
    #[arg(short, long, default_value = "out/filtered_view.json")]
    output: PathBuf,

    /// Also export an SVG world map next to the output file
    #[arg(long)]
    svg: bool,

    /// Also export a GeoJSON FeatureCollection next to the output file
    #[arg(long)]
    geojson: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct FilterReport {
    state: FilterState,
    summary: SummaryStats,
    view: chain_filter::FilteredView,
    generated_at: String,
}

impl Args {
    fn filter_state(&self) -> FilterState {
        let defaults = FilterState::default();
        FilterState {
            search: self.search.clone().unwrap_or_default(),
            node_types: if self.node_types.is_empty() {
                defaults.node_types
            } else {
                self.node_types.clone()
            },
            risk_levels: if self.risk_levels.is_empty() {
                defaults.risk_levels
            } else {
                self.risk_levels.clone()
            },
            severities: if self.severities.is_empty() {
                defaults.severities
            } else {
                self.severities.clone()
            },
            sources: self.sources.clone(),
            min_trade_value_usd: self.min_trade_value,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dataset = loader::load_dataset(&args.dataset)?;
    let state = args.filter_state();

    let view = filter::apply(&dataset, &state);
    let stats = summary::summarize(&view);

    info!("Filtered view:");
    info!("  nodes:       {}", stats.node_count);
    info!("  routes:      {}", stats.route_count);
    info!("  disruptions: {}", stats.disruption_count);
    info!("  trade value: ${:.0}", stats.total_trade_value_usd);
    info!("  critical:    {} nodes", stats.critical_nodes);

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    info!("Writing report to {:?}", args.output);
    let report = FilterReport {
        state,
        summary: stats,
        view: view.clone(),
        generated_at: chrono::Utc::now().to_rfc3339(),
    };
    let file = File::create(&args.output)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &report)?;

    if args.svg || args.geojson {
        let exporter = Exporter::mounted(WorldMap::default());
        let scene = MapScene {
            nodes: &view.nodes,
            routes: &view.routes,
            disruptions: &view.disruptions,
        };
        let out_dir = args.output.parent().unwrap_or_else(|| ".".as_ref());

        if args.svg {
            let artifact = exporter.export(&scene, ExportFormat::Svg)?;
            let path = out_dir.join(&artifact.file_name);
            info!("Writing SVG to {:?}", path);
            std::fs::write(path, artifact.contents)?;
        }
        if args.geojson {
            let artifact = exporter.export(&scene, ExportFormat::GeoJson)?;
            let path = out_dir.join(&artifact.file_name);
            info!("Writing GeoJSON to {:?}", path);
            std::fs::write(path, artifact.contents)?;
        }
    }

    Ok(())
}
