//! u-timegraph CLI
//!
//! Builds a time-expanded capacity graph and prints its adjacency.
//!
//! # Usage
//!
//! ```bash
//! # Built-in three-hub example
//! u-timegraph
//!
//! # JSON network configuration
//! u-timegraph --config demos/three_hubs.json
//!
//! # Drone map, expanded over 12 turns, as JSON
//! u-timegraph --map demos/maps/fork.txt --horizon 12 --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use u_timegraph::graph::build_graph;
use u_timegraph::map::FlightMap;
use u_timegraph::models::NetworkConfig;

#[derive(Parser)]
#[command(name = "u-timegraph")]
#[command(about = "Build a time-expanded capacity graph and print it", long_about = None)]
struct Cli {
    /// Network configuration (JSON)
    #[arg(short, long, conflicts_with = "map")]
    config: Option<PathBuf>,

    /// Drone map file
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Last time step when expanding a map
    #[arg(long, default_value = "10")]
    horizon: usize,

    /// Emit the graph as JSON instead of the node listing
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let graph = build_graph(&config).context("graph construction failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
    } else {
        print!("{graph}");
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<NetworkConfig> {
    if let Some(path) = &cli.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        return serde_json::from_str(&text)
            .with_context(|| format!("invalid network configuration in {}", path.display()));
    }
    if let Some(path) = &cli.map {
        let map = FlightMap::from_file(path)
            .with_context(|| format!("cannot load map {}", path.display()))?;
        let network = map
            .to_network(cli.horizon)
            .with_context(|| format!("cannot expand map {}", path.display()))?;
        return Ok(network.config);
    }
    Ok(NetworkConfig::three_hub_example())
}
