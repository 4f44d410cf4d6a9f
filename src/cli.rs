//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Synthetic fuel-station tank flow and refill simulator.
#[derive(Debug, Parser)]
#[command(name = "station-flow-sim", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a historical event dataset for every configured station.
    Generate {
        #[command(flatten)]
        source: ScenarioSource,
        /// Override the master random seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Override the number of simulated days.
        #[arg(long)]
        days: Option<u32>,
        /// Write CSV here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Spread stations over a worker pool; output is unchanged.
        #[arg(long)]
        parallel: bool,
    },
    /// Step every station in lockstep and print each event.
    Scada {
        #[command(flatten)]
        source: ScenarioSource,
        /// Number of steps to run.
        #[arg(long, default_value_t = 60)]
        steps: u32,
    },
    /// Generate a transit-time trip dataset.
    Transit {
        #[arg(long, default_value_t = 365)]
        days: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Write CSV here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Where the scenario comes from; a preset when neither is given.
#[derive(Debug, Args)]
pub struct ScenarioSource {
    /// Load scenario from a TOML file.
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,
    /// Use a built-in preset (dispenser, scada, fitted).
    #[arg(long)]
    pub preset: Option<String>,
}
