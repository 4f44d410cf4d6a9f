//! Station flow simulator entry point: CLI wiring and config-driven station construction.

use std::io::{self, Write};
use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use station_flow_sim::cli::{Cli, Command, ScenarioSource};
use station_flow_sim::config::ScenarioConfig;
use station_flow_sim::io::export::{
    export_events_csv, export_trips_csv, write_events_csv, write_trips_csv,
};
use station_flow_sim::scenario::Scenario;
use station_flow_sim::sim::batch::BatchSummary;
use station_flow_sim::transit::{TransitConfig, TransitGenerator};
use station_flow_sim::{Result, SimError};

/// Loads the scenario: `--scenario` takes priority, then `--preset`, then `default_preset`.
fn load_scenario(source: &ScenarioSource, default_preset: &str) -> Result<ScenarioConfig> {
    let cfg = match (&source.scenario, &source.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
        (None, Some(name)) => ScenarioConfig::from_preset(name)?,
        (None, None) => ScenarioConfig::from_preset(default_preset)?,
    };
    Ok(cfg)
}

/// Fails with every validation error printed, not just the first.
fn check(cfg: &ScenarioConfig) -> Result<()> {
    let mut errors = cfg.validate().into_iter();
    match errors.next() {
        None => Ok(()),
        Some(first) => {
            for e in errors {
                eprintln!("{e}");
            }
            Err(SimError::Config(first))
        }
    }
}

fn generate(
    source: &ScenarioSource,
    seed: Option<u64>,
    days: Option<u32>,
    out: Option<&Path>,
    parallel: bool,
) -> Result<()> {
    let mut cfg = load_scenario(source, "dispenser")?;
    if let Some(seed) = seed {
        cfg.simulation.seed = seed;
    }
    if let Some(days) = days {
        cfg.simulation.days = days;
    }
    check(&cfg)?;

    let Scenario {
        mut registry,
        batch,
    } = Scenario::build(&cfg)?;
    let records = if parallel {
        batch.run_all_parallel(&mut registry)
    } else {
        batch.run_all(&mut registry)
    };

    match out {
        Some(path) => {
            export_events_csv(&records, path)?;
            eprintln!("{}", BatchSummary::from_records(&records));
            eprintln!("Events written to {}", path.display());
        }
        None => write_events_csv(&records, io::stdout().lock())?,
    }
    Ok(())
}

fn scada(source: &ScenarioSource, steps: u32) -> Result<()> {
    let cfg = load_scenario(source, "scada")?;
    check(&cfg)?;

    let mut registry = Scenario::build(&cfg)?.registry;
    let mut stdout = io::stdout().lock();
    for _ in 0..steps {
        for event in registry.next_all() {
            writeln!(stdout, "{event}")?;
        }
    }
    Ok(())
}

fn transit(days: u32, seed: u64, out: Option<&Path>) -> Result<()> {
    let config = TransitConfig {
        days,
        ..TransitConfig::default()
    };
    let trips = TransitGenerator::new(config, seed)?.generate();
    match out {
        Some(path) => {
            export_trips_csv(&trips, path)?;
            eprintln!("{} trips written to {}", trips.len(), path.display());
        }
        None => write_trips_csv(&trips, io::stdout().lock())?,
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Generate {
            source,
            seed,
            days,
            out,
            parallel,
        } => generate(source, *seed, *days, out.as_deref(), *parallel),
        Command::Scada { source, steps } => scada(source, *steps),
        Command::Transit { days, seed, out } => transit(*days, *seed, out.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
