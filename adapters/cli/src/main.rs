#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless prism weapon scenario.

mod scenario;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use prism_core::SimConfig;

use scenario::{Mode, Scenario};

/// Runs the prism charge weapon against a ring of targets and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "prism-sim", version, about)]
struct Args {
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Which fire toggles the actor holds.
    #[arg(long, value_enum, default_value_t = Mode::Focus)]
    mode: Mode,
    /// Targets placed in a ring around the actor.
    #[arg(long, default_value_t = 12)]
    targets: usize,
    /// Hostile projectiles fired at the actor over the run.
    #[arg(long, default_value_t = 24)]
    hostiles: usize,
    /// Overrides the seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with simulation parameters.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config file '{}'", path.display()))?;
    let config: SimConfig =
        toml::from_str(&text).with_context(|| format!("parse config file '{}'", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validate config file '{}'", path.display()))?;
    Ok(config)
}

/// Entry point for the prism simulation command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    log::info!(
        "running {} ticks in {:?} mode (seed {:#x})",
        args.ticks,
        args.mode,
        config.seed
    );

    let scenario = Scenario {
        config,
        ticks: args.ticks,
        mode: args.mode,
        targets: args.targets,
        hostiles: args.hostiles,
    };
    let summary = scenario.run()?;
    println!("{summary}");
    Ok(())
}
