//! Headless command-line runner for the anemone feeding model.
//!
//! Reads a JSON configuration, sets up logging, runs the simulation to its
//! end condition and prints how it ended.

use std::path::{Path, PathBuf};

use anemone_core::{
    config::{Config, parse_level_name},
    point_cloud,
    simulation::Simulation,
    types::{Vector3, vector_from_components},
};
use anyhow::{Context, Result, bail};
use clap::Parser;
use log::LevelFilter;

const DEFAULT_CONFIG_FILE_PATH: &str = "config.json";

#[derive(Parser, Debug)]
#[command(
    name = "anemone-feeder",
    version,
    about = "Model the feeding of a sea anemone."
)]
struct Cli {
    /// Path to the JSON config file to use.
    #[arg(default_value = DEFAULT_CONFIG_FILE_PATH)]
    config_file_path: PathBuf,

    /// Seed for a reproducible run (overrides `simulation.random_seed`).
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (overrides `logging.level`): critical, error, warning, info, debug, trace.
    #[arg(long)]
    log_level: Option<String>,

    /// Ambient current as `x,y,z` (overrides `model.current_vector_*`).
    #[arg(long, allow_hyphen_values = true)]
    current: Option<String>,

    /// Write the anemone geometry as an `.xyz` point cloud to this new file.
    #[arg(long)]
    point_cloud: Option<PathBuf>,

    /// Print the default configuration and exit.
    #[arg(long)]
    dump_default_config: bool,
}

/// Picks the log level: command line first, then the config file.
fn resolve_level(cli_level: Option<&str>, cfg: &Config) -> LevelFilter {
    cli_level.map_or_else(|| cfg.level_filter(), parse_level_name)
}

/// Parses an `x,y,z` triple.
fn parse_current(s: &str) -> Result<Vector3> {
    let components = s
        .split(',')
        .map(|c| {
            c.trim()
                .parse::<f64>()
                .with_context(|| format!("`{c}` is not a number"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(vector_from_components("current", &components)?)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path: &Path = &cli.config_file_path;
    if !path.is_file() {
        bail!("Unable to read config from {}", path.display());
    }
    let mut cfg = Config::from_path(path)?;

    if let Some(seed) = cli.seed {
        cfg.simulation.random_seed = Some(seed);
    }
    if let Some(current) = cli.current.as_deref() {
        let current = parse_current(current).context("invalid --current")?;
        cfg.model.set_current(current);
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.dump_default_config {
        println!("{}", Config::default().to_json_pretty()?);
        return Ok(());
    }

    let cfg = load_config(&cli)?;

    env_logger::Builder::new()
        .filter_level(resolve_level(cli.log_level.as_deref(), &cfg))
        .parse_default_env()
        .init();

    let mut sim = Simulation::from_config(&cfg).context("unable to instantiate anemone model")?;

    if let Some(path) = &cli.point_cloud {
        point_cloud::save_xyz(&sim.anemone, path)
            .with_context(|| format!("failed to write point cloud to {}", path.display()))?;
        log::info!("Wrote anemone point cloud to {}", path.display());
    }

    let report = sim.run(cfg.run_limits()).context("run terminated unexpectedly")?;

    println!("Run ended after {} timesteps", report.steps);
    println!("\t{} pieces of food remain", report.remaining_food);
    Ok(())
}
