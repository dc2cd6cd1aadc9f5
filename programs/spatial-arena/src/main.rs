//! Spatial Arena - runs the spatial Prisoner's Dilemma from the command line
//!
//! Prints one row of strategy counts per round, or the whole history as
//! JSON for plotting tools.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spatial_dilemma::{
    History, PairCounting, RoundStats, SimConfig, Simulation, StatisticsSink, Topology,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "spatial-arena",
    version,
    about = "Run the spatial Prisoner's Dilemma and report cooperators vs. defectors"
)]
struct Cli {
    /// JSON file with a SimConfig; flags below override its fields.
    #[arg(long, env = "SPATIAL_ARENA_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Number of agents.
    #[arg(long)]
    population: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Rounds to run.
    #[arg(long, default_value_t = 100)]
    rounds: u32,

    /// Wrap neighborhoods around the grid edges.
    #[arg(long)]
    torus: bool,

    /// Play each adjacent pair once per round instead of once from each side.
    #[arg(long)]
    single_count: bool,

    /// Emit the history as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                SimConfig::from_json(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => SimConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(population) = self.population {
            config.population = population;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.torus {
            config.topology = Topology::Torus;
        }
        if self.single_count {
            config.pair_counting = PairCounting::Once;
        }
        Ok(config)
    }
}

/// Writes each round as a table row
struct TablePrinter<W: Write> {
    out: W,
}

impl<W: Write> TablePrinter<W> {
    fn new(mut out: W) -> Self {
        let _ = writeln!(out, "{:>6} {:>12} {:>10}", "Step", "Cooperators", "Defectors");
        Self { out }
    }
}

impl<W: Write> StatisticsSink for TablePrinter<W> {
    fn record(&mut self, stats: RoundStats) {
        let _ = writeln!(
            self.out,
            "{:>6} {:>12} {:>10}",
            stats.round, stats.cooperators, stats.defectors
        );
    }
}

/// Record the starting census, then every round
fn run_with<S: StatisticsSink>(sim: &mut Simulation, rounds: u32, sink: &mut S) {
    sink.record(sim.census());
    sim.run(rounds, sink);
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.sim_config()?;

    info!(
        width = config.width,
        height = config.height,
        population = config.population,
        seed = config.seed,
        rounds = cli.rounds,
        "Starting spatial Prisoner's Dilemma"
    );

    let mut sim = Simulation::new(config).context("failed to build simulation")?;

    if cli.json {
        let mut history = History::new();
        run_with(&mut sim, cli.rounds, &mut history);
        println!("{}", history.to_json()?);
    } else {
        let mut printer = TablePrinter::new(std::io::stdout().lock());
        run_with(&mut sim, cli.rounds, &mut printer);
    }

    let last = sim.census();
    info!(
        rounds = last.round,
        cooperators = last.cooperators,
        defectors = last.defectors,
        "Simulation finished"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
