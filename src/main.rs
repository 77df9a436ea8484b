//! Command-line front end for the network selection simulator.
//!
//! Subcommands:
//! - `run`: step the simulation and select a network at every step
//! - `decide`: select a network for a candidate list read from JSON
//! - `layout`: print the base-station layout

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{LevelFilter, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use netselect_simulator::common::config::SimulatorConfig;
use netselect_simulator::common::scene::{Scene, load_scene};
use netselect_simulator::simulation::{Simulation, StepOutcome};
use netselect_simulator::{DecisionError, NetworkCandidate, Position, TaskState};

/// Exit code for rejected caller input.
const EXIT_INVALID_INPUT: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "netselect-sim")]
#[command(about = "Simulate energy-aware network selection for a mobile IoT device", long_about = None)]
struct Args {
    /// Simulator configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base-station layout (JSON); overrides the scene named in the config
    #[arg(short, long, global = true)]
    scene: Option<PathBuf>,

    /// Enable debug logging for the simulator
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run simulation steps, selecting the optimal network at each one
    Run {
        /// Number of steps to simulate
        #[arg(short = 'n', long, default_value_t = 20)]
        steps: usize,

        /// Override the configured random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Starting position as "x,y"
        #[arg(long, value_parser = parse_position)]
        start: Option<Position>,

        /// Output JSON report path (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Select the optimal network from a JSON list of candidates
    Decide {
        /// Task state, e.g. VIDEO_STREAMING
        #[arg(short, long)]
        task: TaskState,

        /// JSON file containing an array of {name, bandwidth, latency}
        #[arg(long)]
        candidates: PathBuf,
    },
    /// Print the map and base-station layout as JSON
    Layout,
}

#[derive(Serialize)]
struct RunReport {
    generated_at: String,
    seed: u64,
    steps: Vec<StepOutcome>,
    /// How often each network won.
    selections: BTreeMap<String, usize>,
    steps_without_network: usize,
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("Expected \"x,y\", got '{}'", s))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("Invalid x coordinate '{}': {}", x, e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("Invalid y coordinate '{}': {}", y, e))?;
    Ok(Position::new(x, y))
}

fn load_config(args: &Args) -> Result<SimulatorConfig> {
    let mut config = match &args.config {
        Some(path) => SimulatorConfig::load(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(scene) = &args.scene {
        config.scene = Some(scene.clone());
    }
    Ok(config)
}

fn load_layout(config: &SimulatorConfig) -> Result<Scene> {
    match &config.scene {
        Some(path) => Ok(load_scene(path)?),
        None => Ok(Scene::default()),
    }
}

fn run(args: &Args, steps: usize, seed: Option<u64>, start: Option<Position>, output: Option<&Path>) -> Result<()> {
    let mut config = load_config(args)?;
    let scene = load_layout(&config)?;

    config.simulation.map = scene.map;
    if let Some(seed) = seed {
        config.simulation.seed = seed;
    }
    if start.is_some() {
        config.simulation.initial_position = start;
    }
    config.simulation.validate().map_err(anyhow::Error::msg).context("Invalid simulation parameters")?;

    let seed = config.simulation.seed;
    let mut simulation = Simulation::new(config.simulation.clone(), scene.base_stations);
    info!("Running {} steps with seed {}", steps, seed);

    println!("{:>6} {:>16} {:<18} {:<22} {:>12}", "Step", "Position", "Task", "Selected", "Cost");
    println!("{}", "-".repeat(78));

    let mut outcomes = Vec::with_capacity(steps);
    let mut selections: BTreeMap<String, usize> = BTreeMap::new();
    let mut steps_without_network = 0;

    for _ in 0..steps {
        let outcome = simulation.step_with_decision(&config.decision);
        let position = format!("({:.0}, {:.0})", outcome.state.position.x, outcome.state.position.y);

        match &outcome.decision {
            Some(decision) => {
                *selections.entry(decision.optimal_network.clone()).or_insert(0) += 1;
                let violated = decision.winner().is_some_and(|w| w.qos_violated);
                let selected = if violated {
                    format!("{} (QoS unmet)", decision.optimal_network)
                } else {
                    decision.optimal_network.clone()
                };
                println!(
                    "{:>6} {:>16} {:<18} {:<22} {:>12.2}",
                    outcome.step, position, outcome.state.task, selected, decision.optimal_cost
                );
            }
            None => {
                steps_without_network += 1;
                println!("{:>6} {:>16} {:<18} {:<22} {:>12}", outcome.step, position, outcome.state.task, "-", "-");
            }
        }

        outcomes.push(outcome);
    }

    println!("\nSelections:");
    for (network, count) in &selections {
        println!("  {:<8} {:>5}", network, count);
    }
    if steps_without_network > 0 {
        println!("  {:<8} {:>5}", "none", steps_without_network);
    }

    if let Some(path) = output {
        let report = RunReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            seed,
            steps: outcomes,
            selections,
            steps_without_network,
        };
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}

fn decide(args: &Args, task: TaskState, candidates_path: &Path) -> Result<()> {
    let config = load_config(args)?;
    let data = fs::read_to_string(candidates_path).with_context(|| format!("Failed to read candidates file: {}", candidates_path.display()))?;
    let candidates: Vec<NetworkCandidate> = serde_json::from_str(&data).context("Invalid candidates JSON")?;

    let decision = config.decision.select_optimal_network(task, &candidates)?;
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

fn layout(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let scene = load_layout(&config)?;
    println!("{}", serde_json::to_string_pretty(&scene)?);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("netselect_simulator"), if args.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .parse_default_env()
        .init();

    let result = match &args.command {
        Command::Run { steps, seed, start, output } => run(&args, *steps, *seed, *start, output.as_deref()),
        Command::Decide { task, candidates } => decide(&args, *task, candidates),
        Command::Layout => layout(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(DecisionError::InvalidInput(reason)) = e.downcast_ref::<DecisionError>() {
                eprintln!("Rejected input: {}", reason);
                return ExitCode::from(EXIT_INVALID_INPUT);
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_position() {
        assert_eq!(parse_position("12.5, 40").unwrap(), Position::new(12.5, 40.0));
        assert!(parse_position("12.5").is_err());
        assert!(parse_position("a,b").is_err());
    }

    #[test]
    fn cli_accepts_task_names() {
        let args = Args::try_parse_from(["netselect-sim", "decide", "--task", "VIDEO_STREAMING", "--candidates", "c.json"]).unwrap();
        match args.command {
            Command::Decide { task, .. } => assert_eq!(task, TaskState::VideoStreaming),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
