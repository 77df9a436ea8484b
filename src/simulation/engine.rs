//! Discrete-step simulation of one mobile device among fixed base stations.
//!
//! Each `step()`:
//! 1. Moves the device (bounded random walk or sweep), clamped to the map
//! 2. Draws the next task from a seeded weighted distribution
//! 3. Advances the step counter
//! 4. Returns a snapshot whose network list is derived from position,
//!    stations and step
//!
//! All randomness comes from a `ChaCha8Rng` seeded from the parameters, so
//! a given seed always yields the same trajectory. The simulation holds no
//! locks; callers sharing one instance across threads must serialise
//! `step()`/`reset()` themselves (e.g. behind a `Mutex`).

use log::{debug, info, warn};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::geometry::{clamp_to_bounds, distance2};
use super::signal_calculations::{apply_shadowing, link_quality_at_distance};
use super::types::{BaseStation, DeviceState, MapBounds, MovementPattern, SimulationStats, Technology, TechnologyCount};
use crate::common::types::{NetworkCandidate, Position, TaskState};
use crate::decision::{CostModel, Decision};

/// Steps spent on each leg of the sweep pattern.
const SWEEP_LEG_STEPS: u64 = 100;

/// Mixed into the seed so shadowing draws don't mirror the movement stream.
const SHADOWING_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Tunable simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SimulationParameters {
    pub seed: u64,
    pub map: MapBounds,
    /// Maximum displacement per axis per step.
    pub step_size: f64,
    pub movement: MovementPattern,
    /// Shadowing standard deviation (fraction of the link figure). 0 disables.
    pub shadowing_sigma: f64,
    /// Starting position; `None` draws one from the seeded RNG.
    pub initial_position: Option<Position>,
    /// Weights for IDLE_MONITORING, DATA_BURST_ALERT, VIDEO_STREAMING.
    pub task_probabilities: [f64; 3],
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            seed: 42,
            map: MapBounds::default(),
            step_size: 10.0,
            movement: MovementPattern::RandomWalk,
            shadowing_sigma: 0.0,
            initial_position: None,
            task_probabilities: [0.6, 0.3, 0.1],
        }
    }
}

impl SimulationParameters {
    /// Check the parameters describe a usable simulation.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.map.width > 0.0 && self.map.width.is_finite()) || !(self.map.height > 0.0 && self.map.height.is_finite()) {
            return Err(format!("Invalid map size {}x{}, both dimensions must be positive", self.map.width, self.map.height));
        }
        if !(self.step_size >= 0.0 && self.step_size <= self.map.width.max(self.map.height)) {
            return Err(format!(
                "Invalid step_size {}, must be between 0 and the larger map dimension ({})",
                self.step_size,
                self.map.width.max(self.map.height)
            ));
        }
        if !(self.shadowing_sigma >= 0.0 && self.shadowing_sigma.is_finite()) {
            return Err(format!("Invalid shadowing_sigma {}, must be non-negative", self.shadowing_sigma));
        }
        if self.task_probabilities.iter().any(|p| !(*p >= 0.0 && p.is_finite())) {
            return Err(format!("Invalid task_probabilities {:?}, all weights must be non-negative", self.task_probabilities));
        }
        if self.task_probabilities.iter().sum::<f64>() <= 0.0 {
            return Err("Invalid task_probabilities, at least one weight must be positive".to_string());
        }
        if let Some(position) = &self.initial_position {
            if !(0.0..=self.map.width).contains(&position.x) || !(0.0..=self.map.height).contains(&position.y) {
                return Err(format!("Initial position ({}, {}) lies outside the map", position.x, position.y));
            }
        }
        Ok(())
    }
}

/// Result of an integrated step plus decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: u64,
    pub state: DeviceState,
    /// `None` when no network is reachable at the new position.
    pub decision: Option<Decision>,
}

/// Simulation context. One instance per session; the caller owns its
/// lifetime and concurrency discipline.
pub struct Simulation {
    params: SimulationParameters,
    base_stations: Vec<BaseStation>,
    rng: ChaCha8Rng,
    /// `None` falls back to cycling through the tasks.
    task_distribution: Option<WeightedIndex<f64>>,
    step: u64,
    position: Position,
    task: TaskState,
}

impl Simulation {
    /// Parameters are not required to pass `validate()`; out-of-range values
    /// degrade (zero step, clamped positions) instead of failing later.
    pub fn new(params: SimulationParameters, base_stations: Vec<BaseStation>) -> Self {
        if let Err(e) = params.validate() {
            warn!("Simulation created with unvalidated parameters: {}", e);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

        let task_distribution = match WeightedIndex::new(params.task_probabilities) {
            Ok(distribution) => Some(distribution),
            Err(e) => {
                warn!("Unusable task probabilities {:?} ({}), cycling through tasks instead", params.task_probabilities, e);
                None
            }
        };

        let position = match params.initial_position {
            Some(position) => clamp_to_bounds(position, &params.map),
            None => random_position(&mut rng, &params.map),
        };

        let mut per_technology: BTreeMap<Technology, usize> = BTreeMap::new();
        for station in &base_stations {
            *per_technology.entry(station.technology).or_insert(0) += 1;
        }
        info!("Simulation initialised with {} base stations", base_stations.len());
        for (technology, count) in &per_technology {
            info!("  {}: {} stations", technology, count);
        }

        Simulation {
            params,
            base_stations,
            rng,
            task_distribution,
            step: 0,
            position,
            task: TaskState::IdleMonitoring,
        }
    }

    /// Simulation over the built-in station layout.
    pub fn with_default_layout(params: SimulationParameters) -> Self {
        Simulation::new(params, default_base_stations())
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) -> DeviceState {
        self.position = self.next_position();
        self.task = self.next_task();
        self.step += 1;

        let state = self.current_state();
        debug!(
            "Step {}: position=({:.1}, {:.1}) task={} reachable={}",
            self.step,
            state.position.x,
            state.position.y,
            state.task,
            state.available_networks.len()
        );
        state
    }

    /// Reinitialise position, task and step counter. The station layout is
    /// kept and the RNG is reseeded, so runs after a reset are reproducible.
    pub fn reset(&mut self, new_position: Option<Position>) -> DeviceState {
        let position = new_position.or(self.params.initial_position).unwrap_or(Position::ORIGIN);
        self.position = clamp_to_bounds(position, &self.params.map);
        self.task = TaskState::IdleMonitoring;
        self.step = 0;
        self.rng = ChaCha8Rng::seed_from_u64(self.params.seed);

        info!("Simulation reset to ({:.1}, {:.1})", self.position.x, self.position.y);
        self.current_state()
    }

    /// Read-only snapshot.
    pub fn current_state(&self) -> DeviceState {
        DeviceState {
            position: self.position,
            task: self.task,
            available_networks: self.available_networks(),
        }
    }

    /// Networks reachable from the current position.
    pub fn available_networks(&self) -> Vec<NetworkCandidate> {
        let shadowing_seed = self.params.seed ^ self.step.wrapping_mul(SHADOWING_SEED_SALT);
        reachable_networks(&self.position, &self.base_stations, self.params.shadowing_sigma, shadowing_seed)
    }

    /// Run `steps` consecutive steps and collect each snapshot.
    pub fn run_steps(&mut self, steps: usize) -> Vec<DeviceState> {
        (0..steps).map(|_| self.step()).collect()
    }

    /// Step, then select the optimal network among those now reachable.
    pub fn step_with_decision(&mut self, model: &CostModel) -> StepOutcome {
        let state = self.step();
        let decision = if state.available_networks.is_empty() {
            debug!("Step {}: no reachable network, skipping decision", self.step);
            None
        } else {
            match model.select_optimal_network(state.task, &state.available_networks) {
                Ok(decision) => Some(decision),
                Err(e) => {
                    warn!("Step {}: decision rejected simulated networks: {}", self.step, e);
                    None
                }
            }
        };

        StepOutcome {
            step: self.step,
            state,
            decision,
        }
    }

    pub fn stats(&self) -> SimulationStats {
        let stations_per_technology = Technology::ALL
            .into_iter()
            .map(|technology| TechnologyCount {
                technology,
                stations: self.base_stations.iter().filter(|s| s.technology == technology).count(),
            })
            .filter(|count| count.stations > 0)
            .collect();

        SimulationStats {
            step: self.step,
            position: self.position,
            task: self.task,
            available_networks: self.available_networks().into_iter().map(|n| n.name).collect(),
            map: self.params.map,
            total_base_stations: self.base_stations.len(),
            stations_per_technology,
        }
    }

    pub fn base_stations(&self) -> &[BaseStation] {
        &self.base_stations
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    fn next_position(&mut self) -> Position {
        let step_size = if self.params.step_size.is_finite() { self.params.step_size.abs() } else { 0.0 };
        let (dx, dy) = match self.params.movement {
            MovementPattern::Sweep if self.step < SWEEP_LEG_STEPS => (step_size, 0.0),
            MovementPattern::Sweep if self.step < 2 * SWEEP_LEG_STEPS => (0.0, step_size),
            // Unit draws scaled afterwards, so no step size can overflow the sampled range.
            MovementPattern::Sweep | MovementPattern::RandomWalk => (
                self.rng.gen_range(-1.0..=1.0) * step_size,
                self.rng.gen_range(-1.0..=1.0) * step_size,
            ),
        };
        clamp_to_bounds(Position::new(self.position.x + dx, self.position.y + dy), &self.params.map)
    }

    fn next_task(&mut self) -> TaskState {
        match &self.task_distribution {
            Some(distribution) => TaskState::ALL[distribution.sample(&mut self.rng)],
            None => {
                let index = TaskState::ALL.iter().position(|t| *t == self.task).unwrap_or(0);
                TaskState::ALL[(index + 1) % TaskState::ALL.len()]
            }
        }
    }
}

/// Networks reachable from `position`, one entry per technology.
///
/// For each technology the nearest station within range supplies the link
/// figures; stations beyond range never contribute. Entries are ordered by
/// technology. Shadowing draws come from an RNG seeded with `shadowing_seed`,
/// making the result a pure function of its arguments.
pub fn reachable_networks(position: &Position, stations: &[BaseStation], shadowing_sigma: f64, shadowing_seed: u64) -> Vec<NetworkCandidate> {
    let mut nearest: BTreeMap<Technology, f64> = BTreeMap::new();
    for station in stations {
        let range = station.technology.spec().max_range;
        let d2 = distance2(position, &station.position);
        // NaN never compares below the current nearest, so it must not seed the entry.
        if !d2.is_finite() || d2 > range * range {
            continue;
        }
        nearest
            .entry(station.technology)
            .and_modify(|best| {
                if d2 < *best {
                    *best = d2;
                }
            })
            .or_insert(d2);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(shadowing_seed);
    nearest
        .into_iter()
        .filter_map(|(technology, d2)| {
            let spec = technology.spec();
            let quality = link_quality_at_distance(d2.sqrt(), &spec)?;
            let quality = apply_shadowing(quality, &spec, shadowing_sigma, &mut rng);
            Some(NetworkCandidate::new(technology.name(), quality.bandwidth, quality.latency))
        })
        .collect()
}

/// Built-in layout: four Wi-Fi routers, four 5G towers, four BLE beacons
/// and two 4G towers on a 1000 x 1000 map.
pub fn default_base_stations() -> Vec<BaseStation> {
    let layout: [(Technology, &str, &[(f64, f64)]); 4] = [
        (Technology::WiFi, "wifi", &[(100.0, 100.0), (300.0, 250.0), (600.0, 400.0), (800.0, 750.0)]),
        (Technology::FiveG, "5g", &[(200.0, 200.0), (500.0, 300.0), (700.0, 600.0), (900.0, 100.0)]),
        (Technology::Ble, "ble", &[(150.0, 150.0), (350.0, 350.0), (550.0, 550.0), (750.0, 750.0)]),
        (Technology::FourG, "4g", &[(250.0, 750.0), (750.0, 250.0)]),
    ];

    layout
        .iter()
        .flat_map(|(technology, prefix, positions)| {
            positions
                .iter()
                .enumerate()
                .map(move |(i, (x, y))| BaseStation::new(format!("{}_{}", prefix, i), *technology, *x, *y))
        })
        .collect()
}

fn random_position<R: Rng + ?Sized>(rng: &mut R, map: &MapBounds) -> Position {
    let position = Position::new(rng.gen_range(0.0..=1.0) * map.width, rng.gen_range(0.0..=1.0) * map.height);
    clamp_to_bounds(position, map)
}
