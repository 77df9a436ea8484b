//! Simulation core module.
//!
//! This module owns the device's position and task and the fixed layout of
//! base stations. Each step it moves the device, advances the task and
//! derives which networks are reachable from distance-based link quality.
//!
//! ## Module Organization
//!
//! - `types`: Core data structures (technologies, stations, device snapshots)
//! - `geometry`: Distance and map-bounds helpers
//! - `signal_calculations`: Distance to bandwidth/latency model
//! - `engine`: The `Simulation` context object and reachability computation
//!
//! ## Public API
//!
//! The main entry point is `Simulation`, exposing `step`, `reset` and
//! `current_state`.

pub mod engine;
pub mod geometry;
pub mod signal_calculations;
pub mod types;

// Re-export commonly used types
pub use engine::{Simulation, SimulationParameters, StepOutcome, default_base_stations, reachable_networks};
pub use types::{BaseStation, DeviceState, MapBounds, MovementPattern, SimulationStats, Technology};
