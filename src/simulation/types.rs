//! Type definitions for the simulation.
//!
//! Contains:
//! - The closed set of radio technologies and their nominal envelopes
//! - Base stations (fixed infrastructure)
//! - Device state snapshots and simulation statistics
//! - Movement patterns

use serde::{Deserialize, Serialize};

use crate::common::types::{NetworkCandidate, Position, TaskState};

/// Radio technology of a base station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "Wi-Fi")]
    WiFi,
    #[serde(rename = "5G")]
    FiveG,
    #[serde(rename = "4G")]
    FourG,
    #[serde(rename = "BLE")]
    Ble,
}

/// Nominal best-case link figures (at distance 0) and coverage range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TechnologySpec {
    /// Mbps
    pub best_bandwidth: f64,
    /// ms
    pub best_latency: f64,
    /// World units
    pub max_range: f64,
}

impl Technology {
    pub const ALL: [Technology; 4] = [Technology::WiFi, Technology::FiveG, Technology::FourG, Technology::Ble];

    /// Network name reported in `NetworkCandidate::name`.
    pub fn name(&self) -> &'static str {
        match self {
            Technology::WiFi => "Wi-Fi",
            Technology::FiveG => "5G",
            Technology::FourG => "4G",
            Technology::Ble => "BLE",
        }
    }

    pub fn spec(&self) -> TechnologySpec {
        let (best_bandwidth, best_latency, max_range) = match self {
            Technology::WiFi => (100.0, 5.0, 100.0),
            Technology::FiveG => (200.0, 10.0, 500.0),
            Technology::FourG => (50.0, 30.0, 800.0),
            Technology::Ble => (2.0, 20.0, 50.0),
        };
        TechnologySpec {
            best_bandwidth,
            best_latency,
            max_range,
        }
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Fixed-position emitter of one technology. Immutable for the lifetime of
/// a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStation {
    pub id: String,
    pub position: Position,
    pub technology: Technology,
}

impl BaseStation {
    pub fn new(id: impl Into<String>, technology: Technology, x: f64, y: f64) -> Self {
        BaseStation {
            id: id.into(),
            position: Position::new(x, y),
            technology,
        }
    }
}

/// Snapshot of the simulated device.
///
/// `available_networks` is derived from position, stations and step; it is
/// never stored on the simulation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    pub position: Position,
    pub task: TaskState,
    pub available_networks: Vec<NetworkCandidate>,
}

/// How the device moves each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementPattern {
    /// Uniform displacement in `[-step_size, step_size]` on both axes.
    #[default]
    RandomWalk,
    /// Horizontal sweep for 100 steps, vertical for 100, then random walk.
    Sweep,
}

/// Rectangular plane `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for MapBounds {
    fn default() -> Self {
        MapBounds {
            width: 1000.0,
            height: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnologyCount {
    pub technology: Technology,
    pub stations: usize,
}

/// Summary of the simulation for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStats {
    pub step: u64,
    pub position: Position,
    pub task: TaskState,
    pub available_networks: Vec<String>,
    pub map: MapBounds,
    pub total_base_stations: usize,
    pub stations_per_technology: Vec<TechnologyCount>,
}
