//! Value types shared by the decision and simulation engines.
//!
//! Contains:
//! - `TaskState`: the device's current activity mode
//! - `NetworkCandidate`: one reachable network as observed in a single step
//! - `Position`: a point on the simulation plane

use serde::{Deserialize, Serialize};

/// Discrete mode of device activity.
///
/// Drives both the QoS requirement and the energy/QoS weighting used by the
/// decision engine. Serialised as `IDLE_MONITORING`, `DATA_BURST_ALERT` and
/// `VIDEO_STREAMING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    IdleMonitoring,
    DataBurstAlert,
    VideoStreaming,
}

impl TaskState {
    /// Every task state, in transition-table order.
    pub const ALL: [TaskState; 3] = [TaskState::IdleMonitoring, TaskState::DataBurstAlert, TaskState::VideoStreaming];

    /// Wire name of the task (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::IdleMonitoring => "IDLE_MONITORING",
            TaskState::DataBurstAlert => "DATA_BURST_ALERT",
            TaskState::VideoStreaming => "VIDEO_STREAMING",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskState::ALL
            .into_iter()
            .find(|task| task.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown task state '{}', expected one of IDLE_MONITORING, DATA_BURST_ALERT, VIDEO_STREAMING", s))
    }
}

/// A network observed as reachable at one instant.
///
/// Ephemeral: recomputed every simulation step and consumed by one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkCandidate {
    /// Technology name, e.g. "Wi-Fi".
    pub name: String,
    /// Available bandwidth in Mbps. Must be > 0.
    pub bandwidth: f64,
    /// Round-trip latency in ms. Must be >= 0.
    pub latency: f64,
}

impl NetworkCandidate {
    pub fn new(name: impl Into<String>, bandwidth: f64, latency: f64) -> Self {
        NetworkCandidate {
            name: name.into(),
            bandwidth,
            latency,
        }
    }
}

/// Simple 2D point in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position { x, y }
    }
}

impl From<[f64; 2]> for Position {
    fn from([x, y]: [f64; 2]) -> Self {
        Position { x, y }
    }
}
