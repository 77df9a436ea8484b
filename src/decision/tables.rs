//! Fixed lookup tables keyed by `TaskState`, plus per-technology radio
//! energy profiles.
//!
//! Every task table is an exhaustive `match`, so adding a `TaskState`
//! variant without extending each table fails to compile.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::types::TaskState;

/// Relative importance of energy versus QoS for one task. The two weights
/// sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskWeights {
    pub w_energy: f64,
    pub w_qos: f64,
}

/// Minimum service level a network must offer for a task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QosRequirement {
    /// Mbps
    pub min_bandwidth: f64,
    /// ms
    pub max_latency: f64,
}

impl QosRequirement {
    /// True when the offered link falls short on bandwidth or exceeds the
    /// latency ceiling.
    pub fn is_violated_by(&self, bandwidth: f64, latency: f64) -> bool {
        bandwidth < self.min_bandwidth || latency > self.max_latency
    }
}

/// Assumed transfer for one evaluation of a task. Independent of the
/// candidate network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    /// Payload to transmit, in megabits.
    pub data_size_mb: f64,
    /// Time the radio is kept up, in seconds.
    pub duration_s: f64,
}

/// Energy characteristics of a radio technology.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RadioProfile {
    /// Power drawn while transmitting (mW).
    pub tx_power_mw: f64,
    /// Power drawn while the link is held idle (mW).
    pub idle_power_mw: f64,
    /// One-off cost of bringing the radio up (mJ).
    pub wakeup_energy_mj: f64,
}

impl RadioProfile {
    /// All figures finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.tx_power_mw, self.idle_power_mw, self.wakeup_energy_mj]
            .iter()
            .all(|v| *v >= 0.0 && v.is_finite())
    }
}

pub const WIFI_PROFILE: RadioProfile = RadioProfile {
    tx_power_mw: 800.0,
    idle_power_mw: 10.0,
    wakeup_energy_mj: 2.0,
};

pub const FIVE_G_PROFILE: RadioProfile = RadioProfile {
    tx_power_mw: 1200.0,
    idle_power_mw: 15.0,
    wakeup_energy_mj: 5.0,
};

pub const FOUR_G_PROFILE: RadioProfile = RadioProfile {
    tx_power_mw: 1500.0,
    idle_power_mw: 20.0,
    wakeup_energy_mj: 8.0,
};

pub const BLE_PROFILE: RadioProfile = RadioProfile {
    tx_power_mw: 30.0,
    idle_power_mw: 2.0,
    wakeup_energy_mj: 0.5,
};

/// Used for candidate names with no known profile.
pub const FALLBACK_PROFILE: RadioProfile = RadioProfile {
    tx_power_mw: 1000.0,
    idle_power_mw: 15.0,
    wakeup_energy_mj: 5.0,
};

/// Built-in radio profiles keyed by network name.
pub fn default_radio_profiles() -> BTreeMap<String, RadioProfile> {
    BTreeMap::from([
        ("Wi-Fi".to_string(), WIFI_PROFILE),
        ("5G".to_string(), FIVE_G_PROFILE),
        ("4G".to_string(), FOUR_G_PROFILE),
        ("BLE".to_string(), BLE_PROFILE),
    ])
}

impl TaskState {
    pub fn weights(&self) -> TaskWeights {
        let (w_energy, w_qos) = match self {
            TaskState::IdleMonitoring => (0.8, 0.2),
            TaskState::DataBurstAlert => (0.6, 0.4),
            TaskState::VideoStreaming => (0.3, 0.7),
        };
        TaskWeights { w_energy, w_qos }
    }

    pub fn qos_requirement(&self) -> QosRequirement {
        let (min_bandwidth, max_latency) = match self {
            TaskState::IdleMonitoring => (0.1, 1000.0),
            TaskState::DataBurstAlert => (5.0, 100.0),
            TaskState::VideoStreaming => (25.0, 50.0),
        };
        QosRequirement { min_bandwidth, max_latency }
    }

    pub fn workload(&self) -> Workload {
        // 1 KB sensor reading, 50 KB alert, 10 MB video chunk
        let (data_size_mb, duration_s) = match self {
            TaskState::IdleMonitoring => (0.008, 1.0),
            TaskState::DataBurstAlert => (0.4, 1.0),
            TaskState::VideoStreaming => (80.0, 1.0),
        };
        Workload { data_size_mb, duration_s }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_for_every_task() {
        for task in TaskState::ALL {
            let w = task.weights();
            assert!((w.w_energy + w.w_qos - 1.0).abs() < 1e-12, "{task}");
        }
    }

    #[test]
    fn requirements_tighten_with_task_intensity() {
        let idle = TaskState::IdleMonitoring.qos_requirement();
        let burst = TaskState::DataBurstAlert.qos_requirement();
        let video = TaskState::VideoStreaming.qos_requirement();
        assert!(idle.min_bandwidth < burst.min_bandwidth && burst.min_bandwidth < video.min_bandwidth);
        assert!(idle.max_latency > burst.max_latency && burst.max_latency > video.max_latency);
    }

    #[test]
    fn violation_checks_both_thresholds() {
        let req = TaskState::DataBurstAlert.qos_requirement();
        assert!(!req.is_violated_by(5.0, 100.0));
        assert!(req.is_violated_by(4.99, 10.0));
        assert!(req.is_violated_by(50.0, 100.5));
    }
}
