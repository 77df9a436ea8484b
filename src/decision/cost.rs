//! Multi-criteria cost model and optimal network selection.
//!
//! Cost of a candidate for a task:
//!
//! ```text
//! energy_cost = tx_rate * data_size + idle_power * duration + wakeup_energy
//!     tx_rate = tx_power / bandwidth        (mJ per Mb, i.e. airtime cost)
//! qos_penalty = qos_penalty_constant if bandwidth < min_bw or latency > max_lat, else 0
//!  total_cost = w_energy * energy_cost + w_qos * qos_penalty
//! ```
//!
//! The minimum `total_cost` wins; ties keep the earliest candidate. When every
//! candidate violates QoS the least-bad one is still returned.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::tables::{FALLBACK_PROFILE, QosRequirement, RadioProfile, TaskWeights, default_radio_profiles};
use crate::common::types::{NetworkCandidate, TaskState};
use crate::error::DecisionError;

/// Surcharge for a QoS violation. Large enough to dominate the energy cost
/// of any compliant link under the built-in weights.
pub const DEFAULT_QOS_PENALTY: f64 = 10_000.0;

/// Tunable parameters of the cost function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CostModel {
    pub qos_penalty: f64,
    pub radio_profiles: BTreeMap<String, RadioProfile>,
    pub fallback_profile: RadioProfile,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            qos_penalty: DEFAULT_QOS_PENALTY,
            radio_profiles: default_radio_profiles(),
            fallback_profile: FALLBACK_PROFILE,
        }
    }
}

/// Cost of one candidate under one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub name: String,
    pub bandwidth: f64,
    pub latency: f64,
    pub energy_cost: f64,
    pub qos_violated: bool,
    pub qos_penalty: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub networks_evaluated: usize,
    /// Difference between the highest and lowest total cost.
    pub cost_spread: f64,
}

/// Outcome of `select_optimal_network`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub task: TaskState,
    pub optimal_network: String,
    pub optimal_cost: f64,
    pub weights: TaskWeights,
    pub requirement: QosRequirement,
    /// One entry per candidate, in input order.
    pub breakdown: Vec<CostBreakdown>,
    pub summary: DecisionSummary,
}

impl Decision {
    /// Breakdown entry of the winning candidate.
    pub fn winner(&self) -> Option<&CostBreakdown> {
        self.breakdown.iter().find(|b| b.name == self.optimal_network && b.total_cost == self.optimal_cost)
    }
}

impl CostModel {
    /// Radio profile for a network name, or the fallback profile when the
    /// name is unknown.
    pub fn profile_for(&self, name: &str) -> &RadioProfile {
        match self.radio_profiles.get(name) {
            Some(profile) => profile,
            None => {
                warn!("No radio profile for network '{}', using fallback profile", name);
                &self.fallback_profile
            }
        }
    }

    pub fn energy_cost(&self, task: TaskState, candidate: &NetworkCandidate) -> f64 {
        let profile = self.profile_for(&candidate.name);
        let workload = task.workload();
        let tx_rate = profile.tx_power_mw / candidate.bandwidth;
        tx_rate * workload.data_size_mb + profile.idle_power_mw * workload.duration_s + profile.wakeup_energy_mj
    }

    /// Cost breakdown of a single, already validated, candidate.
    pub fn evaluate(&self, task: TaskState, candidate: &NetworkCandidate) -> CostBreakdown {
        let weights = task.weights();
        let energy_cost = self.energy_cost(task, candidate);
        let qos_violated = task.qos_requirement().is_violated_by(candidate.bandwidth, candidate.latency);
        let qos_penalty = if qos_violated { self.qos_penalty } else { 0.0 };
        let total_cost = weights.w_energy * energy_cost + weights.w_qos * qos_penalty;

        debug!(
            "{} for {}: energy={:.3} violated={} total={:.3}",
            candidate.name, task, energy_cost, qos_violated, total_cost
        );

        CostBreakdown {
            name: candidate.name.clone(),
            bandwidth: candidate.bandwidth,
            latency: candidate.latency,
            energy_cost,
            qos_violated,
            qos_penalty,
            total_cost,
        }
    }

    /// Score every candidate and return the minimum-cost one.
    ///
    /// # Errors
    ///
    /// `DecisionError::InvalidInput` when `candidates` is empty or contains a
    /// candidate with non-positive bandwidth or negative latency.
    pub fn select_optimal_network(&self, task: TaskState, candidates: &[NetworkCandidate]) -> Result<Decision, DecisionError> {
        validate_candidates(candidates)?;

        let breakdown: Vec<CostBreakdown> = candidates.iter().map(|c| self.evaluate(task, c)).collect();

        // Strict comparison keeps the first occurrence on ties. A NaN cost
        // never holds the lead against a comparable one.
        let mut best = 0;
        for (index, entry) in breakdown.iter().enumerate().skip(1) {
            let current = breakdown[best].total_cost;
            if entry.total_cost < current || (current.is_nan() && !entry.total_cost.is_nan()) {
                best = index;
            }
        }

        let max_cost = breakdown.iter().map(|b| b.total_cost).fold(f64::NEG_INFINITY, f64::max);
        let optimal_cost = breakdown[best].total_cost;
        // inf - inf when every candidate is equally unbounded
        let cost_spread = match max_cost - optimal_cost {
            spread if spread.is_nan() => 0.0,
            spread => spread,
        };

        Ok(Decision {
            task,
            optimal_network: breakdown[best].name.clone(),
            optimal_cost,
            weights: task.weights(),
            requirement: task.qos_requirement(),
            summary: DecisionSummary {
                networks_evaluated: breakdown.len(),
                cost_spread,
            },
            breakdown,
        })
    }
}

/// Select the optimal network using the built-in cost model.
pub fn select_optimal_network(task: TaskState, candidates: &[NetworkCandidate]) -> Result<Decision, DecisionError> {
    CostModel::default().select_optimal_network(task, candidates)
}

fn validate_candidates(candidates: &[NetworkCandidate]) -> Result<(), DecisionError> {
    if candidates.is_empty() {
        return Err(DecisionError::InvalidInput("No candidate networks supplied".to_string()));
    }

    for (index, candidate) in candidates.iter().enumerate() {
        if !candidate.bandwidth.is_finite() || candidate.bandwidth <= 0.0 {
            return Err(DecisionError::InvalidInput(format!(
                "Candidate {} ('{}') has bandwidth {}, must be positive",
                index, candidate.name, candidate.bandwidth
            )));
        }
        if !candidate.latency.is_finite() || candidate.latency < 0.0 {
            return Err(DecisionError::InvalidInput(format!(
                "Candidate {} ('{}') has latency {}, must be non-negative",
                index, candidate.name, candidate.latency
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(name: &str, bandwidth: f64, latency: f64) -> NetworkCandidate {
        NetworkCandidate::new(name, bandwidth, latency)
    }

    #[test]
    fn idle_monitoring_prefers_ble() {
        let candidates = vec![c("Wi-Fi", 50.0, 15.0), c("BLE", 1.0, 50.0), c("5G", 120.0, 20.0)];
        let decision = select_optimal_network(TaskState::IdleMonitoring, &candidates).unwrap();
        assert_eq!(decision.optimal_network, "BLE");
        assert!(decision.breakdown.iter().all(|b| !b.qos_violated));
    }

    #[test]
    fn data_burst_rejects_slow_ble_and_picks_wifi() {
        let candidates = vec![c("Wi-Fi", 80.0, 12.0), c("4G", 25.0, 45.0), c("BLE", 1.0, 60.0)];
        let decision = select_optimal_network(TaskState::DataBurstAlert, &candidates).unwrap();
        assert_eq!(decision.optimal_network, "Wi-Fi");
        let ble = &decision.breakdown[2];
        assert!(ble.qos_violated);
        assert_eq!(ble.qos_penalty, DEFAULT_QOS_PENALTY);
    }

    #[test]
    fn video_streaming_picks_high_bandwidth_5g() {
        let candidates = vec![c("Wi-Fi", 100.0, 8.0), c("5G", 200.0, 15.0), c("4G", 15.0, 80.0)];
        let decision = select_optimal_network(TaskState::VideoStreaming, &candidates).unwrap();
        assert_eq!(decision.optimal_network, "5G");
        assert!(decision.breakdown[2].qos_violated);
        assert!(!decision.breakdown[0].qos_violated);
    }

    #[test]
    fn empty_candidate_list_is_invalid_for_every_task() {
        for task in TaskState::ALL {
            let result = select_optimal_network(task, &[]);
            assert!(matches!(result, Err(DecisionError::InvalidInput(_))), "{task}");
        }
    }

    #[test]
    fn malformed_candidates_are_invalid() {
        let zero_bw = select_optimal_network(TaskState::IdleMonitoring, &[c("Wi-Fi", 0.0, 10.0)]);
        assert!(matches!(zero_bw, Err(DecisionError::InvalidInput(_))));

        let negative_latency = select_optimal_network(TaskState::IdleMonitoring, &[c("BLE", 1.0, 5.0), c("Wi-Fi", 10.0, -1.0)]);
        assert!(matches!(negative_latency, Err(DecisionError::InvalidInput(_))));

        let nan_bw = select_optimal_network(TaskState::IdleMonitoring, &[c("5G", f64::NAN, 10.0)]);
        assert!(matches!(nan_bw, Err(DecisionError::InvalidInput(_))));
    }

    #[test]
    fn zero_latency_is_accepted() {
        let decision = select_optimal_network(TaskState::DataBurstAlert, &[c("Wi-Fi", 50.0, 0.0)]).unwrap();
        assert_eq!(decision.optimal_network, "Wi-Fi");
    }

    // Degrading to the least-bad network when nothing meets QoS is intended
    // behaviour, not a failure.
    #[test]
    fn all_violating_candidates_still_yield_least_bad_winner() {
        let candidates = vec![c("4G", 15.0, 80.0), c("BLE", 1.0, 60.0), c("Wi-Fi", 20.0, 30.0)];
        let decision = select_optimal_network(TaskState::VideoStreaming, &candidates).unwrap();

        assert!(decision.breakdown.iter().all(|b| b.qos_violated));
        let min = decision.breakdown.iter().map(|b| b.total_cost).fold(f64::INFINITY, f64::min);
        assert_eq!(decision.optimal_cost, min);

        let winner = decision.winner().unwrap();
        assert!(winner.qos_penalty > 0.0);
        assert_eq!(winner.name, "BLE");
    }

    #[test]
    fn decision_is_deterministic() {
        let candidates = vec![c("Wi-Fi", 80.0, 12.0), c("4G", 25.0, 45.0), c("BLE", 1.0, 60.0)];
        let first = select_optimal_network(TaskState::DataBurstAlert, &candidates).unwrap();
        for _ in 0..10 {
            assert_eq!(select_optimal_network(TaskState::DataBurstAlert, &candidates).unwrap(), first);
        }
    }

    #[test]
    fn ties_keep_first_candidate() {
        let candidates = vec![c("Wi-Fi", 50.0, 10.0), c("Wi-Fi", 50.0, 10.0)];
        let decision = select_optimal_network(TaskState::IdleMonitoring, &candidates).unwrap();
        assert_eq!(decision.breakdown[0].total_cost, decision.breakdown[1].total_cost);
        assert!(std::ptr::eq(decision.winner().unwrap(), &decision.breakdown[0]));
    }

    #[test]
    fn violation_strictly_costs_more_than_identical_compliant_link() {
        // Same radio and bandwidth, only latency differs: energy costs are equal.
        let candidates = vec![c("Wi-Fi", 50.0, 120.0), c("Wi-Fi", 50.0, 20.0)];
        let decision = select_optimal_network(TaskState::DataBurstAlert, &candidates).unwrap();
        assert_eq!(decision.breakdown[0].energy_cost, decision.breakdown[1].energy_cost);
        assert!(decision.breakdown[1].total_cost < decision.breakdown[0].total_cost);
        assert_eq!(decision.optimal_cost, decision.breakdown[1].total_cost);
    }

    #[test]
    fn penalty_dominance_flips_at_energy_spread_threshold() {
        // DATA_BURST weights (0.6, 0.4). Compliant 4G costs 0.6 * 52 = 31.2,
        // violating BLE costs 0.6 * 14.5 + 0.4 * P. Crossover at P = 56.25.
        let candidates = vec![c("4G", 25.0, 45.0), c("BLE", 1.0, 60.0)];

        let below = CostModel {
            qos_penalty: 50.0,
            ..CostModel::default()
        };
        let decision = below.select_optimal_network(TaskState::DataBurstAlert, &candidates).unwrap();
        assert_eq!(decision.optimal_network, "BLE");

        let above = CostModel {
            qos_penalty: 60.0,
            ..CostModel::default()
        };
        let decision = above.select_optimal_network(TaskState::DataBurstAlert, &candidates).unwrap();
        assert_eq!(decision.optimal_network, "4G");
    }

    #[test]
    fn energy_cost_uses_technology_profile() {
        let model = CostModel::default();
        // 4G: 1500 mW / 25 Mbps * 0.4 Mb + 20 mW * 1 s + 8 mJ = 52 mJ
        let energy = model.energy_cost(TaskState::DataBurstAlert, &c("4G", 25.0, 45.0));
        assert!((energy - 52.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_network_uses_fallback_profile() {
        let model = CostModel::default();
        let energy = model.energy_cost(TaskState::IdleMonitoring, &c("LoRa", 0.5, 200.0));
        let expected = FALLBACK_PROFILE.tx_power_mw / 0.5 * 0.008 + FALLBACK_PROFILE.idle_power_mw + FALLBACK_PROFILE.wakeup_energy_mj;
        assert!((energy - expected).abs() < 1e-9);
    }

    #[test]
    fn nan_cost_never_wins_over_finite_cost() {
        let model = CostModel {
            fallback_profile: RadioProfile {
                tx_power_mw: f64::NAN,
                ..FALLBACK_PROFILE
            },
            ..CostModel::default()
        };
        let candidates = vec![c("LoRa", 0.5, 200.0), c("BLE", 1.0, 50.0)];
        let decision = model.select_optimal_network(TaskState::IdleMonitoring, &candidates).unwrap();
        assert_eq!(decision.optimal_network, "BLE");
        assert!(decision.optimal_cost.is_finite());
        assert!(decision.breakdown[0].total_cost.is_nan());
    }

    #[test]
    fn unbounded_costs_report_zero_spread() {
        let candidates = vec![c("Wi-Fi", 1e-310, 10.0), c("5G", 1e-310, 10.0)];
        let decision = select_optimal_network(TaskState::VideoStreaming, &candidates).unwrap();
        assert!(decision.optimal_cost.is_infinite());
        assert_eq!(decision.optimal_network, "Wi-Fi");
        assert_eq!(decision.summary.cost_spread, 0.0);
    }

    #[test]
    fn summary_reports_cost_spread() {
        let candidates = vec![c("Wi-Fi", 100.0, 8.0), c("5G", 200.0, 15.0)];
        let decision = select_optimal_network(TaskState::VideoStreaming, &candidates).unwrap();
        assert_eq!(decision.summary.networks_evaluated, 2);
        let expected = decision.breakdown[0].total_cost - decision.breakdown[1].total_cost;
        assert!((decision.summary.cost_spread - expected).abs() < 1e-9);
    }
}
