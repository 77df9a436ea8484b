//! Decision engine: multi-criteria selection of the network that minimises
//! a task-weighted combination of energy cost and QoS-violation penalty.
//!
//! ## Module Organization
//!
//! - `tables`: per-task weights, QoS requirements, workloads and radio energy profiles
//! - `cost`: the cost model and `select_optimal_network`
//!
//! The engine is stateless; concurrent calls need no coordination.

pub mod cost;
pub mod tables;

pub use cost::{CostBreakdown, CostModel, Decision, DecisionSummary, select_optimal_network};
pub use tables::{QosRequirement, RadioProfile, TaskWeights, Workload};
