//! Energy-aware network selection for a single mobile device.
//!
//! Two engines:
//! - `decision`: scores candidate networks under a task-weighted energy/QoS
//!   cost model and picks the cheapest one
//! - `simulation`: moves the device among fixed base stations and derives
//!   which networks are reachable each step
//!
//! They can be used independently (the decision engine accepts any candidate
//! list) or chained through `Simulation::step_with_decision`.

pub mod common;
pub mod decision;
pub mod error;
pub mod simulation;

pub use common::types::{NetworkCandidate, Position, TaskState};
pub use decision::{CostModel, Decision, select_optimal_network};
pub use error::DecisionError;
pub use simulation::{DeviceState, Simulation};
