//! Error type for the decision engine.
//!
//! The simulation engine has no error states; every position and task
//! transition is total. The only failure a caller can observe from the core
//! is a rejected candidate list.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    /// Empty candidate list, or a candidate with non-positive bandwidth or
    /// negative latency. Callers map this to a client-side error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
