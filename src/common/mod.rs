//! Types and loaders shared by both engines and by callers.
//!
//! - `types`: TaskState, NetworkCandidate, Position
//! - `scene`: base-station layout files (JSON)
//! - `config`: simulator and decision parameters (TOML)

pub mod config;
pub mod scene;
pub mod types;
