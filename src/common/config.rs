//! Configuration loading for the simulator.
//!
//! ```toml
//! scene = "scenes/campus.json"
//!
//! [simulation]
//! seed = 42
//! step-size = 10.0
//! movement = "random-walk"
//! shadowing-sigma = 0.0
//! task-probabilities = [0.6, 0.3, 0.1]
//! initial-position = { x = 0.0, y = 0.0 }
//!
//! [decision]
//! qos-penalty = 10000.0
//! ```

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::decision::CostModel;
use crate::simulation::engine::SimulationParameters;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SimulatorConfig {
    /// Scene file with the base-station layout, relative to the config file.
    /// `None` uses the built-in layout.
    pub scene: Option<PathBuf>,
    pub simulation: SimulationParameters,
    pub decision: CostModel,
}

impl SimulatorConfig {
    /// Load configuration from a TOML file.
    ///
    /// Radio profiles listed under `[decision.radio-profiles]` are merged over
    /// the built-in ones, so a file only needs to name what it overrides.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config = Self::parse(&content).with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        if let Some(scene) = &config.scene {
            if scene.is_relative() {
                let base = config_path.parent().unwrap_or(Path::new("."));
                config.scene = Some(base.join(scene));
            }
        }

        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut config: SimulatorConfig = toml::from_str(content)?;

        let mut profiles = CostModel::default().radio_profiles;
        profiles.append(&mut config.decision.radio_profiles);
        config.decision.radio_profiles = profiles;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Err(e) = self.simulation.validate() {
            bail!("Invalid [simulation] section: {}", e);
        }
        if !(self.decision.qos_penalty >= 0.0 && self.decision.qos_penalty.is_finite()) {
            bail!("Invalid qos-penalty {}, must be non-negative", self.decision.qos_penalty);
        }
        for (name, profile) in &self.decision.radio_profiles {
            if !profile.is_valid() {
                bail!("Invalid radio profile for '{}', all figures must be non-negative", name);
            }
        }
        if !self.decision.fallback_profile.is_valid() {
            bail!("Invalid fallback-profile, all figures must be non-negative");
        }
        Ok(())
    }
}
