//! Tunable battle constants.
//!
//! Defaults reproduce the standard ruleset; a RON document only needs the
//! fields it overrides.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A critical hit lands on a 1-in-N draw.
    pub critical_hit_chance: u32,
    pub critical_multiplier: f64,
    pub stab_multiplier: f64,
    pub wake_chance_percent: u8,
    pub thaw_chance_percent: u8,
    /// Weather ends once it has been active for more than this many upkeeps.
    pub weather_duration: u32,
    pub max_roster_size: usize,
    pub max_moves: usize,
    /// End-of-turn burn and poison damage.
    pub residual_status_damage: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            critical_hit_chance: 16,
            critical_multiplier: 1.5,
            stab_multiplier: 1.5,
            wake_chance_percent: 33,
            thaw_chance_percent: 20,
            weather_duration: 5,
            max_roster_size: 6,
            max_moves: 4,
            residual_status_damage: true,
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.critical_hit_chance == 0 {
            return Err(ConfigError::Invalid(
                "critical_hit_chance must be at least 1".to_string(),
            ));
        }
        if self.wake_chance_percent > 100 || self.thaw_chance_percent > 100 {
            return Err(ConfigError::Invalid(
                "chance percentages must be within 0..=100".to_string(),
            ));
        }
        if self.max_roster_size == 0 || self.max_moves == 0 {
            return Err(ConfigError::Invalid(
                "max_roster_size and max_moves must be at least 1".to_string(),
            ));
        }
        if self.critical_multiplier < 1.0 || self.stab_multiplier < 1.0 {
            return Err(ConfigError::Invalid(
                "multipliers must not reduce damage".to_string(),
            ));
        }
        Ok(())
    }
}
