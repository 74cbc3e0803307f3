//! Runtime configuration for a simulation run.
//!
//! Every field has a default taken from [`crate::constants`], so a config
//! file only needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for scenario-level randomness. Same seed = same simulation.
    pub seed: u64,
    /// Nominal tick rate; the driver may still pass any `dt`.
    pub tick_rate: u32,
    pub gravity: f64,
    pub ground_height: f64,
    pub world_radius: f64,
    pub spatial: SpatialConfig,
    pub aerial: AerialTuning,
    pub infantry: InfantryTuning,
    pub turret: TurretTuning,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    pub combat_cell_size: f64,
    pub ai_cell_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AerialTuning {
    pub acquire_range: f64,
    pub attack_range: f64,
    pub breakoff_distance: f64,
    pub attack_time_cap: f64,
    pub breakoff_duration: f64,
    pub evade_trigger: f64,
    pub evade_duration: f64,
    pub wobble_frequency: f64,
    pub wobble_amplitude: f64,
    pub fire_cone: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfantryTuning {
    pub sight_range: f64,
    pub attack_range: f64,
    pub strafe_aggression: f64,
    pub strafe_flip_secs: f64,
    pub separation_radius: f64,
    pub separation_weight: f64,
    pub evade_trigger: f64,
    pub evade_duration: f64,
    pub flee_base: f64,
    pub flee_span: f64,
    pub objective_range: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretTuning {
    pub range_hysteresis: f64,
    pub aim_threshold: f64,
    pub max_jitter: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
            gravity: GRAVITY,
            ground_height: GROUND_HEIGHT,
            world_radius: WORLD_RADIUS,
            spatial: SpatialConfig::default(),
            aerial: AerialTuning::default(),
            infantry: InfantryTuning::default(),
            turret: TurretTuning::default(),
        }
    }
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            combat_cell_size: COMBAT_CELL_SIZE,
            ai_cell_size: AI_CELL_SIZE,
        }
    }
}

impl Default for AerialTuning {
    fn default() -> Self {
        Self {
            acquire_range: AERIAL_ACQUIRE_RANGE,
            attack_range: AERIAL_ATTACK_RANGE,
            breakoff_distance: AERIAL_BREAKOFF_DISTANCE,
            attack_time_cap: AERIAL_ATTACK_TIME_CAP,
            breakoff_duration: AERIAL_BREAKOFF_DURATION,
            evade_trigger: AERIAL_EVADE_TRIGGER,
            evade_duration: AERIAL_EVADE_DURATION,
            wobble_frequency: AERIAL_WOBBLE_FREQUENCY,
            wobble_amplitude: AERIAL_WOBBLE_AMPLITUDE,
            fire_cone: AERIAL_FIRE_CONE,
        }
    }
}

impl Default for InfantryTuning {
    fn default() -> Self {
        Self {
            sight_range: INFANTRY_SIGHT_RANGE,
            attack_range: INFANTRY_ATTACK_RANGE,
            strafe_aggression: INFANTRY_STRAFE_AGGRESSION,
            strafe_flip_secs: INFANTRY_STRAFE_FLIP_SECS,
            separation_radius: INFANTRY_SEPARATION_RADIUS,
            separation_weight: INFANTRY_SEPARATION_WEIGHT,
            evade_trigger: INFANTRY_EVADE_TRIGGER,
            evade_duration: INFANTRY_EVADE_DURATION,
            flee_base: INFANTRY_FLEE_BASE,
            flee_span: INFANTRY_FLEE_SPAN,
            objective_range: INFANTRY_OBJECTIVE_RANGE,
        }
    }
}

impl Default for TurretTuning {
    fn default() -> Self {
        Self {
            range_hysteresis: TURRET_RANGE_HYSTERESIS,
            aim_threshold: TURRET_AIM_THRESHOLD,
            max_jitter: TURRET_MAX_JITTER,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Seconds per tick at the configured rate.
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    /// Reject values the systems cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::invalid("tick_rate", "must be at least 1"));
        }
        if !(self.spatial.combat_cell_size > 0.0) {
            return Err(ConfigError::invalid(
                "spatial.combat_cell_size",
                format!("must be positive, got {}", self.spatial.combat_cell_size),
            ));
        }
        if !(self.spatial.ai_cell_size > 0.0) {
            return Err(ConfigError::invalid(
                "spatial.ai_cell_size",
                format!("must be positive, got {}", self.spatial.ai_cell_size),
            ));
        }
        if !(self.world_radius > 0.0) {
            return Err(ConfigError::invalid("world_radius", "must be positive"));
        }
        if self.gravity < 0.0 {
            return Err(ConfigError::invalid("gravity", "must not be negative"));
        }
        if self.turret.range_hysteresis < 1.0 {
            return Err(ConfigError::invalid(
                "turret.range_hysteresis",
                "must be at least 1.0",
            ));
        }
        if self.aerial.breakoff_distance >= self.aerial.attack_range {
            return Err(ConfigError::invalid(
                "aerial.breakoff_distance",
                "must be smaller than aerial.attack_range",
            ));
        }
        Ok(())
    }
}
