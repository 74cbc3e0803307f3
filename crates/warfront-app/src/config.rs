use std::{env, path::PathBuf, time::Duration};

use warfront_core::config::SimConfig;
use warfront_core::error::ConfigError;
use warfront_sim::ScenarioId;

// Runtime/driver settings (not simulation tuning).

pub const DEFAULT_TICKS: u64 = 600;

/// JSON file with a full or partial `SimConfig`.
pub fn config_path() -> Option<PathBuf> {
    env::var("WARFRONT_CONFIG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Ticks to run; 0 runs until shut down.
pub fn ticks() -> u64 {
    env::var("WARFRONT_TICKS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TICKS)
}

pub fn scenario() -> ScenarioId {
    env::var("WARFRONT_SCENARIO")
        .ok()
        .and_then(|v| ScenarioId::from_name(&v))
        .unwrap_or(ScenarioId::Skirmish)
}

/// Pace ticks against the wall clock instead of running flat out.
pub fn realtime() -> bool {
    matches!(env::var("WARFRONT_REALTIME").as_deref(), Ok("1") | Ok("true"))
}

pub fn load_sim_config() -> Result<SimConfig, ConfigError> {
    match config_path() {
        Some(path) => SimConfig::from_path(path),
        None => Ok(SimConfig::default()),
    }
}

/// Wall-clock duration of one tick at the configured rate.
pub fn tick_interval(config: &SimConfig) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(config.tick_rate.max(1)))
}
