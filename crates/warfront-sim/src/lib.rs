//! Simulation engine for WARFRONT.
//!
//! Owns the hecs ECS world, runs the combat systems once per tick in a fixed
//! order, and produces events and snapshots for the caller. Two runs with
//! the same seed, scenario and inputs are identical tick for tick.

pub mod damage;
pub mod engine;
pub mod physics;
pub mod rng;
pub mod scenario;
pub mod spatial;
pub mod store;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use scenario::ScenarioId;
pub use warfront_core as core;

#[cfg(test)]
mod tests;
