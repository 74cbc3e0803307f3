//! Combat AI for WARFRONT.
//!
//! Pure decision logic with no ECS dependency: the aerial dogfighter and
//! ground infantry state machines, turret aiming math, the lead-intercept
//! solver and steering helpers. The simulation crate gathers context from
//! the world, calls `evaluate`, and writes the decision into `Intent`.

pub mod dogfight;
pub mod infantry;
pub mod intercept;
pub mod profiles;
pub mod steering;
pub mod turret;

pub use warfront_core as core;

#[cfg(test)]
mod tests;
