//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` when
//! read-only) plus whatever shared engine state they need. They own no
//! state; everything lives in components.

pub mod aerial_ai;
pub mod blast;
pub mod capital;
pub mod cleanup;
pub mod command_post;
pub mod flight;
pub mod ground;
pub mod heat;
pub mod hitscan;
pub mod infantry_ai;
pub mod input;
pub mod projectiles;
pub mod shields;
pub mod snapshot;
pub mod stamina;
pub mod turret_ai;
pub mod weapons;
