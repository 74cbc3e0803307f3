//! WARFRONT headless driver.
//!
//! Runs a scenario on a dedicated game-loop thread, forwards player input
//! to the engine over a channel and keeps the latest snapshot available for
//! polling.

pub mod config;
pub mod game_loop;
pub mod state;

pub use warfront_core as core;
