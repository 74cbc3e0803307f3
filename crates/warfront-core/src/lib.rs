//! Core types and definitions for the WARFRONT combat kernel.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, input snapshots, events, configuration and constants.
//! It contains no system logic.

pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod input;
pub mod types;

pub use glam;
pub use hecs::Entity;
