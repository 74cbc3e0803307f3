//! Per-player input snapshot handed to the simulation each tick.

use serde::{Deserialize, Serialize};

/// Raw control state captured by the (external) input layer.
///
/// Axes are in the player's view frame: `move_forward` along the aim yaw,
/// `move_right` perpendicular to it. `fire`, `jump`, `interact` and `dodge`
/// are one-shot: the consuming system reads them once and clears them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub move_forward: f64,
    pub move_right: f64,
    pub aim_yaw: f64,
    pub aim_pitch: f64,
    /// Throttle for piloted craft (0..1).
    pub throttle: f64,
    pub sprint: bool,
    pub fire: bool,
    pub jump: bool,
    pub interact: bool,
    pub dodge: bool,
}
