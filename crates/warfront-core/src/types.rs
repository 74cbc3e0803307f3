//! Fundamental geometric and simulation types.
//!
//! World axes: x = East, y = Up, z = North. An unrotated entity faces +Z.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of an entity in world space (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub orientation: DQuat,
}

/// Linear velocity in world space (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: DVec3,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Monotonic frame counter (increments by 1 each tick).
    pub frame: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
        }
    }

    /// Unit vector the entity is facing.
    pub fn forward(&self) -> DVec3 {
        self.orientation * DVec3::Z
    }

    /// Unit vector pointing out of the entity's right side.
    pub fn right(&self) -> DVec3 {
        self.orientation * DVec3::NEG_X
    }

    pub fn up(&self) -> DVec3 {
        self.orientation * DVec3::Y
    }

    /// Transform a point given in this entity's local frame into world space.
    pub fn local_to_world(&self, local: DVec3) -> DVec3 {
        self.position + self.orientation * local
    }

    /// Express a world-space direction in this entity's local frame.
    pub fn world_dir_to_local(&self, dir: DVec3) -> DVec3 {
        self.orientation.inverse() * dir
    }

    pub fn distance_to(&self, other: &Transform) -> f64 {
        self.position.distance(other.position)
    }
}

impl Velocity {
    pub const ZERO: Velocity = Velocity {
        linear: DVec3::ZERO,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            linear: DVec3::new(x, y, z),
        }
    }

    pub fn speed(&self) -> f64 {
        self.linear.length()
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.frame += 1;
        self.elapsed_secs += dt;
    }
}

/// Yaw (about +Y, 0 = facing +Z, positive toward +X) of a direction vector.
pub fn yaw_of(dir: DVec3) -> f64 {
    dir.x.atan2(dir.z)
}

/// Pitch (positive = up) of a direction vector.
pub fn pitch_of(dir: DVec3) -> f64 {
    let len = dir.length();
    if len < 1e-9 {
        return 0.0;
    }
    (dir.y / len).clamp(-1.0, 1.0).asin()
}

/// Unit direction from yaw/pitch, inverse of [`yaw_of`] / [`pitch_of`].
pub fn direction_from_angles(yaw: f64, pitch: f64) -> DVec3 {
    let cos_p = pitch.cos();
    DVec3::new(yaw.sin() * cos_p, pitch.sin(), yaw.cos() * cos_p)
}

/// Orientation that faces `dir`, keeping +Y as the up reference.
pub fn look_rotation(dir: DVec3) -> DQuat {
    let dir = dir.normalize_or_zero();
    if dir == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    DQuat::from_rotation_y(yaw_of(dir)) * DQuat::from_rotation_x(-pitch_of(dir))
}

/// Wrap an angle into (-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU);
    wrapped - std::f64::consts::PI
}
