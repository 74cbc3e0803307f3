//! Turret aiming math: local yaw/pitch solutions, rate-limited slewing
//! within mount limits, and the fire gate.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};

use warfront_core::enums::TurretState;
use warfront_core::types::{direction_from_angles, pitch_of, wrap_angle, yaw_of};

/// Yaw/pitch travel limits of a mount, in radians relative to its base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurretLimits {
    pub min_yaw: f64,
    pub max_yaw: f64,
    pub min_pitch: f64,
    pub max_pitch: f64,
}

impl TurretLimits {
    /// A yaw span of a full turn or more means the mount rotates freely.
    pub fn full_circle(&self) -> bool {
        self.max_yaw - self.min_yaw >= TAU
    }

    /// Tolerates inverted limits from malformed specs.
    pub fn clamp_yaw(&self, yaw: f64) -> f64 {
        yaw.max(self.min_yaw).min(self.max_yaw)
    }

    pub fn clamp_pitch(&self, pitch: f64) -> f64 {
        pitch.max(self.min_pitch).min(self.max_pitch)
    }
}

/// Result of one slew step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slew {
    pub yaw: f64,
    pub pitch: f64,
    /// |Δyaw| + |Δpitch| between the barrel and the unclamped desired aim.
    pub aim_error: f64,
}

/// Local yaw/pitch that points a barrel at `base` orientation, sitting at
/// `origin`, toward `aim_point`. `None` when the point is at the origin.
pub fn desired_angles(base: DQuat, origin: DVec3, aim_point: DVec3) -> Option<(f64, f64)> {
    let local = base.inverse() * (aim_point - origin);
    let dir = local.normalize_or_zero();
    if dir == DVec3::ZERO {
        return None;
    }
    Some((yaw_of(dir), pitch_of(dir)))
}

/// Rotate toward the desired angles by at most `max_step` radians per axis,
/// clamped to the mount limits.
pub fn slew(
    yaw: f64,
    pitch: f64,
    desired_yaw: f64,
    desired_pitch: f64,
    limits: &TurretLimits,
    max_step: f64,
) -> Slew {
    let max_step = max_step.max(0.0);

    let next_yaw = if limits.full_circle() {
        let delta = wrap_angle(desired_yaw - yaw);
        wrap_angle(yaw + delta.clamp(-max_step, max_step))
    } else {
        let goal = limits.clamp_yaw(desired_yaw);
        let delta = goal - yaw;
        limits.clamp_yaw(yaw + delta.clamp(-max_step, max_step))
    };

    let goal_pitch = limits.clamp_pitch(desired_pitch);
    let next_pitch = limits.clamp_pitch(pitch + (goal_pitch - pitch).clamp(-max_step, max_step));

    Slew {
        yaw: next_yaw,
        pitch: next_pitch,
        aim_error: wrap_angle(desired_yaw - next_yaw).abs() + (desired_pitch - next_pitch).abs(),
    }
}

/// World direction of a barrel at local `yaw`/`pitch` on a mount with
/// orientation `base`.
pub fn barrel_direction(base: DQuat, yaw: f64, pitch: f64) -> DVec3 {
    (base * direction_from_angles(yaw, pitch)).normalize_or_zero()
}

pub fn can_fire(aim_error: f64, threshold: f64, cooldown: f64) -> bool {
    aim_error < threshold && cooldown <= 0.0
}

/// Whether an unmanned turret must drop its current target.
pub fn target_lost(alive: bool, distance: f64, range: f64, hysteresis: f64) -> bool {
    !alive || distance > range * hysteresis
}

/// Aim jitter amplitude for a turret of the given tracking accuracy.
pub fn jitter_amplitude(tracking_accuracy: f64, max_jitter: f64) -> f64 {
    (1.0 - tracking_accuracy.clamp(0.0, 1.0)) * max_jitter
}

/// Display state of an unmanned turret after this tick's slew.
pub fn unmanned_state(has_target: bool, fired: bool) -> TurretState {
    match (has_target, fired) {
        (false, _) => TurretState::Searching,
        (true, false) => TurretState::Tracking,
        (true, true) => TurretState::Firing,
    }
}
