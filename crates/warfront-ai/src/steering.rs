//! Small steering helpers used by the behavior state machines.

use glam::{DQuat, DVec3};

/// Unit direction from `from` to `to`, or zero when they coincide.
pub fn seek(from: DVec3, to: DVec3) -> DVec3 {
    (to - from).normalize_or_zero()
}

/// Unit direction from `threat` to `from`.
pub fn flee(from: DVec3, threat: DVec3) -> DVec3 {
    (from - threat).normalize_or_zero()
}

/// Drop the vertical component and renormalize (ground movement).
pub fn flatten(dir: DVec3) -> DVec3 {
    DVec3::new(dir.x, 0.0, dir.z).normalize_or_zero()
}

/// Horizontal direction perpendicular to `to_target`; `sign` picks the side.
pub fn circle(to_target: DVec3, sign: f64) -> DVec3 {
    let flat = flatten(to_target);
    DVec3::Y.cross(flat).normalize_or_zero() * sign.signum()
}

/// Repulsion from nearby allies, weighted by inverse distance.
/// Allies closer than `radius` push harder the closer they are.
pub fn separation(position: DVec3, neighbors: &[DVec3], radius: f64) -> DVec3 {
    let mut push = DVec3::ZERO;
    for &other in neighbors {
        let offset = flatten_raw(position - other);
        let dist = offset.length();
        if dist < 1e-6 || dist > radius {
            continue;
        }
        push += offset / dist * (1.0 - dist / radius);
    }
    push
}

fn flatten_raw(v: DVec3) -> DVec3 {
    DVec3::new(v.x, 0.0, v.z)
}

/// Blend a primary direction with a weighted secondary one and renormalize.
pub fn blend(primary: DVec3, secondary: DVec3, weight: f64) -> DVec3 {
    let mixed = primary + secondary * weight;
    if mixed.length_squared() > 1.0 {
        mixed.normalize()
    } else {
        mixed
    }
}

/// Time-varying jink around `base`: yaw oscillates with `sin`, pitch with a
/// half-amplitude `cos`. `phase` and `side` come from the escape roll.
pub fn wobble(base: DVec3, time: f64, frequency: f64, amplitude: f64, phase: f64, side: f64) -> DVec3 {
    let base = base.normalize_or_zero();
    if base == DVec3::ZERO {
        return base;
    }
    let angle = std::f64::consts::TAU * frequency * time + phase;
    let yaw = angle.sin() * amplitude * side;
    let pitch = angle.cos() * amplitude * 0.5;

    let mut lateral = DVec3::Y.cross(base);
    if lateral.length_squared() < 1e-9 {
        lateral = DVec3::X;
    }
    let lateral = lateral.normalize();

    let rotation = DQuat::from_axis_angle(DVec3::Y, yaw) * DQuat::from_axis_angle(lateral, pitch);
    (rotation * base).normalize_or_zero()
}

/// Angle between two directions in radians (0 when either is zero).
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let a = a.normalize_or_zero();
    let b = b.normalize_or_zero();
    if a == DVec3::ZERO || b == DVec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos()
}
