//! Lead-intercept aiming shared by the dogfight AI and turret weapons.
//!
//! Projectiles do not inherit their shooter's velocity, so the relative
//! velocity of the engagement is the target's world velocity.

use glam::DVec3;

use warfront_core::constants::INTERCEPT_EPSILON;

/// Time for a projectile of speed `projectile_speed` to meet a target at
/// relative position `d` moving with relative velocity `dv`.
///
/// Solves `|d + dv·t|² = (s·t)²`, i.e.
/// `(dv·dv − s²)·t² + 2(d·dv)·t + d·d = 0`, and returns the smallest positive
/// root. A near-stationary target degenerates to `|d| / s`.
///
/// Returns `None` when the projectile speed is not positive or no positive
/// root exists (target outruns the projectile); callers then aim straight
/// at the target's current position.
pub fn intercept_time(d: DVec3, dv: DVec3, projectile_speed: f64) -> Option<f64> {
    if !(projectile_speed > INTERCEPT_EPSILON) {
        return None;
    }

    let distance = d.length();
    if distance < INTERCEPT_EPSILON {
        return Some(0.0);
    }

    if dv.length() < INTERCEPT_EPSILON {
        return Some(distance / projectile_speed);
    }

    let a = dv.dot(dv) - projectile_speed * projectile_speed;
    let b = 2.0 * d.dot(dv);
    let c = d.dot(d);

    if a.abs() < INTERCEPT_EPSILON {
        // Target speed equals projectile speed: b·t + c = 0.
        if b.abs() < INTERCEPT_EPSILON {
            return None;
        }
        let t = -c / b;
        return (t > 0.0).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);

    match (t1 > 0.0, t2 > 0.0) {
        (true, true) => Some(t1.min(t2)),
        (true, false) => Some(t1),
        (false, true) => Some(t2),
        (false, false) => None,
    }
}

/// World point to aim at so a projectile fired from `origin` meets the target.
pub fn lead_point(
    origin: DVec3,
    target_position: DVec3,
    target_velocity: DVec3,
    projectile_speed: f64,
) -> Option<DVec3> {
    intercept_time(target_position - origin, target_velocity, projectile_speed)
        .map(|t| target_position + target_velocity * t)
}

/// Unit aim direction toward the lead point, or straight at the target when
/// no intercept solution exists.
pub fn lead_direction(
    origin: DVec3,
    target_position: DVec3,
    target_velocity: DVec3,
    projectile_speed: f64,
) -> DVec3 {
    let point = lead_point(origin, target_position, target_velocity, projectile_speed)
        .unwrap_or(target_position);
    let dir = (point - origin).normalize_or_zero();
    if dir == DVec3::ZERO {
        (target_position - origin).normalize_or_zero()
    } else {
        dir
    }
}
