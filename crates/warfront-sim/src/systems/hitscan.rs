//! Instant cone test for hitscan shots.

use glam::DVec3;
use hecs::{Entity, World};

use warfront_core::components::{HitRadius, Team};
use warfront_core::constants::MAX_TARGET_RADIUS;
use warfront_core::enums::WeaponClass;
use warfront_core::events::SimEvents;

use crate::damage::{apply_hit, Hit, HitResult};
use crate::spatial::SpatialIndex;
use crate::store;

/// One hitscan shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub shooter: Option<Entity>,
    pub team: Team,
    pub origin: DVec3,
    /// Aim after spread perturbation.
    pub direction: DVec3,
    pub range: f64,
    pub damage: f64,
    /// Cone half-angle added to each target's angular radius.
    pub spread: f64,
    pub weapon: WeaponClass,
}

/// Whether a target of `radius` at `to_target` lies inside the shot cone.
pub fn in_cone(direction: DVec3, to_target: DVec3, radius: f64, spread: f64) -> bool {
    let distance = to_target.length();
    if distance <= radius {
        return true;
    }
    let cos = direction.normalize_or_zero().dot(to_target / distance).clamp(-1.0, 1.0);
    let angular_radius = (radius / distance).min(1.0).asin();
    cos.acos() <= angular_radius + spread
}

/// Test enemy candidates nearest first and damage the first one inside the
/// cone. Returns the entity hit and the damage result; `None` on a miss or
/// when the first match is invulnerable.
pub fn resolve(world: &mut World, index: &SpatialIndex, events: &mut SimEvents, shot: Shot) -> Option<(Entity, HitResult)> {
    if shot.direction == DVec3::ZERO {
        return None;
    }
    let candidates = index.query_enemies(shot.origin, shot.range + MAX_TARGET_RADIUS, shot.team);

    for candidate in candidates {
        let target = candidate.entry.entity;
        if Some(target) == shot.shooter || !store::is_alive(world, target) {
            continue;
        }
        let position = store::position(world, target);
        let radius = world.get::<&HitRadius>(target).map(|r| r.0).unwrap_or(0.0);
        let to_target = position - shot.origin;
        if to_target.length() - radius > shot.range {
            continue;
        }
        if !in_cone(shot.direction, to_target, radius, shot.spread) {
            continue;
        }
        // First match ends the shot, even when the target is mid-dodge.
        let result = apply_hit(
            world,
            events,
            Hit {
                target,
                amount: shot.damage,
                shooter: shot.shooter,
                from: shot.origin,
                point: position - shot.direction * radius.min(to_target.length()),
                weapon: shot.weapon,
            },
        )?;
        return Some((target, result));
    }
    None
}
