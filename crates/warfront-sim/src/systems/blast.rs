//! Radius blast with linear falloff.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use warfront_core::components::WeakPoint;
use warfront_core::enums::WeaponClass;
use warfront_core::events::{Explosion, SimEvents};

use crate::damage::{apply_hit, Hit};
use crate::spatial::SpatialIndex;
use crate::store;

/// Damage at `distance` from the centre, falling linearly to zero at `radius`.
pub fn falloff(damage: f64, distance: f64, radius: f64) -> f64 {
    if radius <= 0.0 || distance > radius {
        return 0.0;
    }
    damage * (1.0 - distance / radius).clamp(0.0, 1.0)
}

/// Damage everything inside `radius` of `position`, allies included, and
/// emit one explosion event. Distance is measured to the target's centre.
/// Weak points are skipped.
/// Returns the number of targets damaged.
pub fn detonate(
    world: &mut World,
    index: &SpatialIndex,
    events: &mut SimEvents,
    source: Option<Entity>,
    position: DVec3,
    radius: f64,
    damage: f64,
) -> u32 {
    let targets_hit = blast_area(world, index, events, source, None, position, radius, damage);
    finish(events, source, position, radius, targets_hit)
}

/// Impact detonation: the struck entity sits at the blast centre and takes
/// the full `damage`; everything else falls off with centre distance.
#[allow(clippy::too_many_arguments)]
pub fn detonate_on_contact(
    world: &mut World,
    index: &SpatialIndex,
    events: &mut SimEvents,
    source: Option<Entity>,
    struck: Entity,
    position: DVec3,
    radius: f64,
    damage: f64,
) -> u32 {
    let hit = Hit {
        target: struck,
        amount: damage,
        shooter: source,
        from: position,
        point: position,
        weapon: WeaponClass::Blast,
    };
    let direct = u32::from(apply_hit(world, events, hit).is_some());
    let targets_hit = direct + blast_area(world, index, events, source, Some(struck), position, radius, damage);
    finish(events, source, position, radius, targets_hit)
}

#[allow(clippy::too_many_arguments)]
fn blast_area(
    world: &mut World,
    index: &SpatialIndex,
    events: &mut SimEvents,
    source: Option<Entity>,
    skip: Option<Entity>,
    position: DVec3,
    radius: f64,
    damage: f64,
) -> u32 {
    let mut targets_hit = 0;
    for candidate in index.query_radius(position, radius) {
        let target = candidate.entry.entity;
        if Some(target) == skip {
            continue;
        }
        // Weak points forward to the hull, which the blast reaches directly.
        if !store::is_alive(world, target) || world.get::<&WeakPoint>(target).is_ok() {
            continue;
        }
        let amount = falloff(damage, candidate.distance, radius);
        if amount <= 0.0 {
            continue;
        }
        let hit = Hit {
            target,
            amount,
            shooter: source,
            from: position,
            point: candidate.entry.position,
            weapon: WeaponClass::Blast,
        };
        if apply_hit(world, events, hit).is_some() {
            targets_hit += 1;
        }
    }
    targets_hit
}

fn finish(events: &mut SimEvents, source: Option<Entity>, position: DVec3, radius: f64, targets_hit: u32) -> u32 {
    events.explosions.push(Explosion {
        source,
        position,
        radius,
        targets_hit,
    });
    debug!(source_id = source.map(|s| s.id()), radius, targets_hit, "explosion");
    targets_hit
}
