//! Damage resolution shared by every weapon path.
//!
//! Order of checks for one hit: existence, invulnerability (dodge window),
//! weak-point forwarding, subsystem, capital hull, plain combatant. Shields
//! absorb first and overflow carries into health. An entity whose health
//! reaches zero is removed immediately, together with its children.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::{debug, info};

use warfront_core::components::*;
use warfront_core::enums::{HullSection, ShieldArc, SubsystemKind, WeaponClass};
use warfront_core::events::{SimEvents, SubsystemDestroyed, WeaponImpact};
use warfront_core::types::Transform;

use crate::store;

/// One damage application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub target: Entity,
    pub amount: f64,
    pub shooter: Option<Entity>,
    /// Where the shot came from; picks the shield arc on capital ships.
    pub from: DVec3,
    /// Impact point; picks the hull section on capital ships.
    pub point: DVec3,
    pub weapon: WeaponClass,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Damage dealt after weak-point scaling (shield + health).
    pub damage: f64,
    pub killed: bool,
}

/// Apply a hit and emit its impact event. Returns `None` when the target is
/// gone or invulnerable, in which case nothing happens.
pub fn apply_hit(world: &mut World, events: &mut SimEvents, hit: Hit) -> Option<HitResult> {
    if !world.contains(hit.target) || store::is_invulnerable(world, hit.target) {
        return None;
    }

    let (result, dead) = if let Ok(weak) = world.get::<&WeakPoint>(hit.target).map(|w| *w) {
        damage_weak_point(world, &hit, weak)?
    } else if world.get::<&Subsystem>(hit.target).is_ok() {
        damage_subsystem(world, events, &hit)?
    } else if world.get::<&CapitalShip>(hit.target).is_ok() {
        let result = damage_capital(world, hit.target, &hit, hit.amount, false)?;
        (result, result.killed.then_some(hit.target))
    } else {
        let result = damage_combatant(world, &hit)?;
        (result, result.killed.then_some(hit.target))
    };

    events.impacts.push(WeaponImpact {
        shooter: hit.shooter,
        target: hit.target,
        position: hit.point,
        damage: result.damage,
        weapon: hit.weapon,
        killed: result.killed,
    });

    if let Some(dead) = dead {
        info!(
            target_id = dead.id(),
            shooter_id = hit.shooter.map(|s| s.id()),
            weapon = ?hit.weapon,
            "entity destroyed"
        );
        destroy(world, dead);
    }
    Some(result)
}

/// Remove an entity and its children, detaching it from its parent first.
pub fn destroy(world: &mut World, entity: Entity) -> usize {
    store::detach_child(world, entity);
    store::despawn_with_children(world, entity)
}

fn damage_combatant(world: &mut World, hit: &Hit) -> Option<HitResult> {
    let (health, shield, memory) = world
        .query_one_mut::<(&mut Health, Option<&mut Shield>, Option<&mut DamageMemory>)>(hit.target)
        .ok()?;

    let amount = hit.amount.max(0.0);
    let mut remaining = amount;
    if let Some(shield) = shield {
        shield.since_last_hit = 0.0;
        let absorbed = remaining.min(shield.current.max(0.0));
        shield.current -= absorbed;
        remaining -= absorbed;
    }
    if let Some(memory) = memory {
        memory.since_last_hit = 0.0;
        memory.last_attacker = hit.shooter;
    }

    health.current = (health.current - remaining).max(0.0);
    Some(HitResult {
        damage: amount,
        killed: health.current <= 0.0,
    })
}

/// Forward to the parent hull: amplified and past the shields once revealed.
fn damage_weak_point(world: &mut World, hit: &Hit, weak: WeakPoint) -> Option<(HitResult, Option<Entity>)> {
    let ship = world.get::<&Parent>(hit.target).map(|p| p.entity).ok()?;
    let revealed = world
        .get::<&CapitalShip>(ship)
        .map(|s| s.weak_points_revealed)
        .ok()?;

    let (amount, bypass_shields) = if revealed {
        (hit.amount * weak.multiplier, true)
    } else {
        (hit.amount, false)
    };
    let result = damage_capital(world, ship, hit, amount, bypass_shields)?;
    Some((result, result.killed.then_some(ship)))
}

fn damage_capital(
    world: &mut World,
    ship: Entity,
    hit: &Hit,
    amount: f64,
    bypass_shields: bool,
) -> Option<HitResult> {
    let frame = store::transform(world, ship);
    let (capital, arcs, health) = world
        .query_one_mut::<(&mut CapitalShip, Option<&mut ShieldArcs>, &mut Health)>(ship)
        .ok()?;

    let amount = amount.max(0.0);
    let mut remaining = amount;
    if !bypass_shields {
        if let Some(arcs) = arcs {
            arcs.since_last_hit = 0.0;
            let arc = arc_facing(&frame, hit.from);
            let pool = arcs.arc_mut(arc);
            let absorbed = remaining.min(pool.max(0.0));
            *pool -= absorbed;
            remaining -= absorbed;
        }
    }

    let first = section_at(&frame, capital.length, hit.point);
    for section in [first, HullSection::Mid, HullSection::Fore, HullSection::Aft] {
        if remaining <= 0.0 {
            break;
        }
        let part = capital.hull.section_mut(section);
        let taken = remaining.min(part.current.max(0.0));
        part.current -= taken;
        remaining -= taken;
    }

    health.current = capital.hull.total().max(0.0);
    Some(HitResult {
        damage: amount,
        killed: health.current <= 0.0,
    })
}

fn damage_subsystem(
    world: &mut World,
    events: &mut SimEvents,
    hit: &Hit,
) -> Option<(HitResult, Option<Entity>)> {
    let (subsystem, health, parent) = world
        .query_one_mut::<(&mut Subsystem, &mut Health, Option<&Parent>)>(hit.target)
        .ok()?;

    let amount = hit.amount.max(0.0);
    health.current = (health.current - amount).max(0.0);
    let killed = health.current <= 0.0;
    // Side effect fires only on the enabled -> disabled transition.
    let newly_disabled = killed && !subsystem.disabled;
    if newly_disabled {
        subsystem.disabled = true;
    }
    let kind = subsystem.kind;
    let ship = parent.map(|p| p.entity);

    if newly_disabled {
        if let Some(ship) = ship {
            disable_ship_system(world, ship, kind);
            events.subsystems_destroyed.push(SubsystemDestroyed {
                ship,
                subsystem: hit.target,
                kind,
            });
            info!(ship_id = ship.id(), subsystem_id = hit.target.id(), kind = ?kind, "subsystem destroyed");
        }
    }

    Some((
        HitResult {
            damage: amount,
            killed,
        },
        killed.then_some(hit.target),
    ))
}

/// One-time side effect of losing a subsystem.
pub fn disable_ship_system(world: &mut World, ship: Entity, kind: SubsystemKind) {
    let Ok(mut capital) = world.get::<&mut CapitalShip>(ship) else {
        return;
    };
    match kind {
        SubsystemKind::ShieldGenerator => capital.shield_regen_halved = true,
        SubsystemKind::SensorArray => capital.weak_points_revealed = true,
        SubsystemKind::Engines => capital.turn_rate = 0.0,
        SubsystemKind::Hangar => capital.hangar_disabled = true,
    }
    debug!(ship_id = ship.id(), kind = ?kind, "capital side effect applied");
}

/// Shield arc facing the direction a shot came from.
pub fn arc_facing(frame: &Transform, from: DVec3) -> ShieldArc {
    let local = frame.world_dir_to_local(from - frame.position);
    if local.z >= 0.0 {
        ShieldArc::Front
    } else {
        ShieldArc::Rear
    }
}

/// Hull third containing a world-space impact point.
pub fn section_at(frame: &Transform, length: f64, point: DVec3) -> HullSection {
    let z = frame.world_dir_to_local(point - frame.position).z;
    let sixth = length / 6.0;
    if z > sixth {
        HullSection::Fore
    } else if z < -sixth {
        HullSection::Aft
    } else {
        HullSection::Mid
    }
}
