//! Weapon systems: cooldowns, torpedo lock-on, and firing for personal
//! weapons and turrets.
//!
//! A trigger pull is consumed whether or not the shot goes off. Shots are
//! rejected while cooling down, overheated, out of ammo, or (torpedoes)
//! without a completed lock.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use warfront_ai::steering::angle_between;
use warfront_ai::turret::{barrel_direction, can_fire};
use warfront_core::components::*;
use warfront_core::config::TurretTuning;
use warfront_core::constants::*;
use warfront_core::enums::{ProjectileKind, SeedTag, TurretState, WeaponClass};
use warfront_core::events::{SimEvents, TurretFired};
use warfront_core::types::{look_rotation, Transform, Velocity};

use super::hitscan::{self, Shot};
use crate::rng;
use crate::spatial::SpatialIndex;
use crate::store;

/// Everything needed to put a projectile into the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub owner: Entity,
    pub team: Team,
    pub kind: ProjectileKind,
    pub position: DVec3,
    pub direction: DVec3,
    pub speed: f64,
    pub damage: f64,
    pub life: f64,
    pub blast_radius: f64,
    pub homing: Option<Homing>,
}

pub fn spawn_projectile(world: &mut World, launch: Launch) -> Entity {
    let direction = launch.direction.normalize_or_zero();
    world.spawn((
        Transform::new(launch.position, look_rotation(direction)),
        Velocity {
            linear: direction * launch.speed,
        },
        Projectile {
            kind: launch.kind,
            owner: launch.owner,
            team: launch.team,
            damage: launch.damage,
            life: launch.life,
            speed: launch.speed,
            radius: BOLT_RADIUS,
            blast_radius: launch.blast_radius,
            homing: launch.homing,
            previous_position: launch.position,
            resting: false,
        },
    ))
}

pub fn cooldowns(world: &mut World, dt: f64) {
    for (_, weapon) in world.query_mut::<&mut HitscanWeapon>() {
        weapon.cooldown = (weapon.cooldown - dt).max(0.0);
    }
    for (_, weapon) in world.query_mut::<&mut ProjectileWeapon>() {
        weapon.cooldown = (weapon.cooldown - dt).max(0.0);
    }
    for (_, turret) in world.query_mut::<&mut Turret>() {
        turret.cooldown = (turret.cooldown - dt).max(0.0);
    }
}

fn lock_candidate(
    world: &World,
    index: &SpatialIndex,
    origin: DVec3,
    forward: DVec3,
    team: Team,
    range: f64,
    requested: Option<Entity>,
) -> Option<Entity> {
    let valid = |target: Entity| {
        if !store::is_alive(world, target) || store::team(world, target) == team {
            return false;
        }
        let to_target = store::position(world, target) - origin;
        to_target.length() <= range && angle_between(forward, to_target) <= TORPEDO_SEEKER_CONE
    };
    match requested {
        Some(target) => valid(target).then_some(target),
        None => index
            .query_enemies(origin, range, team)
            .into_iter()
            .map(|n| n.entry.entity)
            .find(|&e| valid(e)),
    }
}

/// Accumulate lock progress while the same target stays in the seeker cone;
/// any change of candidate restarts the lock.
pub fn update_locks(world: &mut World, index: &SpatialIndex, dt: f64) {
    let mut updates: Vec<(Entity, Option<Entity>)> = Vec::new();
    {
        let mut query = world.query::<(&Transform, &Team, &ProjectileWeapon, Option<&Intent>)>();
        for (entity, (transform, team, weapon, intent)) in query.iter() {
            if weapon.kind != ProjectileKind::Torpedo {
                continue;
            }
            let requested = intent.and_then(|i| i.lock_target);
            let candidate = lock_candidate(
                world,
                index,
                transform.position,
                transform.forward(),
                *team,
                weapon.range(),
                requested,
            );
            updates.push((entity, candidate));
        }
    }

    for (entity, candidate) in updates {
        let Ok(mut weapon) = world.get::<&mut ProjectileWeapon>(entity) else {
            continue;
        };
        if weapon.lock_target != candidate {
            weapon.lock_target = candidate;
            weapon.lock_progress = 0.0;
        }
        if weapon.lock_target.is_some() {
            let was_locked = weapon.is_locked();
            weapon.lock_progress = (weapon.lock_progress + dt).min(weapon.lock_time.max(dt));
            if !was_locked && weapon.is_locked() {
                debug!(entity_id = entity.id(), target_id = candidate.map(|t| t.id()), "torpedo lock acquired");
            }
        }
    }
}

fn overheated(world: &World, entity: Entity) -> bool {
    world
        .get::<&WeaponHeat>(entity)
        .map(|h| h.overheated)
        .unwrap_or(false)
}

fn add_heat(world: &mut World, entity: Entity) {
    let Ok(mut heat) = world.get::<&mut WeaponHeat>(entity) else {
        return;
    };
    heat.heat += heat.heat_per_shot;
    heat.since_last_shot = 0.0;
    if heat.heat >= OVERHEAT_THRESHOLD && !heat.overheated {
        heat.overheated = true;
        debug!(entity_id = entity.id(), heat = heat.heat, "weapon overheated");
    }
}

struct Trigger {
    entity: Entity,
    origin: DVec3,
    team: Team,
    aim: DVec3,
    clearance: f64,
}

/// Resolve personal-weapon trigger pulls. Turret operators are skipped;
/// their trigger belongs to the turret.
pub fn fire(world: &mut World, index: &SpatialIndex, events: &mut SimEvents, run_seed: u64, frame: u64) {
    let operators: Vec<Entity> = world
        .query::<&Turret>()
        .iter()
        .filter_map(|(_, t)| t.operator)
        .collect();

    let mut triggers: Vec<Trigger> = Vec::new();
    for (entity, (transform, team, intent, radius)) in
        world.query_mut::<(&Transform, &Team, &mut Intent, Option<&HitRadius>)>()
    {
        if !intent.fire || operators.contains(&entity) {
            continue;
        }
        intent.fire = false;
        triggers.push(Trigger {
            entity,
            origin: transform.position,
            team: *team,
            aim: intent.aim,
            clearance: radius.map(|r| r.0).unwrap_or(0.0) + MUZZLE_CLEARANCE,
        });
    }

    for trigger in triggers {
        if !store::is_alive(world, trigger.entity) || overheated(world, trigger.entity) {
            continue;
        }
        if let Ok(weapon) = world.get::<&HitscanWeapon>(trigger.entity).map(|w| *w) {
            fire_hitscan(world, index, events, &trigger, weapon, run_seed, frame);
        } else if let Ok(weapon) = world.get::<&ProjectileWeapon>(trigger.entity).map(|w| *w) {
            fire_projectile(world, &trigger, weapon);
        }
    }
}

fn fire_hitscan(
    world: &mut World,
    index: &SpatialIndex,
    events: &mut SimEvents,
    trigger: &Trigger,
    weapon: HitscanWeapon,
    run_seed: u64,
    frame: u64,
) {
    if weapon.cooldown > 0.0 {
        return;
    }
    let mut stream = rng::stream(run_seed, trigger.entity, SeedTag::Spread, frame);
    let direction = rng::sample_cone(&mut stream, trigger.aim, weapon.spread);

    if let Ok(mut w) = world.get::<&mut HitscanWeapon>(trigger.entity) {
        w.cooldown = w.fire_interval;
    }
    add_heat(world, trigger.entity);

    hitscan::resolve(
        world,
        index,
        events,
        Shot {
            shooter: Some(trigger.entity),
            team: trigger.team,
            origin: trigger.origin,
            direction,
            range: weapon.range,
            damage: weapon.damage,
            spread: weapon.spread,
            weapon: WeaponClass::Hitscan,
        },
    );
}

fn fire_projectile(world: &mut World, trigger: &Trigger, weapon: ProjectileWeapon) {
    if weapon.cooldown > 0.0 || weapon.ammo == 0 {
        return;
    }
    let homing = match weapon.kind {
        ProjectileKind::Torpedo => {
            let Some(target) = weapon.lock_target.filter(|_| weapon.is_locked()) else {
                return;
            };
            Some(Homing {
                target,
                tracking: weapon.tracking,
            })
        }
        _ => None,
    };

    let aim = trigger.aim.normalize_or_zero();
    let direction = match weapon.kind {
        ProjectileKind::Grenade => (aim + DVec3::Y * GRENADE_LOFT).normalize_or_zero(),
        _ => aim,
    };
    if direction == DVec3::ZERO {
        return;
    }

    let projectile = spawn_projectile(
        world,
        Launch {
            owner: trigger.entity,
            team: trigger.team,
            kind: weapon.kind,
            position: trigger.origin + direction * trigger.clearance,
            direction,
            speed: weapon.muzzle_speed,
            damage: weapon.damage,
            life: weapon.life,
            blast_radius: weapon.blast_radius,
            homing,
        },
    );

    if let Ok(mut w) = world.get::<&mut ProjectileWeapon>(trigger.entity) {
        w.cooldown = w.fire_interval;
        w.ammo = w.ammo.saturating_sub(1);
        if w.kind == ProjectileKind::Torpedo {
            w.lock_progress = 0.0;
        }
    }
    add_heat(world, trigger.entity);
    debug!(
        entity_id = trigger.entity.id(),
        projectile_id = projectile.id(),
        kind = ?weapon.kind,
        "projectile fired"
    );
}

struct TurretShot {
    turret: Entity,
    team: Team,
    origin: DVec3,
    direction: DVec3,
    clearance: f64,
    turret_state: Turret,
}

/// Fire every turret whose gate is open: unmanned turrets in `Firing` with
/// aim error under threshold, manned turrets on their operator's trigger.
pub fn turret_fire(world: &mut World, index: &SpatialIndex, events: &mut SimEvents, tuning: &TurretTuning) {
    let mut shots: Vec<TurretShot> = Vec::new();
    let mut pulled: Vec<Entity> = Vec::new();
    {
        let mut query = world.query::<(&Transform, &Team, &Turret, Option<&HitRadius>)>();
        for (entity, (transform, team, turret, radius)) in query.iter() {
            let ready = match turret.state {
                TurretState::Firing => can_fire(turret.aim_error, tuning.aim_threshold, turret.cooldown),
                TurretState::Manned => {
                    let operator = turret
                        .operator
                        .filter(|&op| world.get::<&Intent>(op).map(|i| i.fire).unwrap_or(false));
                    pulled.extend(operator);
                    operator.is_some() && turret.cooldown <= 0.0
                }
                _ => false,
            };
            if !ready {
                continue;
            }
            shots.push(TurretShot {
                turret: entity,
                team: *team,
                origin: transform.position,
                direction: barrel_direction(turret.base, turret.yaw, turret.pitch),
                clearance: radius.map(|r| r.0).unwrap_or(0.0) + MUZZLE_CLEARANCE,
                turret_state: *turret,
            });
        }
    }

    // The operator's trigger is consumed whether or not the turret was ready.
    for op in pulled {
        if let Ok(mut intent) = world.get::<&mut Intent>(op) {
            intent.fire = false;
        }
    }

    for shot in shots {
        let turret = shot.turret_state;
        if shot.direction == DVec3::ZERO {
            continue;
        }

        if turret.projectile_speed > 0.0 {
            spawn_projectile(
                world,
                Launch {
                    owner: shot.turret,
                    team: shot.team,
                    kind: ProjectileKind::Bolt,
                    position: shot.origin + shot.direction * shot.clearance,
                    direction: shot.direction,
                    speed: turret.projectile_speed,
                    damage: turret.damage,
                    life: turret.range / turret.projectile_speed * tuning.range_hysteresis,
                    blast_radius: 0.0,
                    homing: None,
                },
            );
        } else {
            hitscan::resolve(
                world,
                index,
                events,
                Shot {
                    shooter: Some(shot.turret),
                    team: shot.team,
                    origin: shot.origin,
                    direction: shot.direction,
                    range: turret.range,
                    damage: turret.damage,
                    spread: 0.0,
                    weapon: WeaponClass::Turret,
                },
            );
        }

        if let Ok(mut t) = world.get::<&mut Turret>(shot.turret) {
            t.cooldown = t.fire_interval;
        }
        events.turret_fire.push(TurretFired {
            turret: shot.turret,
            mount: turret.mount,
            origin: shot.origin,
            direction: shot.direction,
            target: turret.target,
        });
    }
}
