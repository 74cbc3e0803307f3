//! Simulated projectiles: homing, ballistic flight, swept collision and
//! expiry.
//!
//! Bolts and torpedoes collide along the segment travelled this tick, so a
//! fast shot cannot tunnel through a target between frames. Grenades never
//! collide; they come to rest on the ground and go off when the fuse runs
//! out.

use glam::DVec3;
use hecs::{Entity, World};

use warfront_ai::intercept::lead_point;
use warfront_core::components::*;
use warfront_core::constants::MAX_TARGET_RADIUS;
use warfront_core::enums::{ProjectileKind, WeaponClass};
use warfront_core::events::SimEvents;
use warfront_core::types::{look_rotation, Transform, Velocity};

use super::blast;
use crate::damage::{apply_hit, Hit};
use crate::spatial::SpatialIndex;
use crate::store;

/// Parameter in `0..=1` of the point on segment `a`→`b` closest to `p`.
pub fn closest_param(a: DVec3, b: DVec3, p: DVec3) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return 0.0;
    }
    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
}

/// Steer `velocity` toward the predicted target position by `tracking`
/// (fraction per tick), keeping `speed`.
pub fn home(position: DVec3, velocity: DVec3, speed: f64, target_position: DVec3, target_velocity: DVec3, tracking: f64) -> DVec3 {
    let aim = lead_point(position, target_position, target_velocity, speed).unwrap_or(target_position);
    let desired = (aim - position).normalize_or_zero() * speed;
    if desired == DVec3::ZERO {
        return velocity;
    }
    let steered = velocity.lerp(desired, tracking.clamp(0.0, 1.0)).normalize_or_zero();
    if steered == DVec3::ZERO {
        desired
    } else {
        steered * speed
    }
}

struct Contact {
    target: Entity,
    point: DVec3,
}

/// First target along `from`→`to`, excluding `owner`.
fn sweep(world: &World, index: &SpatialIndex, projectile: &Projectile, from: DVec3, to: DVec3) -> Option<Contact> {
    let mid = (from + to) * 0.5;
    let reach = from.distance(to) * 0.5 + projectile.radius + MAX_TARGET_RADIUS;

    let mut best: Option<(f64, Contact)> = None;
    for candidate in index.query_enemies(mid, reach, projectile.team) {
        let target = candidate.entry.entity;
        if target == projectile.owner || !store::is_alive(world, target) {
            continue;
        }
        let centre = store::position(world, target);
        let radius = world.get::<&HitRadius>(target).map(|r| r.0).unwrap_or(0.0);
        let t = closest_param(from, to, centre);
        let point = from.lerp(to, t);
        if point.distance(centre) > radius + projectile.radius {
            continue;
        }
        let closer = best.as_ref().map_or(true, |(bt, c)| {
            t < *bt || (t == *bt && target.to_bits() < c.target.to_bits())
        });
        if closer {
            best = Some((t, Contact { target, point }));
        }
    }
    best.map(|(_, c)| c)
}

enum Outcome {
    Fly,
    Hit(Contact),
    Detonate(DVec3),
    Vanish,
}

pub fn run(
    world: &mut World,
    index: &SpatialIndex,
    events: &mut SimEvents,
    gravity: f64,
    ground_height: f64,
    dt: f64,
) {
    let mut ids: Vec<Entity> = world.query::<&Projectile>().iter().map(|(e, _)| e).collect();
    ids.sort_by_key(|e| e.to_bits());

    let mut spent: Vec<Entity> = Vec::new();
    for entity in ids {
        let Ok((transform, velocity, projectile)) = world
            .query_one_mut::<(&Transform, &Velocity, &Projectile)>(entity)
            .map(|(t, v, p)| (*t, *v, *p))
        else {
            continue;
        };
        let mut transform = transform;
        let mut velocity = velocity.linear;
        let mut projectile = projectile;

        if let Some(homing) = projectile.homing {
            if store::is_alive(world, homing.target) {
                velocity = home(
                    transform.position,
                    velocity,
                    projectile.speed,
                    store::position(world, homing.target),
                    store::velocity(world, homing.target),
                    homing.tracking,
                );
            } else {
                projectile.homing = None;
            }
        }

        if projectile.kind == ProjectileKind::Grenade && !projectile.resting {
            velocity.y -= gravity * dt;
        }

        projectile.previous_position = transform.position;
        if !projectile.resting {
            transform.position += velocity * dt;
        }
        projectile.life -= dt;

        let outcome = match projectile.kind {
            ProjectileKind::Grenade => {
                if transform.position.y <= ground_height {
                    transform.position.y = ground_height;
                    velocity = DVec3::ZERO;
                    projectile.resting = true;
                }
                if projectile.life <= 0.0 {
                    Outcome::Detonate(transform.position)
                } else {
                    Outcome::Fly
                }
            }
            ProjectileKind::Bolt | ProjectileKind::Torpedo => {
                match sweep(world, index, &projectile, projectile.previous_position, transform.position) {
                    Some(contact) => Outcome::Hit(contact),
                    None if transform.position.y <= ground_height || projectile.life <= 0.0 => {
                        if projectile.blast_radius > 0.0 {
                            transform.position.y = transform.position.y.max(ground_height);
                            Outcome::Detonate(transform.position)
                        } else {
                            Outcome::Vanish
                        }
                    }
                    None => Outcome::Fly,
                }
            }
        };

        if velocity != DVec3::ZERO {
            transform.orientation = look_rotation(velocity);
        }
        if let Ok((t, v, p)) = world.query_one_mut::<(&mut Transform, &mut Velocity, &mut Projectile)>(entity) {
            *t = transform;
            v.linear = velocity;
            *p = projectile;
        }

        let owner = Some(projectile.owner).filter(|&o| world.contains(o));
        match outcome {
            Outcome::Fly => continue,
            Outcome::Hit(contact) if projectile.blast_radius > 0.0 => {
                blast::detonate_on_contact(
                    world,
                    index,
                    events,
                    owner,
                    contact.target,
                    contact.point,
                    projectile.blast_radius,
                    projectile.damage,
                );
            }
            Outcome::Hit(contact) => {
                let weapon = if world.get::<&Turret>(projectile.owner).is_ok() {
                    WeaponClass::Turret
                } else {
                    WeaponClass::Projectile(projectile.kind)
                };
                apply_hit(
                    world,
                    events,
                    Hit {
                        target: contact.target,
                        amount: projectile.damage,
                        shooter: owner,
                        from: projectile.previous_position,
                        point: contact.point,
                        weapon,
                    },
                );
            }
            Outcome::Detonate(at) => {
                blast::detonate(world, index, events, owner, at, projectile.blast_radius, projectile.damage);
            }
            Outcome::Vanish => {}
        }
        spent.push(entity);
    }

    for entity in spent {
        let _ = world.despawn(entity);
    }
}
