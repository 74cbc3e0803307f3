//! Capital ships: waypoint steering, composite child placement and hangar
//! launches.

use glam::{DQuat, DVec3};
use hecs::{Entity, World};
use tracing::info;

use warfront_ai::steering::flatten;
use warfront_core::components::*;
use warfront_core::events::{FighterLaunched, SimEvents};
use warfront_core::types::{wrap_angle, yaw_of, Transform, Velocity};

use crate::world_setup::{spawn_fighter, FighterSpec, HangarLoadout};

/// Throttle the ship and yaw it toward its waypoint. The waypoint clears
/// once the ship is within half its length of it.
pub fn movement(world: &mut World, dt: f64) {
    for (_, (transform, velocity, ship)) in
        world.query_mut::<(&mut Transform, &mut Velocity, &mut CapitalShip)>()
    {
        let goal = ship.throttle.clamp(0.0, 1.0) * ship.max_speed;
        let step = ship.acceleration * dt;
        ship.speed += (goal - ship.speed).clamp(-step, step);

        if let Some(waypoint) = ship.waypoint {
            let offset = waypoint - transform.position;
            let horizontal = DVec3::new(offset.x, 0.0, offset.z).length();
            if horizontal <= ship.length * 0.5 {
                ship.waypoint = None;
            } else {
                let heading = flatten(offset);
                let delta = wrap_angle(yaw_of(heading) - yaw_of(transform.forward()));
                let max_turn = ship.turn_rate * dt;
                let turn = delta.clamp(-max_turn, max_turn);
                transform.orientation = (DQuat::from_rotation_y(turn) * transform.orientation).normalize();
            }
        }

        velocity.linear = transform.forward() * ship.speed;
        transform.position += velocity.linear * dt;
    }
}

/// Derive every child's world transform from its parent. Turret bases follow
/// the child orientation.
pub fn child_transforms(world: &mut World) {
    let links: Vec<(Entity, Parent)> = world
        .query::<&Parent>()
        .iter()
        .map(|(e, p)| (e, *p))
        .collect();

    for (child, link) in links {
        let Ok(parent) = world.get::<&Transform>(link.entity).map(|t| *t) else {
            continue;
        };
        let parent_velocity = world
            .get::<&Velocity>(link.entity)
            .map(|v| v.linear)
            .unwrap_or(DVec3::ZERO);
        let placed = Transform::new(
            parent.local_to_world(link.local_offset),
            (parent.orientation * link.local_rotation).normalize(),
        );

        let Ok((transform, velocity, turret)) =
            world.query_one_mut::<(&mut Transform, Option<&mut Velocity>, Option<&mut Turret>)>(child)
        else {
            continue;
        };
        *transform = placed;
        if let Some(velocity) = velocity {
            velocity.linear = parent_velocity;
        }
        if let Some(turret) = turret {
            turret.base = placed.orientation;
        }
    }
}

/// Count down launch timers and spawn fighters from the bay.
pub fn hangar(world: &mut World, events: &mut SimEvents, dt: f64) {
    let mut launches: Vec<(Entity, Transform, Team, FighterSpec)> = Vec::new();
    for (carrier, (transform, team, ship, loadout)) in
        world.query_mut::<(&Transform, &Team, &mut CapitalShip, &HangarLoadout)>()
    {
        if ship.hangar_disabled || ship.hangar.fighters_remaining == 0 {
            continue;
        }
        ship.hangar.launch_timer -= dt;
        if ship.hangar.launch_timer > 0.0 {
            continue;
        }
        ship.hangar.launch_timer += ship.hangar.launch_interval.max(dt);
        ship.hangar.fighters_remaining -= 1;
        let bay = Transform::new(transform.local_to_world(ship.hangar.bay_offset), transform.orientation);
        launches.push((carrier, bay, *team, loadout.0));
    }
    launches.sort_by_key(|(carrier, ..)| carrier.to_bits());

    for (carrier, bay, team, spec) in launches {
        let fighter = spawn_fighter(world, bay, team, &spec);
        events.fighters_launched.push(FighterLaunched { carrier, fighter });
        info!(carrier_id = carrier.id(), fighter_id = fighter.id(), team = team.0, "fighter launched");
    }
}
