//! Ground movement for infantry: facing, walk/sprint, dodge, jump and
//! gravity, with collision delegated to the physics collaborator.

use glam::DVec3;
use hecs::World;

use warfront_ai::steering::flatten;
use warfront_core::components::*;
use warfront_core::types::{look_rotation, Transform, Velocity};

use crate::physics::CharacterPhysics;

pub fn run(world: &mut World, physics: &mut dyn CharacterPhysics, gravity: f64, dt: f64) {
    for (_, (transform, velocity, mover, collider, intent, stamina, dodge)) in world.query_mut::<(
        &mut Transform,
        &mut Velocity,
        &mut GroundMover,
        &CharacterCollider,
        &mut Intent,
        Option<&mut Stamina>,
        Option<&mut Dodge>,
    )>() {
        let facing = flatten(intent.aim);
        if facing != DVec3::ZERO {
            transform.orientation = look_rotation(facing);
        }
        let move_dir = flatten(intent.move_dir) * intent.move_dir.length().min(1.0);

        let mut stamina = stamina;
        let mut dodging = None;
        if let Some(dodge) = dodge {
            if intent.dodge && !dodge.is_active() {
                let affordable = stamina.as_deref().map_or(true, |s| s.current >= s.dodge_cost);
                if affordable {
                    if let Some(s) = stamina.as_deref_mut() {
                        s.current -= s.dodge_cost;
                        s.since_drain = 0.0;
                    }
                    let dir = flatten(move_dir);
                    dodge.direction = if dir == DVec3::ZERO { transform.forward() } else { dir };
                    dodge.remaining = dodge.duration;
                }
            }
            if dodge.is_active() {
                dodging = Some(dodge.direction * dodge.speed);
            }
        }

        let horizontal = match dodging {
            Some(v) => v,
            None => {
                let moving = move_dir != DVec3::ZERO;
                let sprinting = intent.sprint
                    && moving
                    && stamina.as_deref().map_or(true, |s| s.current > 0.0);
                if sprinting {
                    if let Some(s) = stamina.as_deref_mut() {
                        s.current = (s.current - s.sprint_cost * dt).max(0.0);
                        s.since_drain = 0.0;
                    }
                    move_dir * mover.sprint_speed
                } else {
                    move_dir * mover.walk_speed
                }
            }
        };

        if intent.jump && mover.grounded {
            mover.vertical_speed = mover.jump_speed;
            mover.grounded = false;
        }
        if !mover.grounded {
            mover.vertical_speed -= gravity * dt;
        }

        let desired = (horizontal + DVec3::Y * mover.vertical_speed) * dt;
        let result = physics.propose_move(collider, transform.position, desired);
        transform.position += result.corrected;
        mover.grounded = result.grounded;
        if mover.grounded && mover.vertical_speed < 0.0 {
            mover.vertical_speed = 0.0;
        }
        velocity.linear = if dt > 0.0 { result.corrected / dt } else { DVec3::ZERO };

        intent.jump = false;
        intent.dodge = false;
    }
}
