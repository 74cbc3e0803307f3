//! Aerial AI system: gathers dogfight context from the world and applies
//! the FSM decision to each fighter's brain and intent.

use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use warfront_ai::dogfight::{self, AerialContext, AerialDecision, TargetInfo};
use warfront_core::components::*;
use warfront_core::config::AerialTuning;
use warfront_core::enums::SeedTag;
use warfront_core::types::Transform;

use crate::rng;
use crate::spatial::SpatialIndex;
use crate::store;

fn target_info(world: &World, entity: Entity) -> TargetInfo {
    TargetInfo {
        entity,
        position: store::position(world, entity),
        velocity: store::velocity(world, entity),
    }
}

pub fn run(
    world: &mut World,
    index: &SpatialIndex,
    tuning: &AerialTuning,
    run_seed: u64,
    frame: u64,
    dt: f64,
) {
    let mut decisions: Vec<(Entity, AerialDecision)> = Vec::new();
    {
        let mut query = world.query::<(
            &Transform,
            &Team,
            &AerialBrain,
            &AerialTactics,
            Option<&Shield>,
            Option<&ProjectileWeapon>,
        )>();
        for (entity, (transform, team, brain, tactics, shield, weapon)) in query.iter() {
            let target = brain
                .target
                .filter(|&t| store::is_alive(world, t) && store::team(world, t) != *team)
                .map(|t| target_info(world, t));
            let candidate = index
                .query_enemies(transform.position, tuning.acquire_range, *team)
                .into_iter()
                .find(|n| n.entry.entity != entity && store::is_alive(world, n.entry.entity))
                .map(|n| target_info(world, n.entry.entity));

            let escape_roll = rng::stream(run_seed, entity, SeedTag::EvadeRoll, frame).gen::<f64>();

            let ctx = AerialContext {
                state: brain.state,
                time_in_state: brain.time_in_state + dt,
                position: transform.position,
                forward: transform.forward(),
                target,
                candidate,
                shield_since_hit: shield.map(|s| s.since_last_hit),
                projectile_speed: weapon.map(|w| w.muzzle_speed).unwrap_or(0.0),
                traits: brain.traits,
                tactics: *tactics,
                escape_roll,
                tuning,
            };
            decisions.push((entity, dogfight::evaluate(&ctx)));
        }
    }

    for (entity, decision) in decisions {
        let Ok((brain, tactics, intent)) =
            world.query_one_mut::<(&mut AerialBrain, &mut AerialTactics, Option<&mut Intent>)>(entity)
        else {
            continue;
        };

        if brain.state == decision.state {
            brain.time_in_state += dt;
        } else {
            debug!(entity_id = entity.id(), from = ?brain.state, to = ?decision.state, "aerial state change");
            brain.transition(decision.state);
        }
        brain.target = decision.target;
        *tactics = decision.tactics;

        if let Some(intent) = intent {
            intent.aim = decision.aim;
            intent.throttle = decision.throttle;
            intent.fire = decision.fire;
            intent.lock_target = decision.target;
        }
    }
}
