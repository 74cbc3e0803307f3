//! Infantry AI system.
//!
//! Enemies come from the combat index, ally separation from the AI index,
//! objectives from the command posts. The evade reaction uses the
//! entity-id roll, not the seeded stream (see `rng`).

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use warfront_ai::dogfight::TargetInfo;
use warfront_ai::infantry::{self, InfantryContext, InfantryDecision, ObjectiveInfo};
use warfront_ai::steering::separation;
use warfront_core::components::*;
use warfront_core::config::InfantryTuning;
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

pub fn run(world: &mut World, combat: &SpatialIndex, steering: &SpatialIndex, tuning: &InfantryTuning, dt: f64) {
    let mut posts: Vec<(ObjectiveInfo, Team)> = world
        .query::<(&Transform, &CommandPost)>()
        .iter()
        .map(|(entity, (t, post))| {
            (ObjectiveInfo { entity, position: t.position, radius: post.radius }, post.owner)
        })
        .collect();
    posts.sort_by_key(|(info, _)| info.entity.to_bits());

    let mut decisions: Vec<(Entity, InfantryDecision)> = Vec::new();
    {
        let mut query = world.query::<(
            &Transform,
            &Team,
            &Health,
            &InfantryBrain,
            &InfantryTactics,
            Option<&DamageMemory>,
        )>();
        for (entity, (transform, team, health, brain, tactics, memory)) in query.iter() {
            let position = transform.position;

            let target = brain
                .target
                .filter(|&t| {
                    store::is_alive(world, t)
                        && store::team(world, t) != *team
                        && store::position(world, t).distance(position) <= tuning.sight_range
                })
                .map(|t| target_info(world, t));
            let nearest_enemy = combat
                .query_enemies(position, tuning.sight_range, *team)
                .into_iter()
                .find(|n| store::is_alive(world, n.entry.entity))
                .map(|n| target_info(world, n.entry.entity));

            let memory = memory.copied().unwrap_or_default();
            let threat_position = memory
                .last_attacker
                .filter(|&a| store::is_alive(world, a))
                .map(|a| store::position(world, a));

            let objective = posts
                .iter()
                .filter(|(_, owner)| owner != team)
                .map(|(post, _)| (post, post.position.distance(position)))
                .filter(|(_, d)| *d <= tuning.objective_range)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(post, _)| *post);

            let allies: Vec<DVec3> = steering
                .query_allies(position, tuning.separation_radius, *team)
                .into_iter()
                .filter(|n| n.entry.entity != entity)
                .map(|n| n.entry.position)
                .collect();

            let ctx = InfantryContext {
                state: brain.state,
                time_in_state: brain.time_in_state + dt,
                position,
                facing: transform.forward(),
                health: health.current,
                target,
                nearest_enemy,
                since_last_hit: memory.since_last_hit,
                threat_position,
                entity_roll: rng::entity_roll(entity),
                objective,
                separation: separation(position, &allies, tuning.separation_radius),
                traits: brain.traits,
                tactics: *tactics,
                tuning,
                dt,
            };
            decisions.push((entity, infantry::evaluate(&ctx)));
        }
    }

    for (entity, decision) in decisions {
        let Ok((brain, tactics, intent)) =
            world.query_one_mut::<(&mut InfantryBrain, &mut InfantryTactics, Option<&mut Intent>)>(entity)
        else {
            continue;
        };

        if brain.state == decision.state {
            brain.time_in_state += dt;
        } else {
            debug!(entity_id = entity.id(), from = ?brain.state, to = ?decision.state, "infantry state change");
            brain.transition(decision.state);
        }
        brain.target = decision.target;
        *tactics = decision.tactics;

        if let Some(intent) = intent {
            intent.move_dir = decision.move_dir;
            intent.aim = decision.aim;
            intent.fire = decision.fire;
            intent.sprint = decision.sprint;
            intent.dodge |= decision.dodge;
            intent.lock_target = decision.target;
        }
    }
}
