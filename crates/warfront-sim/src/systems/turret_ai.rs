//! Turret AI system: operator hand-off, target selection and slewing.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use warfront_ai::intercept::lead_point;
use warfront_ai::turret::{self as aim, TurretLimits};
use warfront_core::components::*;
use warfront_core::config::TurretTuning;
use warfront_core::constants::TURRET_MAN_RANGE;
use warfront_core::enums::{SeedTag, TurretState};
use warfront_core::types::Transform;

use crate::rng;
use crate::spatial::SpatialIndex;
use crate::store;
use crate::world_setup::man_turret;

fn limits(turret: &Turret) -> TurretLimits {
    TurretLimits {
        min_yaw: turret.min_yaw,
        max_yaw: turret.max_yaw,
        min_pitch: turret.min_pitch,
        max_pitch: turret.max_pitch,
    }
}

/// Turret currently operated by `operator`, if any.
pub fn operated_by(world: &World, operator: Entity) -> Option<Entity> {
    let mut query = world.query::<&Turret>();
    let found = query
        .iter()
        .filter(|(_, turret)| turret.operator == Some(operator))
        .map(|(e, _)| e)
        .min_by_key(|e| e.to_bits());
    found
}

/// Resolve interact requests: an operator steps off their turret, anyone
/// else mans the nearest free friendly turret in reach.
pub fn man_turrets(world: &mut World) {
    let requests: Vec<(Entity, DVec3, Team)> = world
        .query::<(&Transform, &Team, &Intent, &Infantry)>()
        .iter()
        .filter(|(_, (_, _, intent, _))| intent.interact)
        .map(|(e, (t, team, _, _))| (e, t.position, *team))
        .collect();

    for (operator, position, team) in requests {
        if let Ok(mut intent) = world.get::<&mut Intent>(operator) {
            intent.interact = false;
        }

        if let Some(current) = operated_by(world, operator) {
            if let Ok(mut turret) = world.get::<&mut Turret>(current) {
                turret.operator = None;
                turret.state = TurretState::Searching;
            }
            debug!(turret_id = current.id(), operator_id = operator.id(), "turret released");
            continue;
        }

        let candidate = {
            let mut query = world.query::<(&Transform, &Team, &Turret)>();
            let found = query
                .iter()
                .filter(|(_, (_, t, turret))| **t == team && turret.operator.is_none())
                .map(|(e, (transform, _, _))| (e, transform.position.distance(position)))
                .filter(|(_, d)| *d <= TURRET_MAN_RANGE)
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.to_bits().cmp(&b.0.to_bits())))
                .map(|(e, _)| e);
            found
        };
        if let Some(turret) = candidate {
            if man_turret(world, turret, operator) {
                debug!(turret_id = turret.id(), operator_id = operator.id(), "turret manned");
            }
        }
    }
}

struct TurretUpdate {
    entity: Entity,
    yaw: f64,
    pitch: f64,
    aim_error: f64,
    target: Option<Entity>,
    state: TurretState,
    operator: Option<Entity>,
}

pub fn run(
    world: &mut World,
    index: &SpatialIndex,
    tuning: &TurretTuning,
    run_seed: u64,
    frame: u64,
    dt: f64,
) {
    let mut updates: Vec<TurretUpdate> = Vec::new();
    {
        let mut query = world.query::<(&Transform, &Team, &Turret)>();
        for (entity, (transform, team, turret)) in query.iter() {
            let origin = transform.position;
            let limits = limits(turret);
            let max_step = turret.rotation_speed * dt;

            let operator = turret.operator.filter(|&o| store::is_alive(world, o));
            if let Some(op) = operator {
                let look = world.get::<&Intent>(op).map(|i| i.aim).unwrap_or(DVec3::Z);
                let aim_point = origin + look.normalize_or_zero() * turret.range.max(1.0);
                let (yaw, pitch, aim_error) = match aim::desired_angles(turret.base, origin, aim_point) {
                    Some((dy, dp)) => {
                        let s = aim::slew(turret.yaw, turret.pitch, dy, dp, &limits, max_step);
                        (s.yaw, s.pitch, s.aim_error)
                    }
                    None => (turret.yaw, turret.pitch, turret.aim_error),
                };
                updates.push(TurretUpdate {
                    entity,
                    yaw,
                    pitch,
                    aim_error,
                    target: None,
                    state: TurretState::Manned,
                    operator,
                });
                continue;
            }
            if turret.operator.is_some() {
                debug!(turret_id = entity.id(), "operator lost");
            }

            let target = turret
                .target
                .filter(|&t| {
                    let distance = store::position(world, t).distance(origin);
                    !aim::target_lost(store::is_alive(world, t), distance, turret.range, tuning.range_hysteresis)
                })
                .or_else(|| {
                    index
                        .query_enemies(origin, turret.range, *team)
                        .into_iter()
                        .find(|n| store::is_alive(world, n.entry.entity))
                        .map(|n| n.entry.entity)
                });

            let Some(target) = target else {
                updates.push(TurretUpdate {
                    entity,
                    yaw: turret.yaw,
                    pitch: turret.pitch,
                    aim_error: f64::INFINITY,
                    target: None,
                    state: TurretState::Searching,
                    operator: None,
                });
                continue;
            };

            let target_position = store::position(world, target);
            let aim_point = if turret.projectile_speed > 0.0 {
                lead_point(origin, target_position, store::velocity(world, target), turret.projectile_speed)
                    .unwrap_or(target_position)
            } else {
                target_position
            };

            let (yaw, pitch, aim_error) = match aim::desired_angles(turret.base, origin, aim_point) {
                Some((mut dy, mut dp)) => {
                    let amplitude = aim::jitter_amplitude(turret.tracking_accuracy, tuning.max_jitter);
                    if amplitude > 0.0 {
                        let mut stream = rng::stream(run_seed, entity, SeedTag::TurretTracking, frame);
                        dy += stream.gen_range(-amplitude..=amplitude);
                        dp += stream.gen_range(-amplitude..=amplitude);
                    }
                    let s = aim::slew(turret.yaw, turret.pitch, dy, dp, &limits, max_step);
                    (s.yaw, s.pitch, s.aim_error)
                }
                None => (turret.yaw, turret.pitch, 0.0),
            };

            updates.push(TurretUpdate {
                entity,
                yaw,
                pitch,
                aim_error,
                target: Some(target),
                state: aim::unmanned_state(true, aim_error < tuning.aim_threshold),
                operator: None,
            });
        }
    }

    for update in updates {
        let Ok(mut turret) = world.get::<&mut Turret>(update.entity) else {
            continue;
        };
        if turret.target != update.target {
            debug!(
                turret_id = update.entity.id(),
                target_id = update.target.map(|t| t.id()),
                "turret target changed"
            );
        }
        turret.yaw = update.yaw;
        turret.pitch = update.pitch;
        turret.aim_error = update.aim_error;
        turret.target = update.target;
        turret.state = update.state;
        turret.operator = update.operator;
    }
}
