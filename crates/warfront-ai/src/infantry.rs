//! Ground infantry finite state machine.
//!
//! Priority each tick: the health-driven `Flee` override, then the reactive
//! `Evade` roll, then proximity (`Attack`/`Strafe`, `MoveTo`), then the
//! objective (`Capture`), then `Idle`.

use glam::DVec3;

use warfront_core::components::{BrainTraits, InfantryTactics};
use warfront_core::config::InfantryTuning;
use warfront_core::enums::InfantryState;
use warfront_core::Entity;

use crate::dogfight::TargetInfo;
use crate::steering::{blend, circle, flatten, flee, seek};

/// Command post the unit is heading for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveInfo {
    pub entity: Entity,
    pub position: DVec3,
    pub radius: f64,
}

pub struct InfantryContext<'a> {
    pub state: InfantryState,
    pub time_in_state: f64,
    pub position: DVec3,
    pub facing: DVec3,
    pub health: f64,
    /// Current target, already checked for liveness by the caller.
    pub target: Option<TargetInfo>,
    /// Nearest enemy inside sight range.
    pub nearest_enemy: Option<TargetInfo>,
    pub since_last_hit: f64,
    /// Where the last hit came from, if the attacker still exists.
    pub threat_position: Option<DVec3>,
    /// Entity-id roll in 0..100.
    pub entity_roll: u64,
    pub objective: Option<ObjectiveInfo>,
    /// Ally repulsion from the steering index.
    pub separation: DVec3,
    pub traits: BrainTraits,
    pub tactics: InfantryTactics,
    pub tuning: &'a InfantryTuning,
    pub dt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfantryDecision {
    pub state: InfantryState,
    pub target: Option<Entity>,
    pub move_dir: DVec3,
    pub aim: DVec3,
    pub fire: bool,
    pub sprint: bool,
    pub dodge: bool,
    pub tactics: InfantryTactics,
}

/// Absolute health below which a unit with `aggression` breaks and runs.
pub fn flee_threshold(aggression: f64, tuning: &InfantryTuning) -> f64 {
    tuning.flee_base + (1.0 - aggression.clamp(0.0, 1.0)) * tuning.flee_span
}

/// Fresh tactical memory for a unit with the given traits.
pub fn initial_tactics(traits: &BrainTraits, tuning: &InfantryTuning) -> InfantryTactics {
    InfantryTactics {
        flee_threshold: flee_threshold(traits.aggression, tuning),
        strafe_sign: 1.0,
        strafe_timer: tuning.strafe_flip_secs,
        evade_timer: 0.0,
        evade_dir: DVec3::ZERO,
        objective: None,
    }
}

pub fn evaluate(ctx: &InfantryContext) -> InfantryDecision {
    let tuning = ctx.tuning;
    let mut tactics = ctx.tactics;
    tactics.evade_timer = (tactics.evade_timer - ctx.dt).max(0.0);
    tactics.objective = ctx.objective.map(|o| o.entity);

    let target = ctx.target.or(ctx.nearest_enemy);
    let facing = flatten(ctx.facing);
    let idle_aim = if facing == DVec3::ZERO { DVec3::Z } else { facing };
    let aim_at = |t: &TargetInfo| {
        let dir = seek(ctx.position, t.position);
        if dir == DVec3::ZERO {
            idle_aim
        } else {
            dir
        }
    };

    // Health override.
    if ctx.health < tactics.flee_threshold {
        let threat = target
            .map(|t| t.position)
            .or(ctx.threat_position);
        let away = threat
            .map(|p| flatten(flee(ctx.position, p)))
            .filter(|d| *d != DVec3::ZERO)
            .unwrap_or(-idle_aim);
        return InfantryDecision {
            state: InfantryState::Flee,
            target: target.map(|t| t.entity),
            move_dir: blend(away, ctx.separation, tuning.separation_weight),
            aim: away,
            fire: false,
            sprint: true,
            dodge: false,
            tactics,
        };
    }

    // Reactive evade: keep rolling until the timer runs out.
    if ctx.state == InfantryState::Evade && tactics.evade_timer > 0.0 {
        return InfantryDecision {
            state: InfantryState::Evade,
            target: target.map(|t| t.entity),
            move_dir: tactics.evade_dir,
            aim: target.as_ref().map(aim_at).unwrap_or(idle_aim),
            fire: false,
            sprint: false,
            dodge: false,
            tactics,
        };
    }
    let recently_hit = ctx.since_last_hit < tuning.evade_trigger;
    let passes_roll = (ctx.entity_roll as f64) < ctx.traits.evasion * 100.0;
    if recently_hit && passes_roll && ctx.state != InfantryState::Evade {
        let threat = ctx.threat_position.or(target.map(|t| t.position));
        let sideways = threat
            .map(|p| circle(p - ctx.position, tactics.strafe_sign))
            .filter(|d| *d != DVec3::ZERO)
            .unwrap_or_else(|| circle(idle_aim, tactics.strafe_sign));
        tactics.evade_timer = tuning.evade_duration;
        tactics.evade_dir = sideways;
        return InfantryDecision {
            state: InfantryState::Evade,
            target: target.map(|t| t.entity),
            move_dir: sideways,
            aim: target.as_ref().map(aim_at).unwrap_or(idle_aim),
            fire: false,
            sprint: false,
            dodge: true,
            tactics,
        };
    }

    if let Some(t) = target {
        let distance = ctx.position.distance(t.position);
        let aim = aim_at(&t);

        if distance <= tuning.attack_range {
            if ctx.traits.aggression > tuning.strafe_aggression {
                tactics.strafe_timer -= ctx.dt;
                if tactics.strafe_timer <= 0.0 {
                    tactics.strafe_sign = -tactics.strafe_sign;
                    tactics.strafe_timer = tuning.strafe_flip_secs;
                }
                let sideways = circle(t.position - ctx.position, tactics.strafe_sign);
                return InfantryDecision {
                    state: InfantryState::Strafe,
                    target: Some(t.entity),
                    move_dir: blend(sideways, ctx.separation, tuning.separation_weight),
                    aim,
                    fire: true,
                    sprint: false,
                    dodge: false,
                    tactics,
                };
            }
            return InfantryDecision {
                state: InfantryState::Attack,
                target: Some(t.entity),
                move_dir: blend(DVec3::ZERO, ctx.separation, tuning.separation_weight),
                aim,
                fire: true,
                sprint: false,
                dodge: false,
                tactics,
            };
        }

        if distance <= tuning.sight_range {
            let toward = flatten(t.position - ctx.position);
            return InfantryDecision {
                state: InfantryState::MoveTo,
                target: Some(t.entity),
                move_dir: blend(toward, ctx.separation, tuning.separation_weight),
                aim,
                fire: false,
                sprint: false,
                dodge: false,
                tactics,
            };
        }
    }

    if let Some(objective) = ctx.objective {
        let offset = objective.position - ctx.position;
        let horizontal = DVec3::new(offset.x, 0.0, offset.z).length();
        // Hold position once comfortably inside the capture radius.
        let toward = if horizontal > objective.radius * 0.5 {
            flatten(offset)
        } else {
            DVec3::ZERO
        };
        let aim = if toward == DVec3::ZERO { idle_aim } else { toward };
        return InfantryDecision {
            state: InfantryState::Capture,
            target: None,
            move_dir: blend(toward, ctx.separation, tuning.separation_weight),
            aim,
            fire: false,
            sprint: horizontal > objective.radius * 4.0,
            dodge: false,
            tactics,
        };
    }

    InfantryDecision {
        state: InfantryState::Idle,
        target: None,
        move_dir: blend(DVec3::ZERO, ctx.separation, tuning.separation_weight),
        aim: idle_aim,
        fire: false,
        sprint: false,
        dodge: false,
        tactics,
    }
}
