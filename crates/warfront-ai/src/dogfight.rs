//! Aerial dogfighter finite state machine.
//!
//! `Acquire → Pursue → Attack ⇄ BreakOff`, plus a reactive `Evade` that
//! preempts everything while the craft's shield is taking hits.
//! Pure function over plain data; the ECS side lives in
//! `warfront_sim::systems::aerial_ai`.

use glam::DVec3;

use warfront_core::components::{AerialTactics, BrainTraits};
use warfront_core::config::AerialTuning;
use warfront_core::enums::AerialState;
use warfront_core::Entity;

use crate::intercept::lead_direction;
use crate::steering::{angle_between, seek, wobble};

/// Kinematic snapshot of a potential or current target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub entity: Entity,
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Input to the dogfight FSM for a single craft.
pub struct AerialContext<'a> {
    pub state: AerialState,
    /// Seconds in `state`, including this tick.
    pub time_in_state: f64,
    pub position: DVec3,
    pub forward: DVec3,
    /// Current target, already checked for liveness by the caller.
    pub target: Option<TargetInfo>,
    /// Nearest enemy inside acquire range.
    pub candidate: Option<TargetInfo>,
    /// Seconds since the shield last absorbed a hit; `None` without a shield.
    pub shield_since_hit: Option<f64>,
    pub projectile_speed: f64,
    pub traits: BrainTraits,
    pub tactics: AerialTactics,
    /// Uniform 0..1 escape roll drawn from the seeded generator this tick.
    pub escape_roll: f64,
    pub tuning: &'a AerialTuning,
}

/// Output of the dogfight FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AerialDecision {
    pub state: AerialState,
    pub target: Option<Entity>,
    pub aim: DVec3,
    pub throttle: f64,
    pub fire: bool,
    pub tactics: AerialTactics,
}

/// Evaluate the FSM for one craft.
pub fn evaluate(ctx: &AerialContext) -> AerialDecision {
    let next = next_state(ctx);

    let mut tactics = ctx.tactics;
    if next == AerialState::Evade && ctx.state != AerialState::Evade {
        tactics = roll_escape(ctx.escape_roll);
    }

    let target = match next {
        AerialState::Acquire => None,
        AerialState::Pursue if ctx.state == AerialState::Acquire => ctx.candidate.map(|c| c.entity),
        _ => ctx.target.or(ctx.candidate).map(|t| t.entity),
    };

    // Time in the new state: a transition restarts the clock.
    let time_in_next = if next == ctx.state { ctx.time_in_state } else { 0.0 };
    behave(ctx, next, target, tactics, time_in_next)
}

/// Pick the state for this tick. Reactive triggers first, then
/// proximity/time triggers.
fn next_state(ctx: &AerialContext) -> AerialState {
    let tuning = ctx.tuning;
    let under_fire = ctx
        .shield_since_hit
        .is_some_and(|since| since < tuning.evade_trigger);

    if ctx.state == AerialState::Evade {
        if ctx.time_in_state < tuning.evade_duration {
            return AerialState::Evade;
        }
        return if ctx.target.is_some() {
            AerialState::Pursue
        } else {
            AerialState::Acquire
        };
    }

    if under_fire {
        return AerialState::Evade;
    }

    match ctx.state {
        AerialState::Acquire => {
            if ctx.candidate.is_some() {
                AerialState::Pursue
            } else {
                AerialState::Acquire
            }
        }
        AerialState::Pursue => match ctx.target {
            None => AerialState::Acquire,
            Some(t) if ctx.position.distance(t.position) < tuning.attack_range => {
                AerialState::Attack
            }
            Some(_) => AerialState::Pursue,
        },
        AerialState::Attack => match ctx.target {
            None => AerialState::Acquire,
            Some(t) => {
                let dist = ctx.position.distance(t.position);
                // Aggressive pilots press the attack longer before extending.
                let time_cap = tuning.attack_time_cap * (0.5 + ctx.traits.aggression);
                if dist < tuning.breakoff_distance || ctx.time_in_state > time_cap {
                    AerialState::BreakOff
                } else if dist > tuning.attack_range * 1.5 {
                    AerialState::Pursue
                } else {
                    AerialState::Attack
                }
            }
        },
        AerialState::BreakOff => {
            if ctx.time_in_state < tuning.breakoff_duration {
                AerialState::BreakOff
            } else if ctx.target.is_some() {
                AerialState::Pursue
            } else {
                AerialState::Acquire
            }
        }
        AerialState::Evade => AerialState::Evade,
    }
}

/// Escape roll: starting phase and jink side.
fn roll_escape(roll: f64) -> AerialTactics {
    let roll = roll.clamp(0.0, 1.0);
    AerialTactics {
        evade_phase: roll * std::f64::consts::TAU,
        evade_side: if roll < 0.5 { -1.0 } else { 1.0 },
    }
}

fn behave(
    ctx: &AerialContext,
    state: AerialState,
    target: Option<Entity>,
    tactics: AerialTactics,
    time_in_state: f64,
) -> AerialDecision {
    let tuning = ctx.tuning;
    let target_info = ctx
        .target
        .filter(|t| Some(t.entity) == target)
        .or_else(|| ctx.candidate.filter(|c| Some(c.entity) == target));

    let (aim, throttle, fire) = match (state, target_info) {
        (AerialState::Pursue, Some(t)) => (seek(ctx.position, t.position), 1.0, false),
        (AerialState::Attack, Some(t)) => {
            let aim = lead_direction(ctx.position, t.position, t.velocity, ctx.projectile_speed);
            // Steadier hands open the firing cone.
            let cone = tuning.fire_cone * (0.5 + ctx.traits.accuracy);
            let on_target = angle_between(ctx.forward, aim) < cone;
            (aim, 0.8, on_target)
        }
        (AerialState::BreakOff, Some(t)) => {
            let away = (ctx.position - t.position).normalize_or_zero();
            let aim = (away + DVec3::Y * 0.3).normalize_or_zero();
            (if aim == DVec3::ZERO { ctx.forward } else { aim }, 1.0, false)
        }
        (AerialState::Evade, _) => {
            let base = target_info
                .map(|t| seek(ctx.position, t.position))
                .filter(|d| *d != DVec3::ZERO)
                .unwrap_or(ctx.forward);
            let amplitude = tuning.wobble_amplitude * (0.5 + ctx.traits.evasion);
            let aim = wobble(
                base,
                time_in_state,
                tuning.wobble_frequency,
                amplitude,
                tactics.evade_phase,
                tactics.evade_side,
            );
            (aim, 1.0, false)
        }
        _ => (ctx.forward, 0.6, false),
    };

    AerialDecision {
        state,
        target,
        aim,
        throttle,
        fire,
        tactics,
    }
}
