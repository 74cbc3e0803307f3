use glam::{DQuat, DVec3};

use warfront_core::components::{AerialTactics, BrainTraits};
use warfront_core::config::{AerialTuning, InfantryTuning};
use warfront_core::enums::{AerialState, InfantryState, TurretState};
use warfront_core::Entity;

use crate::dogfight::{self, AerialContext, TargetInfo};
use crate::infantry::{self, flee_threshold, InfantryContext, ObjectiveInfo};
use crate::intercept::{intercept_time, lead_direction, lead_point};
use crate::profiles::{jittered, traits_for, SkillTier};
use crate::steering::{angle_between, circle, separation};
use crate::turret::{barrel_direction, can_fire, desired_angles, slew, target_lost, TurretLimits};

fn entity(n: u32) -> Entity {
    Entity::from_bits((1u64 << 32) | n as u64).unwrap()
}

fn target_at(n: u32, position: DVec3) -> TargetInfo {
    TargetInfo {
        entity: entity(n),
        position,
        velocity: DVec3::ZERO,
    }
}

// ---- Intercept ----

#[test]
fn test_intercept_stationary_target() {
    let t = intercept_time(DVec3::new(100.0, 0.0, 0.0), DVec3::ZERO, 500.0).unwrap();
    assert!((t - 0.2).abs() < 1e-9, "expected 0.2 s, got {t}");
}

#[test]
fn test_intercept_zero_speed_has_no_solution() {
    assert_eq!(intercept_time(DVec3::new(100.0, 0.0, 0.0), DVec3::ZERO, 0.0), None);
    assert_eq!(intercept_time(DVec3::new(100.0, 0.0, 0.0), DVec3::X, -5.0), None);
}

#[test]
fn test_intercept_target_outruns_projectile() {
    let t = intercept_time(
        DVec3::new(100.0, 0.0, 0.0),
        DVec3::new(400.0, 0.0, 0.0),
        300.0,
    );
    assert_eq!(t, None);
}

#[test]
fn test_intercept_crossing_target_meets_projectile() {
    let origin = DVec3::ZERO;
    let target = DVec3::new(0.0, 0.0, 200.0);
    let velocity = DVec3::new(50.0, 0.0, 0.0);
    let point = lead_point(origin, target, velocity, 400.0).unwrap();
    let t = intercept_time(target - origin, velocity, 400.0).unwrap();
    // Projectile flight time to the lead point equals the intercept time.
    assert!(((point - origin).length() / 400.0 - t).abs() < 1e-9);
    assert!(point.x > 0.0, "lead point must be ahead of the target");
}

#[test]
fn test_lead_direction_falls_back_to_straight_line() {
    let dir = lead_direction(DVec3::ZERO, DVec3::new(0.0, 0.0, 50.0), DVec3::X * 1000.0, 0.0);
    assert!(dir.distance(DVec3::Z) < 1e-12);
}

// ---- Steering ----

#[test]
fn test_circle_is_horizontal_and_perpendicular() {
    let to_target = DVec3::new(0.0, 3.0, 10.0);
    let side = circle(to_target, 1.0);
    assert_eq!(side.y, 0.0);
    assert!(side.dot(DVec3::Z).abs() < 1e-12);
    assert!(circle(to_target, -1.0).distance(-side) < 1e-12);
}

#[test]
fn test_separation_pushes_away_from_close_allies() {
    let push = separation(DVec3::ZERO, &[DVec3::new(1.0, 0.0, 0.0), DVec3::new(50.0, 0.0, 0.0)], 3.0);
    assert!(push.x < 0.0);
    assert_eq!(push.z, 0.0);
}

// ---- Dogfight ----

fn aerial_context<'a>(tuning: &'a AerialTuning, state: AerialState) -> AerialContext<'a> {
    AerialContext {
        state,
        time_in_state: 0.0,
        position: DVec3::ZERO,
        forward: DVec3::Z,
        target: None,
        candidate: None,
        shield_since_hit: None,
        projectile_speed: 800.0,
        traits: BrainTraits::default(),
        tactics: AerialTactics::default(),
        escape_roll: 0.25,
        tuning,
    }
}

#[test]
fn test_acquire_to_pursue_with_candidate() {
    let tuning = AerialTuning::default();
    let mut ctx = aerial_context(&tuning, AerialState::Acquire);
    ctx.candidate = Some(target_at(2, DVec3::new(0.0, 0.0, 1500.0)));

    let decision = dogfight::evaluate(&ctx);
    assert_eq!(decision.state, AerialState::Pursue);
    assert_eq!(decision.target, Some(entity(2)));
    assert!(!decision.fire);
}

#[test]
fn test_pursue_to_attack_inside_range_fires_on_target() {
    let tuning = AerialTuning::default();
    let mut ctx = aerial_context(&tuning, AerialState::Pursue);
    ctx.target = Some(target_at(2, DVec3::new(0.0, 0.0, tuning.attack_range - 50.0)));

    let decision = dogfight::evaluate(&ctx);
    assert_eq!(decision.state, AerialState::Attack);
    assert!(decision.fire, "nose on a stationary target must fire");
    assert!(angle_between(decision.aim, DVec3::Z) < 1e-9);
}

#[test]
fn test_attack_breaks_off_when_too_close() {
    let tuning = AerialTuning::default();
    let mut ctx = aerial_context(&tuning, AerialState::Attack);
    ctx.target = Some(target_at(2, DVec3::new(0.0, 0.0, tuning.breakoff_distance * 0.5)));

    let decision = dogfight::evaluate(&ctx);
    assert_eq!(decision.state, AerialState::BreakOff);
    assert!(decision.aim.z < 0.0, "break-off turns away from the target");
}

#[test]
fn test_breakoff_returns_to_pursue_after_duration() {
    let tuning = AerialTuning::default();
    let mut ctx = aerial_context(&tuning, AerialState::BreakOff);
    ctx.target = Some(target_at(2, DVec3::new(0.0, 0.0, 300.0)));
    ctx.time_in_state = tuning.breakoff_duration - 0.1;
    assert_eq!(dogfight::evaluate(&ctx).state, AerialState::BreakOff);

    ctx.time_in_state = tuning.breakoff_duration + 0.1;
    assert_eq!(dogfight::evaluate(&ctx).state, AerialState::Pursue);
}

#[test]
fn test_shield_hit_preempts_attack_with_evade() {
    let tuning = AerialTuning::default();
    let mut ctx = aerial_context(&tuning, AerialState::Attack);
    ctx.target = Some(target_at(2, DVec3::new(0.0, 0.0, 300.0)));
    ctx.shield_since_hit = Some(0.0);

    let decision = dogfight::evaluate(&ctx);
    assert_eq!(decision.state, AerialState::Evade);
    assert!(!decision.fire);
    assert_eq!(decision.tactics.evade_side, -1.0);
}

#[test]
fn test_evade_ends_after_duration() {
    let tuning = AerialTuning::default();
    let mut ctx = aerial_context(&tuning, AerialState::Evade);
    ctx.time_in_state = tuning.evade_duration + 0.01;
    ctx.shield_since_hit = Some(0.0);
    assert_eq!(dogfight::evaluate(&ctx).state, AerialState::Acquire);
}

#[test]
fn test_lost_target_returns_to_acquire() {
    let tuning = AerialTuning::default();
    let ctx = aerial_context(&tuning, AerialState::Attack);
    let decision = dogfight::evaluate(&ctx);
    assert_eq!(decision.state, AerialState::Acquire);
    assert_eq!(decision.target, None);
}

// ---- Infantry ----

fn infantry_context<'a>(tuning: &'a InfantryTuning, traits: BrainTraits) -> InfantryContext<'a> {
    InfantryContext {
        state: InfantryState::Idle,
        time_in_state: 0.0,
        position: DVec3::ZERO,
        facing: DVec3::Z,
        health: 100.0,
        target: None,
        nearest_enemy: None,
        since_last_hit: f64::INFINITY,
        threat_position: None,
        entity_roll: 99,
        objective: None,
        separation: DVec3::ZERO,
        traits,
        tactics: infantry::initial_tactics(&traits, tuning),
        tuning,
        dt: 1.0 / 60.0,
    }
}

#[test]
fn test_flee_threshold_formula() {
    let tuning = InfantryTuning::default();
    assert_eq!(flee_threshold(1.0, &tuning), 20.0);
    assert_eq!(flee_threshold(0.0, &tuning), 50.0);
    assert_eq!(flee_threshold(0.5, &tuning), 35.0);
}

#[test]
fn test_flee_overrides_everything() {
    let tuning = InfantryTuning::default();
    let traits = BrainTraits {
        aggression: 0.5,
        ..Default::default()
    };
    let mut ctx = infantry_context(&tuning, traits);
    ctx.health = 30.0;
    ctx.nearest_enemy = Some(target_at(5, DVec3::new(0.0, 0.0, 10.0)));
    ctx.since_last_hit = 0.0;
    ctx.entity_roll = 0;

    let decision = infantry::evaluate(&ctx);
    assert_eq!(decision.state, InfantryState::Flee);
    assert!(!decision.fire);
    assert!(decision.sprint);
    assert!(decision.move_dir.z < 0.0, "flee moves away from the enemy");
}

#[test]
fn test_evade_requires_roll_to_pass() {
    let tuning = InfantryTuning::default();
    let traits = BrainTraits {
        evasion: 0.5,
        aggression: 0.0,
        ..Default::default()
    };
    let mut ctx = infantry_context(&tuning, traits);
    ctx.since_last_hit = 0.0;
    ctx.threat_position = Some(DVec3::new(0.0, 0.0, 30.0));

    ctx.entity_roll = 49;
    let evading = infantry::evaluate(&ctx);
    assert_eq!(evading.state, InfantryState::Evade);
    assert!(evading.dodge);
    assert_eq!(evading.tactics.evade_timer, tuning.evade_duration);

    ctx.entity_roll = 50;
    assert_ne!(infantry::evaluate(&ctx).state, InfantryState::Evade);
}

#[test]
fn test_attack_or_strafe_by_aggression() {
    let tuning = InfantryTuning::default();
    let enemy = target_at(7, DVec3::new(0.0, 0.0, 20.0));

    let mut calm = infantry_context(&tuning, BrainTraits { aggression: 0.4, ..Default::default() });
    calm.nearest_enemy = Some(enemy);
    let decision = infantry::evaluate(&calm);
    assert_eq!(decision.state, InfantryState::Attack);
    assert!(decision.fire);

    let mut hot = infantry_context(&tuning, BrainTraits { aggression: 0.9, ..Default::default() });
    hot.nearest_enemy = Some(enemy);
    let decision = infantry::evaluate(&hot);
    assert_eq!(decision.state, InfantryState::Strafe);
    assert!(decision.fire);
    assert!(decision.move_dir.z.abs() < 1e-9, "strafe moves sideways");
}

#[test]
fn test_strafe_direction_flips_on_timer() {
    let tuning = InfantryTuning::default();
    let mut ctx = infantry_context(&tuning, BrainTraits { aggression: 0.9, ..Default::default() });
    ctx.nearest_enemy = Some(target_at(7, DVec3::new(0.0, 0.0, 20.0)));
    ctx.tactics.strafe_timer = 0.001;

    let decision = infantry::evaluate(&ctx);
    assert_eq!(decision.tactics.strafe_sign, -1.0);
    assert_eq!(decision.tactics.strafe_timer, tuning.strafe_flip_secs);
}

#[test]
fn test_move_to_enemy_in_sight() {
    let tuning = InfantryTuning::default();
    let mut ctx = infantry_context(&tuning, BrainTraits::default());
    ctx.nearest_enemy = Some(target_at(7, DVec3::new(0.0, 0.0, 70.0)));

    let decision = infantry::evaluate(&ctx);
    assert_eq!(decision.state, InfantryState::MoveTo);
    assert!(decision.move_dir.z > 0.9);
    assert!(!decision.fire);
}

#[test]
fn test_capture_moves_to_objective() {
    let tuning = InfantryTuning::default();
    let mut ctx = infantry_context(&tuning, BrainTraits::default());
    ctx.objective = Some(ObjectiveInfo {
        entity: entity(9),
        position: DVec3::new(100.0, 0.0, 0.0),
        radius: 10.0,
    });

    let decision = infantry::evaluate(&ctx);
    assert_eq!(decision.state, InfantryState::Capture);
    assert!(decision.move_dir.x > 0.9);
    assert_eq!(decision.tactics.objective, Some(entity(9)));
}

#[test]
fn test_idle_without_anything_to_do() {
    let tuning = InfantryTuning::default();
    let ctx = infantry_context(&tuning, BrainTraits::default());
    let decision = infantry::evaluate(&ctx);
    assert_eq!(decision.state, InfantryState::Idle);
    assert_eq!(decision.move_dir, DVec3::ZERO);
}

// ---- Turret ----

#[test]
fn test_turret_clamps_to_yaw_limits() {
    let limits = TurretLimits {
        min_yaw: -0.5,
        max_yaw: 0.5,
        min_pitch: -0.1,
        max_pitch: 1.0,
    };
    let mut yaw = 0.0;
    let mut pitch = 0.0;
    let mut error = 0.0;
    for _ in 0..100 {
        let s = slew(yaw, pitch, 2.0, -0.8, &limits, 0.1);
        yaw = s.yaw;
        pitch = s.pitch;
        error = s.aim_error;
    }
    assert!((yaw - 0.5).abs() < 1e-12);
    assert!((pitch + 0.1).abs() < 1e-12);
    assert!(error > 0.05, "target outside limits keeps a large aim error");
}

#[test]
fn test_turret_rotation_rate_limited() {
    let limits = TurretLimits {
        min_yaw: -std::f64::consts::PI,
        max_yaw: std::f64::consts::PI,
        min_pitch: -1.0,
        max_pitch: 1.0,
    };
    let s = slew(0.0, 0.0, 1.0, 0.0, &limits, 0.25);
    assert_eq!(s.yaw, 0.25);
    assert!((s.aim_error - 0.75).abs() < 1e-12);
}

#[test]
fn test_free_turret_takes_short_way_round() {
    let limits = TurretLimits {
        min_yaw: -10.0,
        max_yaw: 10.0,
        min_pitch: -1.0,
        max_pitch: 1.0,
    };
    let s = slew(3.0, 0.0, -3.0, 0.0, &limits, 0.1);
    assert!(s.yaw > 3.0 || s.yaw < -3.0, "wraps through ±π, got {}", s.yaw);
}

#[test]
fn test_desired_angles_and_barrel_agree() {
    let base = DQuat::from_rotation_y(0.7);
    let origin = DVec3::new(5.0, 2.0, -3.0);
    let point = DVec3::new(40.0, 30.0, 80.0);
    let (yaw, pitch) = desired_angles(base, origin, point).unwrap();
    let barrel = barrel_direction(base, yaw, pitch);
    assert!(barrel.distance((point - origin).normalize()) < 1e-9);
    assert_eq!(desired_angles(base, origin, origin), None);
}

#[test]
fn test_fire_gate_requires_aim_and_cooldown() {
    assert!(can_fire(0.01, 0.05, 0.0));
    assert!(!can_fire(0.01, 0.05, 0.1));
    assert!(!can_fire(0.2, 0.05, 0.0));
}

#[test]
fn test_target_lost_with_hysteresis() {
    assert!(!target_lost(true, 110.0, 100.0, 1.2));
    assert!(target_lost(true, 121.0, 100.0, 1.2));
    assert!(target_lost(false, 10.0, 100.0, 1.2));
}

#[test]
fn test_unmanned_state() {
    assert_eq!(crate::turret::unmanned_state(false, false), TurretState::Searching);
    assert_eq!(crate::turret::unmanned_state(true, false), TurretState::Tracking);
    assert_eq!(crate::turret::unmanned_state(true, true), TurretState::Firing);
}

// ---- Profiles ----

#[test]
fn test_jittered_traits_stay_in_range_and_replay() {
    use rand::SeedableRng;

    let base = traits_for(SkillTier::Ace);
    let mut a = rand::rngs::StdRng::seed_from_u64(11);
    let mut b = rand::rngs::StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let ta = jittered(base, 0.3, &mut a);
        let tb = jittered(base, 0.3, &mut b);
        assert_eq!(ta, tb);
        for v in [ta.aggression, ta.accuracy, ta.evasion] {
            assert!((0.0..=1.0).contains(&v));
        }
    }
    assert_eq!(jittered(base, 0.0, &mut a), base);
}

#[test]
fn test_tiers_are_ordered() {
    assert!(traits_for(SkillTier::Recruit).accuracy < traits_for(SkillTier::Regular).accuracy);
    assert!(traits_for(SkillTier::Veteran).accuracy < traits_for(SkillTier::Ace).accuracy);
}
