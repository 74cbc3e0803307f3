//! Simulation constants and tuning parameters.
//!
//! Runtime-adjustable values are mirrored in [`crate::config::SimConfig`];
//! the constants here are their defaults.

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the default tick rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World ---

/// Downward acceleration (m/s²) for grenades and characters.
pub const GRAVITY: f64 = 9.81;

/// Height of the flat ground plane.
pub const GROUND_HEIGHT: f64 = 0.0;

/// Entities farther than this from the origin are removed.
pub const WORLD_RADIUS: f64 = 20_000.0;

// --- Spatial index ---

/// Combat index cell size (~2.5x the typical 25 m weapon query).
pub const COMBAT_CELL_SIZE: f64 = 60.0;

/// Steering index cell size (~2.5x the 10 m separation query).
pub const AI_CELL_SIZE: f64 = 25.0;

// --- Damage ---

/// Heat at which a weapon overheats.
pub const OVERHEAT_THRESHOLD: f64 = 100.0;

/// Radius of a bolt for swept collision.
pub const BOLT_RADIUS: f64 = 0.1;

/// Projectiles spawn this far outside the shooter's hit radius.
pub const MUZZLE_CLEARANCE: f64 = 0.5;

/// Maximum hit radius considered when padding projectile queries.
pub const MAX_TARGET_RADIUS: f64 = 60.0;

/// Half-angle (radians) of the torpedo seeker cone used for lock-on.
pub const TORPEDO_SEEKER_CONE: f64 = 0.35;

/// Upward bias added to a thrown grenade's aim before normalizing.
pub const GRENADE_LOFT: f64 = 0.35;

/// Fighters never fly below this altitude above the ground.
pub const FIGHTER_MIN_ALTITUDE: f64 = 5.0;

// --- Lead intercept ---

/// Relative speeds below this are treated as a stationary target.
pub const INTERCEPT_EPSILON: f64 = 1e-6;

// --- Aerial AI ---

pub const AERIAL_ACQUIRE_RANGE: f64 = 2_500.0;
pub const AERIAL_ATTACK_RANGE: f64 = 600.0;
pub const AERIAL_BREAKOFF_DISTANCE: f64 = 80.0;
pub const AERIAL_ATTACK_TIME_CAP: f64 = 6.0;
pub const AERIAL_BREAKOFF_DURATION: f64 = 2.5;
/// Evade when the shield was hit more recently than this (seconds).
pub const AERIAL_EVADE_TRIGGER: f64 = 0.25;
pub const AERIAL_EVADE_DURATION: f64 = 1.5;
/// Wobble frequency (Hz) and amplitude (radians) while evading.
pub const AERIAL_WOBBLE_FREQUENCY: f64 = 1.5;
pub const AERIAL_WOBBLE_AMPLITUDE: f64 = 0.8;
/// Fire only when the nose is within this angle of the lead point.
pub const AERIAL_FIRE_CONE: f64 = 0.12;

// --- Infantry AI ---

pub const INFANTRY_SIGHT_RANGE: f64 = 80.0;
pub const INFANTRY_ATTACK_RANGE: f64 = 45.0;
/// Aggression above which Attack becomes Strafe.
pub const INFANTRY_STRAFE_AGGRESSION: f64 = 0.6;
pub const INFANTRY_STRAFE_FLIP_SECS: f64 = 1.5;
pub const INFANTRY_SEPARATION_RADIUS: f64 = 3.0;
pub const INFANTRY_SEPARATION_WEIGHT: f64 = 0.6;
/// A hit within this window can trigger an evade roll.
pub const INFANTRY_EVADE_TRIGGER: f64 = 0.3;
pub const INFANTRY_EVADE_DURATION: f64 = 0.8;
/// Flee threshold = BASE + (1 - aggression) * SPAN.
pub const INFANTRY_FLEE_BASE: f64 = 20.0;
pub const INFANTRY_FLEE_SPAN: f64 = 30.0;
/// Multiplier used by the entity-id reactive roll.
pub const ENTITY_ROLL_PRIME: u64 = 7919;
/// Search radius for capture objectives.
pub const INFANTRY_OBJECTIVE_RANGE: f64 = 500.0;

// --- Turrets ---

/// Targets beyond this multiple of turret range are dropped.
pub const TURRET_RANGE_HYSTERESIS: f64 = 1.2;
/// Maximum combined yaw+pitch error (radians) that allows firing.
pub const TURRET_AIM_THRESHOLD: f64 = 0.05;
/// Aim jitter (radians) at zero tracking accuracy.
pub const TURRET_MAX_JITTER: f64 = 0.05;
/// An operator must stand this close to an emplacement to man it.
pub const TURRET_MAN_RANGE: f64 = 3.0;

// --- Resources ---

pub const DEFAULT_SHIELD_REGEN_DELAY: f64 = 3.0;
pub const DEFAULT_HEAT_COOL_DELAY: f64 = 0.5;
pub const DEFAULT_STAMINA_REGEN_DELAY: f64 = 1.0;
pub const DEFAULT_DODGE_DURATION: f64 = 0.4;

// --- Capital ships ---

/// Regen multiplier applied once the shield generator is destroyed.
pub const SHIELD_GENERATOR_PENALTY: f64 = 0.5;

// --- Command posts ---

pub const DEFAULT_POST_RADIUS: f64 = 10.0;
pub const DEFAULT_POST_RATE: f64 = 0.25;
