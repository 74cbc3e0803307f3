//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in systems, not
//! components; the few methods here are pure accessors.

use glam::{DQuat, DVec3};
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::enums::*;

// ---- Identity & survivability ----

/// Team membership. `Team::NONE` is the documented default for entities
/// without a team and doubles as "neutral" for command posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Team(pub i32);

impl Team {
    pub const NONE: Team = Team(-1);

    pub fn is_none(self) -> bool {
        self.0 < 0
    }
}

impl Default for Team {
    fn default() -> Self {
        Team::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }
}

/// Collision sphere radius used by every hit test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRadius(pub f64);

/// Personal energy shield. Absorbs damage before health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub current: f64,
    pub max: f64,
    /// Points regenerated per second once regeneration resumes.
    pub regen_rate: f64,
    /// Seconds without a hit before regeneration resumes.
    pub regen_delay: f64,
    pub since_last_hit: f64,
}

impl Shield {
    pub fn full(max: f64, regen_rate: f64, regen_delay: f64) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
            regen_delay,
            since_last_hit: f64::INFINITY,
        }
    }
}

/// Last-hit bookkeeping read by reactive AI triggers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageMemory {
    pub since_last_hit: f64,
    pub last_attacker: Option<Entity>,
}

impl Default for DamageMemory {
    fn default() -> Self {
        Self {
            since_last_hit: f64::INFINITY,
            last_attacker: None,
        }
    }
}

// ---- Weapons ----

/// Instant-hit weapon resolved by a cone test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitscanWeapon {
    /// Seconds until the weapon may fire again.
    pub cooldown: f64,
    /// Cooldown applied after each shot.
    pub fire_interval: f64,
    pub damage: f64,
    pub range: f64,
    /// Half-angle of the spread cone (radians).
    pub spread: f64,
}

/// Launcher for simulated projectiles (bolts, torpedoes, grenades).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileWeapon {
    pub kind: ProjectileKind,
    pub ammo: u32,
    pub cooldown: f64,
    pub fire_interval: f64,
    pub muzzle_speed: f64,
    pub damage: f64,
    /// Projectile life (or grenade fuse) in seconds.
    pub life: f64,
    /// Fraction of the steering error corrected per tick (torpedoes).
    pub tracking: f64,
    /// Seconds a target must be held in the seeker cone to lock.
    pub lock_time: f64,
    pub lock_progress: f64,
    pub lock_target: Option<Entity>,
    /// 0 means the projectile deals direct-hit damage only.
    pub blast_radius: f64,
}

impl ProjectileWeapon {
    pub fn range(&self) -> f64 {
        self.muzzle_speed * self.life
    }

    pub fn is_locked(&self) -> bool {
        self.lock_target.is_some() && self.lock_progress >= self.lock_time
    }
}

/// Heat gauge that gates firing in place of ammunition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponHeat {
    pub heat: f64,
    pub heat_per_shot: f64,
    /// Cooling per second once `cool_delay` has passed without firing.
    pub cool_rate: f64,
    /// Cooling per second while overheated.
    pub overheat_cool_rate: f64,
    pub cool_delay: f64,
    pub since_last_shot: f64,
    pub overheated: bool,
}

impl WeaponHeat {
    pub fn new(heat_per_shot: f64, cool_rate: f64, overheat_cool_rate: f64, cool_delay: f64) -> Self {
        Self {
            heat: 0.0,
            heat_per_shot,
            cool_rate,
            overheat_cool_rate,
            cool_delay,
            since_last_shot: f64::INFINITY,
            overheated: false,
        }
    }
}

/// Steering data of a homing projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homing {
    pub target: Entity,
    pub tracking: f64,
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub owner: Entity,
    pub team: Team,
    pub damage: f64,
    pub life: f64,
    pub speed: f64,
    pub radius: f64,
    pub blast_radius: f64,
    pub homing: Option<Homing>,
    /// Position at the start of the current tick, for swept collision.
    pub previous_position: DVec3,
    /// Grenades come to rest on the ground and wait for their fuse.
    pub resting: bool,
}

// ---- Stamina & dodge ----

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stamina {
    pub current: f64,
    pub max: f64,
    pub regen_rate: f64,
    /// Seconds without any drain before regeneration resumes.
    pub regen_delay: f64,
    pub since_drain: f64,
    /// Drain per second while sprinting.
    pub sprint_cost: f64,
    /// Lump cost of one dodge roll.
    pub dodge_cost: f64,
}

/// Dodge-roll state. While `remaining > 0` the entity is invulnerable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dodge {
    pub remaining: f64,
    pub duration: f64,
    pub speed: f64,
    pub direction: DVec3,
}

impl Dodge {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

// ---- Control ----

/// Input-like intent written by AI or by the player input system and
/// consumed by movement and weapon systems. One-shot flags (`fire`, `jump`,
/// `dodge`, `interact`) are reset by the system that reads them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intent {
    /// Desired horizontal movement (ground) — length ≤ 1.
    pub move_dir: DVec3,
    /// Desired aim / heading direction.
    pub aim: DVec3,
    /// 0..1 throttle for flying craft.
    pub throttle: f64,
    pub fire: bool,
    pub sprint: bool,
    pub jump: bool,
    pub dodge: bool,
    pub interact: bool,
    /// Target designated for seeker lock-on.
    pub lock_target: Option<Entity>,
}

impl Default for Intent {
    fn default() -> Self {
        Self {
            move_dir: DVec3::ZERO,
            aim: DVec3::Z,
            throttle: 0.0,
            fire: false,
            sprint: false,
            jump: false,
            dodge: false,
            interact: false,
            lock_target: None,
        }
    }
}

/// Marks an entity whose intent comes from queued player input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerControlled;

/// Marks an entity driven by an AI brain; these populate the steering index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AiControlled;

/// Marks an aerial fighter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Fighter;

/// Marks a ground infantry unit; only these count toward command-post capture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Infantry;

// ---- AI ----

/// Personality knobs shared by every brain (all in 0..1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrainTraits {
    pub aggression: f64,
    pub accuracy: f64,
    pub evasion: f64,
}

impl Default for BrainTraits {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            accuracy: 0.5,
            evasion: 0.5,
        }
    }
}

/// State + timer + target + traits; one instantiation per combat domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brain<S> {
    pub state: S,
    pub time_in_state: f64,
    pub target: Option<Entity>,
    pub traits: BrainTraits,
}

impl<S: Copy + PartialEq> Brain<S> {
    pub fn new(state: S, traits: BrainTraits) -> Self {
        Self {
            state,
            time_in_state: 0.0,
            target: None,
            traits,
        }
    }

    /// Switch state, resetting the timer only on an actual change.
    pub fn transition(&mut self, next: S) {
        if next != self.state {
            self.state = next;
            self.time_in_state = 0.0;
        }
    }
}

pub type AerialBrain = Brain<AerialState>;
pub type InfantryBrain = Brain<InfantryState>;

/// Evasion parameters rolled when an aerial brain enters Evade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AerialTactics {
    pub evade_phase: f64,
    /// +1 or -1: which way the jink starts.
    pub evade_side: f64,
}

/// Infantry-only tactical memory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfantryTactics {
    /// Absolute health below which the unit flees.
    pub flee_threshold: f64,
    pub strafe_sign: f64,
    pub strafe_timer: f64,
    pub evade_timer: f64,
    pub evade_dir: DVec3,
    pub objective: Option<Entity>,
}

// ---- Movement ----

/// Turn-rate limited flight for fighters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightModel {
    pub speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    /// Radians per second.
    pub turn_rate: f64,
}

/// Character-controller driven ground movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundMover {
    pub walk_speed: f64,
    pub sprint_speed: f64,
    pub jump_speed: f64,
    pub vertical_speed: f64,
    pub grounded: bool,
}

/// Capsule handed to the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterCollider {
    pub radius: f64,
    pub height: f64,
}

// ---- Capital ships ----

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullSections {
    pub fore: Health,
    pub mid: Health,
    pub aft: Health,
}

impl HullSections {
    pub fn section(&self, section: HullSection) -> &Health {
        match section {
            HullSection::Fore => &self.fore,
            HullSection::Mid => &self.mid,
            HullSection::Aft => &self.aft,
        }
    }

    pub fn section_mut(&mut self, section: HullSection) -> &mut Health {
        match section {
            HullSection::Fore => &mut self.fore,
            HullSection::Mid => &mut self.mid,
            HullSection::Aft => &mut self.aft,
        }
    }

    pub fn total(&self) -> f64 {
        self.fore.current + self.mid.current + self.aft.current
    }

    pub fn total_max(&self) -> f64 {
        self.fore.max + self.mid.max + self.aft.max
    }
}

/// Front/rear directional shields of a capital ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldArcs {
    pub front: f64,
    pub rear: f64,
    pub max_per_arc: f64,
    /// Total regen per second, split evenly across both arcs.
    pub regen_rate: f64,
    pub regen_delay: f64,
    pub since_last_hit: f64,
}

impl ShieldArcs {
    pub fn arc(&self, arc: ShieldArc) -> f64 {
        match arc {
            ShieldArc::Front => self.front,
            ShieldArc::Rear => self.rear,
        }
    }

    pub fn arc_mut(&mut self, arc: ShieldArc) -> &mut f64 {
        match arc {
            ShieldArc::Front => &mut self.front,
            ShieldArc::Rear => &mut self.rear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hangar {
    pub fighters_remaining: u32,
    pub launch_interval: f64,
    pub launch_timer: f64,
    /// Launch point in the ship's local frame.
    pub bay_offset: DVec3,
}

/// Root component of a capital ship composite.
#[derive(Debug, Clone, PartialEq)]
pub struct CapitalShip {
    pub hull: HullSections,
    /// Hull length; splits impacts into fore/mid/aft thirds.
    pub length: f64,
    pub throttle: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    pub turn_rate: f64,
    /// World point the ship steers toward, if any.
    pub waypoint: Option<DVec3>,
    pub hangar: Hangar,
    pub weak_points_revealed: bool,
    pub shield_regen_halved: bool,
    pub hangar_disabled: bool,
}

/// Links a child entity to its composite root. The child's transform is
/// derived from the parent every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parent {
    pub entity: Entity,
    pub local_offset: DVec3,
    pub local_rotation: DQuat,
}

/// Children of a composite root, removed together with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Children {
    pub entities: Vec<Entity>,
}

/// Rotating weapon mount (capital-ship hardpoint, emplacement, walker gun).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Turret {
    pub mount: TurretMount,
    pub state: TurretState,
    /// Local yaw/pitch relative to `base` (radians).
    pub yaw: f64,
    pub pitch: f64,
    pub min_yaw: f64,
    pub max_yaw: f64,
    pub min_pitch: f64,
    pub max_pitch: f64,
    /// Radians per second on each axis.
    pub rotation_speed: f64,
    pub damage: f64,
    pub range: f64,
    pub cooldown: f64,
    pub fire_interval: f64,
    pub projectile_speed: f64,
    /// 1 = perfect tracking, 0 = maximum aim jitter.
    pub tracking_accuracy: f64,
    pub target: Option<Entity>,
    /// Angular error between barrel and desired aim after the last slew.
    pub aim_error: f64,
    /// Orientation of the mount the yaw/pitch are relative to.
    pub base: DQuat,
    /// Operator whose intent drives a manned turret.
    pub operator: Option<Entity>,
}

/// Destructible capital-ship system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subsystem {
    pub kind: SubsystemKind,
    pub disabled: bool,
}

/// Hit zone that forwards damage to its parent hull, amplified once revealed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeakPoint {
    pub multiplier: f64,
}

// ---- Objectives ----

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommandPost {
    pub owner: Team,
    /// 0..1 capture progress of `contesting` team.
    pub progress: f64,
    pub radius: f64,
    /// Progress per second while a single team holds the majority.
    pub rate: f64,
    pub contesting: Team,
}
