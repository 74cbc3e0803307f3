//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Aerial dogfighter behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AerialState {
    /// Looking for a target.
    #[default]
    Acquire,
    /// Closing on a target from outside attack range.
    Pursue,
    /// Inside attack range, leading the target and firing.
    Attack,
    /// Overshoot avoidance: extending away before re-engaging.
    BreakOff,
    /// Reactive jinking after taking shield hits.
    Evade,
}

/// Ground infantry behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfantryState {
    #[default]
    Idle,
    /// Closing distance to a sighted enemy.
    MoveTo,
    /// Heading for a command post not held by the unit's team.
    Capture,
    /// Standing and firing at a target.
    Attack,
    /// Circling a target while firing.
    Strafe,
    /// Low health: running away from the nearest threat.
    Flee,
    /// Short sidestep reaction to being hit.
    Evade,
}

/// Turret targeting state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurretState {
    /// No valid target in range.
    #[default]
    Searching,
    /// Slewing toward a target, aim error above threshold.
    Tracking,
    /// Aim error below threshold; firing whenever cooldown allows.
    Firing,
    /// Driven by an operator's intent.
    Manned,
}

/// What a projectile weapon launches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight-flying blaster bolt with segment collision.
    #[default]
    Bolt,
    /// Homing torpedo; requires a completed lock to fire.
    Torpedo,
    /// Ballistic grenade; explodes when its fuse runs out.
    Grenade,
}

/// Weapon category reported in impact events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    Hitscan,
    Projectile(ProjectileKind),
    Turret,
    Blast,
}

/// Capital-ship subsystem type. Destroying one applies a one-time side effect
/// to the parent ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubsystemKind {
    /// Halves the ship's shield regeneration.
    ShieldGenerator,
    /// Reveals the ship's weak points.
    SensorArray,
    /// Zeroes the ship's turn rate.
    Engines,
    /// Stops further fighter launches.
    Hangar,
}

/// Longitudinal hull section of a capital ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HullSection {
    Fore,
    Mid,
    Aft,
}

/// Directional shield arc of a capital ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShieldArc {
    Front,
    Rear,
}

/// Which kind of platform a turret is mounted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurretMount {
    /// Free-standing ground emplacement.
    #[default]
    Emplacement,
    /// Hardpoint on a capital ship hull.
    CapitalShip,
    /// Chin or side gun on a walker.
    Walker,
}

/// Tag mixed into seed derivation so independent random draws of the same
/// entity on the same frame never share a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedTag {
    Spread,
    TurretTracking,
    EvadeRoll,
    Traits,
}

impl SeedTag {
    pub fn as_u64(self) -> u64 {
        match self {
            SeedTag::Spread => 0x5350_5245,
            SeedTag::TurretTracking => 0x5452_4143,
            SeedTag::EvadeRoll => 0x4556_4144,
            SeedTag::Traits => 0x5452_4954,
        }
    }
}
