//! Events emitted by the simulation for rendering, HUD and objective tracking.
//!
//! Events are pushed during a tick and drained once by the consumer.
//! A drained event is never delivered again.

use glam::DVec3;
use hecs::Entity;

use crate::components::Team;
use crate::enums::*;

/// A weapon hit something (hitscan, projectile, turret or blast).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponImpact {
    pub shooter: Option<Entity>,
    pub target: Entity,
    pub position: DVec3,
    /// Damage after invulnerability checks and weak-point scaling.
    pub damage: f64,
    pub weapon: WeaponClass,
    pub killed: bool,
}

/// A projectile or warhead detonated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub source: Option<Entity>,
    pub position: DVec3,
    pub radius: f64,
    /// Number of targets that took damage.
    pub targets_hit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsystemDestroyed {
    pub ship: Entity,
    pub subsystem: Entity,
    pub kind: SubsystemKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurretFired {
    pub turret: Entity,
    pub mount: TurretMount,
    pub origin: DVec3,
    pub direction: DVec3,
    pub target: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostCaptured {
    pub post: Entity,
    pub previous_owner: Team,
    pub new_owner: Team,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FighterLaunched {
    pub carrier: Entity,
    pub fighter: Entity,
}

/// Append-only queue drained exactly once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: T) {
        self.events.push(event);
    }

    /// Return every queued event and leave the queue empty.
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.events.iter()
    }
}

/// All output queues of the simulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimEvents {
    pub impacts: EventQueue<WeaponImpact>,
    pub explosions: EventQueue<Explosion>,
    pub subsystems_destroyed: EventQueue<SubsystemDestroyed>,
    pub turret_fire: EventQueue<TurretFired>,
    pub posts_captured: EventQueue<PostCaptured>,
    pub fighters_launched: EventQueue<FighterLaunched>,
}

/// Everything drained from [`SimEvents`] in one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainedEvents {
    pub impacts: Vec<WeaponImpact>,
    pub explosions: Vec<Explosion>,
    pub subsystems_destroyed: Vec<SubsystemDestroyed>,
    pub turret_fire: Vec<TurretFired>,
    pub posts_captured: Vec<PostCaptured>,
    pub fighters_launched: Vec<FighterLaunched>,
}

impl SimEvents {
    pub fn drain(&mut self) -> DrainedEvents {
        DrainedEvents {
            impacts: self.impacts.drain(),
            explosions: self.explosions.drain(),
            subsystems_destroyed: self.subsystems_destroyed.drain(),
            turret_fire: self.turret_fire.drain(),
            posts_captured: self.posts_captured.drain(),
            fighters_launched: self.fighters_launched.drain(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.impacts.is_empty()
            && self.explosions.is_empty()
            && self.subsystems_destroyed.is_empty()
            && self.turret_fire.is_empty()
            && self.posts_captured.is_empty()
            && self.fighters_launched.is_empty()
    }
}

impl DrainedEvents {
    pub fn total(&self) -> usize {
        self.impacts.len()
            + self.explosions.len()
            + self.subsystems_destroyed.len()
            + self.turret_fire.len()
            + self.posts_captured.len()
            + self.fighters_launched.len()
    }
}
