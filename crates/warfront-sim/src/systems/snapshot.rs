//! Snapshot system: a serializable, id-sorted summary of the world.
//!
//! This system is read-only. Two runs with the same seed and inputs must
//! produce byte-identical JSON for every tick.

use glam::DVec3;
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use warfront_core::components::*;
use warfront_core::enums::*;
use warfront_core::types::{SimTime, Transform, Velocity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitRole {
    Fighter,
    Infantry,
    CapitalShip,
    Turret,
    Subsystem,
    WeakPoint,
    Combatant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiStateView {
    Aerial(AerialState),
    Infantry(InfantryState),
    Turret(TurretState),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantView {
    pub id: u64,
    pub team: i32,
    pub role: UnitRole,
    pub position: DVec3,
    pub velocity: DVec3,
    pub health: f64,
    /// Shield strength; the sum of both arcs on capital ships.
    pub shield: Option<f64>,
    pub ai_state: Option<AiStateView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u64,
    pub kind: ProjectileKind,
    pub team: i32,
    pub position: DVec3,
    pub velocity: DVec3,
    pub life: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: u64,
    pub position: DVec3,
    pub owner: i32,
    pub progress: f64,
    pub contesting: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub combatants: Vec<CombatantView>,
    pub projectiles: Vec<ProjectileView>,
    pub posts: Vec<PostView>,
}

fn role_of(world: &World, entity: Entity) -> UnitRole {
    if world.get::<&Fighter>(entity).is_ok() {
        UnitRole::Fighter
    } else if world.get::<&Infantry>(entity).is_ok() {
        UnitRole::Infantry
    } else if world.get::<&CapitalShip>(entity).is_ok() {
        UnitRole::CapitalShip
    } else if world.get::<&Turret>(entity).is_ok() {
        UnitRole::Turret
    } else if world.get::<&Subsystem>(entity).is_ok() {
        UnitRole::Subsystem
    } else if world.get::<&WeakPoint>(entity).is_ok() {
        UnitRole::WeakPoint
    } else {
        UnitRole::Combatant
    }
}

fn ai_state_of(world: &World, entity: Entity) -> Option<AiStateView> {
    if let Ok(brain) = world.get::<&AerialBrain>(entity) {
        return Some(AiStateView::Aerial(brain.state));
    }
    if let Ok(brain) = world.get::<&InfantryBrain>(entity) {
        return Some(AiStateView::Infantry(brain.state));
    }
    if let Ok(turret) = world.get::<&Turret>(entity) {
        return Some(AiStateView::Turret(turret.state));
    }
    None
}

fn shield_of(world: &World, entity: Entity) -> Option<f64> {
    if let Ok(shield) = world.get::<&Shield>(entity) {
        return Some(shield.current);
    }
    world
        .get::<&ShieldArcs>(entity)
        .ok()
        .map(|arcs| arcs.front + arcs.rear)
}

pub fn build_snapshot(world: &World, time: &SimTime) -> WorldSnapshot {
    let mut combatants: Vec<CombatantView> = world
        .query::<(&Transform, &Health)>()
        .iter()
        .map(|(entity, (transform, health))| CombatantView {
            id: entity.to_bits().get(),
            team: world.get::<&Team>(entity).map(|t| t.0).unwrap_or(Team::NONE.0),
            role: role_of(world, entity),
            position: transform.position,
            velocity: world
                .get::<&Velocity>(entity)
                .map(|v| v.linear)
                .unwrap_or(DVec3::ZERO),
            health: health.current,
            shield: shield_of(world, entity),
            ai_state: ai_state_of(world, entity),
        })
        .collect();
    combatants.sort_by_key(|c| c.id);

    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Transform, &Velocity, &Projectile)>()
        .iter()
        .map(|(entity, (transform, velocity, projectile))| ProjectileView {
            id: entity.to_bits().get(),
            kind: projectile.kind,
            team: projectile.team.0,
            position: transform.position,
            velocity: velocity.linear,
            life: projectile.life,
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);

    let mut posts: Vec<PostView> = world
        .query::<(&Transform, &CommandPost)>()
        .iter()
        .map(|(entity, (transform, post))| PostView {
            id: entity.to_bits().get(),
            position: transform.position,
            owner: post.owner.0,
            progress: post.progress,
            contesting: post.contesting.0,
        })
        .collect();
    posts.sort_by_key(|p| p.id);

    WorldSnapshot {
        time: *time,
        combatants,
        projectiles,
        posts,
    }
}
