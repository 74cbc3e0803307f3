//! Read helpers over the hecs world with documented defaults.
//!
//! Systems never fail on a missing component: position reads as the origin,
//! velocity as zero, team as `Team::NONE`, brain target as `None`.

use glam::DVec3;
use hecs::{Entity, World};

use warfront_core::components::*;
use warfront_core::types::{Transform, Velocity};

/// Entity exists and, if it has health, is above zero.
pub fn is_alive(world: &World, entity: Entity) -> bool {
    if !world.contains(entity) {
        return false;
    }
    match world.get::<&Health>(entity) {
        Ok(health) => health.current > 0.0,
        Err(_) => true,
    }
}

pub fn position(world: &World, entity: Entity) -> DVec3 {
    world
        .get::<&Transform>(entity)
        .map(|t| t.position)
        .unwrap_or(DVec3::ZERO)
}

pub fn transform(world: &World, entity: Entity) -> Transform {
    world
        .get::<&Transform>(entity)
        .map(|t| *t)
        .unwrap_or_default()
}

pub fn velocity(world: &World, entity: Entity) -> DVec3 {
    world
        .get::<&Velocity>(entity)
        .map(|v| v.linear)
        .unwrap_or(DVec3::ZERO)
}

pub fn team(world: &World, entity: Entity) -> Team {
    world.get::<&Team>(entity).map(|t| *t).unwrap_or(Team::NONE)
}

pub fn health(world: &World, entity: Entity) -> f64 {
    world.get::<&Health>(entity).map(|h| h.current).unwrap_or(0.0)
}

/// Current target of whatever brain or turret the entity carries.
pub fn target_of(world: &World, entity: Entity) -> Option<Entity> {
    if let Ok(brain) = world.get::<&AerialBrain>(entity) {
        return brain.target;
    }
    if let Ok(brain) = world.get::<&InfantryBrain>(entity) {
        return brain.target;
    }
    if let Ok(turret) = world.get::<&Turret>(entity) {
        return turret.target;
    }
    None
}

/// Mid-dodge entities take no damage from any source.
pub fn is_invulnerable(world: &World, entity: Entity) -> bool {
    world
        .get::<&Dodge>(entity)
        .map(|d| d.is_active())
        .unwrap_or(false)
}

/// Composite root of a child, or the entity itself.
pub fn root_of(world: &World, entity: Entity) -> Entity {
    world
        .get::<&Parent>(entity)
        .map(|p| p.entity)
        .unwrap_or(entity)
}

/// Despawn an entity and, recursively, every child it lists. Returns the
/// number of entities removed.
pub fn despawn_with_children(world: &mut World, entity: Entity) -> usize {
    let children = world
        .get::<&Children>(entity)
        .map(|c| c.entities.clone())
        .unwrap_or_default();

    let mut removed = 0;
    for child in children {
        removed += despawn_with_children(world, child);
    }
    if world.despawn(entity).is_ok() {
        removed += 1;
    }
    removed
}

/// Drop `child` from its parent's child list (used when a child dies alone).
pub fn detach_child(world: &mut World, child: Entity) {
    let parent = match world.get::<&Parent>(child) {
        Ok(p) => p.entity,
        Err(_) => return,
    };
    if let Ok(mut children) = world.get::<&mut Children>(parent) {
        children.entities.retain(|&e| e != child);
    }
}
