//! End-of-tick removal of dead and out-of-bounds entities.

use hecs::{Entity, World};
use tracing::{debug, trace};

use warfront_core::components::{Fighter, Health, Projectile};
use warfront_core::types::Transform;

use crate::damage::destroy;

/// Despawn anything with depleted health that a damage path did not already
/// remove, plus projectiles and fighters that left the world. Reuses
/// `buffer` to avoid a per-tick allocation. Returns the number of entities
/// removed, children included.
pub fn run(world: &mut World, buffer: &mut Vec<Entity>, world_radius: f64) -> usize {
    buffer.clear();
    for (entity, health) in world.query_mut::<&Health>() {
        if health.current <= 0.0 {
            buffer.push(entity);
        }
    }
    for (entity, (transform, _)) in world.query_mut::<(&Transform, &Projectile)>() {
        if transform.position.length() > world_radius {
            buffer.push(entity);
        }
    }
    for (entity, (transform, _)) in world.query_mut::<(&Transform, &Fighter)>() {
        if transform.position.length() > world_radius {
            debug!(entity_id = entity.id(), "fighter left the battlespace");
            buffer.push(entity);
        }
    }
    buffer.sort_by_key(|e| e.to_bits());
    buffer.dedup();

    let mut removed = 0;
    for &entity in buffer.iter() {
        removed += destroy(world, entity);
    }
    if removed > 0 {
        trace!(removed, "cleanup");
    }
    removed
}
