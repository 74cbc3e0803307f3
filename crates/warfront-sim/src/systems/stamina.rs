//! Stamina regeneration, dodge windows and damage memory timers.

use hecs::World;

use warfront_core::components::{DamageMemory, Dodge, Stamina};

pub fn run(world: &mut World, dt: f64) {
    for (_, stamina) in world.query_mut::<&mut Stamina>() {
        stamina.since_drain += dt;
        if stamina.since_drain >= stamina.regen_delay {
            stamina.current = (stamina.current + stamina.regen_rate * dt).min(stamina.max);
        }
    }
    for (_, dodge) in world.query_mut::<&mut Dodge>() {
        dodge.remaining = (dodge.remaining - dt).max(0.0);
    }
    for (_, memory) in world.query_mut::<&mut DamageMemory>() {
        memory.since_last_hit += dt;
    }
}
