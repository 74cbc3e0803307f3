//! Weapon heat dissipation.
//!
//! Normal cooling waits `cool_delay` after the last shot. An overheated
//! weapon vents at its overheat rate straight away and stays locked out
//! until heat is back to zero.

use hecs::World;

use warfront_core::components::WeaponHeat;

pub fn cool(heat: &mut WeaponHeat, dt: f64) {
    heat.since_last_shot += dt;
    if heat.overheated {
        heat.heat = (heat.heat - heat.overheat_cool_rate * dt).max(0.0);
        if heat.heat <= 0.0 {
            heat.overheated = false;
        }
    } else if heat.since_last_shot >= heat.cool_delay {
        heat.heat = (heat.heat - heat.cool_rate * dt).max(0.0);
    }
}

pub fn run(world: &mut World, dt: f64) {
    for (_, heat) in world.query_mut::<&mut WeaponHeat>() {
        cool(heat, dt);
    }
}
