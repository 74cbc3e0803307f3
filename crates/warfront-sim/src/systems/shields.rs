//! Shield regeneration after the post-hit delay.

use hecs::World;

use warfront_core::components::{CapitalShip, Shield, ShieldArcs};
use warfront_core::constants::SHIELD_GENERATOR_PENALTY;

pub fn run(world: &mut World, dt: f64) {
    for (_, shield) in world.query_mut::<&mut Shield>() {
        shield.since_last_hit += dt;
        if shield.since_last_hit >= shield.regen_delay && shield.current < shield.max {
            shield.current = (shield.current + shield.regen_rate * dt).min(shield.max);
        }
    }

    // Capital arcs share one generator: each arc gets half the rate.
    for (_, (arcs, ship)) in world.query_mut::<(&mut ShieldArcs, Option<&CapitalShip>)>() {
        arcs.since_last_hit += dt;
        if arcs.since_last_hit < arcs.regen_delay {
            continue;
        }
        let mut rate = arcs.regen_rate * 0.5;
        if ship.is_some_and(|s| s.shield_regen_halved) {
            rate *= SHIELD_GENERATOR_PENALTY;
        }
        let max = arcs.max_per_arc;
        arcs.front = (arcs.front + rate * dt).min(max);
        arcs.rear = (arcs.rear + rate * dt).min(max);
    }
}
