//! Player input system: copies queued input snapshots into `Intent`.

use glam::DVec3;
use hecs::{Entity, World};

use warfront_core::components::{Intent, PlayerControlled};
use warfront_core::input::PlayerInput;
use warfront_core::types::direction_from_angles;

/// Apply and clear every queued input. Inputs for entities that are gone
/// or not player-controlled are dropped.
pub fn run(world: &mut World, queue: &mut Vec<(Entity, PlayerInput)>) {
    for (entity, input) in queue.drain(..) {
        let Ok((intent, _player)) = world.query_one_mut::<(&mut Intent, &PlayerControlled)>(entity) else {
            continue;
        };
        apply(intent, &input);
    }
}

/// Map a view-relative input snapshot onto an intent. One-shot flags are
/// only ever set here; the consuming system clears them.
pub fn apply(intent: &mut Intent, input: &PlayerInput) {
    let (sin, cos) = input.aim_yaw.sin_cos();
    let forward = DVec3::new(sin, 0.0, cos);
    let right = DVec3::new(-cos, 0.0, sin);
    let mut move_dir = forward * input.move_forward + right * input.move_right;
    if move_dir.length_squared() > 1.0 {
        move_dir = move_dir.normalize();
    }

    intent.move_dir = move_dir;
    intent.aim = direction_from_angles(input.aim_yaw, input.aim_pitch);
    intent.throttle = input.throttle.clamp(0.0, 1.0);
    intent.sprint = input.sprint;
    intent.fire |= input.fire;
    intent.jump |= input.jump;
    intent.interact |= input.interact;
    intent.dodge |= input.dodge;
}
