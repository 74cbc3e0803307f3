//! Fighter flight model: rate-limited turning toward the aim direction and
//! throttle-driven speed along the nose.

use glam::{DQuat, DVec3};
use hecs::World;

use warfront_core::components::{FlightModel, Intent};
use warfront_core::constants::FIGHTER_MIN_ALTITUDE;
use warfront_core::types::{Transform, Velocity};

/// Rotate `orientation` toward facing `aim` by at most `max_angle` radians.
pub fn turn_toward(orientation: DQuat, aim: DVec3, max_angle: f64) -> DQuat {
    let forward = orientation * DVec3::Z;
    let aim = aim.normalize_or_zero();
    if aim == DVec3::ZERO {
        return orientation;
    }
    let angle = forward.dot(aim).clamp(-1.0, 1.0).acos();
    if angle < 1e-9 {
        return orientation;
    }
    let axis = forward.cross(aim);
    let axis = if axis.length_squared() < 1e-12 {
        // Pointing straight away: turn about the local up axis.
        orientation * DVec3::Y
    } else {
        axis.normalize()
    };
    let step = angle.min(max_angle.max(0.0));
    (DQuat::from_axis_angle(axis, step) * orientation).normalize()
}

pub fn run(world: &mut World, ground_height: f64, dt: f64) {
    for (_, (transform, velocity, flight, intent)) in
        world.query_mut::<(&mut Transform, &mut Velocity, &mut FlightModel, &Intent)>()
    {
        transform.orientation = turn_toward(transform.orientation, intent.aim, flight.turn_rate * dt);

        let throttle = intent.throttle.clamp(0.0, 1.0);
        let goal = flight.min_speed + throttle * (flight.max_speed - flight.min_speed);
        let step = flight.acceleration * dt;
        flight.speed += (goal - flight.speed).clamp(-step, step);

        velocity.linear = transform.forward() * flight.speed;
        transform.position += velocity.linear * dt;

        let floor = ground_height + FIGHTER_MIN_ALTITUDE;
        if transform.position.y < floor {
            transform.position.y = floor;
            velocity.linear.y = velocity.linear.y.max(0.0);
        }
    }
}
