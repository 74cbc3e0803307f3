//! Deterministic randomness.
//!
//! Two mechanisms coexist:
//!
//! * **Seeded stream**: `derive_seed(entity, tag, frame)` mixed with the run
//!   seed feeds a fresh `ChaCha8Rng`. Used for hitscan spread, turret
//!   tracking jitter and aerial escape rolls. Replaying the same inputs with
//!   the same run seed reproduces every draw.
//! * **Entity-id roll**: `(id * 7919) % 100`, constant for the lifetime of an
//!   entity. Used only by the infantry evade reaction, which therefore passes
//!   or fails the same way every time for a given unit.

use glam::DVec3;
use hecs::Entity;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use warfront_core::constants::ENTITY_ROLL_PRIME;
use warfront_core::enums::SeedTag;

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Pure seed mixing of an entity id, a draw tag and a frame number.
pub fn derive_seed(entity_id: u32, tag: SeedTag, frame: u64) -> u64 {
    let mut h = splitmix64(entity_id as u64);
    h = splitmix64(h ^ tag.as_u64());
    splitmix64(h ^ frame)
}

/// Fresh generator for one entity's draw of `tag` on `frame`, salted with
/// the run seed so different runs diverge.
pub fn stream(run_seed: u64, entity: Entity, tag: SeedTag, frame: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_seed(entity.id(), tag, frame) ^ splitmix64(run_seed))
}

/// Per-entity roll in `0..100`.
pub fn entity_roll(entity: Entity) -> u64 {
    (entity.id() as u64).wrapping_mul(ENTITY_ROLL_PRIME) % 100
}

/// Uniformly sample a unit direction inside a cone of half-angle
/// `half_angle` around `dir`.
pub fn sample_cone(rng: &mut impl Rng, dir: DVec3, half_angle: f64) -> DVec3 {
    let dir = dir.normalize_or_zero();
    if dir == DVec3::ZERO || half_angle <= 0.0 {
        return dir;
    }
    let cos_max = half_angle.min(std::f64::consts::PI).cos();
    let cos_theta = rng.gen_range(cos_max..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = rng.gen_range(0.0..std::f64::consts::TAU);

    let helper = if dir.y.abs() < 0.99 { DVec3::Y } else { DVec3::X };
    let u = dir.cross(helper).normalize();
    let v = dir.cross(u);
    (dir * cos_theta + (u * phi.cos() + v * phi.sin()) * sin_theta).normalize_or_zero()
}
