//! Character-movement collaborator.
//!
//! The engine never resolves collisions itself: ground movement proposes a
//! delta and receives a corrected delta plus a grounded flag.

use glam::DVec3;

use warfront_core::components::CharacterCollider;

/// Corrected movement returned by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub corrected: DVec3,
    pub grounded: bool,
}

pub trait CharacterPhysics {
    /// Resolve `desired` for a collider whose feet sit at `position`.
    fn propose_move(&mut self, collider: &CharacterCollider, position: DVec3, desired: DVec3) -> MoveResult;
}

/// Infinite flat ground at `height`, no other obstacles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGroundPhysics {
    pub height: f64,
}

impl Default for FlatGroundPhysics {
    fn default() -> Self {
        Self {
            height: warfront_core::constants::GROUND_HEIGHT,
        }
    }
}

impl CharacterPhysics for FlatGroundPhysics {
    fn propose_move(&mut self, _collider: &CharacterCollider, position: DVec3, desired: DVec3) -> MoveResult {
        let target_y = position.y + desired.y;
        if target_y <= self.height {
            MoveResult {
                corrected: DVec3::new(desired.x, self.height - position.y, desired.z),
                grounded: true,
            }
        } else {
            MoveResult {
                corrected: desired,
                grounded: false,
            }
        }
    }
}
