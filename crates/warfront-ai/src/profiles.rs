//! Pilot and trooper skill presets.
//!
//! Consolidates per-tier trait values so scenarios can spawn mixed-skill
//! forces without spelling out every knob.

use rand::Rng;

use warfront_core::components::BrainTraits;

/// Coarse skill tier of an AI combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillTier {
    Recruit,
    Regular,
    Veteran,
    Ace,
}

/// Trait values for a tier.
pub fn traits_for(tier: SkillTier) -> BrainTraits {
    match tier {
        SkillTier::Recruit => BrainTraits {
            aggression: 0.3,
            accuracy: 0.2,
            evasion: 0.2,
        },
        SkillTier::Regular => BrainTraits::default(),
        SkillTier::Veteran => BrainTraits {
            aggression: 0.7,
            accuracy: 0.7,
            evasion: 0.6,
        },
        SkillTier::Ace => BrainTraits {
            aggression: 0.9,
            accuracy: 0.9,
            evasion: 0.85,
        },
    }
}

/// Perturb every trait by up to `±spread`, clamped to 0..1.
///
/// Callers pass a generator seeded from the entity so a scenario spawns the
/// same squad every run.
pub fn jittered(traits: BrainTraits, spread: f64, rng: &mut impl Rng) -> BrainTraits {
    let spread = spread.abs();
    if spread == 0.0 {
        return traits;
    }
    let mut nudge = |value: f64| (value + rng.gen_range(-spread..=spread)).clamp(0.0, 1.0);
    BrainTraits {
        aggression: nudge(traits.aggression),
        accuracy: nudge(traits.accuracy),
        evasion: nudge(traits.evasion),
    }
}
