//! Scenario definitions: hardcoded starting battles for the headless driver
//! and the determinism tests.
//!
//! Every random choice draws from the engine's seeded generator, so the same
//! seed always spawns the same forces.

use std::f64::consts::PI;

use glam::{DQuat, DVec3};
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use warfront_ai::profiles::{jittered, traits_for, SkillTier};
use warfront_core::components::Team;
use warfront_core::config::SimConfig;
use warfront_core::enums::{ProjectileKind, SubsystemKind};
use warfront_core::types::Transform;

use crate::world_setup::*;

const TRAIT_SPREAD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioId {
    /// Two infantry squads, emplacements and three command posts.
    Skirmish,
    /// Fighter squadrons with a torpedo bomber each.
    Dogfight,
    /// Two capital ships with escorts and loaded hangars.
    FleetAction,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 3] = [ScenarioId::Skirmish, ScenarioId::Dogfight, ScenarioId::FleetAction];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioId::Skirmish => "skirmish",
            ScenarioId::Dogfight => "dogfight",
            ScenarioId::FleetAction => "fleet_action",
        }
    }

    /// Case-insensitive lookup by [`ScenarioId::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// Populate `world` with the given scenario.
pub fn setup(world: &mut World, scenario: ScenarioId, config: &SimConfig, rng: &mut ChaCha8Rng) {
    match scenario {
        ScenarioId::Skirmish => setup_skirmish(world, config, rng),
        ScenarioId::Dogfight => setup_dogfight(world, rng),
        ScenarioId::FleetAction => setup_fleet_action(world, rng),
    }
    info!(scenario = scenario.name(), entities = world.len(), "scenario loaded");
}

fn tier_for(team: Team) -> SkillTier {
    if team.0 == 0 {
        SkillTier::Regular
    } else {
        SkillTier::Veteran
    }
}

/// Facing toward the enemy: team 0 looks north (+Z), team 1 south.
fn facing(team: Team) -> DQuat {
    if team.0 == 0 {
        DQuat::IDENTITY
    } else {
        DQuat::from_rotation_y(PI)
    }
}

fn setup_skirmish(world: &mut World, config: &SimConfig, rng: &mut ChaCha8Rng) {
    let ground = config.ground_height;
    for (team, z) in [(Team(0), -40.0), (Team(1), 40.0)] {
        for i in 0..4 {
            let x = (i as f64 - 1.5) * 6.0 + rng.gen_range(-1.0..=1.0);
            let spec = InfantrySpec {
                traits: jittered(traits_for(tier_for(team)), TRAIT_SPREAD, rng),
                ..Default::default()
            };
            spawn_infantry(
                world,
                Transform::new(DVec3::new(x, ground, z), facing(team)),
                team,
                &spec,
                &config.infantry,
            );
        }

        let grenadier = InfantrySpec {
            traits: jittered(traits_for(tier_for(team)), TRAIT_SPREAD, rng),
            weapon: LoadoutSpec::Projectile(ProjectileSpec {
                kind: ProjectileKind::Grenade,
                ammo: 6,
                fire_interval: 2.0,
                muzzle_speed: 18.0,
                damage: 60.0,
                life: 2.5,
                blast_radius: 6.0,
                ..Default::default()
            }),
            heat: None,
            ..Default::default()
        };
        spawn_infantry(
            world,
            Transform::new(DVec3::new(12.0, ground, z * 1.2), facing(team)),
            team,
            &grenadier,
            &config.infantry,
        );

        spawn_turret_emplacement(
            world,
            Transform::new(DVec3::new(-15.0, ground, z * 1.5), facing(team)),
            team,
            &TurretSpec {
                range: 70.0,
                damage: 8.0,
                fire_interval: 0.3,
                projectile_speed: 0.0,
                ..Default::default()
            },
        );

        spawn_command_post(
            world,
            DVec3::new(0.0, ground, z * 1.5),
            &CommandPostSpec {
                owner: team,
                ..Default::default()
            },
        );
    }

    spawn_command_post(world, DVec3::new(0.0, ground, 0.0), &CommandPostSpec::default());
}

fn fighter_spec(team: Team, rng: &mut ChaCha8Rng) -> FighterSpec {
    FighterSpec {
        traits: jittered(traits_for(tier_for(team)), TRAIT_SPREAD, rng),
        ..Default::default()
    }
}

fn bomber_spec(team: Team, rng: &mut ChaCha8Rng) -> FighterSpec {
    FighterSpec {
        weapon: ProjectileSpec {
            kind: ProjectileKind::Torpedo,
            ammo: 4,
            fire_interval: 3.0,
            muzzle_speed: 250.0,
            damage: 150.0,
            life: 8.0,
            tracking: 0.15,
            lock_time: 1.5,
            blast_radius: 15.0,
        },
        heat: None,
        ..fighter_spec(team, rng)
    }
}

fn setup_dogfight(world: &mut World, rng: &mut ChaCha8Rng) {
    for (team, z) in [(Team(0), -700.0), (Team(1), 700.0)] {
        for i in 0..4 {
            let offset = DVec3::new((i as f64 - 1.5) * 60.0, 300.0 + rng.gen_range(-20.0..=20.0), z);
            let spec = fighter_spec(team, rng);
            spawn_fighter(world, Transform::new(offset, facing(team)), team, &spec);
        }
        let spec = bomber_spec(team, rng);
        spawn_fighter(
            world,
            Transform::new(DVec3::new(0.0, 350.0, z * 1.2), facing(team)),
            team,
            &spec,
        );
    }
}

fn capital_spec(team: Team, rng: &mut ChaCha8Rng) -> CapitalShipSpec {
    let battery = TurretSpec {
        range: 1500.0,
        damage: 25.0,
        fire_interval: 0.8,
        projectile_speed: 500.0,
        tracking_accuracy: 0.7,
        ..Default::default()
    };
    let turrets = [-200.0, -60.0, 60.0, 200.0]
        .into_iter()
        .flat_map(|z| {
            [40.0, -40.0].into_iter().map(move |x| TurretSpec {
                offset: DVec3::new(x, 20.0, z),
                facing: if x > 0.0 { PI / 2.0 } else { -PI / 2.0 },
                min_yaw: -PI / 2.0,
                max_yaw: PI / 2.0,
                ..battery
            })
        })
        .collect();

    CapitalShipSpec {
        throttle: 0.3,
        waypoint: Some(DVec3::new(0.0, 200.0, 0.0)),
        hangar: HangarSpec {
            fighters: 4,
            launch_interval: 6.0,
            bay_offset: DVec3::new(0.0, -25.0, 100.0),
            fighter: fighter_spec(team, rng),
        },
        turrets,
        subsystems: vec![
            SubsystemSpec {
                kind: SubsystemKind::ShieldGenerator,
                offset: DVec3::new(0.0, 40.0, -150.0),
                health: 400.0,
                hit_radius: 8.0,
            },
            SubsystemSpec {
                kind: SubsystemKind::SensorArray,
                offset: DVec3::new(0.0, 45.0, 150.0),
                health: 300.0,
                hit_radius: 6.0,
            },
            SubsystemSpec {
                kind: SubsystemKind::Engines,
                offset: DVec3::new(0.0, 0.0, -290.0),
                health: 600.0,
                hit_radius: 15.0,
            },
            SubsystemSpec {
                kind: SubsystemKind::Hangar,
                offset: DVec3::new(0.0, -25.0, 90.0),
                health: 500.0,
                hit_radius: 12.0,
            },
        ],
        weak_points: vec![WeakPointSpec {
            offset: DVec3::new(0.0, 10.0, -40.0),
            multiplier: 3.0,
            hit_radius: 5.0,
        }],
        ..Default::default()
    }
}

fn setup_fleet_action(world: &mut World, rng: &mut ChaCha8Rng) {
    for (team, z) in [(Team(0), -1500.0), (Team(1), 1500.0)] {
        let spec = capital_spec(team, rng);
        spawn_capital_ship(world, Transform::new(DVec3::new(0.0, 200.0, z), facing(team)), team, &spec);

        for i in 0..2 {
            let escort = fighter_spec(team, rng);
            let x = if i == 0 { -150.0 } else { 150.0 };
            spawn_fighter(
                world,
                Transform::new(DVec3::new(x, 260.0, z * 0.85), facing(team)),
                team,
                &escort,
            );
        }
    }
}
