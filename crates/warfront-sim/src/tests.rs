//! Tests for damage resolution, weapons, capital ships, command posts and
//! the tick pipeline.

use std::f64::consts::FRAC_PI_2;

use glam::{DQuat, DVec3};
use hecs::{Entity, World};

use warfront_core::components::*;
use warfront_core::config::{SimConfig, TurretTuning};
use warfront_core::enums::*;
use warfront_core::events::SimEvents;
use warfront_core::input::PlayerInput;
use warfront_core::types::Transform;

use crate::damage::{apply_hit, Hit};
use crate::engine::SimulationEngine;
use crate::physics::FlatGroundPhysics;
use crate::spatial::{IndexScope, SpatialIndex};
use crate::systems::{blast, capital, command_post, flight, ground, heat, hitscan, projectiles, turret_ai, weapons};
use crate::world_setup::*;

const DT: f64 = 1.0 / 60.0;

fn combatant(world: &mut World, position: DVec3, team: i32, shield: Option<f64>) -> Entity {
    let spec = CombatantSpec {
        health: 100.0,
        hit_radius: 1.0,
        shield: shield.map(|max| ShieldSpec {
            max,
            regen_rate: 10.0,
            regen_delay: 3.0,
        }),
        velocity: DVec3::ZERO,
    };
    spawn_combatant(world, Transform::from_position(position), Team(team), &spec)
}

fn hit(target: Entity, amount: f64) -> Hit {
    Hit {
        target,
        amount,
        shooter: None,
        from: DVec3::ZERO,
        point: DVec3::ZERO,
        weapon: WeaponClass::Hitscan,
    }
}

fn combat_index(world: &World) -> SpatialIndex {
    let mut index = SpatialIndex::new(60.0, IndexScope::Combatants);
    index.rebuild(world);
    index
}

fn health_of(world: &World, entity: Entity) -> f64 {
    world.get::<&Health>(entity).map(|h| h.current).unwrap_or(0.0)
}

fn start_dodge(world: &mut World, entity: Entity) {
    world
        .insert_one(
            entity,
            Dodge {
                remaining: 0.3,
                duration: 0.4,
                speed: 9.0,
                direction: DVec3::Z,
            },
        )
        .unwrap();
}

// ---- Damage ----

#[test]
fn test_shield_absorbs_before_health() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let target = combatant(&mut world, DVec3::ZERO, 1, Some(50.0));
    world.get::<&mut Shield>(target).unwrap().current = 20.0;

    let result = apply_hit(&mut world, &mut events, hit(target, 15.0)).unwrap();
    assert!(!result.killed);
    assert_eq!(world.get::<&Shield>(target).unwrap().current, 5.0);
    assert_eq!(health_of(&world, target), 100.0);

    apply_hit(&mut world, &mut events, hit(target, 30.0)).unwrap();
    assert_eq!(world.get::<&Shield>(target).unwrap().current, 0.0);
    assert_eq!(health_of(&world, target), 75.0);
    assert_eq!(events.impacts.len(), 2);
}

#[test]
fn test_kill_removes_entity_and_reports_it() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let target = combatant(&mut world, DVec3::ZERO, 1, None);

    let result = apply_hit(&mut world, &mut events, hit(target, 250.0)).unwrap();
    assert!(result.killed);
    assert!(!world.contains(target));
    let impacts = events.impacts.drain();
    assert_eq!(impacts.len(), 1);
    assert!(impacts[0].killed);

    // A stale handle is ignored.
    assert!(apply_hit(&mut world, &mut events, hit(target, 10.0)).is_none());
    assert!(events.impacts.is_empty());
}

#[test]
fn test_dodge_blocks_hitscan_projectile_and_blast() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let shooter = combatant(&mut world, DVec3::ZERO, 0, None);
    let target = combatant(&mut world, DVec3::new(0.0, 0.0, 10.0), 1, None);
    start_dodge(&mut world, target);
    let index = combat_index(&world);

    let shot = hitscan::Shot {
        shooter: Some(shooter),
        team: Team(0),
        origin: DVec3::ZERO,
        direction: DVec3::Z,
        range: 100.0,
        damage: 10.0,
        spread: 0.0,
        weapon: WeaponClass::Hitscan,
    };
    assert!(hitscan::resolve(&mut world, &index, &mut events, shot).is_none());

    let bolt = weapons::spawn_projectile(
        &mut world,
        weapons::Launch {
            owner: shooter,
            team: Team(0),
            kind: ProjectileKind::Bolt,
            position: DVec3::new(0.0, 0.0, 5.0),
            direction: DVec3::Z,
            speed: 600.0,
            damage: 50.0,
            life: 1.0,
            blast_radius: 0.0,
            homing: None,
        },
    );
    projectiles::run(&mut world, &index, &mut events, 9.81, -100.0, DT);
    assert!(!world.contains(bolt), "the bolt is spent on contact");

    let hits = blast::detonate(&mut world, &index, &mut events, Some(shooter), DVec3::new(0.0, 0.0, 10.0), 5.0, 100.0);
    assert_eq!(hits, 0);
    assert_eq!(events.explosions.len(), 1);

    assert_eq!(health_of(&world, target), 100.0);
    assert!(events.impacts.is_empty());
}

#[test]
fn test_bolt_hits_target_between_frames() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let shooter = combatant(&mut world, DVec3::ZERO, 0, None);
    let target = combatant(&mut world, DVec3::new(0.0, 0.0, 10.0), 1, None);
    let index = combat_index(&world);

    weapons::spawn_projectile(
        &mut world,
        weapons::Launch {
            owner: shooter,
            team: Team(0),
            kind: ProjectileKind::Bolt,
            position: DVec3::new(0.0, 0.0, 2.0),
            direction: DVec3::Z,
            speed: 1200.0,
            damage: 40.0,
            life: 1.0,
            blast_radius: 0.0,
            homing: None,
        },
    );
    projectiles::run(&mut world, &index, &mut events, 9.81, -100.0, DT);

    assert_eq!(health_of(&world, target), 60.0);
    let impacts = events.impacts.drain();
    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].weapon, WeaponClass::Projectile(ProjectileKind::Bolt));
    assert_eq!(impacts[0].shooter, Some(shooter));
}

#[test]
fn test_blast_falls_off_and_hits_allies() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let near = combatant(&mut world, DVec3::new(1.0, 0.0, 0.0), 0, None);
    let far = combatant(&mut world, DVec3::new(6.0, 0.0, 0.0), 1, None);
    let grazing = combatant(&mut world, DVec3::new(0.0, 0.0, 10.5), 1, None);
    let outside = combatant(&mut world, DVec3::new(20.0, 0.0, 0.0), 1, None);
    let index = combat_index(&world);

    let hits = blast::detonate(&mut world, &index, &mut events, None, DVec3::ZERO, 10.0, 100.0);
    assert_eq!(hits, 2);
    // Falloff is measured to the target's centre.
    assert!((health_of(&world, near) - 10.0).abs() < 1e-9);
    assert!((health_of(&world, far) - 60.0).abs() < 1e-9);
    assert_eq!(health_of(&world, grazing), 100.0, "centre outside the radius is untouched");
    assert_eq!(health_of(&world, outside), 100.0);
    assert_eq!(events.impacts.len(), 2);
}

#[test]
fn test_contact_blast_hits_struck_hull_in_full() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let spec = CombatantSpec {
        health: 100.0,
        hit_radius: 30.0,
        shield: None,
        velocity: DVec3::ZERO,
    };
    let hulk = spawn_combatant(&mut world, Transform::from_position(DVec3::new(0.0, 0.0, 40.0)), Team(1), &spec);
    let bystander = combatant(&mut world, DVec3::new(0.0, 0.0, 5.0), 1, None);
    let index = combat_index(&world);

    let contact = DVec3::new(0.0, 0.0, 10.0);
    let hits = blast::detonate_on_contact(&mut world, &index, &mut events, None, hulk, contact, 10.0, 50.0);
    assert_eq!(hits, 2);
    assert_eq!(health_of(&world, hulk), 50.0);
    assert!((health_of(&world, bystander) - 75.0).abs() < 1e-9);
    assert_eq!(events.explosions.len(), 1);
}

// ---- Weapons ----

fn gunner(world: &mut World, heat_per_shot: f64) -> Entity {
    world.spawn((
        Transform::default(),
        Team(0),
        Intent::default(),
        HitscanWeapon {
            cooldown: 0.0,
            fire_interval: 0.0,
            damage: 5.0,
            range: 50.0,
            spread: 0.0,
        },
        WeaponHeat::new(heat_per_shot, 20.0, 50.0, 0.5),
    ))
}

fn pull_trigger(world: &mut World, entity: Entity) {
    world.get::<&mut Intent>(entity).unwrap().fire = true;
}

#[test]
fn test_overheat_blocks_fire_until_cooled() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let shooter = gunner(&mut world, 10.0);
    let index = SpatialIndex::new(60.0, IndexScope::Combatants);

    for frame in 0..10 {
        pull_trigger(&mut world, shooter);
        weapons::fire(&mut world, &index, &mut events, 7, frame);
    }
    {
        let heat = world.get::<&WeaponHeat>(shooter).unwrap();
        assert_eq!(heat.heat, 100.0);
        assert!(heat.overheated);
    }

    pull_trigger(&mut world, shooter);
    weapons::fire(&mut world, &index, &mut events, 7, 10);
    assert_eq!(world.get::<&WeaponHeat>(shooter).unwrap().heat, 100.0, "rejected shot adds no heat");
    assert!(!world.get::<&Intent>(shooter).unwrap().fire, "trigger is consumed");

    // Vents at 50/s: locked out until heat is back to zero.
    heat::run(&mut world, 1.0);
    assert!(world.get::<&WeaponHeat>(shooter).unwrap().overheated);
    heat::run(&mut world, 1.0);
    let heat = *world.get::<&WeaponHeat>(shooter).unwrap();
    assert_eq!(heat.heat, 0.0);
    assert!(!heat.overheated);
}

#[test]
fn test_cooldown_rejects_fire() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let shooter = gunner(&mut world, 1.0);
    world.get::<&mut HitscanWeapon>(shooter).unwrap().fire_interval = 0.5;
    let index = SpatialIndex::new(60.0, IndexScope::Combatants);

    pull_trigger(&mut world, shooter);
    weapons::fire(&mut world, &index, &mut events, 7, 0);
    pull_trigger(&mut world, shooter);
    weapons::fire(&mut world, &index, &mut events, 7, 1);
    assert_eq!(world.get::<&WeaponHeat>(shooter).unwrap().heat, 1.0);

    weapons::cooldowns(&mut world, 0.5);
    pull_trigger(&mut world, shooter);
    weapons::fire(&mut world, &index, &mut events, 7, 2);
    assert_eq!(world.get::<&WeaponHeat>(shooter).unwrap().heat, 2.0);
}

fn torpedo_boat(world: &mut World) -> Entity {
    world.spawn((
        Transform::default(),
        Team(0),
        HitRadius(2.0),
        Intent::default(),
        ProjectileWeapon {
            kind: ProjectileKind::Torpedo,
            ammo: 2,
            cooldown: 0.0,
            fire_interval: 1.0,
            muzzle_speed: 100.0,
            damage: 100.0,
            life: 10.0,
            tracking: 0.2,
            lock_time: 1.0,
            lock_progress: 0.0,
            lock_target: None,
            blast_radius: 10.0,
        },
    ))
}

fn torpedo_count(world: &World) -> usize {
    world
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| p.kind == ProjectileKind::Torpedo)
        .count()
}

#[test]
fn test_torpedo_requires_completed_lock() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let boat = torpedo_boat(&mut world);
    let target = combatant(&mut world, DVec3::new(0.0, 0.0, 200.0), 1, None);
    let index = combat_index(&world);

    for frame in 0..3 {
        weapons::update_locks(&mut world, &index, 0.25);
        pull_trigger(&mut world, boat);
        weapons::fire(&mut world, &index, &mut events, 1, frame);
    }
    assert_eq!(torpedo_count(&world), 0);

    weapons::update_locks(&mut world, &index, 0.25);
    assert!(world.get::<&ProjectileWeapon>(boat).unwrap().is_locked());
    pull_trigger(&mut world, boat);
    weapons::fire(&mut world, &index, &mut events, 1, 3);
    assert_eq!(torpedo_count(&world), 1);

    let homing = world
        .query::<&Projectile>()
        .iter()
        .find_map(|(_, p)| p.homing)
        .unwrap();
    assert_eq!(homing.target, target);
    let weapon = *world.get::<&ProjectileWeapon>(boat).unwrap();
    assert_eq!(weapon.ammo, 1);
    assert_eq!(weapon.lock_progress, 0.0);
}

#[test]
fn test_lock_needs_target_in_seeker_cone() {
    let mut world = World::new();
    let boat = torpedo_boat(&mut world);
    combatant(&mut world, DVec3::new(200.0, 0.0, 0.0), 1, None);
    let index = combat_index(&world);

    for _ in 0..8 {
        weapons::update_locks(&mut world, &index, 0.25);
    }
    let weapon = *world.get::<&ProjectileWeapon>(boat).unwrap();
    assert!(weapon.lock_target.is_none());
    assert!(!weapon.is_locked());
}

// ---- Turrets ----

fn emplacement(world: &mut World, team: i32) -> Entity {
    spawn_turret_emplacement(
        world,
        Transform::default(),
        Team(team),
        &TurretSpec {
            range: 70.0,
            damage: 8.0,
            fire_interval: 0.3,
            projectile_speed: 0.0,
            tracking_accuracy: 1.0,
            rotation_speed: 10.0,
            ..Default::default()
        },
    )
}

#[test]
fn test_unmanned_turret_acquires_and_fires() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let turret = emplacement(&mut world, 0);
    let enemy = combatant(&mut world, DVec3::new(0.0, 0.0, 50.0), 1, None);
    let index = combat_index(&world);
    let tuning = TurretTuning::default();

    turret_ai::run(&mut world, &index, &tuning, 1, 0, DT);
    {
        let state = world.get::<&Turret>(turret).unwrap();
        assert_eq!(state.target, Some(enemy));
        assert_eq!(state.state, TurretState::Firing);
    }

    weapons::turret_fire(&mut world, &index, &mut events, &tuning);
    assert_eq!(health_of(&world, enemy), 92.0);
    assert_eq!(events.turret_fire.len(), 1);
    assert_eq!(events.impacts.iter().next().unwrap().weapon, WeaponClass::Turret);

    // Cooldown gates the next shot.
    weapons::turret_fire(&mut world, &index, &mut events, &tuning);
    assert_eq!(events.turret_fire.len(), 1);
}

#[test]
fn test_turret_drops_target_beyond_hysteresis() {
    let mut world = World::new();
    let turret = emplacement(&mut world, 0);
    let enemy = combatant(&mut world, DVec3::new(0.0, 0.0, 50.0), 1, None);
    let tuning = TurretTuning::default();

    let index = combat_index(&world);
    turret_ai::run(&mut world, &index, &tuning, 1, 0, DT);

    // 80 m is outside range but inside 1.2x: keep it.
    world.get::<&mut Transform>(enemy).unwrap().position.z = 80.0;
    let index = combat_index(&world);
    turret_ai::run(&mut world, &index, &tuning, 1, 1, DT);
    assert_eq!(world.get::<&Turret>(turret).unwrap().target, Some(enemy));

    world.get::<&mut Transform>(enemy).unwrap().position.z = 90.0;
    let index = combat_index(&world);
    turret_ai::run(&mut world, &index, &tuning, 1, 2, DT);
    let state = *world.get::<&Turret>(turret).unwrap();
    assert_eq!(state.target, None);
    assert_eq!(state.state, TurretState::Searching);
}

#[test]
fn test_operator_mans_and_releases_turret() {
    let mut world = World::new();
    let turret = emplacement(&mut world, 0);
    let spec = InfantrySpec {
        ai: false,
        ..Default::default()
    };
    let trooper = spawn_infantry(
        &mut world,
        Transform::from_position(DVec3::new(1.0, 0.0, 0.0)),
        Team(0),
        &spec,
        &SimConfig::default().infantry,
    );

    world.get::<&mut Intent>(trooper).unwrap().interact = true;
    turret_ai::man_turrets(&mut world);
    {
        let state = world.get::<&Turret>(turret).unwrap();
        assert_eq!(state.operator, Some(trooper));
        assert_eq!(state.state, TurretState::Manned);
    }
    assert!(!world.get::<&Intent>(trooper).unwrap().interact);

    world.get::<&mut Intent>(trooper).unwrap().interact = true;
    turret_ai::man_turrets(&mut world);
    assert_eq!(world.get::<&Turret>(turret).unwrap().operator, None);
}

#[test]
fn test_manned_turret_trigger_is_not_buffered_through_cooldown() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let turret = emplacement(&mut world, 0);
    let trooper = trooper_at(&mut world, DVec3::new(1.0, 0.0, 0.0), 0);
    world.insert_one(trooper, Intent::default()).unwrap();
    world.insert_one(trooper, PlayerControlled).unwrap();
    {
        let mut state = world.get::<&mut Turret>(turret).unwrap();
        state.operator = Some(trooper);
        state.state = TurretState::Manned;
        state.cooldown = 0.5;
    }
    let index = combat_index(&world);
    let tuning = TurretTuning::default();

    pull_trigger(&mut world, trooper);
    weapons::turret_fire(&mut world, &index, &mut events, &tuning);
    assert!(events.turret_fire.is_empty());
    assert!(!world.get::<&Intent>(trooper).unwrap().fire, "rejected pull is consumed");

    weapons::cooldowns(&mut world, 1.0);
    weapons::turret_fire(&mut world, &index, &mut events, &tuning);
    assert!(events.turret_fire.is_empty(), "no shot without a new pull");

    pull_trigger(&mut world, trooper);
    weapons::turret_fire(&mut world, &index, &mut events, &tuning);
    assert_eq!(events.turret_fire.len(), 1);
    assert!(!world.get::<&Intent>(trooper).unwrap().fire);
}

// ---- Capital ships ----

fn capital_with(spec: CapitalShipSpec) -> (World, CapitalShipIds) {
    let mut world = World::new();
    let ids = spawn_capital_ship(&mut world, Transform::default(), Team(1), &spec);
    (world, ids)
}

#[test]
fn test_capital_ship_spawns_root_with_children_linked() {
    let (world, ids) = capital_with(CapitalShipSpec {
        turrets: vec![TurretSpec::default()],
        subsystems: vec![SubsystemSpec {
            kind: SubsystemKind::Hangar,
            offset: DVec3::new(0.0, 0.0, 100.0),
            health: 10.0,
            hit_radius: 5.0,
        }],
        weak_points: vec![WeakPointSpec {
            offset: DVec3::new(0.0, 10.0, 0.0),
            multiplier: 3.0,
            hit_radius: 2.0,
        }],
        ..Default::default()
    });
    let root = ids.root.unwrap();

    assert!(world.get::<&CapitalShip>(root).is_ok());
    assert!(world.get::<&ShieldArcs>(root).is_ok());
    let children = world.get::<&Children>(root).unwrap().entities.clone();
    assert_eq!(children.len(), 3);
    for child in children {
        assert_eq!(world.get::<&Parent>(child).unwrap().entity, root);
    }
}

#[test]
fn test_subsystem_side_effect_applies_once() {
    let (mut world, ids) = capital_with(CapitalShipSpec {
        subsystems: vec![SubsystemSpec {
            kind: SubsystemKind::Engines,
            offset: DVec3::new(0.0, 0.0, -250.0),
            health: 10.0,
            hit_radius: 5.0,
        }],
        ..Default::default()
    });
    let mut events = SimEvents::default();
    let root = ids.root.unwrap();
    let engines = ids.subsystems[0];

    let result = apply_hit(&mut world, &mut events, hit(engines, 25.0)).unwrap();
    assert!(result.killed);
    assert_eq!(world.get::<&CapitalShip>(root).unwrap().turn_rate, 0.0);
    assert_eq!(events.subsystems_destroyed.len(), 1);
    assert!(!world.contains(engines));
    assert!(!world.get::<&Children>(root).unwrap().entities.contains(&engines));

    assert!(apply_hit(&mut world, &mut events, hit(engines, 25.0)).is_none());
    assert_eq!(events.subsystems_destroyed.len(), 1);
}

#[test]
fn test_sensor_loss_reveals_weak_points() {
    let (mut world, ids) = capital_with(CapitalShipSpec {
        shield_per_arc: 0.0,
        subsystems: vec![SubsystemSpec {
            kind: SubsystemKind::SensorArray,
            offset: DVec3::new(0.0, 40.0, 150.0),
            health: 5.0,
            hit_radius: 5.0,
        }],
        weak_points: vec![WeakPointSpec {
            offset: DVec3::new(0.0, 10.0, -40.0),
            multiplier: 3.0,
            hit_radius: 5.0,
        }],
        ..Default::default()
    });
    let mut events = SimEvents::default();
    let root = ids.root.unwrap();
    let weak = ids.weak_points[0];
    let total = health_of(&world, root);

    let mut strike = hit(weak, 10.0);
    strike.point = DVec3::new(0.0, 10.0, -40.0);
    apply_hit(&mut world, &mut events, strike).unwrap();
    assert_eq!(health_of(&world, root), total - 10.0);

    apply_hit(&mut world, &mut events, hit(ids.subsystems[0], 5.0)).unwrap();
    assert!(world.get::<&CapitalShip>(root).unwrap().weak_points_revealed);

    let result = apply_hit(&mut world, &mut events, strike).unwrap();
    assert_eq!(result.damage, 30.0);
    assert_eq!(health_of(&world, root), total - 40.0);
}

#[test]
fn test_children_follow_parent() {
    let (mut world, ids) = capital_with(CapitalShipSpec {
        turrets: vec![TurretSpec {
            offset: DVec3::new(10.0, 5.0, 0.0),
            ..Default::default()
        }],
        ..Default::default()
    });
    let root = ids.root.unwrap();
    let turret = ids.turrets[0];

    let moved = Transform::new(DVec3::new(100.0, 0.0, 50.0), DQuat::from_rotation_y(FRAC_PI_2));
    *world.get::<&mut Transform>(root).unwrap() = moved;
    capital::child_transforms(&mut world);

    let placed = *world.get::<&Transform>(turret).unwrap();
    let expected = moved.local_to_world(DVec3::new(10.0, 5.0, 0.0));
    assert!(placed.position.distance(expected) < 1e-9);
    assert!(placed.forward().distance(moved.forward()) < 1e-9);
    let base = world.get::<&Turret>(turret).unwrap().base;
    assert!((base * DVec3::Z).distance(moved.forward()) < 1e-9);
}

#[test]
fn test_destroying_ship_removes_children() {
    let (mut world, ids) = capital_with(CapitalShipSpec {
        shield_per_arc: 0.0,
        turrets: vec![TurretSpec::default(), TurretSpec::default()],
        ..Default::default()
    });
    let mut events = SimEvents::default();
    let root = ids.root.unwrap();

    let result = apply_hit(&mut world, &mut events, hit(root, 1.0e6)).unwrap();
    assert!(result.killed);
    assert!(!world.contains(root));
    assert!(ids.turrets.iter().all(|&t| !world.contains(t)));
}

#[test]
fn test_hangar_launches_on_interval() {
    let (mut world, ids) = capital_with(CapitalShipSpec {
        hangar: HangarSpec {
            fighters: 2,
            launch_interval: 1.0,
            ..Default::default()
        },
        ..Default::default()
    });
    let mut events = SimEvents::default();
    let root = ids.root.unwrap();

    capital::hangar(&mut world, &mut events, 0.5);
    assert!(events.fighters_launched.is_empty());
    capital::hangar(&mut world, &mut events, 0.5);
    let launched = events.fighters_launched.drain();
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].carrier, root);
    assert_eq!(*world.get::<&Team>(launched[0].fighter).unwrap(), Team(1));
    assert!(world.get::<&Fighter>(launched[0].fighter).is_ok());
    assert_eq!(world.get::<&CapitalShip>(root).unwrap().hangar.fighters_remaining, 1);

    world.get::<&mut CapitalShip>(root).unwrap().hangar_disabled = true;
    for _ in 0..4 {
        capital::hangar(&mut world, &mut events, 0.5);
    }
    assert!(events.fighters_launched.is_empty());
}

// ---- Movement ----

#[test]
fn test_fighter_turn_is_rate_limited() {
    let mut world = World::new();
    let fighter = spawn_fighter(&mut world, Transform::from_position(DVec3::new(0.0, 100.0, 0.0)), Team(0), &FighterSpec::default());
    world.get::<&mut Intent>(fighter).unwrap().aim = DVec3::X;

    flight::run(&mut world, 0.0, 0.1);
    let forward = world.get::<&Transform>(fighter).unwrap().forward();
    let turned = forward.dot(DVec3::Z).clamp(-1.0, 1.0).acos();
    assert!((turned - 0.12).abs() < 1e-9);
}

#[test]
fn test_jump_lands_back_on_ground() {
    let mut world = World::new();
    let mut physics = FlatGroundPhysics::default();
    let spec = InfantrySpec {
        ai: false,
        ..Default::default()
    };
    let trooper = spawn_infantry(&mut world, Transform::default(), Team(0), &spec, &SimConfig::default().infantry);

    world.get::<&mut Intent>(trooper).unwrap().jump = true;
    ground::run(&mut world, &mut physics, 9.81, DT);
    assert!(world.get::<&Transform>(trooper).unwrap().position.y > 0.0);
    assert!(!world.get::<&GroundMover>(trooper).unwrap().grounded);
    assert!(!world.get::<&Intent>(trooper).unwrap().jump);

    for _ in 0..120 {
        ground::run(&mut world, &mut physics, 9.81, DT);
    }
    assert_eq!(world.get::<&Transform>(trooper).unwrap().position.y, 0.0);
    assert!(world.get::<&GroundMover>(trooper).unwrap().grounded);
}

#[test]
fn test_dodge_costs_stamina_and_grants_invulnerability() {
    let mut world = World::new();
    let mut physics = FlatGroundPhysics::default();
    let mut events = SimEvents::default();
    let spec = InfantrySpec {
        ai: false,
        ..Default::default()
    };
    let trooper = spawn_infantry(&mut world, Transform::default(), Team(0), &spec, &SimConfig::default().infantry);

    world.get::<&mut Intent>(trooper).unwrap().dodge = true;
    ground::run(&mut world, &mut physics, 9.81, DT);
    assert_eq!(world.get::<&Stamina>(trooper).unwrap().current, 75.0);
    assert!(world.get::<&Dodge>(trooper).unwrap().is_active());
    assert!(apply_hit(&mut world, &mut events, hit(trooper, 50.0)).is_none());
    assert_eq!(health_of(&world, trooper), 100.0);
}

// ---- Command posts ----

fn trooper_at(world: &mut World, position: DVec3, team: i32) -> Entity {
    world.spawn((Transform::from_position(position), Team(team), Infantry))
}

fn neutral_post(world: &mut World) -> Entity {
    spawn_command_post(
        world,
        DVec3::ZERO,
        &CommandPostSpec {
            owner: Team::NONE,
            radius: 10.0,
            rate: 2.0,
        },
    )
}

#[test]
fn test_post_capture_flips_owner_and_resets_progress() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let post = neutral_post(&mut world);
    trooper_at(&mut world, DVec3::new(3.0, 0.0, 0.0), 0);
    trooper_at(&mut world, DVec3::new(-3.0, 0.0, 2.0), 0);

    for _ in 0..60 {
        command_post::run(&mut world, &mut events, DT);
    }

    let state = *world.get::<&CommandPost>(post).unwrap();
    assert_eq!(state.owner, Team(0));
    assert_eq!(state.progress, 0.0);
    assert_eq!(*world.get::<&Team>(post).unwrap(), Team(0));
    let captured = events.posts_captured.drain();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].previous_owner, Team::NONE);
    assert_eq!(captured[0].new_owner, Team(0));
}

#[test]
fn test_tied_post_freezes_progress() {
    let mut world = World::new();
    let mut events = SimEvents::default();
    let post = neutral_post(&mut world);
    trooper_at(&mut world, DVec3::new(3.0, 0.0, 0.0), 0);
    trooper_at(&mut world, DVec3::new(-3.0, 0.0, 0.0), 1);
    trooper_at(&mut world, DVec3::new(30.0, 0.0, 0.0), 0);

    for _ in 0..120 {
        command_post::run(&mut world, &mut events, DT);
    }
    let state = *world.get::<&CommandPost>(post).unwrap();
    assert_eq!(state.owner, Team::NONE);
    assert_eq!(state.progress, 0.0);
    assert!(events.posts_captured.is_empty());
}

#[test]
fn test_majority_requires_strict_lead() {
    use std::collections::BTreeMap;

    let counts: BTreeMap<Team, u32> = [(Team(0), 2), (Team(1), 2)].into_iter().collect();
    assert_eq!(command_post::majority(&counts), None);
    let counts: BTreeMap<Team, u32> = [(Team(0), 1), (Team(1), 3), (Team(2), 2)].into_iter().collect();
    assert_eq!(command_post::majority(&counts), Some(Team(1)));
    assert_eq!(command_post::majority(&BTreeMap::new()), None);
}

// ---- Engine ----

#[test]
fn test_engine_events_drain_exactly_once() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let infantry = SimConfig::default().infantry;
    let spec = InfantrySpec {
        ai: false,
        ..Default::default()
    };
    let world = engine.world_mut();
    neutral_post(world);
    let a = spawn_infantry(world, Transform::from_position(DVec3::new(2.0, 0.0, 0.0)), Team(0), &spec, &infantry);
    spawn_infantry(world, Transform::from_position(DVec3::new(-2.0, 0.0, 0.0)), Team(0), &spec, &infantry);

    for _ in 0..60 {
        engine.queue_input(a, PlayerInput::default());
        engine.tick(DT);
    }
    assert_eq!(engine.time().frame, 60);

    let first = engine.drain_events();
    assert_eq!(first.posts_captured.len(), 1);
    let second = engine.drain_events();
    assert_eq!(second.total(), 0);
}

#[test]
fn test_engine_rejects_invalid_config() {
    let config = SimConfig {
        tick_rate: 0,
        ..Default::default()
    };
    assert!(SimulationEngine::try_new(config).is_err());
}
