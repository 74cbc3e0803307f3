//! Entity spawn factories.
//!
//! Each factory builds the full component set of one kind of entity and
//! inserts it with a single `World::spawn`. Specs are plain serde data so
//! scenarios can be described in JSON.

use glam::{DQuat, DVec3};
use hecs::{Entity, EntityBuilder, World};
use serde::{Deserialize, Serialize};
use tracing::debug;

use warfront_ai::infantry::initial_tactics;
use warfront_core::components::*;
use warfront_core::config::InfantryTuning;
use warfront_core::constants::*;
use warfront_core::enums::*;
use warfront_core::types::{Transform, Velocity};

// ---- Specs ----

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldSpec {
    pub max: f64,
    pub regen_rate: f64,
    pub regen_delay: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatSpec {
    pub heat_per_shot: f64,
    pub cool_rate: f64,
    pub overheat_cool_rate: f64,
    pub cool_delay: f64,
}

impl HeatSpec {
    fn build(&self) -> WeaponHeat {
        WeaponHeat::new(
            self.heat_per_shot,
            self.cool_rate,
            self.overheat_cool_rate,
            self.cool_delay,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantSpec {
    pub health: f64,
    pub hit_radius: f64,
    pub shield: Option<ShieldSpec>,
    pub velocity: DVec3,
}

impl Default for CombatantSpec {
    fn default() -> Self {
        Self {
            health: 100.0,
            hit_radius: 0.5,
            shield: None,
            velocity: DVec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSpec {
    pub kind: ProjectileKind,
    pub ammo: u32,
    pub fire_interval: f64,
    pub muzzle_speed: f64,
    pub damage: f64,
    pub life: f64,
    pub tracking: f64,
    pub lock_time: f64,
    pub blast_radius: f64,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            kind: ProjectileKind::Bolt,
            ammo: u32::MAX,
            fire_interval: 0.15,
            muzzle_speed: 800.0,
            damage: 12.0,
            life: 1.5,
            tracking: 0.0,
            lock_time: 0.0,
            blast_radius: 0.0,
        }
    }
}

impl ProjectileSpec {
    fn build(&self) -> ProjectileWeapon {
        ProjectileWeapon {
            kind: self.kind,
            ammo: self.ammo,
            cooldown: 0.0,
            fire_interval: self.fire_interval,
            muzzle_speed: self.muzzle_speed,
            damage: self.damage,
            life: self.life,
            tracking: self.tracking,
            lock_time: self.lock_time,
            lock_progress: 0.0,
            lock_target: None,
            blast_radius: self.blast_radius,
        }
    }
}

/// Primary weapon of a ground unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LoadoutSpec {
    Hitscan(HitscanWeapon),
    Projectile(ProjectileSpec),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterSpec {
    pub combatant: CombatantSpec,
    pub flight: FlightModel,
    pub weapon: ProjectileSpec,
    pub heat: Option<HeatSpec>,
    pub traits: BrainTraits,
    pub ai: bool,
}

impl Default for FighterSpec {
    fn default() -> Self {
        Self {
            combatant: CombatantSpec {
                health: 100.0,
                hit_radius: 4.0,
                shield: Some(ShieldSpec {
                    max: 50.0,
                    regen_rate: 10.0,
                    regen_delay: DEFAULT_SHIELD_REGEN_DELAY,
                }),
                velocity: DVec3::ZERO,
            },
            flight: FlightModel {
                speed: 120.0,
                min_speed: 60.0,
                max_speed: 200.0,
                acceleration: 40.0,
                turn_rate: 1.2,
            },
            weapon: ProjectileSpec::default(),
            heat: Some(HeatSpec {
                heat_per_shot: 6.0,
                cool_rate: 25.0,
                overheat_cool_rate: 40.0,
                cool_delay: DEFAULT_HEAT_COOL_DELAY,
            }),
            traits: BrainTraits::default(),
            ai: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfantrySpec {
    pub combatant: CombatantSpec,
    pub mover: GroundMover,
    pub collider: CharacterCollider,
    pub stamina: f64,
    pub stamina_regen: f64,
    pub sprint_cost: f64,
    pub dodge_cost: f64,
    pub dodge_speed: f64,
    pub dodge_duration: f64,
    pub weapon: LoadoutSpec,
    pub heat: Option<HeatSpec>,
    pub traits: BrainTraits,
    pub ai: bool,
}

impl Default for InfantrySpec {
    fn default() -> Self {
        Self {
            combatant: CombatantSpec::default(),
            mover: GroundMover {
                walk_speed: 4.0,
                sprint_speed: 7.0,
                jump_speed: 5.0,
                vertical_speed: 0.0,
                grounded: true,
            },
            collider: CharacterCollider {
                radius: 0.4,
                height: 1.8,
            },
            stamina: 100.0,
            stamina_regen: 20.0,
            sprint_cost: 15.0,
            dodge_cost: 25.0,
            dodge_speed: 9.0,
            dodge_duration: DEFAULT_DODGE_DURATION,
            weapon: LoadoutSpec::Hitscan(HitscanWeapon {
                cooldown: 0.0,
                fire_interval: 0.25,
                damage: 10.0,
                range: 60.0,
                spread: 0.02,
            }),
            heat: Some(HeatSpec {
                heat_per_shot: 8.0,
                cool_rate: 20.0,
                overheat_cool_rate: 35.0,
                cool_delay: DEFAULT_HEAT_COOL_DELAY,
            }),
            traits: BrainTraits::default(),
            ai: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretSpec {
    /// Mount position relative to the parent (or the world, for emplacements).
    pub offset: DVec3,
    /// Heading of the mount's zero yaw relative to its parent (radians).
    pub facing: f64,
    pub min_yaw: f64,
    pub max_yaw: f64,
    pub min_pitch: f64,
    pub max_pitch: f64,
    pub rotation_speed: f64,
    pub damage: f64,
    pub range: f64,
    pub fire_interval: f64,
    pub projectile_speed: f64,
    pub tracking_accuracy: f64,
    pub health: f64,
    pub hit_radius: f64,
}

impl Default for TurretSpec {
    fn default() -> Self {
        Self {
            offset: DVec3::ZERO,
            facing: 0.0,
            min_yaw: -std::f64::consts::PI,
            max_yaw: std::f64::consts::PI,
            min_pitch: -0.2,
            max_pitch: 1.3,
            rotation_speed: 1.5,
            damage: 20.0,
            range: 800.0,
            fire_interval: 0.5,
            projectile_speed: 600.0,
            tracking_accuracy: 0.8,
            health: 200.0,
            hit_radius: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubsystemSpec {
    pub kind: SubsystemKind,
    pub offset: DVec3,
    pub health: f64,
    pub hit_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeakPointSpec {
    pub offset: DVec3,
    pub multiplier: f64,
    pub hit_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HangarSpec {
    pub fighters: u32,
    pub launch_interval: f64,
    pub bay_offset: DVec3,
    pub fighter: FighterSpec,
}

impl Default for HangarSpec {
    fn default() -> Self {
        Self {
            fighters: 0,
            launch_interval: 5.0,
            bay_offset: DVec3::new(0.0, -10.0, 0.0),
            fighter: FighterSpec::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalShipSpec {
    pub length: f64,
    pub hit_radius: f64,
    pub hull_fore: f64,
    pub hull_mid: f64,
    pub hull_aft: f64,
    pub shield_per_arc: f64,
    pub shield_regen: f64,
    pub shield_regen_delay: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    pub turn_rate: f64,
    pub throttle: f64,
    pub waypoint: Option<DVec3>,
    pub hangar: HangarSpec,
    pub turrets: Vec<TurretSpec>,
    pub subsystems: Vec<SubsystemSpec>,
    pub weak_points: Vec<WeakPointSpec>,
}

impl Default for CapitalShipSpec {
    fn default() -> Self {
        Self {
            length: 600.0,
            hit_radius: 60.0,
            hull_fore: 2000.0,
            hull_mid: 3000.0,
            hull_aft: 2000.0,
            shield_per_arc: 1500.0,
            shield_regen: 40.0,
            shield_regen_delay: DEFAULT_SHIELD_REGEN_DELAY,
            max_speed: 30.0,
            acceleration: 2.0,
            turn_rate: 0.05,
            throttle: 0.0,
            waypoint: None,
            hangar: HangarSpec::default(),
            turrets: Vec::new(),
            subsystems: Vec::new(),
            weak_points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandPostSpec {
    pub owner: Team,
    pub radius: f64,
    pub rate: f64,
}

impl Default for CommandPostSpec {
    fn default() -> Self {
        Self {
            owner: Team::NONE,
            radius: DEFAULT_POST_RADIUS,
            rate: DEFAULT_POST_RATE,
        }
    }
}

/// Fighter template carried by a capital ship's hangar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HangarLoadout(pub FighterSpec);

/// Ids of a spawned capital-ship composite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapitalShipIds {
    pub root: Option<Entity>,
    pub turrets: Vec<Entity>,
    pub subsystems: Vec<Entity>,
    pub weak_points: Vec<Entity>,
}

// ---- Factories ----

fn add_combatant(builder: &mut EntityBuilder, transform: Transform, team: Team, spec: &CombatantSpec) {
    builder
        .add(transform)
        .add(Velocity {
            linear: spec.velocity,
        })
        .add(team)
        .add(Health::full(spec.health))
        .add(HitRadius(spec.hit_radius))
        .add(DamageMemory::default());
    if let Some(shield) = spec.shield {
        builder.add(Shield::full(shield.max, shield.regen_rate, shield.regen_delay));
    }
}

/// Generic combatant: transform, velocity, team, health, hit radius and an
/// optional shield.
pub fn spawn_combatant(world: &mut World, transform: Transform, team: Team, spec: &CombatantSpec) -> Entity {
    let mut builder = EntityBuilder::new();
    add_combatant(&mut builder, transform, team, spec);
    world.spawn(builder.build())
}

pub fn spawn_fighter(world: &mut World, transform: Transform, team: Team, spec: &FighterSpec) -> Entity {
    let mut builder = EntityBuilder::new();
    let mut combatant = spec.combatant;
    if combatant.velocity == DVec3::ZERO {
        combatant.velocity = transform.forward() * spec.flight.speed;
    }
    add_combatant(&mut builder, transform, team, &combatant);
    builder
        .add(Fighter)
        .add(spec.flight)
        .add(Intent {
            aim: transform.forward(),
            throttle: 0.5,
            ..Default::default()
        })
        .add(spec.weapon.build());
    if let Some(heat) = spec.heat {
        builder.add(heat.build());
    }
    if spec.ai {
        builder
            .add(AiControlled)
            .add(AerialBrain::new(AerialState::Acquire, spec.traits))
            .add(AerialTactics::default());
    } else {
        builder.add(PlayerControlled);
    }

    let entity = world.spawn(builder.build());
    debug!(entity_id = entity.id(), team = team.0, ai = spec.ai, "fighter spawned");
    entity
}

pub fn spawn_infantry(
    world: &mut World,
    transform: Transform,
    team: Team,
    spec: &InfantrySpec,
    tuning: &InfantryTuning,
) -> Entity {
    let mut builder = EntityBuilder::new();
    add_combatant(&mut builder, transform, team, &spec.combatant);
    builder
        .add(Infantry)
        .add(spec.mover)
        .add(spec.collider)
        .add(Stamina {
            current: spec.stamina,
            max: spec.stamina,
            regen_rate: spec.stamina_regen,
            regen_delay: DEFAULT_STAMINA_REGEN_DELAY,
            since_drain: f64::INFINITY,
            sprint_cost: spec.sprint_cost,
            dodge_cost: spec.dodge_cost,
        })
        .add(Dodge {
            remaining: 0.0,
            duration: spec.dodge_duration,
            speed: spec.dodge_speed,
            direction: DVec3::ZERO,
        })
        .add(Intent {
            aim: transform.forward(),
            ..Default::default()
        });
    match spec.weapon {
        LoadoutSpec::Hitscan(weapon) => {
            builder.add(weapon);
        }
        LoadoutSpec::Projectile(weapon) => {
            builder.add(weapon.build());
        }
    }
    if let Some(heat) = spec.heat {
        builder.add(heat.build());
    }
    if spec.ai {
        builder
            .add(AiControlled)
            .add(InfantryBrain::new(InfantryState::Idle, spec.traits))
            .add(initial_tactics(&spec.traits, tuning));
    } else {
        builder.add(PlayerControlled);
    }

    let entity = world.spawn(builder.build());
    debug!(entity_id = entity.id(), team = team.0, ai = spec.ai, "infantry spawned");
    entity
}

fn build_turret(spec: &TurretSpec, mount: TurretMount, base: DQuat) -> Turret {
    Turret {
        mount,
        state: TurretState::Searching,
        yaw: 0.0_f64.max(spec.min_yaw).min(spec.max_yaw),
        pitch: 0.0_f64.max(spec.min_pitch).min(spec.max_pitch),
        min_yaw: spec.min_yaw,
        max_yaw: spec.max_yaw,
        min_pitch: spec.min_pitch,
        max_pitch: spec.max_pitch,
        rotation_speed: spec.rotation_speed,
        damage: spec.damage,
        range: spec.range,
        cooldown: 0.0,
        fire_interval: spec.fire_interval,
        projectile_speed: spec.projectile_speed,
        tracking_accuracy: spec.tracking_accuracy,
        target: None,
        aim_error: f64::INFINITY,
        base,
        operator: None,
    }
}

/// Free-standing ground turret. `spec.offset` is ignored; the transform
/// places it.
pub fn spawn_turret_emplacement(world: &mut World, transform: Transform, team: Team, spec: &TurretSpec) -> Entity {
    let base = transform.orientation * DQuat::from_rotation_y(spec.facing);
    let entity = world.spawn((
        transform,
        Velocity::ZERO,
        team,
        Health::full(spec.health),
        HitRadius(spec.hit_radius),
        build_turret(spec, TurretMount::Emplacement, base),
    ));
    debug!(entity_id = entity.id(), team = team.0, "turret emplacement spawned");
    entity
}

/// Capital ship root plus turret, subsystem and weak-point children.
pub fn spawn_capital_ship(world: &mut World, transform: Transform, team: Team, spec: &CapitalShipSpec) -> CapitalShipIds {
    let hull = HullSections {
        fore: Health::full(spec.hull_fore),
        mid: Health::full(spec.hull_mid),
        aft: Health::full(spec.hull_aft),
    };
    let capital = CapitalShip {
        hull,
        length: spec.length,
        throttle: spec.throttle,
        speed: 0.0,
        max_speed: spec.max_speed,
        acceleration: spec.acceleration,
        turn_rate: spec.turn_rate,
        waypoint: spec.waypoint,
        hangar: Hangar {
            fighters_remaining: spec.hangar.fighters,
            launch_interval: spec.hangar.launch_interval,
            launch_timer: spec.hangar.launch_interval,
            bay_offset: spec.hangar.bay_offset,
        },
        weak_points_revealed: false,
        shield_regen_halved: false,
        hangar_disabled: false,
    };
    // Children need the root handle before the root itself is spawned.
    let root = world.reserve_entity();

    let child_transform = |offset: DVec3, rotation: DQuat| {
        Transform::new(
            transform.local_to_world(offset),
            transform.orientation * rotation,
        )
    };

    let mut ids = CapitalShipIds {
        root: Some(root),
        ..Default::default()
    };

    for turret in &spec.turrets {
        let rotation = DQuat::from_rotation_y(turret.facing);
        let placed = child_transform(turret.offset, rotation);
        let entity = world.spawn((
            placed,
            Velocity::ZERO,
            team,
            Health::full(turret.health),
            HitRadius(turret.hit_radius),
            build_turret(turret, TurretMount::CapitalShip, placed.orientation),
            Parent {
                entity: root,
                local_offset: turret.offset,
                local_rotation: rotation,
            },
        ));
        ids.turrets.push(entity);
    }

    for subsystem in &spec.subsystems {
        let entity = world.spawn((
            child_transform(subsystem.offset, DQuat::IDENTITY),
            Velocity::ZERO,
            team,
            Health::full(subsystem.health),
            HitRadius(subsystem.hit_radius),
            Subsystem {
                kind: subsystem.kind,
                disabled: false,
            },
            Parent {
                entity: root,
                local_offset: subsystem.offset,
                local_rotation: DQuat::IDENTITY,
            },
        ));
        ids.subsystems.push(entity);
    }

    for weak in &spec.weak_points {
        // Weak points carry a nominal health so the spatial index picks them
        // up; damage is forwarded to the hull and never reduces it.
        let entity = world.spawn((
            child_transform(weak.offset, DQuat::IDENTITY),
            Velocity::ZERO,
            team,
            Health::full(1.0),
            HitRadius(weak.hit_radius),
            WeakPoint {
                multiplier: weak.multiplier,
            },
            Parent {
                entity: root,
                local_offset: weak.offset,
                local_rotation: DQuat::IDENTITY,
            },
        ));
        ids.weak_points.push(entity);
    }

    let children: Vec<Entity> = ids
        .turrets
        .iter()
        .chain(&ids.subsystems)
        .chain(&ids.weak_points)
        .copied()
        .collect();
    world.spawn_at(
        root,
        (
            transform,
            Velocity::ZERO,
            team,
            Health::full(hull.total()),
            HitRadius(spec.hit_radius),
            capital,
            ShieldArcs {
                front: spec.shield_per_arc,
                rear: spec.shield_per_arc,
                max_per_arc: spec.shield_per_arc,
                regen_rate: spec.shield_regen,
                regen_delay: spec.shield_regen_delay,
                since_last_hit: f64::INFINITY,
            },
            HangarLoadout(spec.hangar.fighter),
            Children { entities: children },
        ),
    );

    debug!(
        entity_id = root.id(),
        team = team.0,
        turrets = ids.turrets.len(),
        subsystems = ids.subsystems.len(),
        weak_points = ids.weak_points.len(),
        "capital ship spawned"
    );
    ids
}

pub fn spawn_command_post(world: &mut World, position: DVec3, spec: &CommandPostSpec) -> Entity {
    let entity = world.spawn((
        Transform::from_position(position),
        spec.owner,
        CommandPost {
            owner: spec.owner,
            progress: 0.0,
            radius: spec.radius,
            rate: spec.rate,
            contesting: Team::NONE,
        },
    ));
    debug!(entity_id = entity.id(), owner = spec.owner.0, "command post spawned");
    entity
}

/// Put `operator` behind `turret`. Returns false when either is missing or
/// the turret is already manned by someone else.
pub fn man_turret(world: &mut World, turret: Entity, operator: Entity) -> bool {
    if !world.contains(operator) {
        return false;
    }
    let Ok(mut mount) = world.get::<&mut Turret>(turret) else {
        return false;
    };
    if mount.operator.is_some_and(|o| o != operator) {
        return false;
    }
    mount.operator = Some(operator);
    mount.state = TurretState::Manned;
    true
}
