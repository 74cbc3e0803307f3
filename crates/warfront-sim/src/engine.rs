//! Simulation engine: the core of the combat kernel.
//!
//! `SimulationEngine` owns the hecs world, both spatial indices, the event
//! queues and the frame counter. Completely headless; the caller supplies
//! `dt` and player input, and drains events and snapshots.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use warfront_core::config::SimConfig;
use warfront_core::error::ConfigError;
use warfront_core::events::{DrainedEvents, SimEvents};
use warfront_core::input::PlayerInput;
use warfront_core::types::SimTime;

use crate::physics::{CharacterPhysics, FlatGroundPhysics};
use crate::scenario::{self, ScenarioId};
use crate::spatial::{IndexScope, SpatialIndex};
use crate::systems;
use crate::systems::snapshot::WorldSnapshot;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: SimConfig,
    time: SimTime,
    combat_index: SpatialIndex,
    ai_index: SpatialIndex,
    events: SimEvents,
    rng: ChaCha8Rng,
    input_queue: Vec<(Entity, PlayerInput)>,
    despawn_buffer: Vec<Entity>,
    physics: Box<dyn CharacterPhysics>,
}

impl SimulationEngine {
    /// Create an engine with flat-ground physics. The config is taken as
    /// given; use [`SimulationEngine::try_new`] for untrusted input.
    pub fn new(config: SimConfig) -> Self {
        let physics = Box::new(FlatGroundPhysics {
            height: config.ground_height,
        });
        Self::with_physics(config, physics)
    }

    /// Validate `config`, then create the engine.
    pub fn try_new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create an engine with a custom character-physics collaborator.
    pub fn with_physics(config: SimConfig, physics: Box<dyn CharacterPhysics>) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            combat_index: SpatialIndex::new(config.spatial.combat_cell_size, IndexScope::Combatants),
            ai_index: SpatialIndex::new(config.spatial.ai_cell_size, IndexScope::AiControlled),
            events: SimEvents::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            input_queue: Vec::new(),
            despawn_buffer: Vec::new(),
            physics,
            config,
        }
    }

    /// Spawn a built-in scenario into the world.
    pub fn load_scenario(&mut self, scenario: ScenarioId) {
        scenario::setup(&mut self.world, scenario, &self.config, &mut self.rng);
    }

    /// Queue a player input snapshot for the next tick.
    pub fn queue_input(&mut self, entity: Entity, input: PlayerInput) {
        self.input_queue.push((entity, input));
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        let frame = self.time.frame;
        let seed = self.config.seed;
        let gravity = self.config.gravity;
        let ground_height = self.config.ground_height;

        // 1. Spatial indices
        self.combat_index.rebuild(&self.world);
        self.ai_index.rebuild(&self.world);
        trace!(
            frame,
            combatants = self.combat_index.len(),
            ai = self.ai_index.len(),
            "indices rebuilt"
        );

        // 2. Input and AI (intent only)
        systems::input::run(&mut self.world, &mut self.input_queue);
        systems::turret_ai::man_turrets(&mut self.world);
        systems::aerial_ai::run(&mut self.world, &self.combat_index, &self.config.aerial, seed, frame, dt);
        systems::infantry_ai::run(
            &mut self.world,
            &self.combat_index,
            &self.ai_index,
            &self.config.infantry,
            dt,
        );
        systems::turret_ai::run(&mut self.world, &self.combat_index, &self.config.turret, seed, frame, dt);

        // 3. Movement and weapons
        systems::weapons::cooldowns(&mut self.world, dt);
        systems::flight::run(&mut self.world, ground_height, dt);
        systems::ground::run(&mut self.world, self.physics.as_mut(), gravity, dt);
        systems::capital::movement(&mut self.world, dt);
        systems::capital::child_transforms(&mut self.world);
        systems::capital::hangar(&mut self.world, &mut self.events, dt);
        systems::weapons::update_locks(&mut self.world, &self.combat_index, dt);
        systems::weapons::fire(&mut self.world, &self.combat_index, &mut self.events, seed, frame);
        systems::weapons::turret_fire(&mut self.world, &self.combat_index, &mut self.events, &self.config.turret);

        // 4. Projectiles and blasts
        systems::projectiles::run(
            &mut self.world,
            &self.combat_index,
            &mut self.events,
            gravity,
            ground_height,
            dt,
        );

        // 5. Resources and objectives
        systems::shields::run(&mut self.world, dt);
        systems::heat::run(&mut self.world, dt);
        systems::stamina::run(&mut self.world, dt);
        systems::command_post::run(&mut self.world, &mut self.events, dt);

        // 6. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, self.config.world_radius);
        self.time.advance(dt);
    }

    /// Return and clear every queued event.
    pub fn drain_events(&mut self) -> DrainedEvents {
        self.events.drain()
    }

    /// Events queued since the last drain.
    pub fn events(&self) -> &SimEvents {
        &self.events
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        systems::snapshot::build_snapshot(&self.world, &self.time)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for spawning and test setup.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Scenario-level generator, seeded from the config.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}
