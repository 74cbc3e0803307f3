//! Game loop thread: advances the engine at a fixed step and publishes
//! snapshots.
//!
//! The engine is created inside the thread so it never crosses a thread
//! boundary. Commands arrive via an `mpsc` channel; the latest snapshot is
//! stored in shared state for polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use warfront_core::config::SimConfig;
use warfront_core::events::DrainedEvents;
use warfront_sim::systems::snapshot::WorldSnapshot;
use warfront_sim::{ScenarioId, SimulationEngine};

use crate::config;
use crate::state::GameLoopCommand;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSettings {
    pub scenario: ScenarioId,
    /// 0 runs until a shutdown command or channel disconnect.
    pub ticks: u64,
    pub realtime: bool,
}

impl LoopSettings {
    pub fn from_env() -> Self {
        Self {
            scenario: config::scenario(),
            ticks: config::ticks(),
            realtime: config::realtime(),
        }
    }
}

/// Event totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub impacts: usize,
    pub kills: usize,
    pub explosions: usize,
    pub subsystems_destroyed: usize,
    pub turret_shots: usize,
    pub posts_captured: usize,
    pub fighters_launched: usize,
}

impl RunSummary {
    pub fn record(&mut self, events: &DrainedEvents) {
        self.impacts += events.impacts.len();
        self.kills += events.impacts.iter().filter(|i| i.killed).count();
        self.explosions += events.explosions.len();
        self.subsystems_destroyed += events.subsystems_destroyed.len();
        self.turret_shots += events.turret_fire.len();
        self.posts_captured += events.posts_captured.len();
        self.fighters_launched += events.fighters_launched.len();
    }
}

/// Spawn the game loop in a new thread. Returns the command sender and a
/// handle that yields the run summary.
pub fn spawn_game_loop(
    sim_config: SimConfig,
    settings: LoopSettings,
    latest_snapshot: Arc<Mutex<Option<WorldSnapshot>>>,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<RunSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("warfront-game-loop".into())
        .spawn(move || {
            let mut engine = SimulationEngine::new(sim_config);
            engine.load_scenario(settings.scenario);
            run_game_loop(&mut engine, &cmd_rx, settings, &latest_snapshot)
        })?;

    Ok((cmd_tx, handle))
}

/// Run until the tick budget is spent, a shutdown command arrives, or the
/// channel disconnects.
pub fn run_game_loop(
    engine: &mut SimulationEngine,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    settings: LoopSettings,
    latest_snapshot: &Mutex<Option<WorldSnapshot>>,
) -> RunSummary {
    let dt = engine.config().dt();
    let interval = config::tick_interval(engine.config());
    let report_every = u64::from(engine.config().tick_rate.max(1));
    let mut summary = RunSummary::default();
    let mut next_tick_time = Instant::now();

    info!(
        scenario = settings.scenario.name(),
        ticks = settings.ticks,
        realtime = settings.realtime,
        entities = engine.world().len(),
        "game loop started"
    );

    'run: loop {
        if settings.ticks > 0 && summary.ticks >= settings.ticks {
            break;
        }

        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Input(entity, input)) => engine.queue_input(entity, input),
                Ok(GameLoopCommand::Shutdown) => break 'run,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) if settings.ticks == 0 => break 'run,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }

        // 2. Advance one tick and collect its events
        engine.tick(dt);
        summary.ticks += 1;
        let events = engine.drain_events();
        if events.total() > 0 {
            debug!(frame = engine.time().frame, events = events.total(), "tick events");
        }
        summary.record(&events);

        // 3. Publish the snapshot
        let snapshot = engine.snapshot();
        if summary.ticks % report_every == 0 {
            info!(
                frame = snapshot.time.frame,
                combatants = snapshot.combatants.len(),
                projectiles = snapshot.projectiles.len(),
                kills = summary.kills,
                "sim progress"
            );
        }
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next tick when pacing against the clock
        if settings.realtime {
            next_tick_time += interval;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > interval * 2 {
                // Too far behind: reset instead of catching up.
                next_tick_time = now;
            }
        }
    }

    info!(?summary, "game loop stopped");
    summary
}
