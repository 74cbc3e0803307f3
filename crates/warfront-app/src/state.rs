//! State shared between the driver and the game loop thread.

use std::io::BufRead;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use hecs::Entity;

use warfront_core::input::PlayerInput;
use warfront_sim::systems::snapshot::WorldSnapshot;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Player input for one entity, applied on the next tick.
    Input(Entity, PlayerInput),
    /// Stop after the current tick.
    Shutdown,
}

/// Handle the driver keeps while the loop runs.
///
/// The sender is wrapped in a `Mutex` so the state can be shared across
/// threads; the snapshot is shared with the loop itself.
pub struct AppState {
    /// `None` until a loop is attached.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop after each tick.
    pub latest_snapshot: Arc<Mutex<Option<WorldSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, tx: mpsc::Sender<GameLoopCommand>) -> Result<(), String> {
        let mut lock = self.command_tx.lock().map_err(|e| e.to_string())?;
        *lock = Some(tx);
        Ok(())
    }

    pub fn send_command(&self, command: GameLoopCommand) -> Result<(), String> {
        let lock = self.command_tx.lock().map_err(|e| e.to_string())?;
        match lock.as_ref() {
            Some(tx) => tx
                .send(command)
                .map_err(|e| format!("Failed to send command: {}", e)),
            None => Err("Simulation not started".into()),
        }
    }

    pub fn snapshot(&self) -> Result<Option<WorldSnapshot>, String> {
        let lock = self.latest_snapshot.lock().map_err(|e| e.to_string())?;
        Ok(lock.clone())
    }
}

/// Block until `quit` is read or the input closes, then ask the loop to
/// stop. Used by open-ended runs.
pub fn shutdown_on_quit(input: impl BufRead, state: &AppState) -> Result<(), String> {
    for line in input.lines() {
        let line = line.map_err(|e| e.to_string())?;
        if line.trim().eq_ignore_ascii_case("quit") {
            break;
        }
    }
    state.send_command(GameLoopCommand::Shutdown)
}
