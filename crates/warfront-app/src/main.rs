use std::error::Error;

use tracing::info;

use warfront_app::config;
use warfront_app::game_loop::{self, LoopSettings};
use warfront_app::state::{self, AppState};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let sim_config = config::load_sim_config()?;
    let settings = LoopSettings::from_env();
    info!(
        seed = sim_config.seed,
        tick_rate = sim_config.tick_rate,
        config_file = ?config::config_path(),
        "starting WARFRONT"
    );

    let state = AppState::new();
    let (cmd_tx, handle) = game_loop::spawn_game_loop(sim_config, settings, state.latest_snapshot.clone())?;
    state.attach(cmd_tx)?;
    if settings.ticks == 0 {
        info!("running until `quit` or end of input");
        state::shutdown_on_quit(std::io::stdin().lock(), &state)?;
    }

    let summary = handle.join().map_err(|_| "game loop thread panicked")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if let Some(snapshot) = state.snapshot()? {
        println!("{}", serde_json::to_string(&snapshot)?);
    }
    Ok(())
}
