use anyhow::{Context, Result};
use log::info;
use std::time::Duration;

use rusted_platformer::engine::game_loop::GameLoop;
use rusted_platformer::engine::input::IntentTracker;
use rusted_platformer::engine::physics::PhysicsWorld;
use rusted_platformer::game::config::LevelConfig;
use rusted_platformer::game::events::{Cue, GameEvent};
use rusted_platformer::game::level::Level;

const DEFAULT_LEVEL: &str = "levels/demo.ron";

/// Stop the demo after this much simulated time
const MAX_SIM_SECONDS: f32 = 60.0;

/// Host frame time fed to the loop
const FRAME_TIME: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Platformer...");

    let level_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let config = LevelConfig::load(&level_path)
        .with_context(|| format!("Failed to load level {}", level_path))?;

    let physics = PhysicsWorld::with_gravity(config.gravity);
    let mut level = Level::from_config(&config, physics)?;

    let mut game_loop = GameLoop::new();
    let mut input = IntentTracker::new();

    // Scripted input: run right, hold jump briefly every second and a half
    while game_loop.now() < MAX_SIM_SECONDS {
        for tick in game_loop.begin_frame(FRAME_TIME) {
            let jump_held = tick.index % 90 < 10;
            let intent = input.sample(1.0, jump_held);

            for event in level.tick(tick, &intent) {
                match event {
                    // A fresh life starts with no buttons held
                    GameEvent::Cue { cue: Cue::Respawn, .. } => input.reset(),
                    GameEvent::Cue { .. } => {}
                    other => info!("[{:.2}s] {:?}", tick.now, other),
                }
            }
        }

        if level.session().ready_to_unload(game_loop.now()) {
            break;
        }
    }

    let snapshot = level.session().snapshot();
    info!(
        "Finished after {:.2}s: {:?}, score {}, highscore {}, lives {}",
        game_loop.now(),
        level.session().status(),
        snapshot.score,
        snapshot.highscore,
        snapshot.lives
    );

    Ok(())
}
