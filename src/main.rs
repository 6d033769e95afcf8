//! Brick Breaker headless runner
//!
//! Drives the simulation with a simple autopilot at a fixed 60 Hz clock and
//! prints a summary, optionally followed by the final frame snapshot as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use brick_breaker::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use brick_breaker::{QualityPreset, Settings, Snapshot};
    use clap::Parser;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Dead zone around the paddle center before the autopilot steers
    const STEER_DEADBAND: f32 = 6.0;

    #[derive(Parser, Debug)]
    #[command(name = "brick-breaker")]
    #[command(about = "Run the brick-breaker simulation headless with an autopilot paddle")]
    pub struct Cli {
        /// Number of frames to simulate
        #[arg(long, default_value_t = 3_600)]
        ticks: u64,
        /// Settings JSON applied to the final snapshot
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Override the quality preset (low, medium, high)
        #[arg(long)]
        quality: Option<String>,
        /// Print the final snapshot as JSON
        #[arg(long)]
        snapshot: bool,
        /// Stop early once the run is over
        #[arg(long)]
        stop_on_game_over: bool,
    }

    /// Follow the lowest descending ball, launch whenever serving
    fn autopilot(state: &GameState) -> TickInput {
        let target = state
            .balls
            .iter()
            .filter(|b| b.on_paddle || b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .or_else(|| state.balls.first())
            .map(|b| b.pos.x);

        let mut input = TickInput {
            launch: state.phase == GamePhase::Serve,
            ..Default::default()
        };
        if let Some(x) = target {
            let offset = x - state.paddle.center_x();
            input.move_left = offset < -STEER_DEADBAND;
            input.move_right = offset > STEER_DEADBAND;
            input.boost = offset.abs() > state.paddle.width;
        }
        input
    }

    pub fn run(cli: Cli) -> Result<()> {
        let mut settings = match &cli.settings {
            Some(path) => Settings::from_path(path)
                .with_context(|| format!("reading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(name) = &cli.quality {
            let preset = QualityPreset::from_str(name)
                .with_context(|| format!("unknown quality preset '{name}'"))?;
            settings.apply_preset(preset);
        }

        let mut state = GameState::new();
        let mut now_ms = 0.0;
        let mut destroyed = 0u32;

        for _ in 0..cli.ticks {
            let input = autopilot(&state);
            tick(&mut state, &input, now_ms);
            now_ms += FRAME_MS;

            for event in &state.events {
                match event {
                    GameEvent::BrickDestroyed { .. } => destroyed += 1,
                    GameEvent::LevelCleared { level } => {
                        log::info!("Cleared level {} at score {}", level, state.score)
                    }
                    _ => {}
                }
            }

            if cli.stop_on_game_over && state.is_game_over() {
                break;
            }
        }

        println!(
            "ticks={} level={} score={} lives={} bricks_destroyed={} phase={:?}",
            state.time_ticks, state.level, state.score, state.lives, destroyed, state.phase
        );

        if cli.snapshot {
            let snapshot = Snapshot::capture(&state, &settings, now_ms);
            println!("{}", snapshot.to_json()?);
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");
    headless::run(headless::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the embedding page on wasm
}
