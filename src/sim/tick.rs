//! Per-frame simulation tick
//!
//! Core game loop that advances the simulation deterministically. The host
//! supplies its monotonic clock in milliseconds; only the resume countdown
//! reads it.

use serde::{Deserialize, Serialize};

use super::collision::{BallOutcome, advance_ball};
use super::effects;
use super::level::{LevelPattern, brick_top, create_bricks};
use super::powerup;
use super::rng::Lcg;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Player intents for a single tick, latched by the host between frames
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held: move paddle left
    pub move_left: bool,
    /// Held: move paddle right
    pub move_right: bool,
    /// Held: use boost speed
    pub boost: bool,
    /// Release balls resting on the paddle
    pub launch: bool,
    /// Pause, or start the resume countdown when paused
    pub toggle_pause: bool,
    /// Start a new session (game over only)
    pub restart: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    state.events.clear();

    if input.restart && state.is_game_over() {
        log::info!("Restarting after game over (score {})", state.score);
        *state = GameState::new();
        return;
    }

    if input.toggle_pause {
        toggle_pause(state, now_ms);
    }

    if input.launch && state.phase.is_running() {
        launch(state);
    }

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::Resuming { until_ms } => {
            if now_ms >= until_ms {
                state.phase = state.play_phase();
            }
            return;
        }
        GamePhase::GameOver => {
            effects::update_particles(&mut state.particles);
            effects::decay(state);
            return;
        }
        GamePhase::Serve | GamePhase::Active => {}
    }

    state.time_ticks += 1;
    state.multiball_triggered = false;

    // Paddle
    let mut dx = 0.0;
    let step = if input.boost {
        state.paddle.boost_speed
    } else {
        state.paddle.speed
    };
    if input.move_left {
        dx -= step;
    }
    if input.move_right {
        dx += step;
    }
    let paddle_vx = state.paddle.move_by(dx);

    effects::update_particles(&mut state.particles);

    // Balls
    let balls = std::mem::take(&mut state.balls);
    let mut kept = Vec::with_capacity(balls.len());
    let mut lost = 0;
    for mut ball in balls {
        match advance_ball(state, &mut ball, paddle_vx) {
            BallOutcome::InPlay => kept.push(ball),
            BallOutcome::Lost => lost += 1,
        }
    }
    state.balls = kept;
    for _ in 0..lost {
        state.emit(GameEvent::BallLost);
    }
    let life_lost = lost > 0 && state.balls.is_empty();
    if life_lost {
        lose_life(state);
    }

    powerup::update_pickups(state);
    // A multi-ball caught on the losing tick keeps timers running
    if life_lost && state.multiball_triggered && !state.is_game_over() {
        state.timers_frozen = false;
    }
    powerup::tick_timers(state);

    if state.bricks.is_empty() && !state.is_game_over() {
        advance_level(state);
    }

    effects::decay(state);
}

/// Pure variant of [`tick`]: returns the next state, leaving `state` untouched
pub fn step(state: &GameState, input: &TickInput, now_ms: f64) -> GameState {
    let mut next = state.clone();
    tick(&mut next, input, now_ms);
    next
}

fn toggle_pause(state: &mut GameState, now_ms: f64) {
    match state.phase {
        GamePhase::Serve | GamePhase::Active => {
            state.phase = GamePhase::Paused;
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Resuming {
                until_ms: now_ms + RESUME_COUNTDOWN_MS,
            };
        }
        GamePhase::Resuming { .. } | GamePhase::GameOver => {}
    }
}

/// Release every ball resting on the paddle
fn launch(state: &mut GameState) {
    let mut released = false;
    for ball in state.balls.iter_mut().filter(|b| b.on_paddle) {
        ball.on_paddle = false;
        released = true;
    }
    if released {
        state.timers_frozen = false;
        state.phase = GamePhase::Active;
    }
}

/// The last ball is gone: re-serve or end the run
fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.shake = state.shake.max(10);
    state.emit(GameEvent::LifeLost { lives: state.lives });

    if state.lives > 0 {
        log::debug!("Ball lost, {} lives left", state.lives);
        state.spawn_serving_ball();
        state.timers_frozen = !state.multiball_triggered;
        state.phase = GamePhase::Serve;
    } else {
        log::info!("Game over: score={}, level={}", state.score, state.level);
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::GameOver { score: state.score });
    }
}

/// Level cleared: reset per-level state and build the next layout
fn advance_level(state: &mut GameState) {
    let cleared = state.level;
    state.level += 1;
    state.paddle.reset_size();
    state.max_ball_speed = MAX_BALL_SPEED;
    state.powerups.clear();
    state.timers.clear();
    state.spawn_serving_ball();
    state.brick_top = brick_top(state.paddle.y);
    state.rng = Lcg::for_level(state.level);
    let pattern = LevelPattern::for_level(state.level);
    state.bricks = create_bricks(state.brick_top, pattern, state.level, &mut state.rng);
    state.banner_ticks = LEVEL_BANNER_TICKS;
    state.phase = GamePhase::Serve;
    state.emit(GameEvent::LevelCleared { level: cleared });
}
