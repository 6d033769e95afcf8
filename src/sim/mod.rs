//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` per frame)
//! - Seeded RNG only, one shared stream per level
//! - Stable iteration order (row-major bricks, spawn-order balls)
//! - No rendering or platform dependencies; the host clock is passed in

pub mod collision;
pub mod effects;
pub mod level;
pub mod powerup;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{Axis, BallOutcome, advance_ball, clamp_speed, settle_velocity};
pub use level::{LevelPattern, brick_top, create_bricks};
pub use rng::Lcg;
pub use state::{
    Ball, Brick, GameEvent, GamePhase, GameState, Paddle, Particle, Popup, Powerup, PowerupKind,
    PowerupMessage, PowerupTimers, Rgb,
};
pub use tick::{TickInput, step, tick};
