//! Brick Breaker - simulation core for an embeddable arcade widget
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, powerups, game state)
//! - `snapshot`: Read-only view of the state for an external renderer
//! - `settings`: Presentation preferences loaded from JSON
//! - `wasm`: JavaScript bindings (wasm32 only)

pub mod settings;
pub mod sim;
pub mod snapshot;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use settings::{QualityPreset, Settings, SettingsError};
pub use snapshot::Snapshot;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 720.0;
    /// Ceiling of the play area (HUD lives above it)
    pub const TOP_PLAY_Y: f32 = 10.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 18.0;
    pub const PADDLE_BOTTOM_MARGIN: f32 = 22.0;
    pub const PADDLE_MIN_WIDTH: f32 = 70.0;
    pub const PADDLE_MAX_WIDTH: f32 = 220.0;
    /// Width change per expand/shrink pickup
    pub const PADDLE_WIDTH_STEP: f32 = 24.0;
    pub const BASE_PADDLE_SPEED: f32 = 7.0;
    pub const BOOST_PADDLE_SPEED: f32 = 10.0;
    pub const MIN_PADDLE_SPEED: f32 = 3.0;
    /// Share of the paddle's per-tick velocity imparted on a bounce
    pub const PADDLE_SPIN_FACTOR: f32 = 0.15;
    /// Divisor turning hit offset from paddle center into dx
    pub const PADDLE_DEFLECT_DIVISOR: f32 = 90.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 14.0;
    pub const BALL_RADIUS: f32 = BALL_SIZE / 2.0;
    pub const BASE_BALL_SPEED: f32 = 5.0;
    pub const MAX_BALL_SPEED: f32 = 10.0;
    pub const FAST_MAX_BALL_SPEED: f32 = 13.0;
    pub const MIN_HORZ_SPEED: f32 = 0.6;
    pub const MIN_VERT_SPEED: f32 = 2.0;
    /// Distance a ball is nudged after a wall/paddle bounce
    pub const SEPARATION: f32 = 1.0;
    pub const TRAIL_LENGTH: usize = 10;
    /// Ticks of near-vertical travel before a horizontal kick
    pub const STRAIGHT_FRAME_LIMIT: u32 = 45;

    /// Brick grid
    pub const ROWS: u32 = 5;
    pub const BRICK_WIDTH: f32 = 80.0;
    pub const BRICK_HEIGHT: f32 = 28.0;
    /// Minimum vertical gap between the lowest brick row and the paddle
    pub const TARGET_MIN_GAP: f32 = 420.0;

    /// Pickups
    pub const POWERUP_SIZE: f32 = 22.0;
    pub const POWERUP_CHANCE: f64 = 0.35;
    pub const POWERUP_FALL_SPEED: f32 = 2.1;
    pub const POWERUP_MESSAGE_TICKS: u32 = 180;

    /// Effects
    pub const SCORE_PER_BRICK: u32 = 10;
    pub const PARTICLES_PER_BRICK: usize = 14;
    pub const PARTICLE_GRAVITY: f32 = 0.08;
    pub const POPUP_LIFE: u32 = 45;
    pub const POPUP_DRIFT: f32 = -0.6;
    pub const HIT_FLASH_TICKS: u32 = 6;
    pub const LEVEL_BANNER_TICKS: u32 = 60;

    /// Session
    pub const START_LIVES: u8 = 3;
    pub const RESUME_COUNTDOWN_MS: f64 = 3000.0;
    /// Per-level PRNG seed multiplier
    pub const LEVEL_SEED_FACTOR: u32 = 9999;
}

/// Axis-aligned rectangle in field coordinates (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square box centered on a point
    pub fn centered(cx: f32, cy: f32, size: f32) -> Self {
        Self::new(cx - size / 2.0, cy - size / 2.0, size, size)
    }

    /// Strict overlap test (touching edges do not overlap)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }
}
