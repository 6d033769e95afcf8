//! Game state and core simulation types
//!
//! `GameState` is the single root of the simulation. Cosmetic collections are
//! skipped when serializing.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::{LevelPattern, brick_top, create_bricks};
use super::rng::Lcg;
use crate::Rect;
use crate::consts::*;

/// RGB color triple
pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];
pub const RED: Rgb = [255, 0, 0];
pub const GREEN: Rgb = [0, 255, 0];
pub const BLUE: Rgb = [0, 0, 255];
pub const YELLOW: Rgb = [255, 255, 0];
pub const ORANGE: Rgb = [255, 165, 0];
pub const PURPLE: Rgb = [128, 0, 128];
pub const BROWN: Rgb = [150, 75, 0];
pub const CYAN: Rgb = [0, 200, 200];

/// Brick row colors, top row first
pub const ROW_COLORS: [Rgb; 7] = [RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE, BROWN];

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// At least one ball attached to the paddle, waiting for launch
    Serve,
    /// All balls in flight
    Active,
    /// Simulation frozen until toggled again
    Paused,
    /// Un-paused, counting down on the host clock before play resumes
    Resuming { until_ms: f64 },
    /// Run ended; only a restart leaves this phase
    GameOver,
}

impl GamePhase {
    /// Phases in which the simulation advances
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Serve | GamePhase::Active)
    }
}

/// Notable things that happened during the latest tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BrickHit { strength: u32 },
    BrickDestroyed { x: f32, y: f32 },
    PowerupDropped(PowerupKind),
    PowerupCollected(PowerupKind),
    PowerupExpired(PowerupKind),
    BallLost,
    LifeLost { lives: u8 },
    LevelCleared { level: u32 },
    GameOver { score: u32 },
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Resting on the paddle, tracking its center
    pub on_paddle: bool,
    /// Consecutive ticks of near-vertical travel
    pub straight_frames: u32,
    /// Previous positions, oldest first
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    /// A fresh ball resting on the paddle, aimed up and to a random side
    pub fn serving(rng: &mut Lcg) -> Self {
        let dx = BASE_BALL_SPEED * rng.choose(&[1.0, -1.0]);
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::new(dx, -BASE_BALL_SPEED),
            on_paddle: true,
            straight_frames: 0,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Square bounding box used for all overlap tests
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos.x, self.pos.y, BALL_SIZE)
    }

    /// Record a position, dropping the oldest past capacity
    pub fn record_trail(&mut self, pos: Vec2) {
        self.trail.push_back(pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    /// Snap onto the paddle's center line
    pub fn follow_paddle(&mut self, paddle: &Paddle) {
        self.pos = paddle.serve_point();
        self.straight_frames = 0;
        self.trail.clear();
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub speed: f32,
    pub boost_speed: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
            y: FIELD_HEIGHT - PADDLE_HEIGHT - PADDLE_BOTTOM_MARGIN,
            width: PADDLE_WIDTH,
            speed: BASE_PADDLE_SPEED,
            boost_speed: BOOST_PADDLE_SPEED,
        }
    }
}

impl Paddle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, PADDLE_HEIGHT)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Where a serving ball rests
    pub fn serve_point(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.y - BALL_RADIUS)
    }

    /// Keep the paddle inside the field
    pub fn clamp_to_field(&mut self) {
        self.x = self.x.clamp(0.0, (FIELD_WIDTH - self.width).max(0.0));
    }

    /// Move by `dx` and clamp; returns the distance actually travelled
    pub fn move_by(&mut self, dx: f32) -> f32 {
        let before = self.x;
        self.x += dx;
        self.clamp_to_field();
        self.x - before
    }

    /// Back to baseline width and speed
    pub fn reset_size(&mut self) {
        self.width = PADDLE_WIDTH;
        self.speed = BASE_PADDLE_SPEED;
        self.clamp_to_field();
    }
}

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Drifts toward grey as the brick takes damage
    pub color: Rgb,
    /// Remaining hit points
    pub strength: u32,
    /// Highlight ticks after a hit
    pub hit_flash: u32,
}

impl Brick {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Power-up types, in timer iteration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    Expand,
    Shrink,
    Slow,
    Fast,
    MultiBall,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::Expand,
        PowerupKind::Shrink,
        PowerupKind::Slow,
        PowerupKind::Fast,
        PowerupKind::MultiBall,
    ];

    /// Ticks an applied effect lasts (0 = instant)
    pub fn duration(&self) -> u32 {
        match self {
            PowerupKind::Expand | PowerupKind::Shrink => 900,
            PowerupKind::Slow | PowerupKind::Fast => 450,
            PowerupKind::MultiBall => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Expand => "expand",
            PowerupKind::Shrink => "shrink",
            PowerupKind::Slow => "slow",
            PowerupKind::Fast => "fast",
            PowerupKind::MultiBall => "multi_ball",
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    /// Top-left corner of the pickup box
    pub pos: Vec2,
    pub kind: PowerupKind,
    pub vy: f32,
}

impl Powerup {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, POWERUP_SIZE, POWERUP_SIZE)
    }
}

/// Per-kind tick counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerupTimers {
    pub expand: u32,
    pub shrink: u32,
    pub slow: u32,
    pub fast: u32,
    pub multi_ball: u32,
}

impl PowerupTimers {
    /// Nominal durations, used for UI fill ratios
    pub fn nominal() -> Self {
        Self {
            expand: PowerupKind::Expand.duration(),
            shrink: PowerupKind::Shrink.duration(),
            slow: PowerupKind::Slow.duration(),
            fast: PowerupKind::Fast.duration(),
            multi_ball: 1,
        }
    }

    pub fn get(&self, kind: PowerupKind) -> u32 {
        match kind {
            PowerupKind::Expand => self.expand,
            PowerupKind::Shrink => self.shrink,
            PowerupKind::Slow => self.slow,
            PowerupKind::Fast => self.fast,
            PowerupKind::MultiBall => self.multi_ball,
        }
    }

    pub fn get_mut(&mut self, kind: PowerupKind) -> &mut u32 {
        match kind {
            PowerupKind::Expand => &mut self.expand,
            PowerupKind::Shrink => &mut self.shrink,
            PowerupKind::Slow => &mut self.slow,
            PowerupKind::Fast => &mut self.fast,
            PowerupKind::MultiBall => &mut self.multi_ball,
        }
    }

    pub fn set(&mut self, kind: PowerupKind, ticks: u32) {
        *self.get_mut(kind) = ticks;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Transient on-screen text after a pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerupMessage {
    pub text: String,
    pub color: Rgb,
    pub ticks: u32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks
    pub life: i32,
    pub color: Rgb,
}

/// Floating score text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Popup {
    pub pos: Vec2,
    pub dy: f32,
    pub life: i32,
    pub text: String,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    pub lives: u8,
    /// Current level (1-based)
    pub level: u32,
    pub phase: GamePhase,
    pub paddle: Paddle,
    /// Active balls
    pub balls: Vec<Ball>,
    /// Bricks in creation (row-major) order
    pub bricks: Vec<Brick>,
    /// Y of the top brick row
    pub brick_top: f32,
    /// Falling pickups
    pub powerups: Vec<Powerup>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    #[serde(skip)]
    pub popups: Vec<Popup>,
    /// Remaining ticks per effect
    pub timers: PowerupTimers,
    /// Nominal effect durations
    pub powerup_max: PowerupTimers,
    #[serde(skip)]
    pub message: Option<PowerupMessage>,
    /// Timers paused after a lost ball until the next launch
    pub timers_frozen: bool,
    /// A multi-ball pickup was applied this tick
    pub multiball_triggered: bool,
    /// Session ball speed cap
    pub max_ball_speed: f32,
    pub banner_ticks: u32,
    pub shake: u32,
    /// Render jitter sampled this tick
    pub shake_offset: (i32, i32),
    pub rng: Lcg,
    /// Simulated tick counter
    pub time_ticks: u64,
    /// Events raised during the latest tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh session: level 1, three lives, one serving ball
    pub fn new() -> Self {
        let paddle = Paddle::default();
        let top = brick_top(paddle.y);
        let mut state = Self {
            score: 0,
            lives: START_LIVES,
            level: 1,
            phase: GamePhase::Serve,
            paddle,
            balls: Vec::new(),
            bricks: Vec::new(),
            brick_top: top,
            powerups: Vec::new(),
            particles: Vec::new(),
            popups: Vec::new(),
            timers: PowerupTimers::default(),
            powerup_max: PowerupTimers::nominal(),
            message: None,
            timers_frozen: false,
            multiball_triggered: false,
            max_ball_speed: MAX_BALL_SPEED,
            banner_ticks: LEVEL_BANNER_TICKS,
            shake: 0,
            shake_offset: (0, 0),
            rng: Lcg::for_level(1),
            time_ticks: 0,
            events: Vec::new(),
        };

        state.spawn_serving_ball();

        // Opening layout is a full grid of one-hit bricks
        state.bricks = create_bricks(top, LevelPattern::Full, 1, &mut state.rng);
        for brick in &mut state.bricks {
            brick.strength = 1;
        }

        state
    }

    /// Replace the ball set with one ball resting on the paddle
    pub fn spawn_serving_ball(&mut self) {
        let mut ball = Ball::serving(&mut self.rng);
        ball.follow_paddle(&self.paddle);
        self.balls = vec![ball];
    }

    /// Any ball still waiting on the paddle
    pub fn has_ball_on_paddle(&self) -> bool {
        self.balls.iter().any(|b| b.on_paddle)
    }

    /// Phase to return to once play resumes
    pub fn play_phase(&self) -> GamePhase {
        if self.has_ball_on_paddle() {
            GamePhase::Serve
        } else {
            GamePhase::Active
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].on_paddle);
        assert_eq!(state.bricks.len(), 50);
        assert!(state.bricks.iter().all(|b| b.strength == 1));
        assert_eq!(state.banner_ticks, LEVEL_BANNER_TICKS);
    }

    #[test]
    fn test_serving_ball_velocity() {
        let state = GameState::new();
        let ball = &state.balls[0];
        assert_eq!(ball.vel.x.abs(), BASE_BALL_SPEED);
        assert_eq!(ball.vel.y, -BASE_BALL_SPEED);
        assert_eq!(ball.pos, state.paddle.serve_point());
    }

    #[test]
    fn test_paddle_clamp() {
        let mut paddle = Paddle::default();
        let moved = paddle.move_by(-10_000.0);
        assert_eq!(paddle.x, 0.0);
        assert!(moved < 0.0);
        paddle.move_by(10_000.0);
        assert_eq!(paddle.x, FIELD_WIDTH - paddle.width);
    }

    #[test]
    fn test_trail_capacity() {
        let mut rng = Lcg::new(1);
        let mut ball = Ball::serving(&mut rng);
        for i in 0..25 {
            ball.record_trail(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(ball.trail.len(), TRAIL_LENGTH);
        assert_eq!(ball.trail.front().map(|p| p.x), Some(15.0));
        assert_eq!(ball.trail.back().map(|p| p.x), Some(24.0));
    }

    #[test]
    fn test_timers_by_kind() {
        let mut timers = PowerupTimers::default();
        timers.set(PowerupKind::Slow, 12);
        assert_eq!(timers.get(PowerupKind::Slow), 12);
        assert_eq!(timers.get(PowerupKind::Fast), 0);
        timers.clear();
        assert_eq!(timers, PowerupTimers::default());
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new();
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.bricks.len(), state.bricks.len());
        assert_eq!(back.rng, state.rng);
        assert!(back.particles.is_empty());
    }
}
