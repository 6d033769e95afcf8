//! Read-only presentation view of a game state
//!
//! Everything a renderer needs for one frame, already resolved against the
//! user's settings: fade alphas, timer bar fill, countdown seconds and the
//! shake offset. Capturing a snapshot never mutates the simulation.

use serde::Serialize;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::state::{GamePhase, GameState, PowerupKind, Rgb};

const PADDLE_COLOR: Rgb = [230, 230, 230];
const PADDLE_EXPANDED_COLOR: Rgb = [180, 220, 255];
const PADDLE_SHRUNK_COLOR: Rgb = [255, 180, 180];
const TRAIL_ALPHA: f32 = 0.3;
const PARTICLE_FADE_TICKS: f32 = 40.0;
const PARTICLE_MIN_ALPHA: f32 = 0.2;
const HIT_FLASH_ALPHA_STEP: f32 = 0.08;
const HIT_FLASH_MAX_ALPHA: f32 = 0.5;

/// Phase as the overlay layer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseView {
    Serve,
    Active,
    Paused,
    Resuming,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaddleView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailPoint {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Oldest first
    pub trail: Vec<TrailPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrickView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: Rgb,
    pub strength: u32,
    /// White overlay strength, 0 when not flashing
    pub flash_alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerupView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub kind: PowerupKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupView {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub alpha: f32,
}

/// HUD bar for one running powerup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerBar {
    pub kind: PowerupKind,
    pub label: String,
    /// Remaining fraction in [0, 1]
    pub ratio: f32,
    /// Drawn muted while timers are held after a ball loss
    pub frozen: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub text: String,
    pub color: Rgb,
    pub alpha: f32,
}

/// One frame's worth of renderable state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: PhaseView,
    pub score: u32,
    pub lives: u8,
    pub level: u32,
    /// Whole seconds left on the resume countdown
    pub countdown_secs: Option<u32>,
    pub shake_offset: (i32, i32),
    pub high_contrast: bool,
    pub paddle: PaddleView,
    pub balls: Vec<BallView>,
    pub bricks: Vec<BrickView>,
    pub powerups: Vec<PowerupView>,
    pub particles: Vec<ParticleView>,
    pub popups: Vec<PopupView>,
    pub timer_bars: Vec<TimerBar>,
    pub message: Option<MessageView>,
    pub banner: Option<String>,
}

impl Snapshot {
    /// Build the view for `state` as of host time `now_ms`
    pub fn capture(state: &GameState, settings: &Settings, now_ms: f64) -> Self {
        let (phase, countdown_secs) = match state.phase {
            GamePhase::Serve => (PhaseView::Serve, None),
            GamePhase::Active => (PhaseView::Active, None),
            GamePhase::Paused => (PhaseView::Paused, None),
            GamePhase::Resuming { until_ms } => {
                (PhaseView::Resuming, Some(countdown_secs(until_ms - now_ms)))
            }
            GamePhase::GameOver => (PhaseView::GameOver, None),
        };

        let shake_offset = if settings.effective_screen_shake() {
            state.shake_offset
        } else {
            (0, 0)
        };

        let paddle_color = if state.timers.shrink > 0 {
            PADDLE_SHRUNK_COLOR
        } else if state.timers.expand > 0 {
            PADDLE_EXPANDED_COLOR
        } else {
            PADDLE_COLOR
        };

        let balls = state
            .balls
            .iter()
            .map(|ball| {
                let keep = settings.trail_points(ball.trail.len());
                let skip = ball.trail.len() - keep;
                let trail = ball
                    .trail
                    .iter()
                    .skip(skip)
                    .enumerate()
                    .map(|(i, p)| TrailPoint {
                        x: p.x,
                        y: p.y,
                        alpha: TRAIL_ALPHA * (i + 1) as f32 / keep.max(1) as f32,
                    })
                    .collect();
                BallView {
                    x: ball.pos.x,
                    y: ball.pos.y,
                    radius: BALL_RADIUS,
                    trail,
                }
            })
            .collect();

        let flash = settings.effective_hit_flash();
        let bricks = state
            .bricks
            .iter()
            .map(|b| BrickView {
                x: b.x,
                y: b.y,
                w: b.w,
                h: b.h,
                color: b.color,
                strength: b.strength,
                flash_alpha: if flash {
                    (b.hit_flash as f32 * HIT_FLASH_ALPHA_STEP).min(HIT_FLASH_MAX_ALPHA)
                } else {
                    0.0
                },
            })
            .collect();

        let powerups = state
            .powerups
            .iter()
            .map(|p| PowerupView {
                x: p.pos.x,
                y: p.pos.y,
                size: POWERUP_SIZE,
                kind: p.kind,
            })
            .collect();

        let particles = state
            .particles
            .iter()
            .take(settings.max_particles())
            .map(|p| ParticleView {
                x: p.pos.x,
                y: p.pos.y,
                color: p.color,
                alpha: (p.life as f32 / PARTICLE_FADE_TICKS).clamp(PARTICLE_MIN_ALPHA, 1.0),
            })
            .collect();

        let popups = state
            .popups
            .iter()
            .map(|p| PopupView {
                x: p.pos.x,
                y: p.pos.y,
                text: p.text.clone(),
                alpha: (p.life as f32 / POPUP_LIFE as f32).clamp(0.0, 1.0),
            })
            .collect();

        let timer_bars = PowerupKind::ALL
            .iter()
            .filter(|&&kind| state.timers.get(kind) > 0)
            .map(|&kind| {
                let denom = state.powerup_max.get(kind).max(1) as f32;
                TimerBar {
                    kind,
                    label: kind.as_str().replace('_', " ").to_uppercase(),
                    ratio: (state.timers.get(kind) as f32 / denom).clamp(0.0, 1.0),
                    frozen: state.timers_frozen,
                }
            })
            .collect();

        let message = state.message.as_ref().map(|m| MessageView {
            text: m.text.clone(),
            color: m.color,
            alpha: (m.ticks as f32 / POWERUP_MESSAGE_TICKS as f32).min(1.0),
        });

        let banner = (settings.level_banner && state.banner_ticks > 0)
            .then(|| format!("Level {}", state.level));

        Self {
            phase,
            score: state.score,
            lives: state.lives,
            level: state.level,
            countdown_secs,
            shake_offset,
            high_contrast: settings.high_contrast,
            paddle: PaddleView {
                x: state.paddle.x,
                y: state.paddle.y,
                w: state.paddle.width,
                h: PADDLE_HEIGHT,
                color: paddle_color,
            },
            balls,
            bricks,
            powerups,
            particles,
            popups,
            timer_bars,
            message,
            banner,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Seconds shown on the resume overlay, never below 1
pub fn countdown_secs(remaining_ms: f64) -> u32 {
    (remaining_ms / 1000.0).ceil().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Particle, PowerupMessage};
    use glam::Vec2;

    #[test]
    fn test_countdown_secs() {
        assert_eq!(countdown_secs(3000.0), 3);
        assert_eq!(countdown_secs(2999.0), 3);
        assert_eq!(countdown_secs(2000.0), 2);
        assert_eq!(countdown_secs(1.0), 1);
        assert_eq!(countdown_secs(-50.0), 1);
    }

    #[test]
    fn test_resuming_snapshot() {
        let mut state = GameState::new();
        state.phase = GamePhase::Resuming { until_ms: 4000.0 };
        let snap = Snapshot::capture(&state, &Settings::default(), 1500.0);
        assert_eq!(snap.phase, PhaseView::Resuming);
        assert_eq!(snap.countdown_secs, Some(3));
    }

    #[test]
    fn test_timer_bars() {
        let mut state = GameState::new();
        state.timers.slow = 225;
        state.timers.multi_ball = 0;
        state.timers_frozen = true;
        let snap = Snapshot::capture(&state, &Settings::default(), 0.0);
        assert_eq!(snap.timer_bars.len(), 1);
        let bar = &snap.timer_bars[0];
        assert_eq!(bar.kind, PowerupKind::Slow);
        assert_eq!(bar.label, "SLOW");
        assert!((bar.ratio - 0.5).abs() < 1e-6);
        assert!(bar.frozen);
    }

    #[test]
    fn test_reduced_motion_hides_shake_and_flash() {
        let mut state = GameState::new();
        state.shake_offset = (3, -2);
        state.bricks[0].hit_flash = HIT_FLASH_TICKS;

        let snap = Snapshot::capture(&state, &Settings::default(), 0.0);
        assert_eq!(snap.shake_offset, (3, -2));
        assert!((snap.bricks[0].flash_alpha - 0.48).abs() < 1e-6);

        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let snap = Snapshot::capture(&state, &settings, 0.0);
        assert_eq!(snap.shake_offset, (0, 0));
        assert_eq!(snap.bricks[0].flash_alpha, 0.0);
    }

    #[test]
    fn test_particles_respect_settings() {
        let mut state = GameState::new();
        state.particles.push(Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::ZERO,
            life: 80,
            color: [1, 2, 3],
        });
        state.particles.push(Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::ZERO,
            life: 2,
            color: [1, 2, 3],
        });
        let snap = Snapshot::capture(&state, &Settings::default(), 0.0);
        assert_eq!(snap.particles.len(), 2);
        assert_eq!(snap.particles[0].alpha, 1.0);
        assert_eq!(snap.particles[1].alpha, PARTICLE_MIN_ALPHA);

        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        let snap = Snapshot::capture(&state, &settings, 0.0);
        assert!(snap.particles.is_empty());
    }

    #[test]
    fn test_trail_is_thinned() {
        let mut state = GameState::new();
        for i in 0..TRAIL_LENGTH {
            state.balls[0].record_trail(Vec2::new(i as f32, 0.0));
        }
        let snap = Snapshot::capture(&state, &Settings::default(), 0.0);
        let trail = &snap.balls[0].trail;
        assert_eq!(trail.len(), 6);
        // Most recent points survive, newest is brightest
        assert_eq!(trail[5].x, (TRAIL_LENGTH - 1) as f32);
        assert!((trail[5].alpha - TRAIL_ALPHA).abs() < 1e-6);
        assert!(trail[0].alpha < trail[5].alpha);
    }

    #[test]
    fn test_message_and_banner() {
        let mut state = GameState::new();
        state.message = Some(PowerupMessage {
            text: "Ball Sped Up!".to_string(),
            color: [255, 0, 0],
            ticks: 90,
        });
        let snap = Snapshot::capture(&state, &Settings::default(), 0.0);
        let message = snap.message.as_ref().unwrap();
        assert!((message.alpha - 0.5).abs() < 1e-6);
        assert_eq!(snap.banner.as_deref(), Some("Level 1"));

        state.banner_ticks = 0;
        let snap = Snapshot::capture(&state, &Settings::default(), 0.0);
        assert!(snap.banner.is_none());
    }

    #[test]
    fn test_paddle_tint_and_json() {
        let mut state = GameState::new();
        state.timers.expand = 10;
        let snap = Snapshot::capture(&state, &Settings::default(), 0.0);
        assert_eq!(snap.paddle.color, PADDLE_EXPANDED_COLOR);

        let json = snap.to_json().unwrap();
        assert!(json.contains("\"phase\":\"serve\""));
        assert!(json.contains("\"lives\":3"));
    }
}
