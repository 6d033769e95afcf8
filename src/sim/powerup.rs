//! Power-up drops, collection, timed effects and their reverts

use glam::Vec2;

use super::collision::{clamp_speed, ensure_min_horizontal, ensure_min_vertical, settle_velocity};
use super::state::{
    Ball, CYAN, GREEN, GameEvent, GameState, ORANGE, PURPLE, Powerup, PowerupKind, PowerupMessage,
    RED,
};
use crate::consts::*;

/// Fan offsets for the extra balls of a multi-ball pickup
const MULTI_BALL_FAN: [f32; 2] = [-0.6, 0.6];

/// After a brick is destroyed: maybe drop a pickup centered on it
pub fn roll_drop(state: &mut GameState, cx: f32, cy: f32) {
    if state.rng.next_f64() >= POWERUP_CHANCE {
        return;
    }
    let idx = (state.rng.next_f64() * PowerupKind::ALL.len() as f64).floor() as usize;
    let kind = PowerupKind::ALL[idx.min(PowerupKind::ALL.len() - 1)];
    state.powerups.push(Powerup {
        pos: Vec2::new(cx - POWERUP_SIZE / 2.0, cy - POWERUP_SIZE / 2.0),
        kind,
        vy: POWERUP_FALL_SPEED,
    });
    state.emit(GameEvent::PowerupDropped(kind));
}

/// Move pickups, cull the ones past the bottom and apply any the paddle catches
pub fn update_pickups(state: &mut GameState) {
    let falling = std::mem::take(&mut state.powerups);
    let mut kept = Vec::with_capacity(falling.len());

    for mut pickup in falling {
        if pickup.pos.y > FIELD_HEIGHT + POWERUP_SIZE {
            continue;
        }
        pickup.pos.y += pickup.vy;
        if pickup.rect().overlaps(&state.paddle.rect()) {
            apply(state, pickup.kind);
        } else {
            kept.push(pickup);
        }
    }

    state.powerups = kept;
}

/// Apply a collected pickup
pub fn apply(state: &mut GameState, kind: PowerupKind) {
    let max_speed = state.max_ball_speed;
    let (text, color) = match kind {
        PowerupKind::Expand => {
            state.timers.shrink = 0;
            state.paddle.width = (state.paddle.width + PADDLE_WIDTH_STEP).min(PADDLE_MAX_WIDTH);
            state.paddle.clamp_to_field();
            state.timers.expand = kind.duration();
            ("Paddle Expanded!", GREEN)
        }
        PowerupKind::Shrink => {
            state.timers.expand = 0;
            state.paddle.width = (state.paddle.width - PADDLE_WIDTH_STEP).max(PADDLE_MIN_WIDTH);
            state.paddle.clamp_to_field();
            state.timers.shrink = kind.duration();
            ("Paddle Shrunk!", RED)
        }
        PowerupKind::Slow => {
            state.paddle.speed = (state.paddle.speed - 1.0).max(MIN_PADDLE_SPEED);
            for ball in state.balls.iter_mut() {
                let new_dy = (ball.vel.y.abs() - 1.0).max(3.0);
                ball.vel.y = if ball.vel.y < 0.0 { -new_dy } else { new_dy };
                settle_velocity(&mut ball.vel, &mut state.rng, max_speed);
            }
            state.timers.slow = kind.duration();
            ("Ball Slowed!", ORANGE)
        }
        PowerupKind::Fast => {
            state.timers.slow = 0;
            state.max_ball_speed = FAST_MAX_BALL_SPEED;
            for ball in state.balls.iter_mut() {
                ball.vel *= 1.25;
                ensure_min_horizontal(&mut ball.vel, &mut state.rng, MIN_HORZ_SPEED);
                ensure_min_vertical(&mut ball.vel, &mut state.rng, MIN_VERT_SPEED);
                clamp_speed(&mut ball.vel, FAST_MAX_BALL_SPEED);
            }
            state.timers.fast = kind.duration();
            ("Ball Fast!", CYAN)
        }
        PowerupKind::MultiBall => {
            spawn_multi_ball(state);
            ("Multi-Ball!", PURPLE)
        }
    };

    log::debug!("Powerup applied: {}", kind.as_str());
    state.message = Some(PowerupMessage {
        text: text.to_string(),
        color,
        ticks: POWERUP_MESSAGE_TICKS,
    });
    state.emit(GameEvent::PowerupCollected(kind));
}

/// Two extra free balls fanned out from the serving position
fn spawn_multi_ball(state: &mut GameState) {
    state.multiball_triggered = true;
    state.shake = state.shake.max(8);
    let origin = state.paddle.serve_point();

    for offset in MULTI_BALL_FAN {
        let mut ball = Ball::serving(&mut state.rng);
        ball.on_paddle = false;
        ball.pos = origin;
        let jitter = state.rng.sign() * 3.0;
        ball.vel = Vec2::new(BASE_BALL_SPEED * (1.2 * offset) + jitter, -BASE_BALL_SPEED - 1.0);
        settle_velocity(&mut ball.vel, &mut state.rng, state.max_ball_speed);
        state.balls.push(ball);
    }
}

/// Undo an expired effect
pub fn revert(state: &mut GameState, kind: PowerupKind) {
    match kind {
        PowerupKind::Expand | PowerupKind::Shrink => {
            if state.timers.expand == 0 && state.timers.shrink == 0 {
                state.paddle.width = PADDLE_WIDTH;
                state.paddle.clamp_to_field();
            }
        }
        PowerupKind::Slow => {
            state.paddle.speed = BASE_PADDLE_SPEED;
            let max_speed = state.max_ball_speed;
            for ball in state.balls.iter_mut() {
                let sign = if ball.vel.y < 0.0 { -1.0 } else { 1.0 };
                ball.vel.y = BASE_BALL_SPEED * sign;
                settle_velocity(&mut ball.vel, &mut state.rng, max_speed);
            }
        }
        PowerupKind::Fast => {
            state.max_ball_speed = MAX_BALL_SPEED;
            for ball in state.balls.iter_mut() {
                clamp_speed(&mut ball.vel, MAX_BALL_SPEED);
            }
        }
        PowerupKind::MultiBall => {}
    }
    log::debug!("Powerup expired: {}", kind.as_str());
    state.emit(GameEvent::PowerupExpired(kind));
}

/// Count down active effects unless frozen, reverting any that run out
pub fn tick_timers(state: &mut GameState) {
    if state.timers_frozen {
        return;
    }
    for kind in PowerupKind::ALL {
        let timer = state.timers.get_mut(kind);
        if *timer == 0 {
            continue;
        }
        *timer -= 1;
        if *timer == 0 {
            revert(state, kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launched_state() -> GameState {
        let mut state = GameState::new();
        for ball in state.balls.iter_mut() {
            ball.on_paddle = false;
            ball.pos = Vec2::new(400.0, 400.0);
        }
        state
    }

    #[test]
    fn test_expand_and_shrink_exclusive() {
        let mut state = GameState::new();
        apply(&mut state, PowerupKind::Expand);
        assert_eq!(state.paddle.width, PADDLE_WIDTH + PADDLE_WIDTH_STEP);
        assert_eq!(state.timers.expand, 900);

        apply(&mut state, PowerupKind::Shrink);
        assert_eq!(state.timers.expand, 0);
        assert_eq!(state.timers.shrink, 900);
        assert_eq!(state.paddle.width, PADDLE_WIDTH);
        assert_eq!(state.message.as_ref().map(|m| m.text.as_str()), Some("Paddle Shrunk!"));
    }

    #[test]
    fn test_width_bounds() {
        let mut state = GameState::new();
        for _ in 0..10 {
            apply(&mut state, PowerupKind::Expand);
        }
        assert_eq!(state.paddle.width, PADDLE_MAX_WIDTH);
        for _ in 0..10 {
            apply(&mut state, PowerupKind::Shrink);
        }
        assert_eq!(state.paddle.width, PADDLE_MIN_WIDTH);
    }

    #[test]
    fn test_expand_keeps_paddle_in_field() {
        let mut state = GameState::new();
        state.paddle.move_by(FIELD_WIDTH);
        apply(&mut state, PowerupKind::Expand);
        assert_eq!(state.paddle.x, FIELD_WIDTH - state.paddle.width);
    }

    #[test]
    fn test_width_reverts_only_when_both_idle() {
        let mut state = GameState::new();
        apply(&mut state, PowerupKind::Expand);
        state.timers.expand = 1;
        state.timers.shrink = 5;
        tick_timers(&mut state);
        assert_eq!(state.timers.expand, 0);
        assert_eq!(state.paddle.width, PADDLE_WIDTH + PADDLE_WIDTH_STEP);

        state.timers.shrink = 1;
        tick_timers(&mut state);
        assert_eq!(state.paddle.width, PADDLE_WIDTH);
    }

    #[test]
    fn test_slow_then_revert() {
        let mut state = launched_state();
        state.balls[0].vel = Vec2::new(3.0, -6.0);
        apply(&mut state, PowerupKind::Slow);
        assert_eq!(state.paddle.speed, BASE_PADDLE_SPEED - 1.0);
        assert_eq!(state.balls[0].vel.y, -5.0);

        state.timers.slow = 1;
        tick_timers(&mut state);
        assert_eq!(state.paddle.speed, BASE_PADDLE_SPEED);
        assert_eq!(state.balls[0].vel.y, -BASE_BALL_SPEED);
        assert!(state.events.contains(&GameEvent::PowerupExpired(PowerupKind::Slow)));
    }

    #[test]
    fn test_fast_raises_cap_and_expiry_reclamps() {
        let mut state = launched_state();
        state.balls[0].vel = Vec2::new(6.0, -8.0);
        state.timers.slow = 100;
        apply(&mut state, PowerupKind::Fast);
        assert_eq!(state.timers.slow, 0);
        assert_eq!(state.max_ball_speed, FAST_MAX_BALL_SPEED);
        assert!((state.balls[0].vel.length() - 12.5).abs() < 1e-4);

        state.timers.fast = 1;
        tick_timers(&mut state);
        assert_eq!(state.max_ball_speed, MAX_BALL_SPEED);
        assert!(state.balls[0].vel.length() <= MAX_BALL_SPEED + 1e-4);
    }

    #[test]
    fn test_multi_ball_spawns_two() {
        let mut state = GameState::new();
        apply(&mut state, PowerupKind::MultiBall);
        assert_eq!(state.balls.len(), 3);
        assert!(state.multiball_triggered);
        assert!(state.shake >= 8);
        assert_eq!(state.timers.multi_ball, 0);
        for ball in &state.balls[1..] {
            assert!(!ball.on_paddle);
            assert!(ball.vel.y < 0.0);
            assert!(ball.vel.length() <= MAX_BALL_SPEED + 1e-4);
            assert!(ball.vel.x.abs() >= MIN_HORZ_SPEED);
        }
    }

    #[test]
    fn test_frozen_timers_hold() {
        let mut state = GameState::new();
        state.timers.expand = 10;
        state.timers_frozen = true;
        tick_timers(&mut state);
        assert_eq!(state.timers.expand, 10);
        state.timers_frozen = false;
        tick_timers(&mut state);
        assert_eq!(state.timers.expand, 9);
    }

    #[test]
    fn test_pickup_caught_by_paddle() {
        let mut state = GameState::new();
        let paddle = state.paddle.rect();
        state.powerups.push(Powerup {
            pos: Vec2::new(paddle.center_x() - POWERUP_SIZE / 2.0, paddle.y - POWERUP_SIZE),
            kind: PowerupKind::Expand,
            vy: POWERUP_FALL_SPEED,
        });
        update_pickups(&mut state);
        assert!(state.powerups.is_empty());
        assert_eq!(state.timers.expand, 900);
    }

    #[test]
    fn test_pickup_missed_is_culled() {
        let mut state = GameState::new();
        state.powerups.push(Powerup {
            pos: Vec2::new(10.0, FIELD_HEIGHT + POWERUP_SIZE - 1.0),
            kind: PowerupKind::Fast,
            vy: POWERUP_FALL_SPEED,
        });
        update_pickups(&mut state);
        assert_eq!(state.powerups.len(), 1);
        update_pickups(&mut state);
        assert!(state.powerups.is_empty());
        assert_eq!(state.max_ball_speed, MAX_BALL_SPEED);
    }
}
