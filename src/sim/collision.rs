//! Axis-separated ball motion and collision response
//!
//! Each free ball moves along X, resolves walls then bricks, then moves along
//! Y and resolves ceiling, paddle and bricks. At most one brick is hit per
//! axis per tick: the first overlapping one in creation order.

use glam::Vec2;

use super::effects;
use super::powerup;
use super::rng::Lcg;
use super::state::{Ball, Brick, GameEvent, GameState, Paddle};
use crate::Rect;
use crate::consts::*;

/// Motion axis for a collision pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// What happened to a ball this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallOutcome {
    InPlay,
    /// Fell past the bottom of the field
    Lost,
}

/// Scale velocity down so its magnitude does not exceed `max_speed`
#[inline]
pub fn clamp_speed(vel: &mut Vec2, max_speed: f32) {
    let v2 = vel.length_squared();
    if v2 > max_speed * max_speed {
        *vel *= max_speed / v2.sqrt();
    }
}

/// Keep `|dx| >= min_h`, re-deriving dy so overall speed is preserved
pub fn ensure_min_horizontal(vel: &mut Vec2, rng: &mut Lcg, min_h: f32) {
    let speed = vel.length();
    if speed == 0.0 {
        vel.x = min_h * rng.sign();
        vel.y = -BASE_BALL_SPEED;
        return;
    }
    if vel.x.abs() < min_h {
        let sign = if vel.x < 0.0 {
            -1.0
        } else if vel.x > 0.0 {
            1.0
        } else {
            rng.sign()
        };
        let new_dx = min_h.min(speed * 0.9) * sign;
        let rem = (speed * speed - new_dx * new_dx).max(1.0);
        let dy_sign = if vel.y > 0.0 { 1.0 } else { -1.0 };
        vel.x = new_dx;
        vel.y = dy_sign * rem.sqrt();
    }
}

/// Keep `|dy| >= min_v` when the ball is fast enough to afford it
pub fn ensure_min_vertical(vel: &mut Vec2, rng: &mut Lcg, min_v: f32) {
    let speed = vel.length();
    if speed == 0.0 {
        vel.x = MIN_HORZ_SPEED * rng.sign();
        vel.y = -min_v;
        return;
    }
    if vel.y.abs() < min_v && speed > min_v {
        let dy_sign = if vel.y > 0.0 { 1.0 } else { -1.0 };
        let dx_mag = (speed * speed - min_v * min_v).max(0.0).sqrt();
        let dx_sign = if vel.x > 0.0 {
            1.0
        } else if vel.x < 0.0 {
            -1.0
        } else {
            rng.sign()
        };
        vel.x = dx_sign * dx_mag;
        vel.y = dy_sign * min_v;
    }
}

/// Minimum horizontal speed followed by the session speed cap
#[inline]
pub fn settle_velocity(vel: &mut Vec2, rng: &mut Lcg, max_speed: f32) {
    ensure_min_horizontal(vel, rng, MIN_HORZ_SPEED);
    clamp_speed(vel, max_speed);
}

/// Nudge the ball along its current direction on `axis`
#[inline]
pub fn post_separate(ball: &mut Ball, axis: Axis, amount: f32) {
    match axis {
        Axis::X => ball.pos.x += if ball.vel.x > 0.0 { amount } else { -amount },
        Axis::Y => ball.pos.y += if ball.vel.y > 0.0 { amount } else { -amount },
    }
}

/// Index of the first brick (creation order) overlapping `ball_box`
pub fn first_brick_hit(bricks: &[Brick], ball_box: &Rect) -> Option<usize> {
    bricks.iter().position(|brick| ball_box.overlaps(&brick.rect()))
}

/// Kick a ball that has been travelling almost vertically for too long
pub fn correct_straight_rally(ball: &mut Ball, rng: &mut Lcg, max_speed: f32) {
    if ball.vel.x.abs() < MIN_HORZ_SPEED * 0.8 && ball.vel.y.abs() > 3.5 {
        ball.straight_frames += 1;
    } else {
        ball.straight_frames = 0;
    }

    if ball.straight_frames > STRAIGHT_FRAME_LIMIT {
        let dir = rng.sign();
        let kick = 1.2 + rng.next_f32() * 0.6;
        ball.vel.x += dir * kick;
        ensure_min_horizontal(&mut ball.vel, rng, MIN_HORZ_SPEED + 0.2);
        clamp_speed(&mut ball.vel, max_speed);
        ball.straight_frames = 0;
    }
}

/// Left/right field boundary. Returns true on a bounce.
pub fn bounce_off_side_walls(ball: &mut Ball, rng: &mut Lcg, max_speed: f32) -> bool {
    if ball.pos.x - BALL_RADIUS > 0.0 && ball.pos.x + BALL_RADIUS < FIELD_WIDTH {
        return false;
    }
    ball.vel.x = -ball.vel.x;
    ball.pos.x = ball.pos.x.clamp(BALL_RADIUS, FIELD_WIDTH - BALL_RADIUS);
    settle_velocity(&mut ball.vel, rng, max_speed);
    post_separate(ball, Axis::X, SEPARATION);
    true
}

/// Top of the play area. Returns true on a bounce.
pub fn bounce_off_ceiling(ball: &mut Ball, rng: &mut Lcg, max_speed: f32) -> bool {
    if ball.pos.y - BALL_RADIUS > TOP_PLAY_Y {
        return false;
    }
    ball.pos.y = TOP_PLAY_Y + BALL_RADIUS;
    ball.vel.y = -ball.vel.y;
    settle_velocity(&mut ball.vel, rng, max_speed);
    post_separate(ball, Axis::Y, SEPARATION);
    true
}

/// Paddle rebound with english from hit offset and paddle motion.
/// Only a descending ball bounces. Returns true on a bounce.
pub fn bounce_off_paddle(
    ball: &mut Ball,
    ball_box: &Rect,
    paddle: &Paddle,
    paddle_vx: f32,
    rng: &mut Lcg,
    max_speed: f32,
) -> bool {
    if !(ball_box.overlaps(&paddle.rect()) && ball.vel.y > 0.0) {
        return false;
    }
    ball.pos.y = paddle.y - BALL_RADIUS;
    ball.vel.y = -ball.vel.y;
    let hit_pos = ball.pos.x - paddle.center_x();
    ball.vel.x += hit_pos / PADDLE_DEFLECT_DIVISOR;
    ball.vel.x += paddle_vx * PADDLE_SPIN_FACTOR;
    settle_velocity(&mut ball.vel, rng, max_speed);
    post_separate(ball, Axis::Y, SEPARATION);
    true
}

/// Reflect off a brick on `axis` and push the ball clear of it, toward the
/// ball's side of the brick center
pub fn bounce_off_brick(ball: &mut Ball, brick: &Rect, axis: Axis) {
    match axis {
        Axis::X => {
            ball.vel.x = -ball.vel.x;
            ball.pos.x = if ball.pos.x > brick.center_x() {
                brick.x + brick.w + BALL_RADIUS
            } else {
                brick.x - BALL_RADIUS
            };
        }
        Axis::Y => {
            ball.vel.y = -ball.vel.y;
            ball.pos.y = if ball.pos.y > brick.center_y() {
                brick.y + brick.h + BALL_RADIUS
            } else {
                brick.y - BALL_RADIUS
            };
        }
    }
}

/// Take one hit off the brick at `index`, destroying it at zero strength
pub fn damage_brick(state: &mut GameState, index: usize) {
    let brick = &mut state.bricks[index];
    brick.strength = brick.strength.saturating_sub(1);
    brick.hit_flash = HIT_FLASH_TICKS;

    if brick.strength > 0 {
        // Fade toward grey as strength drops
        let mix = 0.2 * ROWS.saturating_sub(brick.strength) as f32;
        for c in brick.color.iter_mut() {
            *c = (*c as f32 * (1.0 - mix) + 120.0 * mix).floor().clamp(0.0, 255.0) as u8;
        }
        let strength = brick.strength;
        state.emit(GameEvent::BrickHit { strength });
        return;
    }

    let brick = state.bricks.remove(index);
    let rect = brick.rect();
    let (cx, cy) = (rect.center_x(), rect.center_y());

    state.score = state.score.saturating_add(SCORE_PER_BRICK);
    effects::add_popup(state, cx, cy, "+10");
    effects::spawn_brick_burst(state, &brick);
    state.shake = state.shake.max(3);
    state.emit(GameEvent::BrickDestroyed { x: cx, y: cy });

    powerup::roll_drop(state, cx, cy);
}

/// Brick rebound on `axis` for the first brick overlapping `ball_box`
fn resolve_brick_axis(state: &mut GameState, ball: &mut Ball, ball_box: &Rect, axis: Axis) {
    if let Some(index) = first_brick_hit(&state.bricks, ball_box) {
        let brick_rect = state.bricks[index].rect();
        bounce_off_brick(ball, &brick_rect, axis);
        damage_brick(state, index);
        settle_velocity(&mut ball.vel, &mut state.rng, state.max_ball_speed);
    }
}

/// Advance one ball through both axis passes.
///
/// The ball is owned by the caller (taken out of `state.balls`) so that brick
/// damage can mutate the rest of the state.
pub fn advance_ball(state: &mut GameState, ball: &mut Ball, paddle_vx: f32) -> BallOutcome {
    if ball.on_paddle {
        ball.follow_paddle(&state.paddle);
        return BallOutcome::InPlay;
    }

    let max_speed = state.max_ball_speed;
    correct_straight_rally(ball, &mut state.rng, max_speed);
    let prev = ball.pos;
    ball.record_trail(prev);

    // X pass
    ball.pos.x += ball.vel.x;
    bounce_off_side_walls(ball, &mut state.rng, max_speed);
    let box_x = ball.rect();
    resolve_brick_axis(state, ball, &box_x, Axis::X);

    // Y pass; one box sample serves paddle and bricks
    ball.pos.y += ball.vel.y;
    let max_speed = state.max_ball_speed;
    bounce_off_ceiling(ball, &mut state.rng, max_speed);
    let box_y = ball.rect();
    bounce_off_paddle(ball, &box_y, &state.paddle, paddle_vx, &mut state.rng, max_speed);
    resolve_brick_axis(state, ball, &box_y, Axis::Y);

    if ball.pos.y - BALL_RADIUS >= FIELD_HEIGHT {
        BallOutcome::Lost
    } else {
        BallOutcome::InPlay
    }
}
