//! Cosmetic effects: particles, score popups, hit flash, screen shake
//!
//! None of this feeds back into gameplay, but particle bursts and shake
//! jitter draw from the shared rng.

use glam::Vec2;

use super::state::{Brick, GameState, Particle, Popup};
use crate::consts::*;

/// Radial burst of particles over a destroyed brick
pub fn spawn_brick_burst(state: &mut GameState, brick: &Brick) {
    let rng = &mut state.rng;
    for _ in 0..PARTICLES_PER_BRICK {
        let angle = rng.next_f32() * std::f32::consts::TAU;
        let speed = 1.5 + rng.next_f32() * 2.5;
        let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed);
        let x = brick.x + rng.next_f32() * brick.w;
        let y = brick.y + rng.next_f32() * brick.h;
        let mut color = brick.color;
        for c in color.iter_mut() {
            let jitter = (rng.next_f64() * 40.0 - 20.0).floor() as i32;
            *c = (*c as i32 + jitter).clamp(0, 255) as u8;
        }
        let life = 22 + (rng.next_f64() * 18.0).floor() as i32;
        state.particles.push(Particle {
            pos: Vec2::new(x, y),
            vel,
            life,
            color,
        });
    }
}

/// Floating text at a point
pub fn add_popup(state: &mut GameState, x: f32, y: f32, text: &str) {
    state.popups.push(Popup {
        pos: Vec2::new(x, y),
        dy: POPUP_DRIFT,
        life: POPUP_LIFE as i32,
        text: text.to_string(),
    });
}

/// Integrate particles and drop the expired ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life -= 1;
    }
    particles.retain(|p| p.life > 0);
}

/// Drift popups upward and drop the expired ones
pub fn update_popups(popups: &mut Vec<Popup>) {
    for popup in popups.iter_mut() {
        popup.pos.y += popup.dy;
        popup.life -= 1;
    }
    popups.retain(|p| p.life > 0);
}

/// Sample this tick's render jitter, then decay the magnitude by one
pub fn update_shake(state: &mut GameState) {
    if state.shake == 0 {
        state.shake_offset = (0, 0);
        return;
    }
    let s = state.shake as f64;
    let ox = (state.rng.next_f64() * (s * 2.0 + 1.0) - s).floor() as i32;
    let oy = (state.rng.next_f64() * (s * 2.0 + 1.0) - s).floor() as i32;
    state.shake_offset = (ox, oy);
    state.shake -= 1;
}

/// End-of-tick countdowns for cosmetic state
pub fn decay(state: &mut GameState) {
    update_shake(state);

    for brick in state.bricks.iter_mut() {
        brick.hit_flash = brick.hit_flash.saturating_sub(1);
    }

    update_popups(&mut state.popups);

    if let Some(message) = state.message.as_mut() {
        message.ticks = message.ticks.saturating_sub(1);
        if message.ticks == 0 {
            state.message = None;
        }
    }

    state.banner_ticks = state.banner_ticks.saturating_sub(1);
}
