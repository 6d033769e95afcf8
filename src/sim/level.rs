//! Brick layout generation
//!
//! Four placement patterns cycle with the level index. Columns divide the
//! field width evenly with per-column rounding, so there is no leftover gap.

use super::rng::Lcg;
use super::state::{Brick, ROW_COLORS};
use crate::consts::*;

/// Brick placement rule for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPattern {
    Full,
    Checker,
    CenterGap,
    Random,
}

impl LevelPattern {
    const CYCLE: [LevelPattern; 4] = [
        LevelPattern::Full,
        LevelPattern::Checker,
        LevelPattern::CenterGap,
        LevelPattern::Random,
    ];

    /// Pattern for a 1-based level
    pub fn for_level(level: u32) -> Self {
        Self::CYCLE[(level.saturating_sub(1) % 4) as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelPattern::Full => "full",
            LevelPattern::Checker => "checker",
            LevelPattern::CenterGap => "center_gap",
            LevelPattern::Random => "random",
        }
    }

    /// Whether a brick goes at (row, col). Only `Random` draws from the rng.
    pub fn places(&self, row: u32, col: u32, cols: u32, rng: &mut Lcg) -> bool {
        match self {
            LevelPattern::Full => true,
            LevelPattern::Checker => (row + col) % 2 == 0,
            LevelPattern::CenterGap => !(cols / 3 < col && col < (2 * cols) / 3),
            LevelPattern::Random => rng.next_f64() >= 0.2,
        }
    }
}

/// Number of brick columns across the field
pub fn column_count() -> u32 {
    ((FIELD_WIDTH / BRICK_WIDTH).floor() as u32).max(1)
}

/// Top of the brick grid, keeping the lowest row well above the paddle
pub fn brick_top(paddle_y: f32) -> f32 {
    let bricks_h = ROWS as f32 * BRICK_HEIGHT;
    let min_top = TOP_PLAY_Y + 8.0;
    let ideal_top = (paddle_y - TARGET_MIN_GAP - bricks_h).floor();
    min_top.max(ideal_top)
}

/// Hit points for a brick in `row` on `level`
pub fn brick_strength(row: u32, level: u32) -> u32 {
    let level_scale = level.saturating_sub(2);
    ROWS.saturating_sub(row).saturating_sub(level_scale).max(1)
}

/// Build the brick list in row-major order
pub fn create_bricks(top: f32, pattern: LevelPattern, level: u32, rng: &mut Lcg) -> Vec<Brick> {
    let cols = column_count();
    let col_width = FIELD_WIDTH / cols as f32;
    let mut bricks = Vec::with_capacity((ROWS * cols) as usize);

    for row in 0..ROWS {
        let y = top + row as f32 * BRICK_HEIGHT;
        for col in 0..cols {
            if !pattern.places(row, col, cols, rng) {
                continue;
            }
            let x = (col as f32 * col_width).floor();
            let w = ((col + 1) as f32 * col_width).floor() - x;
            bricks.push(Brick {
                x,
                y,
                w: w - 1.0,
                h: BRICK_HEIGHT - 2.0,
                color: ROW_COLORS[row as usize % ROW_COLORS.len()],
                strength: brick_strength(row, level),
                hit_flash: 0,
            });
        }
    }

    log::info!(
        "Level {}: pattern={}, bricks={}",
        level,
        pattern.as_str(),
        bricks.len()
    );

    bricks
}
