//! Level-seeded linear congruential generator
//!
//! One stream is shared by level layout, particle bursts, pickup drops and
//! velocity nudges, so the order of draws is part of the simulation.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// 32-bit LCG: `state = state * 1664525 + 1013904223 (mod 2^32)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed used when `level` begins
    pub fn for_level(level: u32) -> Self {
        Self::new(level.wrapping_mul(crate::consts::LEVEL_SEED_FACTOR))
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Reseed in place
    pub fn reseed(&mut self, seed: u32) {
        self.state = seed;
    }

    /// Advance and return the raw state
    #[inline]
    pub fn next_state(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        self.state
    }

    /// Uniform draw in [0, 1)
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_state() as f64 / TWO_POW_32
    }

    /// Uniform draw in [0, 1), narrowed for physics math
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.next_f64() as f32
    }

    /// Pick one of `values` uniformly. `values` must not be empty.
    pub fn choose<T: Copy>(&mut self, values: &[T]) -> T {
        let idx = (self.next_f64() * values.len() as f64).floor() as usize;
        values[idx.min(values.len() - 1)]
    }

    /// -1.0 or 1.0
    #[inline]
    pub fn sign(&mut self) -> f32 {
        self.choose(&[-1.0, 1.0])
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.next_state()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_state() as u64;
        let hi = self.next_state() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_state().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
