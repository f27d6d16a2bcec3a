//! Seeded per-cell sampler.
//!
//! Maps a grid coordinate to a uniform value in `[0, 1)` using only wrapping
//! `u32` arithmetic, so the same (seed, row, col) yields the same value on
//! every platform.

use serde::{Deserialize, Serialize};

use crate::constants::{AVALANCHE_MULT, COL_HASH_PRIME, DEFAULT_WORLD_SEED, ROW_HASH_PRIME};

/// World seed - the root of all cell generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSeed {
    pub seed: u32,
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self {
            seed: DEFAULT_WORLD_SEED,
        }
    }
}

impl WorldSeed {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Raw 32-bit hash of a cell coordinate
    pub fn cell_hash(&self, row: u32, col: u32) -> u32 {
        let mut x = row.wrapping_mul(ROW_HASH_PRIME) ^ col.wrapping_mul(COL_HASH_PRIME) ^ self.seed;
        x = (x ^ (x >> 16)).wrapping_mul(AVALANCHE_MULT);
        x = (x ^ (x >> 16)).wrapping_mul(AVALANCHE_MULT);
        x ^ (x >> 16)
    }

    /// Uniform sample in `[0, 1)` for a cell coordinate
    pub fn sample(&self, row: u32, col: u32) -> f64 {
        f64::from(self.cell_hash(row, col)) / 4_294_967_296.0
    }
}
