//! Uniform sampling helpers over a PCG generator

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Simulation RNG
///
/// Seeded from the OS by default. Tests pin a seed so spawn positions and
/// particle bursts are reproducible within a single test run.
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: Pcg32,
}

impl SimRng {
    pub fn from_entropy() -> Self {
        Self {
            inner: Pcg32::from_rng(&mut rand::rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform in `[min, max)`; returns `min` for an empty range
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        self.inner.random_range(min..max)
    }

    /// Uniform integer in `[lo, hi)`; returns `lo` for an empty range
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.inner.random_range(lo..hi)
    }

    /// Uniform integer in `[lo, hi]`
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.inner.random_range(lo..=hi)
    }

    /// Uniform index into a slice of `len` items (`len` must be non-zero)
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len.max(1))
    }

    /// Uniform angle in `[0, TAU)`
    pub fn angle(&mut self) -> f32 {
        self.range(0.0, std::f32::consts::TAU)
    }

    /// Fair coin flip
    pub fn coin(&mut self) -> bool {
        self.inner.random_bool(0.5)
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
