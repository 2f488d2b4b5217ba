//! Seeded randomness shared by every simulation step.
//!
//! All draws go through [`SimRng`] so a world seeded with the same value
//! replays identically.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Rounds `value` toward zero, then adds one when its fractional part exceeds `draw`.
///
/// With `draw` uniform in `[0, 1)` the expected result equals `value` for
/// non-negative inputs, which keeps tiny fractional damages and decays from
/// vanishing on average.
#[must_use]
pub fn round_weighted(value: f64, draw: f64) -> f64 {
    let whole = value.trunc();
    if value - whole > draw {
        whole + 1.0
    } else {
        whole
    }
}

/// Deterministic random source owned by the world.
#[derive(Clone, Debug)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    /// Creates a generator from the provided seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Uniform draw in `[low, high)`; returns `low` when the range is empty.
    pub fn range_f32(&mut self, low: f32, high: f32) -> f32 {
        if high > low {
            self.inner.gen_range(low..high)
        } else {
            low
        }
    }

    /// Uniform integer in `[low, high)`; returns `low` when the range is empty.
    pub fn range_i32(&mut self, low: i32, high: i32) -> i32 {
        if high > low {
            self.inner.gen_range(low..high)
        } else {
            low
        }
    }

    /// Uniform index in `[0, bound)`; returns 0 when `bound` is 0.
    pub fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            0
        } else {
            self.inner.gen_range(0..bound)
        }
    }

    /// Returns `true` with probability `1 / n`.
    pub fn one_in(&mut self, n: u32) -> bool {
        n <= 1 || self.inner.gen_range(0..n) == 0
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.inner.gen::<bool>()
    }

    /// Picks a uniformly random element, or `None` for an empty slice.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            None
        } else {
            Some(items[self.below(items.len())])
        }
    }

    /// Stochastically rounds `value` using a fresh uniform draw.
    pub fn round(&mut self, value: f64) -> f64 {
        round_weighted(value, f64::from(self.unit()))
    }
}
