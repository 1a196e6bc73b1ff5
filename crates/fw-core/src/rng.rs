//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! The whole run draws from one `SimRng` seeded from `SimConfig::seed`.
//! The tick protocol is single-threaded and its phase order is fixed, so the
//! sequence of draws (and therefore every outcome) is a pure function of the
//! seed and the roadway.  Draw *count* matters as much as draw order: every
//! Bernoulli trial here consumes exactly one uniform sample, even when the
//! probability is 0 or 1.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.  Not `Sync`; pass `&mut` through the tick context.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for samplers generic over `rand::Rng`.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// One uniform draw in `[0, 1)` compared against `p`.
    ///
    /// Unlike `Rng::gen_bool` this always consumes a sample, so the draw
    /// sequence does not depend on whether `p` happens to be 0 or 1.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.random::<f64>() < p
    }

    /// Uniform index in `0..len`.  `len` must be non-zero.
    #[inline]
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}
