use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_pcg::Pcg64Mcg;

/// A seeded pseudo-random engine bound to a standard normal sampler.
///
/// Each worker builds its own engine from its own seed, and the engine never leaves
/// that worker, so there is no shared generator state anywhere.
#[derive(Clone, Debug)]
pub struct GaussianEngine {
    rng: Pcg64Mcg,
}

impl GaussianEngine {
    /// Construct an engine from a 64-bit seed. Same seed, same stream.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Draw from N(0, 1)
    #[inline]
    pub fn next_standard_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }

    /// Overwrite `buf` with independent N(0, 1) draws, in order
    #[inline]
    pub fn fill_standard_normal(&mut self, buf: &mut [f64]) {
        for x in buf {
            *x = self.next_standard_normal();
        }
    }
}
