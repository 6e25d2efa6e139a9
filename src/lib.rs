//! Fast, parallel primitives for the multivariate normal distribution `N(μ, Σ)`.
//!
//! * [`sample`] draws random variates, [`density`] and [`mahalanobis`] evaluate the
//!   (log-)density and squared Mahalanobis distance at a batch of points, and
//!   [`check_bounds`] tests points against elementwise bounds.
//! * [`Mvn`] resolves the Cholesky factor of `Σ` once and then serves any number of
//!   batch calls. The free functions are quick-start helpers that build one per call.
//!   Pass `is_chol = true` when you already hold the upper Cholesky factor, to skip factoring.
//!
//! Matrices are [`ndarray`] arrays, one point per row. Inputs are taken as views in
//! any memory layout; results come back as owned `Array1`/`Array2`.
//!
//! Batches are split into `ncores` contiguous blocks of rows, fixed before any work
//! starts, and each block writes only its own rows of the output. With the `parallel`
//! feature (on by default) the blocks run on a rayon pool of that many threads.
//! A panic inside a block is returned as [`MvnError::Computation`].
//!
//! Sampling takes its randomness from a caller-supplied [`rand::Rng`]: exactly `ncores`
//! seeds are drawn from it up front. With `parallel`, block `t` runs its own
//! [`GaussianEngine`] on seed `t`, so the output is reproducible for a given generator
//! state and `ncores` but differs between values of `ncores`. Without `parallel`, a
//! single engine on seed 0 draws every row.

mod bounds;
mod cholesky;
mod density;
mod engine;
mod error;
mod mvn;
mod partition;
mod sample;
mod seeds;
mod util;

#[cfg(test)]
mod test_utils;

pub use ndarray;

pub use bounds::check_bounds;
pub use cholesky::{CholeskyFactor, resolve_factor};
pub use density::{density, mahalanobis};
pub use engine::GaussianEngine;
pub use error::MvnError;
pub use mvn::Mvn;
pub use sample::sample;
pub use seeds::distribute_seeds;
