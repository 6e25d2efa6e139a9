use crate::partition::Partition;
use crate::util::{checked_len, try_zeroed};
use crate::{CholeskyFactor, GaussianEngine, Mvn, MvnError, distribute_seeds};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use rand::Rng;

/// Draw `n` samples from `N(mean, covariance)`, one per row of the result.
///
/// Quick-start helper for [`Mvn::sample`]. If `is_chol` is true, `covariance` must
/// already be its own upper Cholesky factor.
pub fn sample<R: Rng + ?Sized>(
    n: usize,
    mean: &[f64],
    covariance: ArrayView2<'_, f64>,
    ncores: usize,
    is_chol: bool,
    rng: &mut R,
) -> Result<Array2<f64>, MvnError> {
    Mvn::new(mean, covariance, is_chol)?.sample(n, ncores, rng)
}

impl Mvn {
    /// Draw `n` samples, one per row of the result, using `ncores` worker threads.
    ///
    /// `rng` is the caller's uniform generator. Exactly `ncores` seeds are taken from it,
    /// on this thread, before any work starts; see [`distribute_seeds`].
    ///
    /// *Reproducibility*: the output is a deterministic function of the state of `rng`,
    /// `n` and `ncores`. With the `parallel` feature, block `t` of the rows is drawn by an
    /// engine seeded with seed `t`, so changing `ncores` changes the numbers (the
    /// distribution does not). Without it, all `ncores` seeds are still drawn, but a
    /// single engine seeded with seed 0 produces every row.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        n: usize,
        ncores: usize,
        rng: &mut R,
    ) -> Result<Array2<f64>, MvnError> {
        let buf = try_zeroed(checked_len(n, self.dim())?)?;
        let mut out = Array2::from_shape_vec((n, self.dim()), buf)
            .map_err(|err| MvnError::Computation(format!("could not shape output: {err}")))?;
        self.sample_into(out.view_mut(), ncores, rng)?;
        Ok(out)
    }

    /// Same as [`Mvn::sample`], but overwrites every row of a caller-provided `out`
    /// instead of allocating. `out` must have `self.dim()` columns and be in standard
    /// (row-major, contiguous) layout.
    ///
    /// The buffer is first filled with standard normal draws, and then each row is
    /// transformed in place, so no other memory is needed.
    pub fn sample_into<R: Rng + ?Sized>(
        &self,
        mut out: ArrayViewMut2<'_, f64>,
        ncores: usize,
        rng: &mut R,
    ) -> Result<(), MvnError> {
        let d = self.dim();
        if out.ncols() != d {
            return Err(MvnError::dims("output columns", d, out.ncols()));
        }
        let n = out.nrows();
        let buf = out
            .as_slice_mut()
            .ok_or_else(|| MvnError::invalid("out", "must be in standard (row-major) layout"))?;
        let seeds = distribute_seeds(rng, ncores)?;

        #[cfg(feature = "parallel")]
        let partition = Partition::new(n, ncores)?;
        // Single engine, seed 0
        #[cfg(not(feature = "parallel"))]
        let partition = Partition::new(n, 1)?;

        partition.run(buf, d, |t, _rows, block| {
            let mut engine = GaussianEngine::new(seeds[t]);
            engine.fill_standard_normal(block);
            for row in block.chunks_exact_mut(d) {
                transform_row(&self.factor, &self.mean, row);
            }
        })
    }
}

/// Replace a row `z` of independent standard normals by `z R + mean`.
///
/// `(z R)[j] = Σ_{k <= j} z[k] R[k][j]` only reads `z[0..=j]`, so computing it for `j`
/// from last to first lets us overwrite `z` as we go.
/// Nothing outside the row is read, which is what lets rows be split across threads.
#[inline]
pub(crate) fn transform_row(factor: &CholeskyFactor, mean: &[f64], row: &mut [f64]) {
    debug_assert_eq!(row.len(), mean.len());
    for j in (0..row.len()).rev() {
        let col = factor.column(j);
        let mut acc = 0.0;
        for k in 0..=j {
            acc += row[k] * col[k];
        }
        row[j] = acc + mean[j];
    }
}
