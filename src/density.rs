use crate::partition::Partition;
use crate::util::try_zeroed;
use crate::{CholeskyFactor, Mvn, MvnError};
use ndarray::{Array1, ArrayView2};
use wide::f64x4;

const LANES: usize = 4;

/// Evaluate the density of `N(mean, covariance)` at each row of `x`.
///
/// Quick-start helper for [`Mvn::density`]. With `log_scale` the log-density is
/// returned, computed directly rather than as `ln(exp(..))`.
pub fn density(
    x: ArrayView2<'_, f64>,
    mean: &[f64],
    covariance: ArrayView2<'_, f64>,
    log_scale: bool,
    is_chol: bool,
    ncores: usize,
) -> Result<Array1<f64>, MvnError> {
    Mvn::new(mean, covariance, is_chol)?.density(x, log_scale, ncores)
}

/// Squared Mahalanobis distance from `mean` of each row of `x`, with respect to `covariance`.
///
/// Quick-start helper for [`Mvn::mahalanobis`].
pub fn mahalanobis(
    x: ArrayView2<'_, f64>,
    mean: &[f64],
    covariance: ArrayView2<'_, f64>,
    is_chol: bool,
    ncores: usize,
) -> Result<Array1<f64>, MvnError> {
    Mvn::new(mean, covariance, is_chol)?.mahalanobis(x, ncores)
}

impl Mvn {
    /// Density (or log-density, if `log_scale`) at each row of `x`.
    ///
    /// `x` must have `self.dim()` columns. Results are in row order and do not depend on `ncores`.
    pub fn density(
        &self,
        x: ArrayView2<'_, f64>,
        log_scale: bool,
        ncores: usize,
    ) -> Result<Array1<f64>, MvnError> {
        self.evaluate(x, ncores, |out| {
            for val in out {
                let log_density = self.log_normalizer() - 0.5 * *val;
                *val = if log_scale {
                    log_density
                } else {
                    log_density.exp()
                };
            }
        })
    }

    /// Squared Mahalanobis distance `(x - μ)ᵗ Σ⁻¹ (x - μ)` of each row of `x`.
    pub fn mahalanobis(
        &self,
        x: ArrayView2<'_, f64>,
        ncores: usize,
    ) -> Result<Array1<f64>, MvnError> {
        self.evaluate(x, ncores, |_| {})
    }

    // Compute squared distances block by block, then let `finish` map them in place
    fn evaluate<F>(
        &self,
        x: ArrayView2<'_, f64>,
        ncores: usize,
        finish: F,
    ) -> Result<Array1<f64>, MvnError>
    where
        F: Fn(&mut [f64]) + Sync + Send,
    {
        self.check_query(&x)?;
        let partition = Partition::new(x.nrows(), ncores)?;
        let mut out = try_zeroed(x.nrows())?;
        let d = self.dim();

        // Borrowed as-is when already row-major, copied otherwise
        let x = x.as_standard_layout();
        let points = x
            .as_slice()
            .ok_or_else(|| MvnError::Computation("query points are not contiguous".into()))?;

        partition.run(&mut out, 1, |_t, rows, block| {
            let points = &points[rows.start * d..rows.end * d];
            squared_distances(&self.factor, &self.mean, points, block);
            finish(block);
        })?;
        Ok(Array1::from(out))
    }
}

/// For each row `x` of `points` (rows of length `mean.len()`), solve `Rᵗ u = x - mean`
/// and store `u·u` in `out`.
///
/// Four rows are solved at once, one per simd lane, and leftover rows go through the
/// scalar solve. The lane path does exactly the same operations in the same order as
/// [`CholeskyFactor::solve_transposed_in_place`], so a row's result doesn't depend on
/// where it falls in the batch.
pub(crate) fn squared_distances(
    factor: &CholeskyFactor,
    mean: &[f64],
    points: &[f64],
    out: &mut [f64],
) {
    let d = mean.len();
    if d == 0 {
        out.fill(0.0);
        return;
    }
    debug_assert_eq!(points.len(), out.len() * d);

    let mut u = vec![f64x4::ZERO; d];
    let mut groups = points.chunks_exact(LANES * d);
    let mut out_groups = out.chunks_exact_mut(LANES);

    for (group, out4) in (&mut groups).zip(&mut out_groups) {
        let mut sum_sq = f64x4::ZERO;
        for j in 0..d {
            let col = factor.column(j);
            let x = f64x4::new(core::array::from_fn(|lane| group[lane * d + j]));
            let mut acc = x - f64x4::splat(mean[j]);
            for k in 0..j {
                acc -= f64x4::splat(col[k]) * u[k];
            }
            let u_j = acc / f64x4::splat(col[j]);
            u[j] = u_j;
            sum_sq += u_j * u_j;
        }
        let sum_sq: [f64; LANES] = sum_sq.into();
        out4.copy_from_slice(&sum_sq);
    }

    let mut scratch = vec![0.0; d];
    for (point, val) in groups
        .remainder()
        .chunks_exact(d)
        .zip(out_groups.into_remainder())
    {
        for ((s, x), m) in scratch.iter_mut().zip(point).zip(mean) {
            *s = x - m;
        }
        *val = factor.solve_transposed_in_place(&mut scratch);
    }
}
