use crate::partition::Partition;
use crate::{Mvn, MvnError};
use ndarray::ArrayView2;

/// For each row of `x`, check whether every coordinate lies in `[lower, upper]`,
/// writing the answers into `out`.
///
/// `chol_factor` is the upper Cholesky factor of the covariance (it is not factored
/// again). It and `mean` fix the dimension; plain bounds checking does not otherwise
/// use them, see [`Mvn::check_bounds_within`] for that.
pub fn check_bounds(
    mean: &[f64],
    chol_factor: ArrayView2<'_, f64>,
    x: ArrayView2<'_, f64>,
    upper: &[f64],
    lower: &[f64],
    out: &mut [bool],
    ncores: usize,
) -> Result<(), MvnError> {
    Mvn::new(mean, chol_factor, true)?.check_bounds(x, upper, lower, out, ncores)
}

impl Mvn {
    /// Set `out[i]` to whether `lower[j] <= x[i][j] <= upper[j]` for every coordinate `j`.
    ///
    /// Bounds are inclusive, and infinite bounds are fine. A NaN coordinate is never in bounds.
    /// `out` must have one entry per row of `x`.
    pub fn check_bounds(
        &self,
        x: ArrayView2<'_, f64>,
        upper: &[f64],
        lower: &[f64],
        out: &mut [bool],
        ncores: usize,
    ) -> Result<(), MvnError> {
        self.check_bounds_impl(x, upper, lower, None, out, ncores)
    }

    /// Like [`Mvn::check_bounds`], but a point must additionally have squared Mahalanobis
    /// distance at most `max_sq_distance` from the mean.
    pub fn check_bounds_within(
        &self,
        x: ArrayView2<'_, f64>,
        upper: &[f64],
        lower: &[f64],
        max_sq_distance: f64,
        out: &mut [bool],
        ncores: usize,
    ) -> Result<(), MvnError> {
        self.check_bounds_impl(x, upper, lower, Some(max_sq_distance), out, ncores)
    }

    fn check_bounds_impl(
        &self,
        x: ArrayView2<'_, f64>,
        upper: &[f64],
        lower: &[f64],
        max_sq_distance: Option<f64>,
        out: &mut [bool],
        ncores: usize,
    ) -> Result<(), MvnError> {
        self.check_query(&x)?;
        let d = self.dim();
        if upper.len() != d {
            return Err(MvnError::dims("upper bounds", d, upper.len()));
        }
        if lower.len() != d {
            return Err(MvnError::dims("lower bounds", d, lower.len()));
        }
        if out.len() != x.nrows() {
            return Err(MvnError::dims("output length", x.nrows(), out.len()));
        }
        let partition = Partition::new(x.nrows(), ncores)?;

        let x = x.as_standard_layout();
        let points = x
            .as_slice()
            .ok_or_else(|| MvnError::Computation("query points are not contiguous".into()))?;

        partition.run(out, 1, |_t, rows, block| {
            let mut scratch = vec![0.0; d];
            let points = &points[rows.start * d..rows.end * d];
            for (k, result) in block.iter_mut().enumerate() {
                let point = &points[k * d..(k + 1) * d];
                *result = in_bounds(point, upper, lower)
                    && max_sq_distance.is_none_or(|max| {
                        for ((s, p), m) in scratch.iter_mut().zip(point).zip(&self.mean) {
                            *s = p - m;
                        }
                        self.factor.solve_transposed_in_place(&mut scratch) <= max
                    });
            }
        })
    }
}

#[inline]
fn in_bounds(point: &[f64], upper: &[f64], lower: &[f64]) -> bool {
    point
        .iter()
        .zip(upper.iter().zip(lower))
        .all(|(x, (hi, lo))| lo <= x && x <= hi)
}
