use crate::MvnError;
use ndarray::{Array2, ArrayView2};
use tracing::debug;

/// The upper-triangular Cholesky factor `R` of a covariance matrix, `Rᵗ R = Σ`.
///
/// Both the sampling transform and the triangular solve walk `R` one column at a
/// time, and only the part of a column on or above the diagonal is nonzero.
/// So we store column `j` of `R`, entries `0..=j`, contiguously (i.e. `Rᵗ` row-major,
/// lower triangle), and never touch the zeros.
#[derive(Clone, Debug, PartialEq)]
pub struct CholeskyFactor {
    dim: usize,
    // columns[j * dim + k] = R[k][j] for k <= j, zero otherwise
    columns: Vec<f64>,
}

/// Resolve the Cholesky factor of `covariance`.
///
/// If `is_chol` is true, `covariance` is taken to already be the upper Cholesky factor,
/// and its upper triangle is used as-is, without any verification.
/// Otherwise the upper Cholesky factorization is computed, reading only the upper
/// triangle of `covariance`.
///
/// Fails with [`MvnError::DimensionMismatch`] if the matrix isn't square, and with
/// [`MvnError::NotPositiveDefinite`] if factorization breaks down.
pub fn resolve_factor(
    covariance: ArrayView2<'_, f64>,
    is_chol: bool,
) -> Result<CholeskyFactor, MvnError> {
    if !covariance.is_square() {
        return Err(MvnError::dims(
            "covariance columns",
            covariance.nrows(),
            covariance.ncols(),
        ));
    }
    let factor = if is_chol {
        CholeskyFactor::from_upper(covariance)
    } else {
        CholeskyFactor::factorize(covariance)?
    };
    debug!(dim = factor.dim, is_chol, "resolved cholesky factor");
    Ok(factor)
}

impl CholeskyFactor {
    // Take the upper triangle of a square matrix, unchecked
    fn from_upper(upper: ArrayView2<'_, f64>) -> Self {
        let dim = upper.nrows();
        let mut columns = vec![0.0; dim * dim];
        for j in 0..dim {
            for k in 0..=j {
                columns[j * dim + k] = upper[[k, j]];
            }
        }
        Self { dim, columns }
    }

    // Cholesky-Banachiewicz on the columns of R, which are the rows of Rᵗ
    fn factorize(cov: ArrayView2<'_, f64>) -> Result<Self, MvnError> {
        let dim = cov.nrows();
        let mut columns = vec![0.0; dim * dim];
        for j in 0..dim {
            let col_j = &columns[j * dim..j * dim + j];
            let s = cov[[j, j]] - col_j.iter().map(|r| r * r).sum::<f64>();
            // NaN also fails here
            if !(s > 0.0) {
                return Err(MvnError::NotPositiveDefinite { order: j + 1 });
            }
            let r_jj = s.sqrt();
            columns[j * dim + j] = r_jj;

            for i in j + 1..dim {
                let dot: f64 = (0..j)
                    .map(|k| columns[j * dim + k] * columns[i * dim + k])
                    .sum();
                columns[i * dim + j] = (cov[[j, i]] - dot) / r_jj;
            }
        }
        Ok(Self { dim, columns })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Column `j` of `R`, from row 0 down to and including the diagonal.
    #[inline]
    pub fn column(&self, j: usize) -> &[f64] {
        &self.columns[j * self.dim..j * self.dim + j + 1]
    }

    /// The diagonal entry `R[j][j]`
    #[inline]
    pub fn diag(&self, j: usize) -> f64 {
        self.columns[j * self.dim + j]
    }

    /// The factor as a dense upper-triangular matrix
    pub fn upper(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.dim, self.dim), |(k, j)| {
            if k <= j { self.columns[j * self.dim + k] } else { 0.0 }
        })
    }

    /// `Σ log R[j][j]`, which is half the log-determinant of the covariance
    pub fn half_log_det(&self) -> f64 {
        (0..self.dim).map(|j| self.diag(j).ln()).sum()
    }

    /// Log-determinant of the covariance matrix `RᵗR`
    pub fn log_det(&self) -> f64 {
        2.0 * self.half_log_det()
    }

    /// Solve `Rᵗ u = v` for `u` by forward substitution, overwriting `v` with `u`,
    /// and return `u·u`.
    ///
    /// `u[j]` only depends on `v[j]` and `u[0..j]`, so going left to right in place is fine.
    pub fn solve_transposed_in_place(&self, v: &mut [f64]) -> f64 {
        debug_assert_eq!(v.len(), self.dim);
        let mut sum_sq = 0.0;
        for j in 0..self.dim {
            let col = self.column(j);
            let mut acc = v[j];
            for k in 0..j {
                acc -= col[k] * v[k];
            }
            let u = acc / col[j];
            v[j] = u;
            sum_sq += u * u;
        }
        sum_sq
    }
}
