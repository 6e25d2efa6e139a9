use crate::util::LN_2_PI;
use crate::{CholeskyFactor, MvnError, resolve_factor};
use ndarray::ArrayView2;

/// Context for batch operations against a single multivariate normal `N(μ, Σ)`.
///
/// The Cholesky factor of `Σ` is resolved and validated once, in [`Mvn::new`], and then
/// only read: every batch call below shares it across worker threads without locking.
#[derive(Clone, Debug)]
pub struct Mvn {
    pub(crate) mean: Vec<f64>,
    pub(crate) factor: CholeskyFactor,
    // -d/2 log(2π) - Σ log R[j][j]
    log_normalizer: f64,
}

impl Mvn {
    /// Prepare a distribution from its mean and covariance.
    ///
    /// If `is_chol` is true, `covariance` must already hold the upper Cholesky factor
    /// of the covariance matrix. It is used without verification.
    ///
    /// Fails with [`MvnError::DimensionMismatch`] if `covariance` is not `d x d` where
    /// `d = mean.len()`, and with [`MvnError::NotPositiveDefinite`] if it can't be factored.
    pub fn new(
        mean: &[f64],
        covariance: ArrayView2<'_, f64>,
        is_chol: bool,
    ) -> Result<Self, MvnError> {
        if covariance.nrows() != mean.len() {
            return Err(MvnError::dims(
                "covariance rows",
                mean.len(),
                covariance.nrows(),
            ));
        }
        let factor = resolve_factor(covariance, is_chol)?;
        Self::from_factor(mean.to_vec(), factor)
    }

    /// Prepare a distribution from its mean and an already resolved factor
    pub fn from_factor(mean: Vec<f64>, factor: CholeskyFactor) -> Result<Self, MvnError> {
        if factor.dim() != mean.len() {
            return Err(MvnError::dims("cholesky factor", mean.len(), factor.dim()));
        }
        let log_normalizer = -0.5 * mean.len() as f64 * LN_2_PI - factor.half_log_det();
        Ok(Self {
            mean,
            factor,
            log_normalizer,
        })
    }

    /// Dimension `d` of the distribution
    #[inline]
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    #[inline]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    #[inline]
    pub fn factor(&self) -> &CholeskyFactor {
        &self.factor
    }

    /// `-d/2 log(2π) - 1/2 log det Σ`, the log-density at the mean
    #[inline]
    pub fn log_normalizer(&self) -> f64 {
        self.log_normalizer
    }

    // Query points must be rows of length d
    pub(crate) fn check_query(&self, x: &ArrayView2<'_, f64>) -> Result<(), MvnError> {
        if x.ncols() != self.dim() {
            return Err(MvnError::dims("query columns", self.dim(), x.ncols()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_within::assert_within;
    use ndarray::Array2;

    #[test]
    fn covariance_must_match_mean() {
        let cov = Array2::<f64>::eye(3);
        assert_eq!(
            Mvn::new(&[0.0, 0.0], cov.view(), false).unwrap_err(),
            MvnError::dims("covariance rows", 2, 3)
        );

        let factor = resolve_factor(Array2::eye(2).view(), false).unwrap();
        assert_eq!(
            Mvn::from_factor(vec![0.0; 3], factor).unwrap_err(),
            MvnError::dims("cholesky factor", 3, 2)
        );
    }

    #[test]
    fn normalizer_of_standard_normal() {
        let mvn = Mvn::new(&[1.0, 2.0], Array2::eye(2).view(), false).unwrap();
        assert_within!(+1e-15, mvn.log_normalizer(), -LN_2_PI);
        assert_eq!(mvn.dim(), 2);
        assert_eq!(mvn.mean(), &[1.0, 2.0]);
    }
}
