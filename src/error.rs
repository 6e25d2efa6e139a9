use thiserror::Error;

/// Errors returned by the batch operations of this crate.
///
/// All of these are detected before any parallel work starts, so a failed call
/// never leaves a partially written output behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MvnError {
    /// The covariance matrix is not positive definite.
    #[error("matrix is not positive definite: leading minor of order {order} is not positive")]
    NotPositiveDefinite {
        /// 1-based order of the first leading principal minor that failed
        order: usize,
    },

    /// Mean, covariance, query points, bounds or output disagree in size.
    #[error("dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Which argument had the wrong size
        what: &'static str,
        /// Size implied by the other arguments
        expected: usize,
        /// Size actually provided
        found: usize,
    },

    /// A scalar parameter is out of range, e.g. `ncores == 0`.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Anything else: output allocation failed, the worker pool could not be built, ...
    #[error("computation failed: {0}")]
    Computation(String),
}

impl MvnError {
    pub(crate) fn dims(what: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            found,
        }
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = MvnError::NotPositiveDefinite { order: 2 };
        assert!(err.to_string().contains("order 2"));

        let err = MvnError::dims("query columns", 2, 3);
        assert_eq!(
            err.to_string(),
            "dimension mismatch for query columns: expected 2, found 3"
        );

        let err = MvnError::invalid("ncores", "must be at least 1");
        assert!(err.to_string().contains("`ncores`"));
    }
}
