use crate::MvnError;

/// ln(2π)
pub const LN_2_PI: f64 = 1.837_877_066_409_345_5;

// rows * cols, or InvalidParameter if that doesn't fit in a usize
pub fn checked_len(rows: usize, cols: usize) -> Result<usize, MvnError> {
    rows.checked_mul(cols).ok_or_else(|| {
        MvnError::invalid("n", format!("{rows} x {cols} output does not fit in memory"))
    })
}

// Zeroed buffer for batch output.
//
// Large batches are a normal use case, so allocation failure is reported instead of aborting.
pub fn try_zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>, MvnError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|err| {
        MvnError::Computation(format!("could not allocate output of {len} elements: {err}"))
    })?;
    buf.resize(len, T::default());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ln_2_pi_matches_std() {
        assert!((LN_2_PI - (2.0 * core::f64::consts::PI).ln()).abs() < 1e-15);
    }

    #[test]
    fn overflowing_length_is_invalid() {
        assert!(matches!(
            checked_len(usize::MAX, 2),
            Err(MvnError::InvalidParameter { name: "n", .. })
        ));
        assert_eq!(checked_len(3, 4), Ok(12));
    }
}
