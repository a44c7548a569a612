//! Validation helpers for parameter vectors and evaluated quantities.
use crate::maxent::errors::{MaxEntError, MaxEntResult};
use ndarray::ArrayView1;

/// Check that `theta` has one finite entry per feature.
///
/// Errors
/// ------
/// - `MaxEntError::ThetaLengthMismatch` if `theta.len() != dim`.
/// - `MaxEntError::InvalidThetaInput` for the first non-finite entry.
pub fn validate_theta(theta: ArrayView1<f64>, dim: usize) -> MaxEntResult<()> {
    if theta.len() != dim {
        return Err(MaxEntError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(MaxEntError::InvalidThetaInput { index, value });
    }
    Ok(())
}

/// Pass `value` through if finite; otherwise report an overflow in `context`.
pub fn ensure_finite(value: f64, context: impl FnOnce() -> String) -> MaxEntResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MaxEntError::NumericOverflow { context: context(), value })
    }
}
