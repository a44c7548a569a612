//! Validation helpers for dual optimization.
//!
//! This module centralizes common consistency checks used across the
//! optimizer interface:
//!
//! - **Option checks**: [`verify_tol_grad`], [`verify_tol_cost`] and
//!   [`verify_simplex_step`] ensure numeric settings are finite and strictly
//!   positive when provided.
//! - **Derivative validation**: [`validate_grad`] and
//!   [`validate_scaling_ratios`] enforce correct dimension and admissible
//!   entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks dual values for
//!   finiteness.
use crate::optimization::{
    dual_optimizer::{Grad, Theta},
    errors::{OptError, OptResult},
};

/// Reason a numeric setting is rejected, or `None` if it is finite and > 0.
fn positive_finite(value: f64) -> Option<&'static str> {
    if !value.is_finite() {
        Some("Value must be finite.")
    } else if value <= 0.0 {
        Some("Value must be positive.")
    } else {
        None
    }
}

/// Validate the optional gradient‐norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| positive_finite(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// Validate the optional cost‐change (or step) tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| positive_finite(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

/// Validate the edge length of the initial Nelder–Mead simplex.
///
/// # Errors
/// Returns [`OptError::InvalidSimplexStep`] if the value is non-finite or ≤ 0.0.
pub fn verify_simplex_step(step: f64) -> OptResult<()> {
    match positive_finite(step) {
        Some(reason) => Err(OptError::InvalidSimplexStep { step, reason }),
        None => Ok(()),
    }
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate iterative-scaling ratios.
///
/// Ratios are `E_emp / E_model` and may legitimately be `0` (unobserved
/// feature) or `+∞` (model expectation underflowed); only `NaN` and negative
/// values are rejected.
///
/// # Errors
/// - [`OptError::ScalingDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] for a `NaN` or negative ratio.
pub fn validate_scaling_ratios(ratios: &Theta, dim: usize) -> OptResult<()> {
    if ratios.len() != dim {
        return Err(OptError::ScalingDimMismatch { expected: dim, found: ratios.len() });
    }
    for (index, &value) in ratios.iter().enumerate() {
        if value.is_nan() || value < 0.0 {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Scaling ratios must be non-negative.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar dual value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn validate_grad_reports_dimension_and_first_bad_entry() {
        assert_eq!(
            validate_grad(&array![1.0, 2.0], 3),
            Err(OptError::GradientDimMismatch { expected: 3, found: 2 })
        );
        assert!(matches!(
            validate_grad(&array![1.0, f64::INFINITY, f64::NAN], 3),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
        assert!(validate_grad(&array![0.0, -1.0], 2).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Zero and infinite ratios are admissible scaling inputs; NaN is not.
    fn validate_scaling_ratios_accepts_zero_and_infinity() {
        assert!(validate_scaling_ratios(&array![0.0, f64::INFINITY, 1.5], 3).is_ok());
        assert!(matches!(
            validate_scaling_ratios(&array![1.0, f64::NAN], 2),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
        assert!(matches!(
            validate_scaling_ratios(&array![1.0], 2),
            Err(OptError::ScalingDimMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn verify_tolerances_reject_non_finite_and_non_positive() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_cost(Some(1e-8)).is_ok());
        assert_eq!(
            verify_tol_grad(Some(0.0)),
            Err(OptError::InvalidTolGrad { tol: 0.0, reason: "Value must be positive." })
        );
        assert!(matches!(verify_tol_cost(Some(f64::NAN)), Err(OptError::InvalidTolCost { .. })));
    }

    #[test]
    fn verify_simplex_step_rejects_non_finite_and_non_positive() {
        assert!(verify_simplex_step(0.5).is_ok());
        assert!(verify_simplex_step(-0.5).is_err());
        assert!(verify_simplex_step(f64::INFINITY).is_err());
    }

    #[test]
    fn validate_value_rejects_non_finite() {
        assert!(validate_value(-3.0).is_ok());
        assert_eq!(
            validate_value(f64::NEG_INFINITY),
            Err(OptError::NonFiniteCost { value: f64::NEG_INFINITY })
        );
    }
}
