//! dual_optimizer::finite_diff — finite-difference gradient helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient approximations around a parameter
//! vector, with error capture and validation, so that the adapter can serve
//! BFGS even when a [`DualFunction`](super::DualFunction) has no analytic
//! gradient, and so that tests can check analytic gradients against a
//! numerical reference without depending directly on the `finitediff` API.
//!
//! Invariants & assumptions
//! ------------------------
//! - Any error raised by the objective during differencing is routed into the
//!   shared `closure_err` cell (the `finitediff` closures must return `f64`)
//!   and treated as a hard failure for the gradient computation.
//! - Gradients returned from this module satisfy [`validate_grad`].
//!
//! Conventions
//! -----------
//! - Central differences are preferred; forward differences are used only as
//!   a fallback when the central path fails or produces invalid entries.
use crate::optimization::{
    dual_optimizer::{Grad, Theta, validation::validate_grad},
    errors::OptResult,
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Central-difference gradient with a forward-difference fallback.
///
/// Behavior
/// --------
/// - Try *central* differences first.
/// - If any evaluation of `func` failed (captured via `closure_err`), retry
///   with *forward* differences through [`run_fd_diff`].
/// - If the central gradient fails validation (e.g., non-finite), retry once
///   with forward differences.
///
/// # Errors
/// Propagates the captured evaluation error or the validation error of the
/// forward-difference attempt.
pub fn fd_gradient<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let central = theta.central_diff(func);
    if closure_err.borrow().is_some() {
        return run_fd_diff(theta, func, closure_err);
    }
    match validate_grad(&central, theta.len()) {
        Ok(()) => Ok(central),
        Err(_) => run_fd_diff(theta, func, closure_err),
    }
}

/// Forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, runs `forward_diff`, returns any error captured
/// while evaluating `func`, and finally validates the gradient.
///
/// # Errors
/// - The captured evaluation error, converted into an `OptError`.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use approx::assert_abs_diff_eq;
    use argmin::core::ArgminError;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Central and forward gradients on a smooth objective.
    // - Propagation of errors captured inside the objective closure.
    // - The forward fallback when the central pass yields invalid entries.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // On a quadratic `f(θ) = θᵀθ` the central gradient matches `2θ`.
    fn fd_gradient_quadratic_matches_analytic() {
        let theta: Theta = array![0.5, -1.5];
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |x: &Theta| x.dot(x);

        let grad = fd_gradient(&theta, &f, &closure_err).expect("quadratic gradient");

        assert_abs_diff_eq!(grad[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(grad[1], -3.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // An error stored by the objective surfaces as an `OptError` instead of
    // a NaN-filled gradient.
    fn run_fd_diff_closure_error_is_propagated() {
        let theta: Theta = array![1.0];
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_: &Theta| {
            let argmin_err = ArgminError::NotImplemented { text: "fd test".to_string() };
            closure_err.replace(Some(argmin_err.into()));
            f64::NAN
        };

        let err = run_fd_diff(&theta, &f, &closure_err).expect_err("closure error must surface");

        assert!(matches!(err, OptError::Argmin { kind: "not implemented", .. }), "{err}");
    }

    #[test]
    // Purpose
    // -------
    // An objective that is NaN everywhere cannot produce a gradient on
    // either path.
    fn fd_gradient_non_finite_objective_yields_invalid_gradient() {
        let theta: Theta = array![0.0, 1.0];
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_x: &Theta| f64::NAN;

        let err = fd_gradient(&theta, &f, &closure_err).expect_err("NaN objective");

        assert!(matches!(err, OptError::InvalidGradient { .. }));
    }
}
