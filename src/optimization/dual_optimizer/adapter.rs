//! Adapter that exposes a user `DualFunction` as an `argmin` problem.
//!
//! We convert a *maximization* of the dual `Ψ(λ)` into a *minimization*
//! problem by defining the cost as `c(λ) = -Ψ(λ)` (the negated dual).
//! Analytic gradients (if provided) are negated accordingly. If a gradient is
//! not provided, we finite-difference the **cost** closure, so no sign flip
//! is needed in that branch. Every evaluation first checks the optional
//! cancellation token, then rejects non-finite trial points with
//! `OptError::NumericOverflow`.
use std::cell::RefCell;

use crate::optimization::{
    dual_optimizer::{
        finite_diff::fd_gradient,
        scaling::ScalingProblem,
        traits::{CancelToken, DualFunction},
        types::{Cost, Grad, Theta},
        validation::{validate_grad, validate_scaling_ratios},
    },
    errors::OptError,
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a user `DualFunction` to `argmin`'s `CostFunction`, `Gradient`,
/// and [`ScalingProblem`].
///
/// - `CostFunction::cost` returns `-Ψ(λ)`.
/// - `Gradient::gradient` returns `-∇Ψ(λ)` if the user provides an analytic
///   gradient, or a finite-difference gradient of the cost otherwise.
/// - `ScalingProblem::scaling_ratios` forwards the user's ratios unchanged.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: DualFunction> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub cancel: Option<&'a CancelToken>,
}

impl<'a, F: DualFunction> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `DualFunction` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, cancel: None }
    }

    /// Honor `token` on every subsequent evaluation.
    pub fn with_cancel_token(mut self, token: Option<&'a CancelToken>) -> Self {
        self.cancel = token;
        self
    }

    fn ensure_live(&self) -> Result<(), Error> {
        match self.cancel {
            Some(token) if token.is_cancelled() => Err(OptError::Cancelled.into()),
            _ => Ok(()),
        }
    }

    fn ensure_finite_point(theta: &Theta) -> Result<(), Error> {
        match theta.iter().find(|v| !v.is_finite()) {
            Some(&value) => {
                Err(OptError::NumericOverflow { context: "trial point".into(), value }.into())
            }
            None => Ok(()),
        }
    }
}

impl<'a, F: DualFunction> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(λ) = -Ψ(λ)`.
    ///
    /// # Errors
    /// - `OptError::Cancelled` if the token was tripped.
    /// - `OptError::NumericOverflow` if `λ` has a non-finite entry.
    /// - Any `OptError` from the user's `value`.
    /// - `OptError::NonFiniteCost` if the value is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        self.ensure_live()?;
        Self::ensure_finite_point(theta)?;
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: DualFunction> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `λ`.
    ///
    /// Behavior:
    /// - If the user implements `grad(λ, data)`, we validate it and return
    ///   `-grad` (because the cost is `-Ψ`).
    /// - Otherwise, we compute a finite-difference gradient of the **cost**
    ///   via [`fd_gradient`]. The FD closure must return `f64`, so the first
    ///   evaluation error is parked in `closure_err` and `NaN` is returned.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        self.ensure_live()?;
        Self::ensure_finite_point(theta)?;
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                Ok(fd_gradient(theta, &cost_func, &closure_err)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: DualFunction> ScalingProblem for ArgMinAdapter<'a, F> {
    fn scaling_ratios(&self, theta: &Theta) -> Result<Theta, Error> {
        self.ensure_live()?;
        Self::ensure_finite_point(theta)?;
        let ratios = self.f.scaling_ratios(theta, self.data)?;
        validate_scaling_ratios(&ratios, theta.len())?;
        Ok(ratios)
    }
}
