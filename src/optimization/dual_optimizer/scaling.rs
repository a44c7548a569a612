//! dual_optimizer::scaling — generalized iterative scaling as an `argmin` solver.
//!
//! Purpose
//! -------
//! Provide a third search strategy next to Nelder–Mead and BFGS that
//! exploits the structure of exponential-family duals: each λ_i is moved by
//! the log-ratio of the empirical to the model expectation of feature `i`.
//!
//! Key behaviors
//! -------------
//! - Update `λ_i ← λ_i + ln(E_emp,i / E_model,i) / C`, where `C` is the
//!   largest number of features active on one outcome.
//! - Clamp every step to `±MAX_SCALING_STEP`, which also handles ratios of
//!   `0` (feature never observed) and `∞` (model expectation underflowed).
//! - Declare convergence once the largest absolute step is at most the
//!   configured tolerance.
//!
//! Invariants & assumptions
//! ------------------------
//! - The problem implements both `CostFunction` (negated dual) and
//!   [`ScalingProblem`]; ratios have already been validated as finite or
//!   `+∞` and non-negative by the adapter.
//! - Cost is re-evaluated after every update so `argmin` tracks the best
//!   parameter by dual value, not by step size.
use argmin::core::{
    ArgminError, CostFunction, Error, IterState, KV, Problem, Solver, TerminationReason,
    TerminationStatus,
};

use crate::optimization::dual_optimizer::types::{Cost, MAX_SCALING_STEP, Theta};

/// Problems that expose empirical/model expectation ratios.
pub trait ScalingProblem {
    /// Per-feature ratio `E_emp,i / E_model,i` at `theta`.
    fn scaling_ratios(&self, theta: &Theta) -> Result<Theta, Error>;
}

/// State type shared by the derivative-free strategies.
pub type ScalingState = IterState<Theta, (), (), (), (), Cost>;

/// Generalized iterative scaling solver.
#[derive(Debug, Clone, PartialEq)]
pub struct IterativeScaling {
    overlap: f64,
    tol_step: Option<f64>,
    last_step: f64,
}

impl IterativeScaling {
    /// Create a solver with GIS constant `overlap` (clamped to at least 1)
    /// and an optional step tolerance.
    pub fn new(overlap: usize, tol_step: Option<f64>) -> Self {
        Self { overlap: overlap.max(1) as f64, tol_step, last_step: f64::INFINITY }
    }

    /// The largest absolute step taken in the most recent iteration.
    pub fn last_step(&self) -> f64 {
        self.last_step
    }

    fn step(&self, ratio: f64) -> f64 {
        let raw = if ratio == 1.0 { 0.0 } else { ratio.ln() / self.overlap };
        raw.clamp(-MAX_SCALING_STEP, MAX_SCALING_STEP)
    }
}

impl<O> Solver<O, ScalingState> for IterativeScaling
where
    O: CostFunction<Param = Theta, Output = Cost> + ScalingProblem,
{
    const NAME: &'static str = "Iterative scaling";

    fn init(
        &mut self, problem: &mut Problem<O>, mut state: ScalingState,
    ) -> Result<(ScalingState, Option<KV>), Error> {
        let param = state.take_param().ok_or_else(|| ArgminError::NotInitialized {
            text: "Iterative scaling requires an initial parameter vector.".to_string(),
        })?;
        let cost = problem.cost(&param)?;
        Ok((state.param(param).cost(cost), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, mut state: ScalingState,
    ) -> Result<(ScalingState, Option<KV>), Error> {
        let param = state.take_param().ok_or_else(|| ArgminError::NotInitialized {
            text: "Iterative scaling lost its parameter vector.".to_string(),
        })?;
        let ratios = problem.problem("scaling_count", |p| p.scaling_ratios(&param))?;
        let steps = ratios.mapv(|r| self.step(r));
        self.last_step = steps.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));
        let next = &param + &steps;
        let cost = problem.cost(&next)?;
        Ok((state.param(next).cost(cost), None))
    }

    fn terminate(&mut self, _state: &ScalingState) -> TerminationStatus {
        match self.tol_step {
            Some(tol) if self.last_step <= tol => {
                TerminationStatus::Terminated(TerminationReason::SolverConverged)
            }
            _ => TerminationStatus::NotTerminated,
        }
    }
}
