//! dual_optimizer::guarded — evaluation-failure handling around `argmin` solvers.
//!
//! Purpose
//! -------
//! Wrap any solver so that a run either fails cleanly before the first
//! iteration or ends with a reportable state. `argmin`'s Nelder–Mead
//! unwraps the vertex costs in `init`, and every solver propagates a failed
//! evaluation mid-run as a hard error that discards the best point found.
//!
//! Key behaviors
//! -------------
//! - `init` checks the cancellation token and evaluates every registered
//!   start point through the problem with `?`, so a cancelled run or an
//!   overflowing start vertex surfaces as an `Err` before the inner solver
//!   sees it.
//! - `next_iter` keeps the incoming state. If the inner solver fails with
//!   anything other than `OptError::Cancelled`, the kept state is returned
//!   and the run terminates with `TerminationReason::SolverExit` carrying
//!   the error message.
//! - Cancellation always propagates as an error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Start points are evaluated with the same problem the inner solver uses,
//!   so an `init` that passes the pre-check evaluates the same finite costs.
//! - The reported best parameter is whatever `argmin` tracked before the
//!   failing iteration.
//! - A failed iteration always terminates the run: BFGS hands the problem to
//!   its line search and does not get it back on error.
use argmin::core::{
    CostFunction, Error, KV, Problem, Solver, State, TerminationReason, TerminationStatus,
};

use crate::optimization::{
    dual_optimizer::{
        traits::CancelToken,
        types::{Cost, Theta},
    },
    errors::OptError,
};

/// Solver wrapper that turns evaluation failures into a terminated state.
#[derive(Debug, Clone)]
pub struct Guarded<S> {
    inner: S,
    cancel: Option<CancelToken>,
    start_points: Vec<Theta>,
    failure: Option<String>,
}

impl<S> Guarded<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, cancel: None, start_points: Vec::new(), failure: None }
    }

    /// Check `token` before `init` and before every iteration.
    pub fn with_cancel_token(mut self, token: Option<CancelToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Points the inner solver evaluates during `init` without propagating
    /// errors (the Nelder–Mead vertices).
    pub fn with_start_points(mut self, points: Vec<Theta>) -> Self {
        self.start_points = points;
        self
    }

    fn ensure_live(&self) -> Result<(), Error> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(OptError::Cancelled.into()),
            _ => Ok(()),
        }
    }
}

impl<O, S, I> Solver<O, I> for Guarded<S>
where
    O: CostFunction<Param = Theta, Output = Cost>,
    S: Solver<O, I>,
    I: State + Clone,
{
    const NAME: &'static str = S::NAME;

    fn init(&mut self, problem: &mut Problem<O>, state: I) -> Result<(I, Option<KV>), Error> {
        self.ensure_live()?;
        for point in &self.start_points {
            problem.cost(point)?;
        }
        self.inner.init(problem, state)
    }

    fn next_iter(&mut self, problem: &mut Problem<O>, state: I) -> Result<(I, Option<KV>), Error> {
        self.ensure_live()?;
        let last_good = state.clone();
        match self.inner.next_iter(problem, state) {
            Ok(step) => Ok(step),
            Err(err) => match OptError::from(err) {
                OptError::Cancelled => Err(OptError::Cancelled.into()),
                other => {
                    self.failure = Some(other.to_string());
                    Ok((last_good, None))
                }
            },
        }
    }

    fn terminate(&mut self, state: &I) -> TerminationStatus {
        match &self.failure {
            Some(reason) => {
                TerminationStatus::Terminated(TerminationReason::SolverExit(reason.clone()))
            }
            None => self.inner.terminate(state),
        }
    }
}
