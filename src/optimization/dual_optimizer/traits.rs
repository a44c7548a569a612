//! Public API surface for dual maximization.
//!
//! - [`DualFunction`]: trait a model implements to expose its concave dual.
//! - [`DualOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`Strategy`]: which search drives the run (simplex, BFGS, iterative scaling).
//! - [`LineSearcher`]: choice of line search used by BFGS.
//! - [`CancelToken`]: cooperative cancellation honored between iterations.
//! - [`OptimOutcome`]: normalized result returned by [`maximize_dual`](super::maximize_dual).
//!
//! Convention: we *maximize* the dual `Ψ(λ)` by minimizing the cost
//! `c(λ) = -Ψ(λ)`. If an analytic gradient is provided, it should be the
//! gradient of the dual (`∇Ψ(λ)`); the adapter flips the sign as needed.
use crate::optimization::{
    dual_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        types::DEFAULT_SIMPLEX_STEP,
        validation::{
            validate_theta_hat, validate_value, verify_simplex_step, verify_tol_cost,
            verify_tol_grad,
        },
    },
    errors::{OptError, OptResult},
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::{
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

/// User-implemented dual interface.
///
/// You maximize `Ψ(λ)`; internally we minimize the cost `c(λ) = -Ψ(λ)`.
/// If you provide an analytic gradient, return `∇Ψ(λ)` (the adapter flips
/// the sign to match the cost).
///
/// - `type Data`: per-model data carried into every method.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `Ψ(λ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `λ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇Ψ(λ)`.
///   If not implemented, finite differences are used automatically.
/// - `scaling_ratios(&Theta, &Data) -> OptResult<Theta>`: per-feature ratio
///   of empirical to model expectation, required by
///   [`Strategy::IterativeScaling`].
/// - `feature_overlap(&Data) -> usize`: largest number of features that can
///   fire on a single outcome (the GIS constant `C`).
pub trait DualFunction {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }

    fn scaling_ratios(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Theta> {
        Err(OptError::ScalingNotImplemented)
    }

    fn feature_overlap(&self, _data: &Self::Data) -> usize {
        1
    }
}

/// Search strategy driving the run.
///
/// Variants:
/// - `NelderMead`: derivative-free simplex search (default; robust to the
///   flat, ill-conditioned curvature of saturated features).
/// - `Bfgs`: quasi-Newton search using the analytic gradient. It can stop
///   at a point that is not stationary or fail to converge for some feature
///   configurations; callers must inspect [`OptimOutcome::converged`].
/// - `IterativeScaling`: generalized iterative scaling on the ratios
///   exposed by [`DualFunction::scaling_ratios`].
///
/// Parsing is case-insensitive; `"nelder-mead"`, `"neldermead"`, `"bfgs"`,
/// `"iterativescaling"`, `"gis"` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    NelderMead,
    Bfgs,
    IterativeScaling,
}

impl FromStr for Strategy {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(&['-', '_', ' '][..], "").as_str() {
            "neldermead" | "simplex" => Ok(Strategy::NelderMead),
            "bfgs" => Ok(Strategy::Bfgs),
            "iterativescaling" | "gis" => Ok(Strategy::IterativeScaling),
            _ => Err(OptError::InvalidStrategy {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'NelderMead', 'BFGS' or 'IterativeScaling'.",
            }),
        }
    }
}

/// Choice of line search used inside the BFGS solver.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"MoreThuente"`, `"HagerZhang"`). Unknown names return
/// `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Shared cancellation flag.
///
/// Cloning shares the flag. It is checked before every solver iteration
/// and, except under Nelder–Mead, before every cost, gradient, or scaling
/// evaluation; a tripped flag aborts the run with [`OptError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl PartialEq for CancelToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `strategy: Strategy` — which search to run.
/// - `line_searcher: LineSearcher` — line search used by BFGS.
/// - `simplex_step: f64` — edge length of the initial Nelder–Mead simplex.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
/// - `timeout: Option<Duration>` — wall-clock budget for one run.
/// - `cancel: Option<CancelToken>` — cooperative cancellation.
///
/// Default:
/// - `tols`: `tol_grad = 1e-8`, `tol_cost = 1e-10`, `max_iter = 1000`
/// - `strategy`: `NelderMead`, `line_searcher`: `MoreThuente`
/// - `simplex_step`: `1.0`, `verbose`: `false`, no timeout, no token.
#[derive(Debug, Clone, PartialEq)]
pub struct DualOptions {
    pub tols: Tolerances,
    pub strategy: Strategy,
    pub line_searcher: LineSearcher,
    pub simplex_step: f64,
    pub verbose: bool,
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl DualOptions {
    /// Create a new set of optimizer options.
    ///
    /// # Errors
    /// - [`OptError::InvalidSimplexStep`] if `simplex_step` is not finite and
    ///   strictly positive.
    pub fn new(
        tols: Tolerances, strategy: Strategy, line_searcher: LineSearcher, simplex_step: f64,
        verbose: bool,
    ) -> OptResult<Self> {
        verify_simplex_step(simplex_step)?;
        Ok(Self { tols, strategy, line_searcher, simplex_step, verbose, timeout: None, cancel: None })
    }

    /// Attach a wall-clock budget to every run using these options.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancellation token checked on every evaluation.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Default for DualOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-8), tol_cost: Some(1e-10), max_iter: Some(1000) },
            strategy: Strategy::NelderMead,
            line_searcher: LineSearcher::MoreThuente,
            simplex_step: DEFAULT_SIMPLEX_STEP,
            verbose: false,
            timeout: None,
            cancel: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: BFGS stops when the gradient norm falls below this threshold.
/// - `tol_cost`: Nelder–Mead stops when the standard deviation of the simplex
///   costs falls below it; BFGS stops when the cost change does; iterative
///   scaling stops when the largest λ update does.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize_dual`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **dual** value `Ψ(λ̂)` (not the cost).
/// - `converged`: `true` only when the solver met its own convergence
///   criterion. Hitting `max_iter`, the timeout, or any solver exit counts
///   as not converged.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, format!("{reason:?}"))
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}
