//! Execution helpers that run an `argmin` solver on a dual problem and
//! return a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    dual_optimizer::{
        DualFunction, DualOptions, Grad, OptimOutcome, Theta, adapter::ArgMinAdapter,
        types::InvHessian,
    },
    errors::OptResult,
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;
use ndarray::Array2;

/// State used by Nelder–Mead and iterative scaling (no gradient, no Hessian).
pub type DerivativeFreeState = IterState<Theta, (), (), (), (), f64>;

/// State used by BFGS.
pub type QuasiNewtonState = IterState<Theta, Grad, (), InvHessian, (), f64>;

/// Run a derivative-free solver (Nelder–Mead, iterative scaling).
///
/// Wires up the adapter, the solver, `theta0`, `max_iters`, the optional
/// timeout and (behind `obs_slog`) the terminal observer, then converts the
/// final state into an [`OptimOutcome`]. Derivative-free runs report no
/// gradient norm.
///
/// # Errors
/// - Propagates any `argmin` error raised before the first iteration, and
///   cancellation at any point, via `From<argmin::core::Error>`. A guarded
///   solver turns later evaluation failures into a `SolverExit` outcome.
/// - Propagates validation errors from [`OptimOutcome::new`].
pub fn run_derivative_free<'a, F, S>(
    theta0: Theta, opts: &DualOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: DualFunction,
    S: Solver<ArgMinAdapter<'a, F>, DerivativeFreeState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }
    if let Some(timeout) = opts.timeout {
        optimizer = optimizer.timeout(timeout);
    }

    let mut result = optimizer.run()?.state().clone();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        result.get_termination_status().clone(),
        result.get_iter(),
        result.get_func_counts().clone(),
        None,
    )
}

/// Run BFGS starting from an identity inverse Hessian.
///
/// # Errors
/// Same as [`run_derivative_free`], plus line-search failures.
pub fn run_bfgs<'a, F, S>(
    theta0: Theta, opts: &DualOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: DualFunction,
    S: Solver<ArgMinAdapter<'a, F>, QuasiNewtonState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let inv_hessian: InvHessian = Array2::eye(theta0.len());
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0).inv_hessian(inv_hessian));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }
    if let Some(timeout) = opts.timeout {
        optimizer = optimizer.timeout(timeout);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: DualFunction,
{
    let dual0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: dual(lambda0) = {:.6}{}",
        dual0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
