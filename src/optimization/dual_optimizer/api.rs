//! High-level entry point for maximizing a user-provided `DualFunction`.
//!
//! This selects a solver from [`Strategy`] (and, for BFGS, from the
//! configured [`LineSearcher`]), wraps the model in an `ArgMinAdapter`
//! (which *minimizes* `-Ψ(λ)`), guards the solver, and delegates the run to
//! the matching runner.
use crate::optimization::{
    dual_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{
            build_bfgs_hager_zhang, build_bfgs_more_thuente, build_iterative_scaling,
            build_simplex, simplex_vertices,
        },
        guarded::Guarded,
        run::{run_bfgs, run_derivative_free},
        traits::{DualFunction, DualOptions, LineSearcher, Strategy},
    },
    errors::OptResult,
};

/// Maximize a concave dual `Ψ(λ)` with the configured strategy.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an `ArgMinAdapter` that exposes the cost
///   `c(λ) = -Ψ(λ)`, and the solver in a [`Guarded`] that honors
///   `opts.cancel` between iterations.
/// - `Strategy::NelderMead` builds a simplex around `theta0` and registers
///   its vertices as start points; its adapter carries no token, because
///   `argmin` evaluates the vertices in `init` without propagating errors.
/// - `Strategy::Bfgs` builds BFGS with `opts.line_searcher`;
///   `Strategy::IterativeScaling` builds GIS with `f.feature_overlap(data)`.
///   Both adapters also check the token on every evaluation.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors (invalid tolerances).
/// - Start-point failures (non-finite dual at a simplex vertex) and
///   `OptError::Cancelled` at any point.
///
/// # Returns
/// An [`OptimOutcome`]; `converged == false` when the run stopped on
/// `max_iter`, the timeout, a failed mid-run evaluation (status carries the
/// message), or any reason other than the solver's own convergence test.
pub fn maximize_dual<F: DualFunction>(
    f: &F, theta0: Theta, data: &F::Data, opts: &DualOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data).with_cancel_token(opts.cancel.as_ref());
    match opts.strategy {
        Strategy::NelderMead => {
            let vertices = simplex_vertices(&theta0, opts.simplex_step);
            let solver =
                guard(build_simplex(vertices.clone(), opts)?, opts).with_start_points(vertices);
            run_derivative_free(theta0, opts, ArgMinAdapter::new(f, data), solver)
        }
        Strategy::IterativeScaling => {
            let solver = guard(build_iterative_scaling(f.feature_overlap(data), opts), opts);
            run_derivative_free(theta0, opts, problem, solver)
        }
        Strategy::Bfgs => match opts.line_searcher {
            LineSearcher::MoreThuente => {
                let solver = guard(build_bfgs_more_thuente(opts)?, opts);
                run_bfgs(theta0, opts, problem, solver)
            }
            LineSearcher::HagerZhang => {
                let solver = guard(build_bfgs_hager_zhang(opts)?, opts);
                run_bfgs(theta0, opts, problem, solver)
            }
        },
    }
}

fn guard<S>(solver: S, opts: &DualOptions) -> Guarded<S> {
    Guarded::new(solver).with_cancel_token(opts.cancel.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        dual_optimizer::{CancelToken, Grad, Tolerances},
        errors::OptError,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::time::Duration;

    // Ψ(λ) = -Σ (λ_i - c_i)², maximum 0 at λ = c.
    struct Bowl;

    impl DualFunction for Bowl {
        type Data = Theta;

        fn value(&self, theta: &Theta, centre: &Theta) -> OptResult<f64> {
            let d = theta - centre;
            Ok(-d.dot(&d))
        }

        fn check(&self, theta: &Theta, centre: &Theta) -> OptResult<()> {
            if theta.len() != centre.len() {
                return Err(OptError::ThetaLengthMismatch {
                    expected: centre.len(),
                    actual: theta.len(),
                });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, centre: &Theta) -> OptResult<Grad> {
            Ok((theta - centre) * -2.0)
        }
    }

    // Binary-outcome dual Ψ(λ) = λ·p − ln(1 + e^λ) with GIS ratios.
    struct Coin;

    impl DualFunction for Coin {
        type Data = f64;

        fn value(&self, theta: &Theta, p: &f64) -> OptResult<f64> {
            let l = theta[0];
            Ok(l * p - (1.0 + l.exp()).ln())
        }

        fn check(&self, _theta: &Theta, _p: &f64) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, p: &f64) -> OptResult<Grad> {
            Ok(array![p - 1.0 / (1.0 + (-theta[0]).exp())])
        }

        fn scaling_ratios(&self, theta: &Theta, p: &f64) -> OptResult<Theta> {
            Ok(array![p / (1.0 / (1.0 + (-theta[0]).exp()))])
        }
    }

    // Ψ(λ) = λ, which fails to evaluate beyond λ = 3.
    struct Ramp;

    impl DualFunction for Ramp {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            if theta[0] > 3.0 {
                return Err(OptError::NumericOverflow { context: "ramp".into(), value: theta[0] });
            }
            Ok(theta[0])
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, _theta: &Theta, _data: &()) -> OptResult<Grad> {
            Ok(array![1.0])
        }
    }

    fn opts(strategy: Strategy) -> DualOptions {
        DualOptions { strategy, ..DualOptions::default() }
    }

    #[test]
    // Purpose
    // -------
    // Every strategy recovers the maximizer of a concave toy dual.
    //
    // Given
    // -----
    // - Bowl centred at [1, -2] (NelderMead, BFGS with both line searches).
    // - Coin with p = 2/3 (all three strategies), λ* = ln 2.
    //
    // Expect
    // ------
    // - `converged == true`, λ̂ close to the known maximizer, value ≈ Ψ(λ*).
    fn maximize_dual_recovers_known_maximizers() {
        let centre = array![1.0, -2.0];
        for (strategy, ls) in [
            (Strategy::NelderMead, LineSearcher::MoreThuente),
            (Strategy::Bfgs, LineSearcher::MoreThuente),
            (Strategy::Bfgs, LineSearcher::HagerZhang),
        ] {
            let o = DualOptions { line_searcher: ls, ..opts(strategy) };
            let out = maximize_dual(&Bowl, array![0.0, 0.0], &centre, &o).unwrap();
            assert!(out.converged, "{strategy:?}/{ls:?}: {}", out.status);
            assert_abs_diff_eq!(out.theta_hat[0], 1.0, epsilon = 1e-4);
            assert_abs_diff_eq!(out.theta_hat[1], -2.0, epsilon = 1e-4);
            assert_abs_diff_eq!(out.value, 0.0, epsilon = 1e-7);
        }

        let p = 2.0 / 3.0;
        let best = 2.0_f64.ln() * p - 3.0_f64.ln();
        for strategy in [Strategy::NelderMead, Strategy::Bfgs, Strategy::IterativeScaling] {
            let out = maximize_dual(&Coin, array![0.0], &p, &opts(strategy)).unwrap();
            assert!(out.converged, "{strategy:?}: {}", out.status);
            assert_abs_diff_eq!(out.theta_hat[0], 2.0_f64.ln(), epsilon = 1e-4);
            assert_abs_diff_eq!(out.value, best, epsilon = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // Only BFGS reports a gradient norm.
    fn gradient_norm_reported_for_bfgs_only() {
        let p = 2.0 / 3.0;
        let nm = maximize_dual(&Coin, array![0.0], &p, &opts(Strategy::NelderMead)).unwrap();
        let bfgs = maximize_dual(&Coin, array![0.0], &p, &opts(Strategy::Bfgs)).unwrap();

        assert!(nm.grad_norm.is_none());
        assert!(bfgs.grad_norm.is_some());
    }

    #[test]
    // Purpose
    // -------
    // Hitting the iteration cap is reported as not converged.
    fn max_iter_cap_is_not_convergence() {
        let tols = Tolerances::new(None, Some(1e-14), Some(2)).unwrap();
        let o = DualOptions { tols, ..opts(Strategy::NelderMead) };

        let out = maximize_dual(&Bowl, array![5.0, 5.0], &array![0.0, 0.0], &o).unwrap();

        assert!(!out.converged);
        assert_eq!(out.status, "MaxItersReached");
        assert_eq!(out.iterations, 2);
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before any solver work.
    fn check_failure_aborts_before_solving() {
        let err = maximize_dual(&Bowl, array![0.0], &array![0.0, 0.0], &DualOptions::default())
            .unwrap_err();

        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 2, actual: 1 });
    }

    #[test]
    // Purpose
    // -------
    // A pre-cancelled token aborts the run with `Cancelled`.
    fn cancelled_token_aborts_run() {
        let token = CancelToken::new();
        token.cancel();
        for strategy in [Strategy::NelderMead, Strategy::Bfgs, Strategy::IterativeScaling] {
            let o = opts(strategy).with_cancel_token(token.clone());

            let err = maximize_dual(&Coin, array![0.0], &0.5, &o).unwrap_err();

            assert_eq!(err, OptError::Cancelled, "{strategy:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // A generous timeout leaves a fast run untouched.
    fn generous_timeout_does_not_interfere() {
        let o = opts(Strategy::NelderMead).with_timeout(Duration::from_secs(60));

        let out = maximize_dual(&Coin, array![0.0], &0.5, &o).unwrap();

        assert!(out.converged);
        assert_abs_diff_eq!(out.theta_hat[0], 0.0, epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // An evaluation that fails mid-run ends the run as unconverged instead
    // of discarding the progress made.
    //
    // Given
    // -----
    // - Ramp dual Ψ(λ) = λ that fails beyond λ = 3, started at λ = 0.
    //
    // Expect
    // ------
    // - Nelder–Mead and BFGS (both line searches) return `Ok` with
    //   `converged == false`, a `SolverExit` status (naming the overflow for
    //   the simplex and More–Thuente paths), and a best point inside the
    //   feasible range with Ψ(λ̂) = λ̂ > 0.
    fn mid_run_evaluation_failure_yields_unconverged_outcome() {
        for (strategy, ls) in [
            (Strategy::NelderMead, LineSearcher::MoreThuente),
            (Strategy::Bfgs, LineSearcher::MoreThuente),
            (Strategy::Bfgs, LineSearcher::HagerZhang),
        ] {
            let o = DualOptions { line_searcher: ls, ..opts(strategy) };

            let out = maximize_dual(&Ramp, array![0.0], &(), &o).unwrap();

            assert!(!out.converged, "{strategy:?}/{ls:?}");
            assert!(out.status.starts_with("SolverExit"), "{}", out.status);
            if ls == LineSearcher::MoreThuente {
                assert!(out.status.contains("Numeric overflow in ramp"), "{}", out.status);
            }
            assert!(out.theta_hat[0] > 0.0 && out.theta_hat[0] <= 3.0);
            assert_abs_diff_eq!(out.value, out.theta_hat[0], epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // A simplex vertex that cannot be evaluated fails the run up front.
    //
    // Given
    // -----
    // - Ramp dual started at λ = 2.5 with the default simplex step 1, so the
    //   second vertex sits at λ = 3.5.
    //
    // Expect
    // ------
    // - `Err(NumericOverflow)` for the vertex, not a panic.
    fn failing_simplex_vertex_is_an_error() {
        let err = maximize_dual(&Ramp, array![2.5], &(), &opts(Strategy::NelderMead)).unwrap_err();

        assert_eq!(err, OptError::NumericOverflow { context: "ramp".into(), value: 3.5 });
    }
}
