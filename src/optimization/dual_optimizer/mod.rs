//! dual_optimizer — argmin-powered maximization of concave dual objectives.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! concave duals** `Ψ(λ)` of maximum-entropy problems. Callers implement a
//! single trait, [`DualFunction`], and invoke [`maximize_dual`] to run a
//! simplex, quasi-Newton, or iterative-scaling search with configurable
//! tolerances, budgets, and cancellation.
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied duals into Argmin-compatible cost functions
//!   `c(λ) = -Ψ(λ)` via [`adapter::ArgMinAdapter`], which also checks the
//!   optional [`CancelToken`] before each evaluation.
//! - Select the solver from [`Strategy`]: Nelder–Mead (default), BFGS with
//!   a [`LineSearcher`], or generalized iterative scaling
//!   ([`scaling::IterativeScaling`]).
//! - Fall back to finite differences ([`finite_diff`]) when a BFGS run is
//!   requested for a dual without an analytic gradient.
//! - Wrap every solver in [`guarded::Guarded`], which checks start points
//!   and cancellation up front and ends a run on a failed mid-run
//!   evaluation instead of discarding it.
//! - Normalize results into an [`OptimOutcome`] whose `converged` flag is
//!   only set by a genuine solver convergence.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `Ψ(λ)`; user code implements `Ψ`
//!   and `∇Ψ`, never the cost.
//! - Failures before the first iteration (invalid `λ₀`, an overflowing
//!   start vertex, cancellation) and cancellation at any point are returned
//!   as [`OptError`](crate::optimization::errors::OptError) values. Any other
//!   evaluation failure mid-run yields an unconverged outcome at the best
//!   point found, with the error message in `status`.
//! - Configuration types ([`Tolerances`], [`DualOptions`]) are validated on
//!   construction.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions, solver wiring, the
//!   GIS update, and outcome mapping on toy concave duals with closed-form
//!   maximizers. The model layer tests the real bigram dual.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod guarded;
pub mod run;
pub mod scaling;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize_dual;
pub use self::traits::{
    CancelToken, DualFunction, DualOptions, LineSearcher, OptimOutcome, Strategy, Tolerances,
};
pub use self::types::{Cost, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use maxent_bigram::optimization::dual_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize_dual;
    pub use super::traits::{
        CancelToken, DualFunction, DualOptions, LineSearcher, OptimOutcome, Strategy, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
