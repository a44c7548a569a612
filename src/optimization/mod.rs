//! optimization — dual optimizer, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for fitting maximum-entropy
//! models: an Argmin-backed maximizer for concave duals, overflow-safe
//! log-space reductions, and a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - `dual_optimizer`: maximize `Ψ(λ)` with Nelder–Mead, BFGS, or
//!   iterative scaling under iteration, time, and cancellation budgets.
//! - `numerical_stability`: log-sum-exp reductions and tie tolerances.
//! - `errors`: normalize configuration issues, evaluation failures, and
//!   backend solver errors into `OptError` / `OptResult<T>`.
//!
//! Conventions
//! -----------
//! - Solvers maximize `Ψ(λ)` by minimizing `c(λ) = -Ψ(λ)`; outcomes are
//!   reported in terms of `Ψ`.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - No I/O apart from the opt-in `obs_slog` observer.

pub mod dual_optimizer;
pub mod errors;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use maxent_bigram::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::dual_optimizer::prelude::*;
    pub use super::errors::{OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
}
