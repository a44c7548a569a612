//! dual_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the dual
//! optimizer. By defining these in one place, the rest of the optimization
//! code can stay agnostic to `ndarray` and Argmin generics and can more
//! easily evolve if the backend changes.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, inverse
//!   Hessian approximations, and scalar costs (`Theta`, `Grad`,
//!   `InvHessian`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired Nelder–Mead and BFGS solver aliases using the common
//!   `(Theta, Grad, Cost)` numeric shapes.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` have length equal to the number of features.
//! - `Cost` is the negated dual; higher layers flip the sign back when
//!   reporting.
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases and constants; correctness is
//!   exercised by the solver tests in the surrounding modules.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::BFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `λ`, one entry per feature.
pub type Theta = Array1<f64>;

/// Gradient vector of the dual or of its negation.
pub type Grad = Array1<f64>;

/// Dense inverse-Hessian approximation carried by BFGS.
pub type InvHessian = Array2<f64>;

/// Scalar objective value used by the optimizer (the negated dual).
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default edge length of the initial Nelder–Mead simplex around `λ₀`.
pub const DEFAULT_SIMPLEX_STEP: f64 = 1.0;

/// Largest absolute per-iteration change of a single λ under iterative scaling.
pub const MAX_SCALING_STEP: f64 = 5.0;

/// Upper end of the Hager–Zhang step bracket.
///
/// Argmin's default bracket reaches `1e5`, which on a saturated dual sends a
/// single trial point far past any representable log-partition.
pub const MAX_LINE_SEARCH_STEP: f64 = 10.0;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// BFGS wired to the Hager–Zhang line search.
pub type BfgsHagerZhang = BFGS<HagerZhangLS, Cost>;

/// BFGS wired to the More–Thuente line search.
pub type BfgsMoreThuente = BFGS<MoreThuenteLS, Cost>;

/// Nelder–Mead simplex search over `Theta`.
pub type Simplex = NelderMead<Theta, Cost>;
