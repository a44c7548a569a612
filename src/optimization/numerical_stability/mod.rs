//! numerical_stability — overflow-safe log-space reductions.
//!
//! Purpose
//! -------
//! Collect the small numerical primitives the model layer needs to evaluate
//! log-partition functions and compare probabilities, so that the rest of
//! the crate can assume well-conditioned `f64` arithmetic.
//!
//! Key behaviors
//! -------------
//! - `log_sum_exp` / `log_sum_exp_with_zeros`: max-subtracted reductions.
//!   The `_with_zeros` form folds any number of potential-0 terms into one
//!   scaled term, which is how sparse partition functions are evaluated.
//! - `PROB_TIE_TOL`: shared tolerance for probability tie detection.
//!
//! Conventions
//! -----------
//! - Pure functions on slices; no I/O, no global state, no panics.
//! - Non-finite results are returned, not raised; callers map them to their
//!   own overflow errors.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{PROB_TIE_TOL, log_sum_exp, log_sum_exp_with_zeros};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{PROB_TIE_TOL, log_sum_exp, log_sum_exp_with_zeros};
}
