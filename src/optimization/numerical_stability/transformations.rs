//! Numerical stability utilities.
//!
//! Provides overflow-safe reductions over log-space values. The partition
//! function of a log-linear model is a sum of exponentials; evaluating it
//! naïvely overflows as soon as one potential exceeds ~709, so every
//! reduction here subtracts the running maximum before exponentiating.
//!
//! # Provided items
//! - [`PROB_TIE_TOL`]: absolute tolerance under which two probabilities are
//!   treated as tied.
//! - [`log_sum_exp(values)`]: stable `ln Σ exp(v)`.
//! - [`log_sum_exp_with_zeros(values, zeros)`]: stable
//!   `ln(zeros · e⁰ + Σ exp(v))`, used when many terms share potential 0.

/// Absolute tolerance under which two probabilities are considered equal.
pub const PROB_TIE_TOL: f64 = 1e-12;

/// Numerically stable `ln Σ_i exp(values[i])`.
///
/// # Returns
/// - `-∞` for an empty slice or when every entry is `-∞`.
/// - `+∞` if any entry is `+∞`; `NaN` if any entry is `NaN`.
///   Callers decide whether these count as overflow.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    log_sum_exp_with_zeros(values, 0)
}

/// Numerically stable `ln(zeros + Σ_i exp(values[i]))`.
///
/// Each of the `zeros` implicit terms has log-value `0`. The maximum over
/// all terms (including `0` when `zeros > 0`) is subtracted before
/// exponentiating, so no term exceeds `1`.
pub fn log_sum_exp_with_zeros(values: &[f64], zeros: usize) -> f64 {
    let mut m = if zeros > 0 { 0.0 } else { f64::NEG_INFINITY };
    for &v in values {
        if v.is_nan() {
            return f64::NAN;
        }
        m = m.max(v);
    }
    if m == f64::NEG_INFINITY || m == f64::INFINITY {
        return m;
    }
    let mut acc = zeros as f64 * (-m).exp();
    for &v in values {
        acc += (v - m).exp();
    }
    m + acc.ln()
}
