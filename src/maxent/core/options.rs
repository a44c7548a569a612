//! Fitting options for maximum-entropy bigram models.
//!
//! Purpose
//! -------
//! Bundle the optimizer configuration with the model-level choices that
//! shape the dual: how contexts are weighted and whether an unconverged fit
//! may still be used for prediction.
//!
//! Key behaviors
//! -------------
//! - [`MarginalWeighting`] selects the weight `w(x)` multiplying each
//!   `log_partition(x)` in the dual:
//!   - `Context` (default): `w(x) = context_marginal(x)`, the share of
//!     bigrams starting at `x`. With this weight the dual is bounded and its
//!     stationary point reproduces the empirical feature expectations.
//!   - `Unigram`: `w(x) = marginal(x)`, the plain symbol frequency. A
//!     symbol's last occurrence is counted in `marginal` but starts no
//!     bigram, so a feature whose predecessor is always followed by its
//!     target makes the dual unbounded; runs then end unconverged.
//! - [`MaxEntOptions`] carries [`DualOptions`] plus the two flags above.
//!
//! Conventions
//! -----------
//! - Defaults: Nelder–Mead, `tol_cost = 1e-10`, `max_iter = 1000`, simplex
//!   step 1.0, `Context` weighting, unconverged fits refused.
use std::str::FromStr;

use crate::{maxent::errors::MaxEntError, optimization::dual_optimizer::DualOptions};

/// Weight applied to each context's log-partition in the dual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarginalWeighting {
    #[default]
    Context,
    Unigram,
}

impl FromStr for MarginalWeighting {
    type Err = MaxEntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "context" => Ok(MarginalWeighting::Context),
            "unigram" => Ok(MarginalWeighting::Unigram),
            _ => Err(MaxEntError::InvalidWeighting {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Context' or 'Unigram'.",
            }),
        }
    }
}

/// Model-level fitting options.
///
/// Fields
/// ------
/// - `dual_opts`: [`DualOptions`] forwarded to the optimizer.
/// - `weighting`: [`MarginalWeighting`] used by the dual.
/// - `allow_unconverged`: when `true`, a predictor can be built from a fit
///   whose optimizer did not converge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaxEntOptions {
    pub dual_opts: DualOptions,
    pub weighting: MarginalWeighting,
    pub allow_unconverged: bool,
}

impl MaxEntOptions {
    pub fn new(dual_opts: DualOptions, weighting: MarginalWeighting, allow_unconverged: bool) -> Self {
        Self { dual_opts, weighting, allow_unconverged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::dual_optimizer::Strategy;

    #[test]
    // Purpose
    // -------
    // Defaults match the documented configuration.
    fn defaults_are_nelder_mead_with_context_weighting() {
        let opts = MaxEntOptions::default();

        assert_eq!(opts.dual_opts.strategy, Strategy::NelderMead);
        assert_eq!(opts.dual_opts.tols.tol_cost, Some(1e-10));
        assert_eq!(opts.dual_opts.tols.max_iter, Some(1000));
        assert_eq!(opts.weighting, MarginalWeighting::Context);
        assert!(!opts.allow_unconverged);
    }

    #[test]
    // Purpose
    // -------
    // Weighting names parse case-insensitively.
    fn weighting_parses_case_insensitively() {
        assert_eq!("Context".parse::<MarginalWeighting>(), Ok(MarginalWeighting::Context));
        assert_eq!("UNIGRAM".parse::<MarginalWeighting>(), Ok(MarginalWeighting::Unigram));
        assert!(matches!(
            "bigram".parse::<MarginalWeighting>(),
            Err(MaxEntError::InvalidWeighting { .. })
        ));
    }
}
