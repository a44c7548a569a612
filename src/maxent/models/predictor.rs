//! Post-fit queries: conditional probabilities and most-likely successors.
//!
//! Purpose
//! -------
//! Answer `conditional(x, y)` and `most_likely(x)` from a fitted model
//! without recomputing any statistics.
//!
//! Key behaviors
//! -------------
//! - Construction refuses an unconverged fit with
//!   `MaxEntError::OptimizerNonConvergence` unless explicitly overridden.
//! - `most_likely` scans successors in vocabulary (lexicographic) order and
//!   returns the first maximal symbol. All successors within
//!   [`PROB_TIE_TOL`] of the maximum are reported in `ties`, and `uniform`
//!   flags the case where every successor is tied (probability `1/|V|`),
//!   e.g. when `x` starts no feature.
//! - Queries are pure: repeated calls return identical results.
use crate::{
    maxent::{
        core::{data::Symbol, dual::DualContext},
        errors::{MaxEntError, MaxEntResult},
        models::fitted::FittedModel,
    },
    optimization::{dual_optimizer::Theta, numerical_stability::PROB_TIE_TOL},
};

/// Result of a `most_likely` query.
///
/// Fields
/// ------
/// - `symbol`: first maximal successor in vocabulary order.
/// - `probability`: `q(symbol | x)`.
/// - `ties`: every successor whose probability is within `PROB_TIE_TOL` of
///   the maximum, in vocabulary order (always contains `symbol`).
/// - `uniform`: `true` when all successors are tied.
#[derive(Debug, Clone, PartialEq)]
pub struct MostLikely {
    pub symbol: Symbol,
    pub probability: f64,
    pub ties: Vec<Symbol>,
    pub uniform: bool,
}

/// Read-only query handle over a dual context and its fitted parameters.
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a> {
    context: &'a DualContext,
    lambdas: &'a Theta,
}

impl<'a> Predictor<'a> {
    /// Errors
    /// ------
    /// - `MaxEntError::OptimizerNonConvergence` if `fitted` did not converge
    ///   and `allow_unconverged` is `false`.
    pub fn new(
        context: &'a DualContext, fitted: &'a FittedModel, allow_unconverged: bool,
    ) -> MaxEntResult<Self> {
        if !fitted.converged() && !allow_unconverged {
            return Err(MaxEntError::OptimizerNonConvergence {
                status: fitted.outcome().status.clone(),
            });
        }
        context.check_theta(fitted.lambdas())?;
        Ok(Self { context, lambdas: fitted.lambdas() })
    }

    /// `q(y | x)` under the fitted parameters.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::UnknownSymbol` if `x` or `y` is outside the vocabulary.
    pub fn conditional(&self, x: &str, y: &str) -> MaxEntResult<f64> {
        self.context.potential().conditional(x, y, self.lambdas)
    }

    /// Full successor distribution under `x`, in vocabulary order.
    pub fn distribution(&self, x: &str) -> MaxEntResult<Vec<(Symbol, f64)>> {
        let probs = self.context.potential().conditional_distribution(x, self.lambdas)?;
        let vocab = self.context.vocabulary();
        Ok(vocab.symbols().iter().cloned().zip(probs.iter().copied()).collect())
    }

    /// Most likely successor of `x`.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::UnknownSymbol` if `x` is outside the vocabulary.
    pub fn most_likely(&self, x: &str) -> MaxEntResult<MostLikely> {
        let probs = self.context.potential().conditional_distribution(x, self.lambdas)?;
        let vocab = self.context.vocabulary();
        let max = probs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<usize> = probs
            .iter()
            .enumerate()
            .filter(|(_, p)| max - **p <= PROB_TIE_TOL)
            .map(|(y, _)| y)
            .collect();
        let winner = *tied.first().ok_or_else(|| MaxEntError::NumericOverflow {
            context: format!("most_likely({x})"),
            value: max,
        })?;
        Ok(MostLikely {
            symbol: vocab.symbol(winner).to_string(),
            probability: probs[winner],
            uniform: tied.len() == vocab.len(),
            ties: tied.iter().map(|&y| vocab.symbol(y).to_string()).collect(),
        })
    }
}
