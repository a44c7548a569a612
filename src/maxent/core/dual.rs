//! Concave dual objective of the maximum-entropy bigram problem.
//!
//! Purpose
//! -------
//! Bundle the empirical tables, the bound feature set, and the context
//! weighting into one immutable [`DualContext`], and evaluate the dual
//!
//! ```text
//! Ψ(λ) = Σ_i λ_i E_i − Σ_x w(x) · log_partition(x, λ)
//! ```
//!
//! together with its gradient `∂Ψ/∂λ_i = E_i − w(a_i) · q(b_i | a_i)` for
//! feature `i` targeting `(a_i, b_i)`. The optimizer minimizes the negation.
//!
//! Key behaviors
//! -------------
//! - `dual` / `negated_dual`, `dual_gradient` / `negated_gradient`.
//! - `model_expectations`: `w(a_i) · q(b_i | a_i)` per feature; each entry
//!   is computed from a freshly evaluated partition, never an accumulator
//!   carried over from another feature or context.
//! - `scaling_ratios`: `E_i / model_expectation_i` for iterative scaling,
//!   with `0/0 = 1` and `E/0 = +∞`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The context is built once per fitting run and never mutated.
//! - Contexts are summed in vocabulary order, so results are reproducible.
//! - Any non-finite intermediate is a `NumericOverflow` for that evaluation.
use ndarray::Array1;

use crate::{
    maxent::{
        core::{
            data::{TokenSequence, Vocabulary},
            features::{BoundFeatures, FeatureSet},
            options::MarginalWeighting,
            potential::PotentialModel,
            stats::EmpiricalStats,
            validation::{ensure_finite, validate_theta},
        },
        errors::MaxEntResult,
    },
    optimization::dual_optimizer::{Grad, Theta},
};

/// Immutable evaluation context for the dual and its derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct DualContext {
    stats: EmpiricalStats,
    features: FeatureSet,
    bound: BoundFeatures,
    weighting: MarginalWeighting,
    weights: Vec<f64>,
    expectations: Array1<f64>,
}

impl DualContext {
    /// Precompute statistics, bind features, and cache `w(x)` and `E_i`.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::UnknownSymbol` if a feature names a symbol that never
    ///   occurs in `tokens`.
    pub fn new(
        tokens: &TokenSequence, features: &FeatureSet, weighting: MarginalWeighting,
    ) -> MaxEntResult<Self> {
        let stats = EmpiricalStats::new(tokens);
        let bound = BoundFeatures::bind(features, stats.vocabulary())?;
        let weights = (0..stats.vocabulary().len())
            .map(|x| match weighting {
                MarginalWeighting::Context => stats.context_marginal_at(x),
                MarginalWeighting::Unigram => stats.marginal_at(x),
            })
            .collect();
        let expectations = bound.targets().iter().map(|&(a, b)| stats.pair_frequency_at(a, b)).collect();
        Ok(Self { stats, features: features.clone(), bound, weighting, weights, expectations })
    }

    pub fn stats(&self) -> &EmpiricalStats {
        &self.stats
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.stats.vocabulary()
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn bound_features(&self) -> &BoundFeatures {
        &self.bound
    }

    pub fn weighting(&self) -> MarginalWeighting {
        self.weighting
    }

    /// Number of dual parameters.
    pub fn dim(&self) -> usize {
        self.bound.dim()
    }

    /// Empirical feature expectations `E_i`, in feature order.
    pub fn empirical_expectations(&self) -> &Array1<f64> {
        &self.expectations
    }

    /// Weight `w(x)` applied to `log_partition(x)`.
    pub fn weight(&self, symbol: &str) -> MaxEntResult<f64> {
        Ok(self.weights[self.vocabulary().index_of(symbol)?])
    }

    pub fn potential(&self) -> PotentialModel<'_> {
        PotentialModel::new(self.stats.vocabulary(), &self.bound)
    }

    /// Check `theta` against the feature dimension.
    pub fn check_theta(&self, theta: &Theta) -> MaxEntResult<()> {
        validate_theta(theta.view(), self.dim())
    }

    /// Dual value `Ψ(λ)`.
    pub fn dual(&self, theta: &Theta) -> MaxEntResult<f64> {
        self.check_theta(theta)?;
        let potential = self.potential();
        let linear = theta.dot(&self.expectations);
        let mut normalizer = 0.0;
        for (x, &w) in self.weights.iter().enumerate() {
            if w == 0.0 {
                continue;
            }
            normalizer += w * potential.log_partition_at(x, theta)?;
        }
        ensure_finite(linear - normalizer, || "dual".to_string())
    }

    /// `−Ψ(λ)`, the quantity the optimizer minimizes.
    pub fn negated_dual(&self, theta: &Theta) -> MaxEntResult<f64> {
        Ok(-self.dual(theta)?)
    }

    /// Model expectation of each feature, `w(a_i) · q(b_i | a_i)`.
    pub fn model_expectations(&self, theta: &Theta) -> MaxEntResult<Array1<f64>> {
        self.check_theta(theta)?;
        let potential = self.potential();
        let mut out = Array1::zeros(self.dim());
        for (i, &(a, b)) in self.bound.targets().iter().enumerate() {
            let w = self.weights[a];
            if w == 0.0 {
                continue;
            }
            out[i] = w * potential.conditional_at(a, b, theta)?;
        }
        Ok(out)
    }

    /// `∇Ψ(λ)`: `E_i − w(a_i) · q(b_i | a_i)`.
    pub fn dual_gradient(&self, theta: &Theta) -> MaxEntResult<Grad> {
        let model = self.model_expectations(theta)?;
        Ok(&self.expectations - &model)
    }

    /// `∇(−Ψ)(λ)`: `w(a_i) · q(b_i | a_i) − E_i`.
    pub fn negated_gradient(&self, theta: &Theta) -> MaxEntResult<Grad> {
        let model = self.model_expectations(theta)?;
        Ok(model - &self.expectations)
    }

    /// Ratio of empirical to model expectation per feature.
    pub fn scaling_ratios(&self, theta: &Theta) -> MaxEntResult<Theta> {
        let model = self.model_expectations(theta)?;
        let ratios = self
            .expectations
            .iter()
            .zip(model.iter())
            .map(|(&emp, &m)| match (emp == 0.0, m == 0.0) {
                (true, true) => 1.0,
                (false, true) => f64::INFINITY,
                _ => emp / m,
            })
            .collect();
        Ok(ratios)
    }
}
