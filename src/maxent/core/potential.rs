//! Log-linear potential model `q(y | x) ∝ exp(Σ_i λ_i f_i(x, y))`.
//!
//! Purpose
//! -------
//! Turn a parameter vector and a bound feature set into log-potentials,
//! log-partition functions, and normalized conditional probabilities.
//!
//! Key behaviors
//! -------------
//! - `log_potential(x, y, λ)`: sum of λ over features targeting `(x, y)`.
//! - `log_partition(x, λ)`: `ln Σ_y exp(log_potential(x, y, λ))`, evaluated
//!   sparsely. Successors not targeted under `x` have potential 0 and are
//!   folded into a single `(|V| − k)` term of the max-subtracted
//!   log-sum-exp. `log_partition_dense` is the full-vocabulary reference.
//! - `conditional(x, y, λ)` = `exp(log_potential − log_partition)`; for every
//!   `x` the distribution over `y` sums to 1, and λ = 0 gives `1 / |V|`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Symbol-level methods validate symbols and λ; the `*_at` index-level
//!   methods used by the dual assume both were validated upstream.
//! - A non-finite partition is reported as `NumericOverflow`.
use ndarray::Array1;

use crate::{
    maxent::{
        core::{
            data::Vocabulary,
            features::BoundFeatures,
            validation::{ensure_finite, validate_theta},
        },
        errors::MaxEntResult,
    },
    optimization::{
        dual_optimizer::Theta,
        numerical_stability::{log_sum_exp, log_sum_exp_with_zeros},
    },
};

/// Borrowed view pairing a vocabulary with a bound feature set.
#[derive(Debug, Clone, Copy)]
pub struct PotentialModel<'a> {
    vocab: &'a Vocabulary,
    features: &'a BoundFeatures,
}

impl<'a> PotentialModel<'a> {
    pub fn new(vocab: &'a Vocabulary, features: &'a BoundFeatures) -> Self {
        Self { vocab, features }
    }

    pub fn vocabulary(&self) -> &'a Vocabulary {
        self.vocab
    }

    /// Unnormalized log-weight of `(x, y)`.
    pub fn log_potential(&self, x: &str, y: &str, theta: &Theta) -> MaxEntResult<f64> {
        validate_theta(theta.view(), self.features.dim())?;
        Ok(self.log_potential_at(self.vocab.index_of(x)?, self.vocab.index_of(y)?, theta))
    }

    /// Log-normalizer of the successor distribution under `x`.
    pub fn log_partition(&self, x: &str, theta: &Theta) -> MaxEntResult<f64> {
        validate_theta(theta.view(), self.features.dim())?;
        self.log_partition_at(self.vocab.index_of(x)?, theta)
    }

    /// Full-vocabulary log-sum-exp of the potentials under `x`.
    pub fn log_partition_dense(&self, x: &str, theta: &Theta) -> MaxEntResult<f64> {
        validate_theta(theta.view(), self.features.dim())?;
        let x = self.vocab.index_of(x)?;
        let potentials: Vec<f64> =
            (0..self.vocab.len()).map(|y| self.log_potential_at(x, y, theta)).collect();
        ensure_finite(log_sum_exp(&potentials), || {
            format!("log_partition_dense({})", self.vocab.symbol(x))
        })
    }

    /// `q(y | x)` at `theta`.
    pub fn conditional(&self, x: &str, y: &str, theta: &Theta) -> MaxEntResult<f64> {
        validate_theta(theta.view(), self.features.dim())?;
        self.conditional_at(self.vocab.index_of(x)?, self.vocab.index_of(y)?, theta)
    }

    /// Whole successor distribution under `x`, in vocabulary order.
    pub fn conditional_distribution(&self, x: &str, theta: &Theta) -> MaxEntResult<Array1<f64>> {
        validate_theta(theta.view(), self.features.dim())?;
        self.conditional_distribution_at(self.vocab.index_of(x)?, theta)
    }

    pub(crate) fn log_potential_at(&self, x: usize, y: usize, theta: &Theta) -> f64 {
        let groups = self.features.groups(x);
        match groups.binary_search_by_key(&y, |g| g.successor) {
            Ok(pos) => groups[pos].features.iter().map(|&i| theta[i]).sum(),
            Err(_) => 0.0,
        }
    }

    pub(crate) fn log_partition_at(&self, x: usize, theta: &Theta) -> MaxEntResult<f64> {
        let groups = self.features.groups(x);
        let targeted: Vec<f64> =
            groups.iter().map(|g| g.features.iter().map(|&i| theta[i]).sum()).collect();
        let zeros = self.vocab.len() - groups.len();
        ensure_finite(log_sum_exp_with_zeros(&targeted, zeros), || {
            format!("log_partition({})", self.vocab.symbol(x))
        })
    }

    pub(crate) fn conditional_at(&self, x: usize, y: usize, theta: &Theta) -> MaxEntResult<f64> {
        let log_z = self.log_partition_at(x, theta)?;
        Ok((self.log_potential_at(x, y, theta) - log_z).exp())
    }

    pub(crate) fn conditional_distribution_at(
        &self, x: usize, theta: &Theta,
    ) -> MaxEntResult<Array1<f64>> {
        let log_z = self.log_partition_at(x, theta)?;
        let mut probs = Array1::from_elem(self.vocab.len(), (-log_z).exp());
        for group in self.features.groups(x) {
            let potential: f64 = group.features.iter().map(|&i| theta[i]).sum();
            probs[group.successor] = (potential - log_z).exp();
        }
        Ok(probs)
    }
}
