//! Fitted model record: features paired with their optimal λ.
//!
//! A [`FittedModel`] is created once per successful `fit` and is read-only
//! afterwards. [`FittedRecord`] is its plain, serializable form: an ordered
//! list of `(feature, λ)` entries plus the optimizer diagnostics.
use crate::{
    maxent::{
        core::features::{Feature, FeatureSet},
        core::validation::validate_theta,
        errors::MaxEntResult,
    },
    optimization::dual_optimizer::{OptimOutcome, Theta},
};

/// Feature list, optimal parameters, and the optimizer outcome that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    features: FeatureSet,
    outcome: OptimOutcome,
}

impl FittedModel {
    /// Pair `features` with `outcome.theta_hat`.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::ThetaLengthMismatch` / `InvalidThetaInput` if the
    ///   outcome does not carry one finite λ per feature.
    pub fn new(features: FeatureSet, outcome: OptimOutcome) -> MaxEntResult<Self> {
        validate_theta(outcome.theta_hat.view(), features.len())?;
        Ok(Self { features, outcome })
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Optimal parameter vector λ̂.
    pub fn lambdas(&self) -> &Theta {
        &self.outcome.theta_hat
    }

    pub fn outcome(&self) -> &OptimOutcome {
        &self.outcome
    }

    pub fn converged(&self) -> bool {
        self.outcome.converged
    }

    /// Dual value at λ̂.
    pub fn dual_value(&self) -> f64 {
        self.outcome.value
    }

    /// Ordered `(feature, λ)` pairs.
    pub fn entries(&self) -> Vec<(Feature, f64)> {
        self.features.iter().cloned().zip(self.outcome.theta_hat.iter().copied()).collect()
    }

    pub fn record(&self) -> FittedRecord {
        FittedRecord {
            entries: self
                .entries()
                .into_iter()
                .map(|(feature, lambda)| FittedEntry { feature, lambda })
                .collect(),
            converged: self.outcome.converged,
            status: self.outcome.status.clone(),
            iterations: self.outcome.iterations,
            dual_value: self.outcome.value,
        }
    }
}

/// One `(feature, λ)` entry of a [`FittedRecord`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FittedEntry {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub feature: Feature,
    pub lambda: f64,
}

/// Serializable summary of a [`FittedModel`].
///
/// Floats are written in shortest round-trip form. Readers must parse them
/// exactly to get the same λ back (with `serde_json`, enable its
/// `float_roundtrip` feature; the default parser may be off by one ulp).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FittedRecord {
    pub entries: Vec<FittedEntry>,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub dual_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maxent::errors::MaxEntError;
    use argmin::core::{TerminationReason, TerminationStatus};
    use ndarray::array;
    use std::collections::HashMap;

    fn outcome(theta: Theta) -> OptimOutcome {
        OptimOutcome::new(
            Some(theta),
            -0.5,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            HashMap::new(),
            None,
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Entries pair each feature with its λ in order.
    fn entries_pair_features_with_lambdas() {
        let features = FeatureSet::new([("a", "b"), ("b", "c")]).unwrap();

        let fitted = FittedModel::new(features, outcome(array![0.5, -1.0])).unwrap();

        assert_eq!(
            fitted.entries(),
            vec![(Feature::new("a", "b"), 0.5), (Feature::new("b", "c"), -1.0)]
        );
        let record = fitted.record();
        assert!(record.converged);
        assert_eq!(record.status, "SolverConverged");
        assert_eq!(record.iterations, 12);
        assert_eq!(record.dual_value, -0.5);
    }

    #[test]
    // Purpose
    // -------
    // A λ vector of the wrong length cannot form a fitted model.
    fn mismatched_lambdas_are_rejected() {
        let features = FeatureSet::new([("a", "b")]).unwrap();

        let err = FittedModel::new(features, outcome(array![0.5, 1.0])).unwrap_err();

        assert_eq!(err, MaxEntError::ThetaLengthMismatch { expected: 1, actual: 2 });
    }

    #[cfg(feature = "serde")]
    #[test]
    // Purpose
    // -------
    // Records serialize as a flat list of (predecessor, successor, lambda).
    fn record_serializes_flat_entries() {
        let features = FeatureSet::new([("a", "b")]).unwrap();
        let record = FittedModel::new(features, outcome(array![0.25])).unwrap().record();

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json["entries"][0],
            serde_json::json!({ "predecessor": "a", "successor": "b", "lambda": 0.25 })
        );
        let back: FittedRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[cfg(feature = "serde")]
    #[test]
    // Purpose
    // -------
    // λ values survive a JSON string round trip bit for bit.
    //
    // Given
    // -----
    // - λ = ln 8, whose shortest decimal form needs 17 significant digits.
    //
    // Expect
    // ------
    // - The parsed record equals the original, including the exact λ.
    fn record_json_text_round_trips_exact_lambdas() {
        let features = FeatureSet::new([("a", "b")]).unwrap();
        let lambda = 8.0_f64.ln();
        let record = FittedModel::new(features, outcome(array![lambda])).unwrap().record();

        let json = serde_json::to_string(&record).unwrap();
        let back: FittedRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back.entries[0].lambda.to_bits(), lambda.to_bits());
        assert_eq!(back, record);
    }
}
