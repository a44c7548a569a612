//! Indicator features over bigrams.
//!
//! Purpose
//! -------
//! Represent the user's constraints. Each [`Feature`] targets one
//! `(predecessor, successor)` pair and contributes one dual parameter; the
//! ordered [`FeatureSet`] fixes the layout of the parameter vector λ.
//!
//! Key behaviors
//! -------------
//! - [`Feature::indicator`] is 1 iff the queried pair equals the target.
//! - [`FeatureSet::new`] rejects an empty list. Duplicate targets are allowed.
//! - [`BoundFeatures`] resolves a feature set against a vocabulary once, and
//!   groups features by predecessor and successor so the potential model can
//!   evaluate partitions sparsely.
//!
//! Invariants & assumptions
//! ------------------------
//! - After binding, every target symbol is a vocabulary member.
//! - Groups are ordered by predecessor index, then successor index, which
//!   fixes the floating-point reduction order.
use std::collections::BTreeMap;

use crate::maxent::{
    core::data::{Symbol, Vocabulary},
    errors::{MaxEntError, MaxEntResult},
};

/// A single indicator constraint on the pair `(predecessor, successor)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    pub predecessor: Symbol,
    pub successor: Symbol,
}

impl Feature {
    pub fn new(predecessor: impl Into<Symbol>, successor: impl Into<Symbol>) -> Self {
        Self { predecessor: predecessor.into(), successor: successor.into() }
    }

    /// `1.0` if `(x, y)` is this feature's target pair, else `0.0`.
    pub fn indicator(&self, x: &str, y: &str) -> f64 {
        if self.predecessor == x && self.successor == y { 1.0 } else { 0.0 }
    }
}

impl<A: Into<Symbol>, B: Into<Symbol>> From<(A, B)> for Feature {
    fn from((a, b): (A, B)) -> Self {
        Feature::new(a, b)
    }
}

/// Ordered, non-empty list of features. `len()` is the dimension of λ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    features: Vec<Feature>,
}

impl FeatureSet {
    /// Errors
    /// ------
    /// - `MaxEntError::EmptyFeatureSet` if `features` is empty.
    pub fn new<I, F>(features: I) -> MaxEntResult<Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Feature>,
    {
        let features: Vec<Feature> = features.into_iter().map(Into::into).collect();
        if features.is_empty() {
            return Err(MaxEntError::EmptyFeatureSet);
        }
        Ok(Self { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn as_slice(&self) -> &[Feature] {
        &self.features
    }
}

/// Features targeting one successor under a fixed predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessorGroup {
    /// Vocabulary index of the successor.
    pub successor: usize,
    /// Feature indices (into λ) targeting this pair.
    pub features: Vec<usize>,
}

/// A [`FeatureSet`] resolved to vocabulary indices.
///
/// Fields
/// ------
/// - `targets[i]`: `(predecessor, successor)` indices of feature `i`.
/// - `by_context`: predecessor index → successor groups, both sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundFeatures {
    targets: Vec<(usize, usize)>,
    by_context: BTreeMap<usize, Vec<SuccessorGroup>>,
}

impl BoundFeatures {
    /// Resolve every feature's symbols against `vocab`.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::UnknownSymbol` for the first target symbol outside the
    ///   vocabulary.
    pub fn bind(features: &FeatureSet, vocab: &Vocabulary) -> MaxEntResult<Self> {
        let mut targets = Vec::with_capacity(features.len());
        let mut grouped: BTreeMap<usize, BTreeMap<usize, Vec<usize>>> = BTreeMap::new();
        for (i, feature) in features.iter().enumerate() {
            let a = vocab.index_of(&feature.predecessor)?;
            let b = vocab.index_of(&feature.successor)?;
            targets.push((a, b));
            grouped.entry(a).or_default().entry(b).or_default().push(i);
        }
        let by_context = grouped
            .into_iter()
            .map(|(a, succ)| {
                let groups = succ
                    .into_iter()
                    .map(|(successor, features)| SuccessorGroup { successor, features })
                    .collect();
                (a, groups)
            })
            .collect();
        Ok(Self { targets, by_context })
    }

    /// Number of features (dimension of λ).
    pub fn dim(&self) -> usize {
        self.targets.len()
    }

    /// `(predecessor, successor)` indices of feature `i`.
    pub fn target(&self, i: usize) -> (usize, usize) {
        self.targets[i]
    }

    pub fn targets(&self) -> &[(usize, usize)] {
        &self.targets
    }

    /// Successor groups for predecessor `x`; empty if no feature starts at `x`.
    pub fn groups(&self, x: usize) -> &[SuccessorGroup] {
        self.by_context.get(&x).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Largest number of features sharing a single target pair (at least 1).
    ///
    /// With indicator features this is the most features that can fire on
    /// one outcome, i.e. the GIS constant.
    pub fn overlap(&self) -> usize {
        self.by_context
            .values()
            .flat_map(|groups| groups.iter().map(|g| g.features.len()))
            .max()
            .unwrap_or(1)
    }
}
