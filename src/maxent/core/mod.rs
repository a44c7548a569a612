//! core — shared data, statistics, features, potentials, and the dual.
//!
//! Purpose
//! -------
//! Collect the building blocks of the maximum-entropy bigram model: the
//! validated token sequence and vocabulary, precomputed empirical tables,
//! bound indicator features, the log-linear potential model, and the
//! immutable dual context the optimizer evaluates.
//!
//! Key behaviors
//! -------------
//! - [`TokenSequence`] / [`Vocabulary`]: validated inputs with a fixed,
//!   lexicographic symbol order.
//! - [`EmpiricalStats`]: marginals, pair frequencies, context marginals, and
//!   feature expectations, computed once per sequence.
//! - [`Feature`] / [`FeatureSet`] / [`BoundFeatures`]: constraints and their
//!   index-resolved, grouped form.
//! - [`PotentialModel`]: log-potentials, stable log-partitions, and
//!   conditionals.
//! - [`DualContext`]: dual value, gradient, model expectations, and scaling
//!   ratios.
//! - [`MaxEntOptions`] / [`MarginalWeighting`]: fitting configuration.
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything here is immutable after construction and shared by
//!   reference during a fit.
//! - Error conditions are reported through [`MaxEntResult`](crate::maxent::errors::MaxEntResult);
//!   nothing in this module logs or performs I/O.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the sum-to-one and uniform-at-zero invariants, the
//!   sparse vs. dense partition agreement, lookup vs. exhaustive feature
//!   expectations, and the analytic gradient against finite differences.

pub mod data;
pub mod dual;
pub mod features;
pub mod options;
pub mod potential;
pub mod stats;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{Symbol, TokenSequence, Vocabulary};
pub use self::dual::DualContext;
pub use self::features::{BoundFeatures, Feature, FeatureSet, SuccessorGroup};
pub use self::options::{MarginalWeighting, MaxEntOptions};
pub use self::potential::PotentialModel;
pub use self::stats::EmpiricalStats;
