//! maxent — maximum-entropy conditional bigram models.
//!
//! Purpose
//! -------
//! Fit `q(y | x)` over consecutive symbol pairs of a fixed token sequence,
//! subject to user-chosen indicator constraints, by maximizing the concave
//! dual `Ψ(λ) = Σ_i λ_i E_i − Σ_x w(x) log Z_λ(x)`. Use the fitted model to
//! answer `conditional(x, y)` and `most_likely(x)` queries.
//!
//! Key behaviors
//! -------------
//! - [`core`]: token sequence, vocabulary, empirical tables, features, the
//!   potential model, and the immutable [`DualContext`].
//! - [`models`]: [`MaxEntModel`] (fitting), [`FittedModel`] (λ̂ and outcome),
//!   and [`Predictor`] (queries).
//! - [`errors`]: [`MaxEntError`] / [`MaxEntResult`] shared by the layer.
//!
//! Invariants & assumptions
//! ------------------------
//! - The vocabulary is ordered lexicographically; that order drives every
//!   iteration and the tie-break in `most_likely`.
//! - For every finite λ and every context x, `Σ_y q(y | x) = 1`; at λ = 0
//!   each successor has probability `1 / |V|`.
//! - Fitting is single-threaded and deterministic: identical inputs give
//!   identical λ̂.
//!
//! Conventions
//! -----------
//! - `w(x)` is the context marginal by default; see [`MarginalWeighting`]
//!   for the unigram alternative and its caveat.
//! - Optimizer work is delegated to
//!   [`maximize_dual`](crate::optimization::dual_optimizer::maximize_dual).
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use maxent_bigram::maxent::prelude::*;
//!
//! # fn main() -> Result<(), MaxEntError> {
//! let tokens = TokenSequence::new(["optimization", "is", "very", "complex"])?;
//! let features = FeatureSet::new([("optimization", "is"), ("very", "complex")])?;
//! let mut model = MaxEntModel::default();
//! model.fit(&tokens, &features)?;
//! let best = model.predictor()?.most_likely("very")?;
//! assert_eq!(best.symbol, "complex");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    DualContext, EmpiricalStats, Feature, FeatureSet, MarginalWeighting, MaxEntOptions,
    PotentialModel, Symbol, TokenSequence, Vocabulary,
};

pub use self::errors::{MaxEntError, MaxEntResult};

pub use self::models::{FittedModel, FittedRecord, MaxEntModel, MostLikely, Predictor};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use maxent_bigram::maxent::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::{
        Feature, FeatureSet, FittedModel, MarginalWeighting, MaxEntError, MaxEntModel,
        MaxEntOptions, MaxEntResult, MostLikely, Predictor, TokenSequence,
    };
}
