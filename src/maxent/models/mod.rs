//! models — fitting facade, fitted parameters, and queries.
//!
//! Purpose
//! -------
//! Turn a token sequence and a feature set into a fitted maximum-entropy
//! bigram model and answer conditional / most-likely queries against it.
//!
//! Key behaviors
//! -------------
//! - [`MaxEntModel`] owns the options, runs the dual optimizer, and keeps
//!   the last fit together with its dual context.
//! - [`FittedModel`] pairs the feature set with λ̂ and the optimizer outcome;
//!   [`FittedRecord`] is its flat, serializable form.
//! - [`Predictor`] answers `conditional` and `most_likely` queries and
//!   refuses unconverged fits unless explicitly allowed.
//!
//! Testing notes
//! -------------
//! - `maxent.rs` holds the end-to-end fits with closed-form optima;
//!   `predictor.rs` covers tie handling and the convergence gate.

pub mod fitted;
pub mod maxent;
pub mod predictor;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::fitted::{FittedEntry, FittedModel, FittedRecord};
pub use self::maxent::MaxEntModel;
pub use self::predictor::{MostLikely, Predictor};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use maxent_bigram::maxent::models::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::fitted::FittedModel;
    pub use super::maxent::MaxEntModel;
    pub use super::predictor::{MostLikely, Predictor};
}
