//! Errors for maximum-entropy bigram models (input validation, vocabulary
//! lookups, numerical failures, and optimizer outcomes).
//!
//! This module defines the model error type, [`MaxEntError`], used across the
//! Rust core and the Python-facing API. It implements `Display`/`Error` and,
//! with the `python-bindings` feature, converts to `PyErr` for PyO3.
//!
//! ## Conventions
//! - Caller errors (`DegenerateInput`, `UnknownSymbol`, `EmptyFeatureSet`)
//!   are rejected eagerly, before any optimizer work.
//! - Optimizer/backend errors are normalized to
//!   [`MaxEntError::OptimizationFailed`] with a human-readable status, except
//!   for model errors that travelled through the optimizer, which come back
//!   as their original variant.
//! - A finished but unconverged run is [`MaxEntError::OptimizerNonConvergence`];
//!   it is raised only when a usable fitted model is requested.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

use crate::optimization::errors::OptError;

/// Crate-wide result alias for model operations that may produce [`MaxEntError`].
pub type MaxEntResult<T> = Result<T, MaxEntError>;

/// Unified error type for maximum-entropy modeling.
#[derive(Debug, Clone, PartialEq)]
pub enum MaxEntError {
    // ---- Input validation ----
    /// Token sequence of length ≤ 1; no bigram can be formed.
    DegenerateInput { len: usize },

    /// Symbol is not part of the training vocabulary.
    UnknownSymbol { symbol: String },

    /// At least one feature is required.
    EmptyFeatureSet,

    /// Parameter vector length does not match the number of features.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Parameter entries must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// Invalid marginal weighting name.
    InvalidWeighting { name: String, reason: &'static str },

    // ---- Numerical ----
    /// Potential, partition, or dual evaluation left the finite range.
    NumericOverflow { context: String, value: f64 },

    // ---- Estimation / optimizer ----
    /// Search finished without meeting its convergence criterion.
    OptimizerNonConvergence { status: String },

    /// Optimizer failed; include a human-readable status/reason.
    OptimizationFailed { status: String },

    /// Model hasn't been fitted yet.
    ModelNotFitted,
}

impl std::error::Error for MaxEntError {}

impl std::fmt::Display for MaxEntError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input validation ----
            MaxEntError::DegenerateInput { len } => {
                write!(f, "Token sequence of length {len} yields no bigrams; at least 2 tokens are required.")
            }
            MaxEntError::UnknownSymbol { symbol } => {
                write!(f, "Symbol '{symbol}' is not part of the training vocabulary.")
            }
            MaxEntError::EmptyFeatureSet => {
                write!(f, "Feature set must contain at least one feature.")
            }
            MaxEntError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            MaxEntError::InvalidThetaInput { index, value } => {
                write!(f, "Theta input at index {index} must be finite, got {value}")
            }
            MaxEntError::InvalidWeighting { name, reason } => {
                write!(f, "Invalid marginal weighting '{name}': {reason}")
            }
            // ---- Numerical ----
            MaxEntError::NumericOverflow { context, value } => {
                write!(f, "Numeric overflow in {context}: {value}")
            }
            // ---- Estimation / optimizer ----
            MaxEntError::OptimizerNonConvergence { status } => {
                write!(f, "Optimizer did not converge (status: {status}).")
            }
            MaxEntError::OptimizationFailed { status } => {
                write!(f, "Optimizer failed with status: {status}")
            }
            MaxEntError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
        }
    }
}

/// Convert a [`MaxEntError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<MaxEntError> for PyErr {
    fn from(err: MaxEntError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<OptError> for MaxEntError {
    fn from(err: OptError) -> MaxEntError {
        match err {
            OptError::DegenerateInput { len } => MaxEntError::DegenerateInput { len },
            OptError::UnknownSymbol { symbol } => MaxEntError::UnknownSymbol { symbol },
            OptError::EmptyFeatureSet => MaxEntError::EmptyFeatureSet,
            OptError::NumericOverflow { context, value } => {
                MaxEntError::NumericOverflow { context, value }
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                MaxEntError::ThetaLengthMismatch { expected, actual }
            }
            OptError::InvalidThetaInput { index, value } => {
                MaxEntError::InvalidThetaInput { index, value }
            }
            other => MaxEntError::OptimizationFailed { status: other.to_string() },
        }
    }
}
