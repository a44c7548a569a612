use argmin::core::{ArgminError, Error};

use crate::maxent::errors::MaxEntError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- Iterative scaling ----
    /// Objective does not expose empirical/model expectation ratios.
    ScalingNotImplemented,

    /// Scaling ratios must match the parameter dimension.
    ScalingDimMismatch {
        expected: usize,
        found: usize,
    },

    // ---- DualOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// Invalid search strategy name.
    InvalidStrategy {
        name: String,
        reason: &'static str,
    },

    /// Initial simplex edge length needs to be positive and finite.
    InvalidSimplexStep {
        step: f64,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    /// The run was cancelled through its cancellation token.
    Cancelled,

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ----
    /// Error raised by Argmin itself; `kind` names the Argmin error class
    /// (`"invalid parameter"`, `"backend"`, ...).
    Argmin {
        kind: &'static str,
        text: String,
    },

    // ---- Model errors ----
    /// Token sequence too short to derive a bigram.
    DegenerateInput {
        len: usize,
    },
    /// Symbol is not part of the training vocabulary.
    UnknownSymbol {
        symbol: String,
    },
    /// No features were supplied.
    EmptyFeatureSet,
    /// Potential or partition evaluation left the finite range.
    NumericOverflow {
        context: String,
        value: f64,
    },
    /// Theta length mismatch for the feature set.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },
    /// Unconstrained optimization input must have finite values.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- Iterative scaling ----
            OptError::ScalingNotImplemented => {
                write!(f, "Objective does not provide iterative scaling ratios")
            }
            OptError::ScalingDimMismatch { expected, found } => {
                write!(f, "Scaling ratio dimension mismatch: expected {expected}, found {found}")
            }

            // ---- DualOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidStrategy { name, reason } => {
                write!(f, "Invalid search strategy '{name}': {reason}")
            }
            OptError::InvalidSimplexStep { step, reason } => {
                write!(f, "Invalid initial simplex step {step}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::Cancelled => {
                write!(f, "Optimization cancelled")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::Argmin { kind, text } => {
                write!(f, "Argmin error ({kind}): {text}")
            }

            // ---- Model errors ----
            OptError::DegenerateInput { len } => {
                write!(f, "Token sequence of length {len} yields no bigrams")
            }
            OptError::UnknownSymbol { symbol } => {
                write!(f, "Unknown symbol '{symbol}'")
            }
            OptError::EmptyFeatureSet => {
                write!(f, "Feature set is empty")
            }
            OptError::NumericOverflow { context, value } => {
                write!(f, "Numeric overflow in {context}: {value}")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

/// Recover an [`OptError`] from an argmin error.
///
/// Errors raised by our own cost/gradient code travel through argmin boxed as
/// `argmin::core::Error`; they are unwrapped first so callers see the original
/// variant (e.g. `Cancelled`, `NumericOverflow`) instead of a backend string.
impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => {
                let kind = match &argmin_err {
                    ArgminError::InvalidParameter { .. } => "invalid parameter",
                    ArgminError::NotImplemented { .. } => "not implemented",
                    ArgminError::NotInitialized { .. } => "not initialized",
                    ArgminError::ConditionViolated { .. } => "condition violated",
                    ArgminError::CheckpointNotFound { .. } => "checkpoint not found",
                    ArgminError::PotentialBug { .. } => "potential bug",
                    ArgminError::ImpossibleError { .. } => "impossible error",
                    _ => "unknown",
                };
                OptError::Argmin { kind, text: argmin_err.to_string() }
            }
            Err(err) => OptError::Argmin { kind: "backend", text: err.to_string() },
        }
    }
}

impl From<MaxEntError> for OptError {
    fn from(err: MaxEntError) -> Self {
        match err {
            MaxEntError::DegenerateInput { len } => OptError::DegenerateInput { len },
            MaxEntError::UnknownSymbol { symbol } => OptError::UnknownSymbol { symbol },
            MaxEntError::EmptyFeatureSet => OptError::EmptyFeatureSet,
            MaxEntError::NumericOverflow { context, value } => {
                OptError::NumericOverflow { context, value }
            }
            MaxEntError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            MaxEntError::InvalidThetaInput { index, value } => {
                OptError::InvalidThetaInput { index, value }
            }
            MaxEntError::OptimizerNonConvergence { status }
            | MaxEntError::OptimizationFailed { status } => {
                OptError::Argmin { kind: "backend", text: status }
            }
            MaxEntError::InvalidWeighting { name, reason } => {
                OptError::Argmin { kind: "invalid parameter", text: format!("{name}: {reason}") }
            }
            MaxEntError::ModelNotFitted => OptError::UnknownError,
        }
    }
}
