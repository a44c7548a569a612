//! Python-side argument extraction for the `MaxEnt` binding.
//!
//! Every helper converts loosely typed Python arguments into validated Rust
//! values and maps failures to `PyErr` through [`MaxEntError`].
#[cfg(feature = "python-bindings")]
use std::{str::FromStr, time::Duration};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    maxent::{
        core::{
            data::TokenSequence,
            features::FeatureSet,
            options::{MarginalWeighting, MaxEntOptions},
        },
        errors::MaxEntError,
    },
    optimization::dual_optimizer::{DualOptions, LineSearcher, Strategy, Tolerances},
};

/// Extract a token sequence from a Python sequence of `str`.
///
/// A bare `str` is rejected rather than split into characters.
#[cfg(feature = "python-bindings")]
pub fn extract_tokens(raw_tokens: &Bound<'_, PyAny>) -> PyResult<TokenSequence> {
    let tokens: Vec<String> = raw_tokens
        .extract()
        .map_err(|_| PyTypeError::new_err("tokens must be a sequence of str"))?;
    Ok(TokenSequence::new(tokens)?)
}

/// Extract a feature set from a Python sequence of `(predecessor, successor)`
/// string pairs.
#[cfg(feature = "python-bindings")]
pub fn extract_features(raw_features: &Bound<'_, PyAny>) -> PyResult<FeatureSet> {
    let pairs: Vec<(String, String)> = raw_features.extract().map_err(|_| {
        PyTypeError::new_err("features must be a sequence of (predecessor, successor) str pairs")
    })?;
    Ok(FeatureSet::new(pairs)?)
}

/// Build [`MaxEntOptions`] from the keyword arguments of `MaxEnt(...)`.
///
/// `tol` sets both the gradient and the cost tolerance; `None` keeps the
/// defaults. `max_iter = None` keeps the default cap.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn extract_maxent_opts(
    strategy: Option<&str>, line_searcher: Option<&str>, tol: Option<f64>,
    max_iter: Option<usize>, weighting: Option<&str>, timeout: Option<f64>,
    allow_unconverged: bool, verbose: bool,
) -> PyResult<MaxEntOptions> {
    let defaults = DualOptions::default();

    let tols = match (tol, max_iter) {
        (None, None) => defaults.tols,
        _ => Tolerances::new(
            tol.or(defaults.tols.tol_grad),
            tol.or(defaults.tols.tol_cost),
            max_iter.or(defaults.tols.max_iter),
        )
        .map_err(MaxEntError::from)?,
    };
    let strategy = match strategy {
        Some(name) => Strategy::from_str(name).map_err(MaxEntError::from)?,
        None => defaults.strategy,
    };
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(MaxEntError::from)?,
        None => defaults.line_searcher,
    };
    let weighting = match weighting {
        Some(name) => MarginalWeighting::from_str(name)?,
        None => MarginalWeighting::default(),
    };

    let mut dual_opts = DualOptions::new(tols, strategy, ls, defaults.simplex_step, verbose)
        .map_err(MaxEntError::from)?;
    if let Some(secs) = timeout {
        let budget = Duration::try_from_secs_f64(secs).map_err(|_| {
            pyo3::exceptions::PyValueError::new_err("timeout must be a non-negative number of seconds")
        })?;
        dual_opts = dual_opts.with_timeout(budget);
    }

    Ok(MaxEntOptions::new(dual_opts, weighting, allow_unconverged))
}
