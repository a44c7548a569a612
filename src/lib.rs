//! maxent_bigram — maximum-entropy bigram models with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the maximum-entropy bigram model to Python via the
//! `_maxent_bigram` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`maxent` and `optimization`) as the
//!   public crate surface.
//! - Define the `MaxEnt` `#[pyclass]` and the `#[pymodule]` initializer when
//!   the `python-bindings` feature is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - Python-visible behavior mirrors [`MaxEntModel`](crate::maxent::MaxEntModel)
//!   and [`Predictor`](crate::maxent::Predictor), including their errors.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are propagated as [`MaxEntError`] and
//!   converted to `ValueError` at the PyO3 boundary; malformed argument
//!   types raise `TypeError`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on [`maxent`] and can ignore the PyO3 items.
//! - The Python packaging layer imports `_maxent_bigram` and re-exports
//!   `MaxEnt`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   `tests/integration_maxent_pipeline.rs` end-to-end test.

pub mod maxent;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    maxent::models::maxent::MaxEntModel,
    utils::{extract_features, extract_maxent_opts, extract_tokens},
};

/// MaxEnt — Python-facing wrapper for a fitted maximum-entropy bigram model.
///
/// Purpose
/// -------
/// Fit a [`MaxEntModel`] at construction time and answer queries from
/// Python.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `MaxEnt(tokens, features, strategy="NelderMead", tol=None, max_iter=None,
/// allow_unconverged=False, ...)`:
/// - `tokens`: sequence of `str`, length ≥ 2.
/// - `features`: sequence of `(predecessor, successor)` pairs; both symbols
///   must occur in `tokens`.
/// - `strategy`: `"NelderMead"`, `"BFGS"`, or `"IterativeScaling"`.
/// - `tol`, `max_iter`: stopping tolerances; `None` keeps the defaults.
/// - `allow_unconverged`: answer queries even if the fit did not converge.
/// - `line_searcher`, `weighting`, `timeout`, `verbose`: advanced options.
///
/// Invariants
/// ----------
/// - `inner` always holds a completed fit; construction raises otherwise.
/// - Query methods raise `ValueError` for unconverged fits unless
///   `allow_unconverged=True`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "maxent_bigram")]
pub struct MaxEnt {
    inner: MaxEntModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MaxEnt {
    #[new]
    #[pyo3(
        signature = (
            tokens,
            features,
            strategy = "NelderMead",
            tol = None,
            max_iter = None,
            allow_unconverged = false,
            line_searcher = None,
            weighting = None,
            timeout = None,
            verbose = false,
        ),
        text_signature = "(tokens, features, /, strategy='NelderMead', tol=None, max_iter=None, \
                          allow_unconverged=False, line_searcher=None, weighting=None, \
                          timeout=None, verbose=False)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, tokens: &Bound<'py, PyAny>, features: &Bound<'py, PyAny>,
        strategy: &str, tol: Option<f64>, max_iter: Option<usize>,
        allow_unconverged: bool, line_searcher: Option<&str>, weighting: Option<&str>,
        timeout: Option<f64>, verbose: bool,
    ) -> PyResult<Self> {
        let tokens = extract_tokens(tokens)?;
        let features = extract_features(features)?;
        let opts = extract_maxent_opts(
            Some(strategy),
            line_searcher,
            tol,
            max_iter,
            weighting,
            timeout,
            allow_unconverged,
            verbose,
        )?;
        let mut inner = MaxEntModel::new(opts);
        py.allow_threads(|| inner.fit(&tokens, &features).map(|_| ()))?;
        Ok(MaxEnt { inner })
    }

    /// `q(y | x)` under the fitted parameters.
    pub fn conditional(&self, x: &str, y: &str) -> PyResult<f64> {
        Ok(self.inner.predictor()?.conditional(x, y)?)
    }

    /// Most likely successor of `x` as `(symbol, probability, uniform)`.
    ///
    /// Ties resolve to the lexicographically first symbol; `uniform` is
    /// `True` when every successor is equally likely.
    pub fn most_likely(&self, x: &str) -> PyResult<(String, f64, bool)> {
        let best = self.inner.predictor()?.most_likely(x)?;
        Ok((best.symbol, best.probability, best.uniform))
    }

    /// Full successor distribution of `x` as `[(symbol, probability), ...]`.
    pub fn distribution(&self, x: &str) -> PyResult<Vec<(String, f64)>> {
        Ok(self.inner.predictor()?.distribution(x)?)
    }

    /// Fitted λ̂, one entry per feature, as a numpy array.
    #[getter]
    pub fn lambdas<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(self.inner.fitted()?.lambdas().clone().into_pyarray_bound(py))
    }

    #[getter]
    pub fn converged(&self) -> PyResult<bool> {
        Ok(self.inner.fitted()?.converged())
    }

    #[getter]
    pub fn status(&self) -> PyResult<String> {
        Ok(self.inner.fitted()?.outcome().status.clone())
    }

    #[getter]
    pub fn iterations(&self) -> PyResult<usize> {
        Ok(self.inner.fitted()?.outcome().iterations)
    }

    /// Dual value `Ψ(λ̂)`.
    #[getter]
    pub fn dual_value(&self) -> PyResult<f64> {
        Ok(self.inner.fitted()?.dual_value())
    }

    /// Fitted features with their weights as `[((x, y), λ), ...]`.
    #[getter]
    pub fn entries(&self) -> PyResult<Vec<((String, String), f64)>> {
        Ok(self
            .inner
            .fitted()?
            .entries()
            .into_iter()
            .map(|(f, l)| ((f.predecessor, f.successor), l))
            .collect())
    }

    fn __repr__(&self) -> String {
        match self.inner.fitted() {
            Ok(fitted) => format!(
                "MaxEnt(features={}, converged={}, dual_value={:.6})",
                fitted.features().len(),
                fitted.converged(),
                fitted.dual_value()
            ),
            Err(_) => "MaxEnt(unfitted)".to_string(),
        }
    }
}

/// Python module initializer for `_maxent_bigram`.
///
/// Invoked automatically by Python when importing the compiled extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _maxent_bigram(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<MaxEnt>()?;
    Ok(())
}
