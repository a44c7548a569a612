//! Maximum-entropy bigram model: dual wiring and fitting facade.
//!
//! This module wires a [`DualContext`] to the [`DualFunction`] trait so the
//! Argmin-backed optimizer can maximize the concave dual, then keeps the
//! resulting [`FittedModel`] for prediction.
//!
//! Key ideas:
//! - The dual `Ψ(λ)`, its analytic gradient, and the iterative-scaling
//!   ratios all come from the immutable context; the model only forwards.
//! - `fit` starts from λ = 0 (or a caller-supplied λ₀) and records the
//!   outcome even when the search did not converge, so diagnostics stay
//!   available. [`MaxEntModel::predictor`] is where non-convergence is
//!   enforced.
use crate::{
    maxent::{
        core::{
            data::TokenSequence,
            dual::DualContext,
            features::FeatureSet,
            options::MaxEntOptions,
        },
        errors::{MaxEntError, MaxEntResult},
        models::{fitted::FittedModel, predictor::Predictor},
    },
    optimization::{
        dual_optimizer::{DualFunction, Grad, Theta, maximize_dual},
        errors::OptResult,
    },
};

/// Maximum-entropy conditional bigram model.
///
/// Fields
/// ------
/// - `options`: fitting configuration.
/// - `context`: dual context of the last successful fit.
/// - `fitted`: features and λ̂ of the last successful fit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaxEntModel {
    pub options: MaxEntOptions,
    context: Option<DualContext>,
    fitted: Option<FittedModel>,
}

impl MaxEntModel {
    pub fn new(options: MaxEntOptions) -> Self {
        Self { options, context: None, fitted: None }
    }

    /// Fit from λ₀ = 0.
    ///
    /// See [`MaxEntModel::fit_from`].
    pub fn fit(&mut self, tokens: &TokenSequence, features: &FeatureSet) -> MaxEntResult<&FittedModel> {
        self.fit_from(Theta::zeros(features.len()), tokens, features)
    }

    /// Fit by maximizing the dual from `theta0`.
    ///
    /// ## Steps
    /// 1. Drop any previous fit.
    /// 2. Build the [`DualContext`] (statistics, bound features, weights).
    /// 3. Run `maximize_dual` with `options.dual_opts`.
    /// 4. Store context and [`FittedModel`], converged or not.
    ///
    /// ## Errors
    /// - `UnknownSymbol` if a feature names a symbol absent from `tokens`.
    /// - `ThetaLengthMismatch` / `InvalidThetaInput` for a bad `theta0`.
    /// - `NumericOverflow` if the dual overflows at `theta0` or at a start
    ///   vertex of the simplex.
    /// - `OptimizationFailed` for cancellation or solver setup errors.
    ///   Evaluation failures after the first iteration are not errors: they
    ///   end the run unconverged, with the message in the outcome status.
    pub fn fit_from(
        &mut self, theta0: Theta, tokens: &TokenSequence, features: &FeatureSet,
    ) -> MaxEntResult<&FittedModel> {
        self.context = None;
        self.fitted = None;
        let context = DualContext::new(tokens, features, self.options.weighting)?;
        let outcome = maximize_dual(&*self, theta0, &context, &self.options.dual_opts)?;
        let fitted = FittedModel::new(features.clone(), outcome)?;
        self.context = Some(context);
        Ok(&*self.fitted.insert(fitted))
    }

    /// Errors
    /// ------
    /// - `MaxEntError::ModelNotFitted` before a successful `fit`.
    pub fn fitted(&self) -> MaxEntResult<&FittedModel> {
        self.fitted.as_ref().ok_or(MaxEntError::ModelNotFitted)
    }

    /// Errors
    /// ------
    /// - `MaxEntError::ModelNotFitted` before a successful `fit`.
    pub fn context(&self) -> MaxEntResult<&DualContext> {
        self.context.as_ref().ok_or(MaxEntError::ModelNotFitted)
    }

    /// Query handle over the last fit.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::ModelNotFitted` before a successful `fit`.
    /// - `MaxEntError::OptimizerNonConvergence` if the fit did not converge
    ///   and `options.allow_unconverged` is `false`.
    pub fn predictor(&self) -> MaxEntResult<Predictor<'_>> {
        Predictor::new(self.context()?, self.fitted()?, self.options.allow_unconverged)
    }
}

impl DualFunction for MaxEntModel {
    type Data = DualContext;

    /// Dual value `Ψ(λ)`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        Ok(data.dual(theta)?)
    }

    /// Validate λ length and finiteness.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        Ok(data.check_theta(theta)?)
    }

    /// Analytic gradient `∇Ψ(λ)`.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        Ok(data.dual_gradient(theta)?)
    }

    fn scaling_ratios(&self, theta: &Theta, data: &Self::Data) -> OptResult<Theta> {
        Ok(data.scaling_ratios(theta)?)
    }

    fn feature_overlap(&self, data: &Self::Data) -> usize {
        data.bound_features().overlap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        maxent::core::options::MarginalWeighting,
        optimization::dual_optimizer::{CancelToken, DualOptions, LineSearcher, Strategy},
    };
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // End-to-end fits on small corpora with closed-form answers:
    // - saturated features (conditional → 1) under the default strategy,
    // - interior optima recovered by all three strategies,
    // - the unbounded Unigram configuration, reported as not converged,
    // - error paths: degenerate input, unknown symbols, cancellation.
    // -------------------------------------------------------------------------

    fn tokens(words: &[&str]) -> TokenSequence {
        TokenSequence::new(words.iter().copied()).unwrap()
    }

    fn model(strategy: Strategy, weighting: MarginalWeighting) -> MaxEntModel {
        let dual_opts = DualOptions { strategy, ..DualOptions::default() };
        MaxEntModel::new(MaxEntOptions::new(dual_opts, weighting, false))
    }

    // Bigrams: ab ba ac cb ba ab bc cc ca. Every context has three bigrams,
    // so q̂(b|a) = q̂(a|b) = 2/3 and q̂(c|c) = 1/3, giving λ* = (ln 4, ln 4, 0).
    const INTERIOR: &[&str] = &["a", "b", "a", "c", "b", "a", "b", "c", "c", "a"];
    const INTERIOR_FEATURES: &[(&str, &str)] = &[("a", "b"), ("b", "a"), ("c", "c")];

    #[test]
    // Purpose
    // -------
    // A feature whose predecessor occurs once, followed by its target,
    // drives the conditional to 1 under the default strategy.
    //
    // Given
    // -----
    // - tokens [x, a, b, y]; feature (a, b).
    //
    // Expect
    // ------
    // - Converged; q(b | a) ≈ 1 and q(y' | a) ≈ 0 for every other y'.
    fn saturated_feature_drives_conditional_to_one() {
        let mut m = MaxEntModel::default();
        let features = FeatureSet::new([("a", "b")]).unwrap();

        let fitted = m.fit(&tokens(&["x", "a", "b", "y"]), &features).unwrap();
        assert!(fitted.converged(), "{}", fitted.outcome().status);
        let p = m.predictor().unwrap();

        assert_abs_diff_eq!(p.conditional("a", "b").unwrap(), 1.0, epsilon = 1e-6);
        for other in ["a", "x", "y"] {
            assert_abs_diff_eq!(p.conditional("a", other).unwrap(), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // The four-token reference example.
    //
    // Given
    // -----
    // - tokens [optimization, is, very, complex];
    //   features (optimization, is), (very, complex); λ₀ = 0; Nelder–Mead.
    //
    // Expect
    // ------
    // - Converged to a finite λ.
    // - q(is | optimization) ≈ 1, q(complex | very) ≈ 1.
    // - q(y | is) ≈ 1/4 for all four y; most_likely(is) is a uniform tie.
    fn reference_example_converges_to_saturated_conditionals() {
        let mut m = MaxEntModel::default();
        let features =
            FeatureSet::new([("optimization", "is"), ("very", "complex")]).unwrap();

        let fitted = m.fit(&tokens(&["optimization", "is", "very", "complex"]), &features).unwrap();
        assert!(fitted.converged(), "{}", fitted.outcome().status);
        assert!(fitted.lambdas().iter().all(|l| l.is_finite()));
        let p = m.predictor().unwrap();

        assert_abs_diff_eq!(p.conditional("optimization", "is").unwrap(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.conditional("very", "complex").unwrap(), 1.0, epsilon = 1e-6);
        for y in ["complex", "is", "optimization", "very"] {
            assert_abs_diff_eq!(p.conditional("is", y).unwrap(), 0.25, epsilon = 1e-12);
        }
        let best = p.most_likely("is").unwrap();
        assert!(best.uniform);
        assert_eq!(best.symbol, "complex");
        assert_eq!(p.most_likely("optimization").unwrap().symbol, "is");
    }

    #[test]
    // Purpose
    // -------
    // All strategies agree on an interior optimum and reproduce the
    // empirical conditionals.
    fn strategies_agree_on_interior_optimum() {
        let features = FeatureSet::new(INTERIOR_FEATURES.iter().copied()).unwrap();
        let expected = [4.0_f64.ln(), 4.0_f64.ln(), 0.0];
        for (strategy, tol) in [
            (Strategy::NelderMead, 1e-3),
            (Strategy::Bfgs, 1e-4),
            (Strategy::IterativeScaling, 1e-5),
        ] {
            let mut m = model(strategy, MarginalWeighting::Context);

            let fitted = m.fit(&tokens(INTERIOR), &features).unwrap();

            assert!(fitted.converged(), "{strategy:?}: {}", fitted.outcome().status);
            for (l, e) in fitted.lambdas().iter().zip(expected) {
                assert_abs_diff_eq!(*l, e, epsilon = tol);
            }
            let p = m.predictor().unwrap();
            assert_abs_diff_eq!(p.conditional("a", "b").unwrap(), 2.0 / 3.0, epsilon = tol);
            assert_abs_diff_eq!(p.conditional("c", "c").unwrap(), 1.0 / 3.0, epsilon = tol);
        }
    }

    #[test]
    // Purpose
    // -------
    // Iterative scaling matches Nelder–Mead on the one-feature closed form.
    //
    // Given
    // -----
    // - tokens [a, b, a, c], feature (a, b): λ* = ln 2 (context weighting),
    //   λ* = ln 4 (unigram weighting, w(a) = 1/2).
    fn iterative_scaling_matches_nelder_mead_closed_form() {
        let features = FeatureSet::new([("a", "b")]).unwrap();
        for (weighting, expected) in
            [(MarginalWeighting::Context, 2.0_f64.ln()), (MarginalWeighting::Unigram, 4.0_f64.ln())]
        {
            let mut gis = model(Strategy::IterativeScaling, weighting);
            let mut nm = model(Strategy::NelderMead, weighting);

            let l_gis = gis.fit(&tokens(&["a", "b", "a", "c"]), &features).unwrap().lambdas()[0];
            let l_nm = nm.fit(&tokens(&["a", "b", "a", "c"]), &features).unwrap().lambdas()[0];

            assert_abs_diff_eq!(l_gis, expected, epsilon = 1e-6);
            assert_abs_diff_eq!(l_nm, expected, epsilon = 1e-3);
            assert_abs_diff_eq!(
                gis.fitted().unwrap().dual_value(),
                nm.fitted().unwrap().dual_value(),
                epsilon = 1e-8
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Under unigram weighting a saturated feature has no finite maximizer;
    // neither strategy may report convergence, and BFGS in particular is
    // documented as able to stop without converging.
    fn unigram_weighting_on_saturated_features_never_converges() {
        let words = ["optimization", "is", "very", "complex"];
        let features =
            FeatureSet::new([("optimization", "is"), ("very", "complex")]).unwrap();
        for (strategy, ls) in [
            (Strategy::NelderMead, LineSearcher::MoreThuente),
            (Strategy::Bfgs, LineSearcher::MoreThuente),
            (Strategy::Bfgs, LineSearcher::HagerZhang),
        ] {
            let dual_opts =
                DualOptions { strategy, line_searcher: ls, ..DualOptions::default() };
            let mut m =
                MaxEntModel::new(MaxEntOptions::new(dual_opts, MarginalWeighting::Unigram, false));

            let result = m.fit(&tokens(&words), &features).map(|f| f.converged());

            assert!(!matches!(result, Ok(true)), "{strategy:?}/{ls:?} reported convergence");
            if let Ok(false) = result {
                assert!(matches!(
                    m.predictor(),
                    Err(MaxEntError::OptimizerNonConvergence { .. })
                ));
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // On the reference example the dual keeps increasing along every λ_i,
    // so a BFGS stop under the default weighting is never a stationary
    // point. Whatever BFGS reports, the caller can tell from λ̂ and
    // `grad_norm`.
    //
    // Given
    // -----
    // - tokens [optimization, is, very, complex]; features
    //   (optimization, is), (very, complex); context weighting; BFGS with
    //   each line search.
    //
    // Expect
    // ------
    // - `fit` returns `Ok`; the reported `grad_norm` matches ‖∇Ψ(λ̂)‖.
    // - ∇Ψ(λ̂) ≥ 0 componentwise: the supremum is not attained at λ̂.
    // - A converged run sits far out along the ray (every λ_i > 5); an
    //   unconverged one is refused by `predictor`.
    fn bfgs_on_saturated_features_stops_at_non_stationary_point() {
        let words = ["optimization", "is", "very", "complex"];
        let features =
            FeatureSet::new([("optimization", "is"), ("very", "complex")]).unwrap();
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            let dual_opts =
                DualOptions { strategy: Strategy::Bfgs, line_searcher: ls, ..DualOptions::default() };
            let mut m =
                MaxEntModel::new(MaxEntOptions::new(dual_opts, MarginalWeighting::Context, false));

            let fitted = m.fit(&tokens(&words), &features).unwrap().clone();
            let ctx = m.context().unwrap();
            let grad = ctx.dual_gradient(fitted.lambdas()).unwrap();
            let reported = fitted.outcome().grad_norm.unwrap();

            assert!(reported.is_finite(), "{ls:?}");
            assert_abs_diff_eq!(reported, grad.dot(&grad).sqrt(), epsilon = 1e-6);
            assert!(grad.iter().all(|&g| g >= 0.0), "{ls:?}: {grad}");
            if fitted.converged() {
                assert!(fitted.lambdas().iter().all(|&l| l > 5.0), "{ls:?}: {}", fitted.lambdas());
            } else {
                assert!(matches!(
                    m.predictor(),
                    Err(MaxEntError::OptimizerNonConvergence { .. })
                ));
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A starting point whose dual overflows fails the fit with an error
    // instead of bringing down the process.
    //
    // Given
    // -----
    // - tokens [a, b, a, c]; feature (a, b) listed twice; λ₀ = [1e308, 1e308],
    //   so the summed potential of b after a is +∞. Default Nelder–Mead.
    //
    // Expect
    // ------
    // - `Err(NumericOverflow)`; the model stays unfitted.
    fn overflowing_start_point_is_an_error() {
        let mut m = MaxEntModel::default();
        let features = FeatureSet::new([("a", "b"), ("a", "b")]).unwrap();

        let err = m
            .fit_from(Theta::from(vec![1e308, 1e308]), &tokens(&["a", "b", "a", "c"]), &features)
            .unwrap_err();

        assert!(matches!(err, MaxEntError::NumericOverflow { .. }), "{err:?}");
        assert_eq!(m.fitted().unwrap_err(), MaxEntError::ModelNotFitted);
    }

    #[test]
    // Purpose
    // -------
    // Degenerate sequences never reach the optimizer.
    fn degenerate_input_is_rejected() {
        assert_eq!(TokenSequence::new(["alone"]), Err(MaxEntError::DegenerateInput { len: 1 }));
        let empty: [&str; 0] = [];
        assert_eq!(TokenSequence::new(empty), Err(MaxEntError::DegenerateInput { len: 0 }));
    }

    #[test]
    // Purpose
    // -------
    // Features naming unseen symbols fail before fitting; queries before a
    // fit report `ModelNotFitted`.
    fn unknown_feature_symbol_and_unfitted_queries() {
        let mut m = MaxEntModel::default();
        let features = FeatureSet::new([("a", "zebra")]).unwrap();

        assert_eq!(m.predictor().unwrap_err(), MaxEntError::ModelNotFitted);
        let err = m.fit(&tokens(&["a", "b"]), &features).unwrap_err();

        assert_eq!(err, MaxEntError::UnknownSymbol { symbol: "zebra".into() });
        assert_eq!(m.fitted().unwrap_err(), MaxEntError::ModelNotFitted);
    }

    #[test]
    // Purpose
    // -------
    // A cancelled token aborts the default Nelder–Mead fit with an error,
    // before any vertex is evaluated, and leaves the model unfitted.
    fn cancelled_fit_reports_failure() {
        let token = CancelToken::new();
        token.cancel();
        let dual_opts = DualOptions::default().with_cancel_token(token);
        let mut m =
            MaxEntModel::new(MaxEntOptions::new(dual_opts, MarginalWeighting::Context, false));
        let features = FeatureSet::new([("a", "b")]).unwrap();

        let err = m.fit(&tokens(&["a", "b", "a", "c"]), &features).unwrap_err();

        assert_eq!(err, MaxEntError::OptimizationFailed { status: "Optimization cancelled".into() });
        assert_eq!(m.fitted().unwrap_err(), MaxEntError::ModelNotFitted);
    }

    #[test]
    // Purpose
    // -------
    // Refitting is deterministic: identical inputs give identical λ̂ and
    // identical `most_likely` answers.
    fn refit_and_queries_are_deterministic() {
        let features = FeatureSet::new(INTERIOR_FEATURES.iter().copied()).unwrap();
        let mut m = MaxEntModel::default();

        let first = m.fit(&tokens(INTERIOR), &features).unwrap().lambdas().clone();
        let q1 = m.predictor().unwrap().most_likely("a").unwrap();
        let second = m.fit(&tokens(INTERIOR), &features).unwrap().lambdas().clone();
        let q2 = m.predictor().unwrap().most_likely("a").unwrap();

        assert_eq!(first, second);
        assert_eq!(q1, q2);
        assert_eq!(q1.symbol, "b");
    }
}
