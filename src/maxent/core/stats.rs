//! Empirical unigram and bigram statistics.
//!
//! Purpose
//! -------
//! Precompute, once per training sequence, every empirical quantity the dual
//! objective consults: symbol marginals, bigram frequencies, and context
//! (predecessor) marginals. Hot loops then read these tables by index.
//!
//! Key behaviors
//! -------------
//! - `marginal(x)` = occurrences of `x` / `n`.
//! - `pair_frequency(x, y)` = occurrences of the bigram `(x, y)` / `(n − 1)`.
//! - `context_marginal(x)` = bigrams whose predecessor is `x` / `(n − 1)`.
//! - `expected_feature_value(f)` is a table lookup of the target pair's
//!   frequency; `expected_feature_value_exhaustive(f)` sums
//!   `pair_frequency · indicator` over every observed bigram and must agree.
//!
//! Invariants & assumptions
//! ------------------------
//! - Built from a validated [`TokenSequence`], so `n ≥ 2` and no division
//!   by zero can occur.
//! - Marginals sum to 1 over the vocabulary; pair frequencies and context
//!   marginals each sum to 1 over observed bigrams / predecessors.
use std::collections::BTreeMap;

use crate::maxent::{
    core::{
        data::{TokenSequence, Vocabulary},
        features::Feature,
    },
    errors::MaxEntResult,
};

/// Read-only frequency tables for one training sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalStats {
    vocab: Vocabulary,
    n_tokens: usize,
    n_bigrams: usize,
    unigram_counts: Vec<usize>,
    context_counts: Vec<usize>,
    bigram_counts: BTreeMap<(usize, usize), usize>,
}

impl EmpiricalStats {
    /// Scan `tokens` once and build all tables.
    pub fn new(tokens: &TokenSequence) -> Self {
        let vocab = Vocabulary::from_tokens(tokens);
        let v = vocab.len();
        let mut unigram_counts = vec![0; v];
        let mut context_counts = vec![0; v];
        let mut bigram_counts = BTreeMap::new();

        let indices: Vec<usize> = tokens
            .tokens()
            .iter()
            .filter_map(|s| vocab.index_of(s).ok())
            .collect();
        for &i in &indices {
            unigram_counts[i] += 1;
        }
        for pair in indices.windows(2) {
            context_counts[pair[0]] += 1;
            *bigram_counts.entry((pair[0], pair[1])).or_insert(0) += 1;
        }
        Self {
            vocab,
            n_tokens: tokens.len(),
            n_bigrams: tokens.bigram_count(),
            unigram_counts,
            context_counts,
            bigram_counts,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Sequence length `n`.
    pub fn n_tokens(&self) -> usize {
        self.n_tokens
    }

    /// Bigram count `n − 1`.
    pub fn n_bigrams(&self) -> usize {
        self.n_bigrams
    }

    /// Relative frequency of `symbol` among all tokens.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::UnknownSymbol` for symbols outside the vocabulary.
    pub fn marginal(&self, symbol: &str) -> MaxEntResult<f64> {
        Ok(self.marginal_at(self.vocab.index_of(symbol)?))
    }

    /// Relative frequency of the bigram `(x, y)`; `0.0` for a known but
    /// unobserved pair.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::UnknownSymbol` if either symbol is outside the vocabulary.
    pub fn pair_frequency(&self, x: &str, y: &str) -> MaxEntResult<f64> {
        Ok(self.pair_frequency_at(self.vocab.index_of(x)?, self.vocab.index_of(y)?))
    }

    /// Share of bigrams whose predecessor is `symbol`.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::UnknownSymbol` for symbols outside the vocabulary.
    pub fn context_marginal(&self, symbol: &str) -> MaxEntResult<f64> {
        Ok(self.context_marginal_at(self.vocab.index_of(symbol)?))
    }

    /// Empirical expectation of `feature`'s indicator (table lookup).
    pub fn expected_feature_value(&self, feature: &Feature) -> MaxEntResult<f64> {
        self.pair_frequency(&feature.predecessor, &feature.successor)
    }

    /// Empirical expectation of `feature`'s indicator, summed over every
    /// observed bigram. Reference for [`expected_feature_value`](Self::expected_feature_value).
    pub fn expected_feature_value_exhaustive(&self, feature: &Feature) -> MaxEntResult<f64> {
        self.vocab.index_of(&feature.predecessor)?;
        self.vocab.index_of(&feature.successor)?;
        let total = self
            .bigram_counts
            .iter()
            .map(|(&(a, b), &count)| {
                let freq = count as f64 / self.n_bigrams as f64;
                freq * feature.indicator(self.vocab.symbol(a), self.vocab.symbol(b))
            })
            .sum();
        Ok(total)
    }

    pub(crate) fn marginal_at(&self, x: usize) -> f64 {
        self.unigram_counts[x] as f64 / self.n_tokens as f64
    }

    pub(crate) fn context_marginal_at(&self, x: usize) -> f64 {
        self.context_counts[x] as f64 / self.n_bigrams as f64
    }

    pub(crate) fn pair_frequency_at(&self, x: usize, y: usize) -> f64 {
        self.bigram_counts.get(&(x, y)).copied().unwrap_or(0) as f64 / self.n_bigrams as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maxent::errors::MaxEntError;
    use approx::assert_abs_diff_eq;

    fn stats(tokens: &[&str]) -> EmpiricalStats {
        EmpiricalStats::new(&TokenSequence::new(tokens.iter().copied()).unwrap())
    }

    #[test]
    // Purpose
    // -------
    // Marginals divide by n, pair frequencies and context marginals by n − 1.
    //
    // Given
    // -----
    // - tokens [a, b, a, c]: n = 4, bigrams (a,b), (b,a), (a,c).
    //
    // Expect
    // ------
    // - marginal(a) = 1/2, pair_frequency(a,b) = 1/3, context_marginal(a) = 2/3,
    //   context_marginal(c) = 0, pair_frequency(c,a) = 0.
    fn tables_use_expected_denominators() {
        let s = stats(&["a", "b", "a", "c"]);

        assert_abs_diff_eq!(s.marginal("a").unwrap(), 0.5);
        assert_abs_diff_eq!(s.pair_frequency("a", "b").unwrap(), 1.0 / 3.0);
        assert_abs_diff_eq!(s.context_marginal("a").unwrap(), 2.0 / 3.0);
        assert_abs_diff_eq!(s.context_marginal("c").unwrap(), 0.0);
        assert_abs_diff_eq!(s.pair_frequency("c", "a").unwrap(), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Marginal tables sum to one.
    fn marginal_tables_sum_to_one() {
        let tokens = ["the", "cat", "sat", "on", "the", "mat", "the", "end"];
        let s = stats(&tokens);
        let vocab = s.vocabulary().clone();

        let unigram: f64 = vocab.symbols().iter().map(|x| s.marginal(x).unwrap()).sum();
        let context: f64 = vocab.symbols().iter().map(|x| s.context_marginal(x).unwrap()).sum();
        let pairs: f64 = vocab
            .symbols()
            .iter()
            .flat_map(|x| vocab.symbols().iter().map(move |y| (x.clone(), y.clone())))
            .map(|(x, y)| s.pair_frequency(&x, &y).unwrap())
            .sum();

        assert_abs_diff_eq!(unigram, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(context, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pairs, 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Lookup and exhaustive expectations agree for every pair, observed or not.
    fn expected_feature_value_matches_exhaustive_sum() {
        let tokens = ["x", "y", "x", "y", "z", "x", "x", "y", "z", "z"];
        let s = stats(&tokens);
        let symbols = s.vocabulary().symbols().to_vec();

        for a in &symbols {
            for b in &symbols {
                let f = Feature::new(a.as_str(), b.as_str());
                assert_abs_diff_eq!(
                    s.expected_feature_value(&f).unwrap(),
                    s.expected_feature_value_exhaustive(&f).unwrap(),
                    epsilon = 1e-15
                );
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Unknown symbols are rejected, not treated as zero.
    fn unknown_symbols_are_rejected() {
        let s = stats(&["a", "b"]);

        assert_eq!(s.marginal("q"), Err(MaxEntError::UnknownSymbol { symbol: "q".into() }));
        assert!(s.pair_frequency("a", "q").is_err());
        assert!(s.expected_feature_value_exhaustive(&Feature::new("q", "a")).is_err());
    }
}
