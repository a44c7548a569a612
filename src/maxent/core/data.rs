//! Token containers for bigram maximum-entropy models.
//!
//! Purpose
//! -------
//! Provide small, validated containers for the training token sequence and
//! its vocabulary. This module centralizes input validation so downstream
//! statistics and potentials can assume at least one bigram exists and that
//! every symbol has a stable integer index.
//!
//! Key behaviors
//! -------------
//! - [`TokenSequence`] rejects sequences shorter than two tokens and exposes
//!   the `n − 1` consecutive pairs (the bigram table) in sequence order.
//! - [`Vocabulary`] stores the unique symbols in **lexicographic order** and
//!   maps each symbol to its index. That order is the deterministic
//!   iteration order used for partition sums and `most_likely` tie-breaks.
//!
//! Invariants & assumptions
//! ------------------------
//! - `TokenSequence::len() ≥ 2`.
//! - `Vocabulary` is non-empty, sorted, and duplicate-free.
use std::collections::HashMap;

use crate::maxent::errors::{MaxEntError, MaxEntResult};

/// Opaque token. Strings in practice.
pub type Symbol = String;

/// `TokenSequence` — immutable, validated training sequence.
///
/// Invariants
/// ----------
/// - Holds at least two tokens, so `bigrams()` yields `len() − 1 ≥ 1` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    tokens: Vec<Symbol>,
}

impl TokenSequence {
    /// Construct a validated sequence.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::DegenerateInput { len }` when fewer than two tokens
    ///   are supplied.
    pub fn new<I, S>(tokens: I) -> MaxEntResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let tokens: Vec<Symbol> = tokens.into_iter().map(Into::into).collect();
        if tokens.len() <= 1 {
            return Err(MaxEntError::DegenerateInput { len: tokens.len() });
        }
        Ok(Self { tokens })
    }

    /// Number of tokens `n`.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always `false`; construction rejects sequences shorter than two.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of consecutive pairs, `n − 1`.
    pub fn bigram_count(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn tokens(&self) -> &[Symbol] {
        &self.tokens
    }

    /// Consecutive `(predecessor, successor)` pairs in sequence order.
    pub fn bigrams(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.tokens.windows(2).map(|w| (w[0].as_str(), w[1].as_str()))
    }
}

/// `Vocabulary` — sorted set of unique symbols with index lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    symbols: Vec<Symbol>,
    index: HashMap<Symbol, usize>,
}

impl Vocabulary {
    /// Collect the unique symbols of `tokens` in lexicographic order.
    pub fn from_tokens(tokens: &TokenSequence) -> Self {
        let mut symbols: Vec<Symbol> = tokens.tokens().to_vec();
        symbols.sort_unstable();
        symbols.dedup();
        let index = symbols.iter().enumerate().map(|(i, s)| (s.clone(), i)).collect();
        Self { symbols, index }
    }

    /// Number of distinct symbols `|V|`.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Index of `symbol` in vocabulary order.
    ///
    /// Errors
    /// ------
    /// - `MaxEntError::UnknownSymbol` if `symbol` never occurred in training.
    pub fn index_of(&self, symbol: &str) -> MaxEntResult<usize> {
        self.index
            .get(symbol)
            .copied()
            .ok_or_else(|| MaxEntError::UnknownSymbol { symbol: symbol.to_string() })
    }

    /// Symbol at `index`. Panics if `index >= len()`.
    pub fn symbol(&self, index: usize) -> &str {
        &self.symbols[index]
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}
