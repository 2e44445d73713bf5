// File:    scoring.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Text plausibility scorers driven by n-gram language model tables.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Text scorers.
//!
//! A scorer turns a candidate plaintext into a single number; higher means
//! more like natural language. It is the only fitness signal the searches use.

use crate::error::{EnigmaError, Result};
use crate::language_model::NgramTable;

/// Default multiplier applied to the least likely known group for unknown
/// groups.
pub const DEFAULT_PENALTY_FACTOR: f64 = 2.0;

/// Scores candidate plaintexts.
pub trait TextScorer: Send + Sync {
    /// Plausibility of `text`; higher is better.
    ///
    /// Texts shorter than [`TextScorer::window`] score `f64::NEG_INFINITY`.
    fn score(&self, text: &str) -> f64;

    /// Number of symbols one scored group spans.
    fn window(&self) -> usize;
}

/// Mean log10 likelihood over adjacent symbol pairs.
///
/// Pairs missing from the table score the table's [`NgramTable::missing`]
/// value.
#[derive(Debug, Clone)]
pub struct PairLikelihoodScorer {
    table: NgramTable,
}

impl PairLikelihoodScorer {
    /// Creates a pair scorer.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidTable`] unless the table has order 2.
    pub fn new(table: NgramTable) -> Result<Self> {
        if table.order() != 2 {
            return Err(EnigmaError::InvalidTable(format!(
                "pair scoring needs an order 2 table, got order {}",
                table.order()
            )));
        }
        Ok(Self { table })
    }
}

impl TextScorer for PairLikelihoodScorer {
    fn score(&self, text: &str) -> f64 {
        let missing = self.table.missing();
        mean_over_windows(text, 2, |group| self.table.get(group).unwrap_or(missing))
    }

    fn window(&self) -> usize {
        2
    }
}

/// Mean log10 likelihood over overlapping n-symbol groups, with a fixed
/// penalty for groups the table does not know.
#[derive(Debug, Clone)]
pub struct GroupLikelihoodScorer {
    table: NgramTable,
    penalty: f64,
}

impl GroupLikelihoodScorer {
    /// Creates a group scorer with [`DEFAULT_PENALTY_FACTOR`].
    ///
    /// # Errors
    ///
    /// See [`GroupLikelihoodScorer::with_penalty_factor`].
    pub fn new(table: NgramTable) -> Result<Self> {
        Self::with_penalty_factor(table, DEFAULT_PENALTY_FACTOR)
    }

    /// Creates a group scorer where unknown groups score
    /// `least_likely × penalty_factor`, strictly below every known group.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidParameter`] unless `penalty_factor` is
    /// greater than 1, and [`EnigmaError::InvalidTable`] if the least likely
    /// known group has a log10 probability of 0 or more.
    pub fn with_penalty_factor(table: NgramTable, penalty_factor: f64) -> Result<Self> {
        if !penalty_factor.is_finite() || penalty_factor <= 1.0 {
            return Err(EnigmaError::InvalidParameter(format!(
                "penalty factor must be greater than 1, got {penalty_factor}"
            )));
        }
        let least_likely = table
            .least_likely()
            .map_or(table.missing(), |(_, log_prob)| log_prob);
        if least_likely.is_nan() || least_likely >= 0.0 {
            return Err(EnigmaError::InvalidTable(format!(
                "least likely group has log10 probability {least_likely}, \
                 so no penalty can score below it"
            )));
        }
        Ok(Self {
            penalty: least_likely * penalty_factor,
            table,
        })
    }

    /// The score of a single unknown group.
    #[must_use]
    pub const fn unknown_penalty(&self) -> f64 {
        self.penalty
    }
}

impl TextScorer for GroupLikelihoodScorer {
    fn score(&self, text: &str) -> f64 {
        mean_over_windows(text, self.table.order(), |group| {
            self.table.get(group).unwrap_or(self.penalty)
        })
    }

    fn window(&self) -> usize {
        self.table.order()
    }
}

fn mean_over_windows(text: &str, width: usize, log_prob: impl Fn(&str) -> f64) -> f64 {
    // Byte offsets of every symbol plus the end, so windows stay on char
    // boundaries for any alphabet.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let symbols = bounds.len() - 1;
    if width == 0 || symbols < width {
        return f64::NEG_INFINITY;
    }

    let groups = symbols - width + 1;
    let total: f64 = (0..groups)
        .map(|start| log_prob(&text[bounds[start]..bounds[start + width]]))
        .sum();
    total / groups as f64
}
