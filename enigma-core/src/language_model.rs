// File:    language_model.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: N-gram log10 likelihood tables, built from sample text and persisted as JSON.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Language model tables.
//!
//! A table maps every symbol group of a fixed width (its order) to a log10
//! probability. Tables are built once from sample text and are read-only
//! while a search runs.

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Log10 value given to pairs that never occurred in the sample text.
pub const DEFAULT_MISSING_LOG_PROB: f64 = -10.0;

/// A symbol-group to log10 probability table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgramTable {
    order: usize,
    missing: f64,
    log_probs: HashMap<String, f64>,
}

impl NgramTable {
    /// Wraps precomputed log10 probabilities.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidTable`] if `order` is zero, the table is
    /// empty, or a key is not exactly `order` symbols wide.
    pub fn new(order: usize, missing: f64, log_probs: HashMap<String, f64>) -> Result<Self> {
        let table = Self {
            order,
            missing,
            log_probs,
        };
        table.validate()?;
        Ok(table)
    }

    /// Joint probabilities of every overlapping `order`-window of `corpus`.
    ///
    /// The corpus is passed through [`Alphabet::normalize`] first.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidTable`] if `order` is zero or the
    /// normalized corpus is shorter than `order`.
    pub fn from_corpus(alphabet: &Alphabet, corpus: &str, order: usize) -> Result<Self> {
        let symbols: Vec<char> = alphabet.normalize(corpus).chars().collect();
        if order == 0 || symbols.len() < order {
            return Err(EnigmaError::InvalidTable(format!(
                "cannot count {order}-grams in a corpus of {} symbols",
                symbols.len()
            )));
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for window in symbols.windows(order) {
            *counts.entry(window.iter().collect()).or_default() += 1;
        }
        let windows = (symbols.len() - order + 1) as f64;
        let log_probs = counts
            .into_iter()
            .map(|(group, count)| (group, (count as f64 / windows).log10()))
            .collect();

        log::debug!(
            "Counted {order}-grams over {} symbols of sample text.",
            symbols.len()
        );
        Self::new(order, DEFAULT_MISSING_LOG_PROB, log_probs)
    }

    /// Conditional next-symbol probabilities `P(b | a)` for every pair `ab`
    /// of `corpus`.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidTable`] if the normalized corpus has
    /// fewer than two symbols.
    pub fn pair_transitions(alphabet: &Alphabet, corpus: &str) -> Result<Self> {
        let symbols: Vec<char> = alphabet.normalize(corpus).chars().collect();
        if symbols.len() < 2 {
            return Err(EnigmaError::InvalidTable(format!(
                "cannot count transitions in a corpus of {} symbols",
                symbols.len()
            )));
        }

        let mut pair_counts: HashMap<(char, char), usize> = HashMap::new();
        let mut lead_counts: HashMap<char, usize> = HashMap::new();
        for pair in symbols.windows(2) {
            *pair_counts.entry((pair[0], pair[1])).or_default() += 1;
            *lead_counts.entry(pair[0]).or_default() += 1;
        }

        let log_probs = pair_counts
            .into_iter()
            .map(|((first, second), count)| {
                let total = lead_counts[&first] as f64;
                (
                    [first, second].iter().collect(),
                    (count as f64 / total).log10(),
                )
            })
            .collect();
        Self::new(2, DEFAULT_MISSING_LOG_PROB, log_probs)
    }

    /// Loads a table written by [`NgramTable::save`].
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error if the file cannot be read or parsed, and
    /// [`EnigmaError::InvalidTable`] if its content is inconsistent.
    pub fn load(path: &Path) -> Result<Self> {
        let table_str = fs::read_to_string(path)?;
        let table: Self = serde_json::from_str(&table_str)?;
        table.validate()?;
        Ok(table)
    }

    /// Writes the table as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let table_str = serde_json::to_string_pretty(self)?;
        fs::write(path, table_str)?;
        Ok(())
    }

    /// Width of every group in the table.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Log10 value used for groups absent from the table.
    #[must_use]
    pub const fn missing(&self) -> f64 {
        self.missing
    }

    /// Log10 probability of `group`, if it was observed.
    #[must_use]
    pub fn get(&self, group: &str) -> Option<f64> {
        self.log_probs.get(group).copied()
    }

    /// Number of known groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log_probs.len()
    }

    /// `true` if no group is known. Never the case for a validated table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log_probs.is_empty()
    }

    /// The least likely known group and its log10 probability.
    #[must_use]
    pub fn least_likely(&self) -> Option<(&str, f64)> {
        self.log_probs
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(group, &log_prob)| (group.as_str(), log_prob))
    }

    fn validate(&self) -> Result<()> {
        if self.order == 0 {
            return Err(EnigmaError::InvalidTable("order must be positive".to_string()));
        }
        if self.log_probs.is_empty() {
            return Err(EnigmaError::InvalidTable("no groups".to_string()));
        }
        if let Some(group) = self
            .log_probs
            .keys()
            .find(|group| group.chars().count() != self.order)
        {
            return Err(EnigmaError::InvalidTable(format!(
                "group {group:?} does not have {} symbols",
                self.order
            )));
        }
        Ok(())
    }
}
