// File:    alphabet.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: The ordered symbol set of a machine and its symbol <-> index bijection.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::error::{EnigmaError, Result};
use std::collections::HashMap;

/// An ordered set of distinct symbols, indexed `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Builds an alphabet from the characters of `symbols`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidAlphabet`] if `symbols` is empty or
    /// contains a character twice.
    pub fn new(symbols: &str) -> Result<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(EnigmaError::InvalidAlphabet("no symbols".to_string()));
        }
        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &symbol) in symbols.iter().enumerate() {
            if index.insert(symbol, i).is_some() {
                return Err(EnigmaError::InvalidAlphabet(format!(
                    "symbol {symbol:?} appears more than once"
                )));
            }
        }
        Ok(Self { symbols, index })
    }

    /// The 26 lowercase ASCII letters.
    #[must_use]
    pub fn lowercase() -> Self {
        Self::from_ascii_range(b'a')
    }

    /// The 26 uppercase ASCII letters.
    #[must_use]
    pub fn uppercase() -> Self {
        Self::from_ascii_range(b'A')
    }

    fn from_ascii_range(first: u8) -> Self {
        let symbols: Vec<char> = (first..first + 26).map(char::from).collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, index }
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; construction rejects empty alphabets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Index of `symbol`, if it belongs to the alphabet.
    #[must_use]
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    /// Symbol at `index`, if in range.
    #[must_use]
    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// The symbols as a string, in index order.
    #[must_use]
    pub fn as_string(&self) -> String {
        self.symbols.iter().collect()
    }

    /// Converts `text` into symbol indices.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::UnknownSymbol`] for the first character outside
    /// the alphabet.
    pub fn to_indices(&self, text: &str) -> Result<Vec<usize>> {
        text.chars()
            .map(|c| self.index_of(c).ok_or(EnigmaError::UnknownSymbol(c)))
            .collect()
    }

    /// Converts symbol indices back into text.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range. Indices produced by the machine
    /// always are in range.
    #[must_use]
    pub fn render(&self, indices: &[usize]) -> String {
        indices.iter().map(|&i| self.symbols[i]).collect()
    }

    /// Keeps only the characters of `text` that belong to the alphabet.
    ///
    /// ASCII letters outside the alphabet are case-folded first, so
    /// `"Hello, World"` becomes `"helloworld"` for [`Alphabet::lowercase`].
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        text.chars()
            .filter_map(|c| {
                [c, c.to_ascii_lowercase(), c.to_ascii_uppercase()]
                    .into_iter()
                    .find(|candidate| self.index.contains_key(candidate))
            })
            .collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::lowercase()
    }
}
