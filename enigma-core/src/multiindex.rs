// File:    multiindex.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Lazy odometer-order enumeration of every rotor position tuple.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::error::{EnigmaError, Result};

/// Iterates over `[0, radix)^dims` in odometer order, last component fastest.
///
/// ```
/// use enigma_core::MultiIndexIter;
///
/// let tuples: Vec<Vec<usize>> = MultiIndexIter::new(2, 2).unwrap().collect();
/// assert_eq!(tuples, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
/// ```
#[derive(Debug, Clone)]
pub struct MultiIndexIter {
    dims: usize,
    radix: usize,
    len: usize,
    emitted: usize,
    current: Vec<usize>,
}

impl MultiIndexIter {
    /// Creates an iterator over all `dims`-tuples with components below `radix`.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidParameter`] if `radix^dims` does not fit
    /// in a `usize`.
    pub fn new(dims: usize, radix: usize) -> Result<Self> {
        let len = u32::try_from(dims)
            .ok()
            .and_then(|exp| radix.checked_pow(exp))
            .ok_or_else(|| {
                EnigmaError::InvalidParameter(format!(
                    "{radix}^{dims} position tuples cannot be enumerated"
                ))
            })?;
        Ok(Self {
            dims,
            radix,
            len,
            emitted: 0,
            current: vec![0; dims],
        })
    }

    /// Number of components per tuple.
    #[must_use]
    pub const fn dims(&self) -> usize {
        self.dims
    }

    /// Number of values per component.
    #[must_use]
    pub const fn radix(&self) -> usize {
        self.radix
    }

    /// Rewinds to the all-zero tuple.
    pub fn restart(&mut self) {
        self.emitted = 0;
        self.current.fill(0);
    }

    /// The tuple at `linear` in odometer order, or `None` past the end.
    #[must_use]
    pub fn tuple_at(&self, linear: usize) -> Option<Vec<usize>> {
        if linear >= self.len {
            return None;
        }
        let mut tuple = vec![0; self.dims];
        let mut rest = linear;
        for digit in tuple.iter_mut().rev() {
            *digit = rest % self.radix;
            rest /= self.radix;
        }
        Some(tuple)
    }

    fn advance(&mut self) {
        for digit in self.current.iter_mut().rev() {
            *digit += 1;
            if *digit < self.radix {
                return;
            }
            *digit = 0;
        }
    }
}

impl Iterator for MultiIndexIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= self.len {
            return None;
        }
        let tuple = self.current.clone();
        self.emitted += 1;
        self.advance();
        Some(tuple)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.emitted;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MultiIndexIter {}
