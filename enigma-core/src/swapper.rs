// File:    swapper.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Self-inverse position swaps, used both as plugboard and as reflector.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::error::{EnigmaError, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

/// An involution over `[0, N)`: every position is either free (mapped to
/// itself) or swapped with exactly one partner.
///
/// Every mutating method leaves the mapping an involution, or fails without
/// touching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swapper {
    map: Vec<usize>,
}

impl Swapper {
    /// A swapper with `n_positions` positions and no swaps.
    #[must_use]
    pub fn new(n_positions: usize) -> Self {
        Self {
            map: (0..n_positions).collect(),
        }
    }

    /// A swapper with `n_swaps` random disjoint swaps drawn from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::TooManyPlugs`] if `n_swaps > n_positions / 2`.
    pub fn with_random_swaps(n_positions: usize, n_swaps: usize, seed: u64) -> Result<Self> {
        let mut swapper = Self::new(n_positions);
        swapper.assign_random_swaps(n_swaps, seed)?;
        Ok(swapper)
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` if the swapper has no positions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The partner of `input`, or `input` itself if it is free.
    #[must_use]
    pub fn apply(&self, input: usize) -> usize {
        self.map[input]
    }

    /// Connects `a` and `b`. Previous partners of either are freed.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::SelfSwap`] if `a == b`, and
    /// [`EnigmaError::PositionOutOfRange`] if either is not a position.
    pub fn set_swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_range(a)?;
        self.check_range(b)?;
        if a == b {
            return Err(EnigmaError::SelfSwap(a));
        }
        self.release(a);
        self.release(b);
        self.map[a] = b;
        self.map[b] = a;
        Ok(())
    }

    /// Disconnects the swap between `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::NotPaired`] unless `a` and `b` are currently
    /// swapped with each other.
    pub fn unset_swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_range(a)?;
        self.check_range(b)?;
        if a == b || self.map[a] != b {
            return Err(EnigmaError::NotPaired(a, b));
        }
        self.map[a] = a;
        self.map[b] = b;
        Ok(())
    }

    /// Rewires the swap `x <-> from` into `x <-> to`.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::NotSwapped`] if `from` is free and
    /// [`EnigmaError::NotFree`] if `to` is already swapped.
    pub fn move_swap_endpoint(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_range(from)?;
        self.check_range(to)?;
        let partner = self.map[from];
        if partner == from {
            return Err(EnigmaError::NotSwapped(from));
        }
        if self.map[to] != to {
            return Err(EnigmaError::NotFree(to));
        }
        self.map[from] = from;
        self.map[partner] = to;
        self.map[to] = partner;
        Ok(())
    }

    /// Replaces all swaps by `n_swaps` random disjoint swaps drawn from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::TooManyPlugs`] if `n_swaps > len() / 2`; the
    /// current swaps are kept in that case.
    pub fn assign_random_swaps(&mut self, n_swaps: usize, seed: u64) -> Result<()> {
        let n = self.len();
        if n_swaps > n / 2 {
            return Err(EnigmaError::TooManyPlugs {
                requested: n_swaps,
                positions: n,
                max: n / 2,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions: Vec<usize> = (0..n).collect();
        positions.shuffle(&mut rng);
        let (firsts, rest) = positions.split_at(n_swaps);

        self.map = (0..n).collect();
        for (&a, &b) in firsts.iter().zip(&rest[..n_swaps]) {
            self.map[a] = b;
            self.map[b] = a;
        }
        Ok(())
    }

    /// Positions that have a partner, in increasing order.
    #[must_use]
    pub fn swapped_positions(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.map[i] != i).collect()
    }

    /// Positions without a partner, in increasing order.
    #[must_use]
    pub fn free_positions(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.map[i] == i).collect()
    }

    /// Installed swaps as `(low, high)` pairs, sorted.
    #[must_use]
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        (0..self.len())
            .filter(|&i| self.map[i] > i)
            .map(|i| (i, self.map[i]))
            .collect()
    }

    /// Number of installed swaps.
    #[must_use]
    pub fn n_swaps(&self) -> usize {
        self.pairs().len()
    }

    fn release(&mut self, position: usize) {
        let partner = self.map[position];
        self.map[partner] = partner;
        self.map[position] = position;
    }

    fn check_range(&self, position: usize) -> Result<()> {
        if position < self.len() {
            Ok(())
        } else {
            Err(EnigmaError::PositionOutOfRange {
                position,
                positions: self.len(),
            })
        }
    }
}
