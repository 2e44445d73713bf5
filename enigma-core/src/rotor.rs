// File:    rotor.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: A rotor: a seeded random permutation combined with a rotating offset.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// One rotating stage of the signal path.
///
/// The wiring is fixed at construction. Only [`Rotor::position`] changes
/// while encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    forward: Vec<usize>,
    backward: Vec<usize>,
    position: usize,
}

impl Rotor {
    /// Creates a rotor with `n_positions` contacts wired by `seed`.
    ///
    /// The same seed always produces the same wiring.
    ///
    /// # Panics
    ///
    /// Panics if `n_positions` is zero.
    #[must_use]
    pub fn new(n_positions: usize, seed: u64) -> Self {
        assert!(n_positions > 0, "A rotor needs at least one position.");
        let mut rng = StdRng::seed_from_u64(seed);
        let mut forward: Vec<usize> = (0..n_positions).collect();
        forward.shuffle(&mut rng);

        let mut backward = vec![0; n_positions];
        for (input, &output) in forward.iter().enumerate() {
            backward[output] = input;
        }

        Self {
            forward,
            backward,
            position: 0,
        }
    }

    /// Number of contacts.
    #[must_use]
    pub fn n_positions(&self) -> usize {
        self.forward.len()
    }

    /// Current rotational offset, always in `[0, n_positions)`.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Sets the offset, reduced modulo the number of positions.
    pub fn set_position(&mut self, position: usize) {
        self.position = position % self.n_positions();
    }

    /// Advances the rotor by `steps` and returns how many full turns that took.
    pub fn rotate(&mut self, steps: usize) -> usize {
        let n = self.n_positions();
        let total = self.position + steps;
        self.position = total % n;
        total / n
    }

    /// Passes a signal through the rotor towards the reflector.
    #[must_use]
    pub fn permute_forward(&self, input: usize) -> usize {
        Self::permute(&self.forward, self.position, input)
    }

    /// Passes a signal through the rotor on its way back from the reflector.
    ///
    /// Inverts [`Rotor::permute_forward`] at the same position.
    #[must_use]
    pub fn permute_backward(&self, input: usize) -> usize {
        Self::permute(&self.backward, self.position, input)
    }

    // The contact under `input` is `input + position`; its output is shifted
    // back by the same offset.
    fn permute(wiring: &[usize], position: usize, input: usize) -> usize {
        let n = wiring.len();
        (wiring[(input + position) % n] + n - position) % n
    }
}
