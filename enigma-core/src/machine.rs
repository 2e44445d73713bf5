// File:    machine.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: The cipher machine: plugboard, odometer-stepped rotor stack and reflector.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! The composed rotor cipher machine.
//!
//! Encoding is symmetric: running a ciphertext through a machine that starts
//! from the same rotor positions restores the plaintext.

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::rotor::Rotor;
use crate::swapper::Swapper;

/// A rotor cipher machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enigma {
    alphabet: Alphabet,
    rotors: Vec<Rotor>,
    plugboard: Swapper,
    reflector: Swapper,
}

impl Enigma {
    /// Assembles a machine.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::CardinalityMismatch`] if any rotor, the
    /// plugboard or the reflector does not have one position per symbol.
    pub fn new(
        rotors: Vec<Rotor>,
        plugboard: Swapper,
        reflector: Swapper,
        alphabet: Alphabet,
    ) -> Result<Self> {
        let n = alphabet.len();
        for (i, rotor) in rotors.iter().enumerate() {
            check_cardinality(&format!("rotor {i}"), n, rotor.n_positions())?;
        }
        check_cardinality("plugboard", n, plugboard.len())?;
        check_cardinality("reflector", n, reflector.len())?;

        Ok(Self {
            alphabet,
            rotors,
            plugboard,
            reflector,
        })
    }

    /// The machine's alphabet.
    #[must_use]
    pub const fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The rotor stack, entry rotor first.
    #[must_use]
    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    /// The plugboard.
    #[must_use]
    pub const fn plugboard(&self) -> &Swapper {
        &self.plugboard
    }

    /// Mutable access to the plugboard. Its size cannot change through this.
    pub const fn plugboard_mut(&mut self) -> &mut Swapper {
        &mut self.plugboard
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::CardinalityMismatch`] if the sizes differ.
    pub fn set_plugboard(&mut self, plugboard: Swapper) -> Result<()> {
        check_cardinality("plugboard", self.alphabet.len(), plugboard.len())?;
        self.plugboard = plugboard;
        Ok(())
    }

    /// The reflector.
    #[must_use]
    pub const fn reflector(&self) -> &Swapper {
        &self.reflector
    }

    /// Current rotor positions, entry rotor first.
    #[must_use]
    pub fn rotor_positions(&self) -> Vec<usize> {
        self.rotors.iter().map(Rotor::position).collect()
    }

    /// Moves every rotor to the given position.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::PositionCount`] on a length mismatch and
    /// [`EnigmaError::PositionOutOfRange`] for a position `>= N`; no rotor is
    /// moved in either case.
    pub fn set_rotor_positions(&mut self, positions: &[usize]) -> Result<()> {
        if positions.len() != self.rotors.len() {
            return Err(EnigmaError::PositionCount {
                expected: self.rotors.len(),
                actual: positions.len(),
            });
        }
        let n = self.alphabet.len();
        if let Some(&position) = positions.iter().find(|&&p| p >= n) {
            return Err(EnigmaError::PositionOutOfRange {
                position,
                positions: n,
            });
        }
        for (rotor, &position) in self.rotors.iter_mut().zip(positions) {
            rotor.set_position(position);
        }
        Ok(())
    }

    /// Encodes (or, equally, decodes) `text`.
    ///
    /// The rotors are left advanced by the length of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::UnknownSymbol`] for characters outside the
    /// alphabet. The rotors are not moved in that case.
    pub fn encode(&mut self, text: &str) -> Result<String> {
        let input = self.alphabet.to_indices(text)?;
        let output = self.encode_indices(&input);
        Ok(self.alphabet.render(&output))
    }

    /// Encodes a sequence of symbol indices.
    ///
    /// # Panics
    ///
    /// Panics if an index is not below the alphabet size.
    pub fn encode_indices(&mut self, input: &[usize]) -> Vec<usize> {
        input.iter().map(|&symbol| self.encode_symbol(symbol)).collect()
    }

    fn encode_symbol(&mut self, symbol: usize) -> usize {
        let mut signal = self.plugboard.apply(symbol);

        // The entry rotor always steps; the others only on a carry.
        let mut carry = 1;
        for rotor in &mut self.rotors {
            if carry == 0 {
                break;
            }
            carry = rotor.rotate(carry);
        }

        for rotor in &self.rotors {
            signal = rotor.permute_forward(signal);
        }
        signal = self.reflector.apply(signal);
        for rotor in self.rotors.iter().rev() {
            signal = rotor.permute_backward(signal);
        }
        self.plugboard.apply(signal)
    }
}

fn check_cardinality(component: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(EnigmaError::CardinalityMismatch {
            component: component.to_string(),
            expected,
            actual,
        })
    }
}
