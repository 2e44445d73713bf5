// File:    config.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Serializable machine templates and annealing parameters.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Enigma;
use crate::rotor::Rotor;
use crate::swapper::Swapper;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything needed to rebuild a machine: alphabet, wiring seeds and the
/// plugboard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    /// The symbols of the alphabet, in index order.
    pub alphabet: String,
    /// One wiring seed per rotor, entry rotor first.
    pub rotor_seeds: Vec<u64>,
    /// Seed of the fully swapped reflector.
    pub reflector_seed: u64,
    /// Number of plugboard swaps.
    pub plugs: usize,
    /// Seed the plugboard swaps are drawn from.
    pub plugboard_seed: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::lowercase().as_string(),
            rotor_seeds: vec![21, 32, 34],
            reflector_seed: 3,
            plugs: 10,
            plugboard_seed: 41,
        }
    }
}

impl MachineConfig {
    /// Builds the alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidAlphabet`] for an empty or repetitive
    /// alphabet.
    pub fn build_alphabet(&self) -> Result<Alphabet> {
        Alphabet::new(&self.alphabet)
    }

    /// Builds the rotors at position zero.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidAlphabet`] for an invalid alphabet.
    pub fn build_rotors(&self) -> Result<Vec<Rotor>> {
        let n = self.build_alphabet()?.len();
        Ok(self.rotor_seeds.iter().map(|&seed| Rotor::new(n, seed)).collect())
    }

    /// Builds the reflector, with every position swapped (one position stays
    /// free on odd alphabets).
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidAlphabet`] for an invalid alphabet.
    pub fn build_reflector(&self) -> Result<Swapper> {
        let n = self.build_alphabet()?.len();
        Swapper::with_random_swaps(n, n / 2, self.reflector_seed)
    }

    /// Builds the plugboard.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::TooManyPlugs`] if `plugs` exceeds half the
    /// alphabet.
    pub fn build_plugboard(&self) -> Result<Swapper> {
        let n = self.build_alphabet()?.len();
        Swapper::with_random_swaps(n, self.plugs, self.plugboard_seed)
    }

    /// Builds the complete machine with all rotors at position zero.
    ///
    /// # Errors
    ///
    /// Returns any error of the individual builders.
    pub fn build(&self) -> Result<Enigma> {
        Enigma::new(
            self.build_rotors()?,
            self.build_plugboard()?,
            self.build_reflector()?,
            self.build_alphabet()?,
        )
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&config_str)?)
    }

    /// Saves the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = serde_json::to_string_pretty(self)?;
        fs::write(path, config_str)?;
        Ok(())
    }
}

/// Parameters of the constant-temperature annealing search.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Scale of the Metropolis acceptance probability for worsening moves.
    pub temperature: f64,
    /// Iterations per block.
    pub block_size: usize,
    /// Hard limit on the number of blocks.
    pub max_blocks: usize,
    /// The search stops once consecutive block means differ by less than this.
    pub convergence_threshold: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            block_size: 100,
            max_blocks: 200,
            convergence_threshold: 1e-4,
        }
    }
}

impl AnnealingConfig {
    /// Checks that every parameter is in its domain.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidParameter`] for a non-positive or
    /// non-finite temperature, a zero block size or block count, or a
    /// negative threshold.
    pub fn validate(&self) -> Result<()> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(EnigmaError::InvalidParameter(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        if self.block_size == 0 || self.max_blocks == 0 {
            return Err(EnigmaError::InvalidParameter(
                "block size and block count must be positive".to_string(),
            ));
        }
        if self.convergence_threshold.is_nan() || self.convergence_threshold < 0.0 {
            return Err(EnigmaError::InvalidParameter(format!(
                "convergence threshold must not be negative, got {}",
                self.convergence_threshold
            )));
        }
        Ok(())
    }

    /// Loads parameters from a JSON file; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&config_str)?)
    }
}
