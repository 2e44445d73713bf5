// File:    lib.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: The main library crate for enigma-core, tying together the cipher machine, the scorers and the search strategies.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # Enigma Core Library
//!
//! This library simulates a rotor cipher machine and recovers its secret
//! configuration (rotor start positions and plugboard wiring) from ciphertext
//! alone, using n-gram language models as the fitness signal.
//!
//! ```
//! use enigma_core::{Alphabet, Enigma, Rotor, Swapper};
//!
//! let alphabet = Alphabet::lowercase();
//! let n = alphabet.len();
//! let rotors = vec![Rotor::new(n, 21), Rotor::new(n, 32)];
//! let plugboard = Swapper::with_random_swaps(n, 2, 41).unwrap();
//! let reflector = Swapper::with_random_swaps(n, n / 2, 3).unwrap();
//! let mut machine = Enigma::new(rotors, plugboard, reflector, alphabet).unwrap();
//!
//! machine.set_rotor_positions(&[3, 4]).unwrap();
//! let ciphertext = machine.encode("attackatdawn").unwrap();
//! machine.set_rotor_positions(&[3, 4]).unwrap();
//! assert_eq!(machine.encode(&ciphertext).unwrap(), "attackatdawn");
//! ```

/// Symbol sets and the symbol/index bijection.
pub mod alphabet;
/// Serializable machine and annealing configuration.
pub mod config;
/// The error type shared by the whole crate.
pub mod error;
/// N-gram log-likelihood tables.
pub mod language_model;
/// The composed cipher machine.
pub mod machine;
/// Odometer-order enumeration of rotor position tuples.
pub mod multiindex;
/// Rotating permutation stages.
pub mod rotor;
/// Text plausibility scorers.
pub mod scoring;
/// Exhaustive, greedy and annealing cryptanalysis.
pub mod search;
/// Involutions used as plugboard and reflector.
pub mod swapper;

pub use alphabet::Alphabet;
pub use config::{AnnealingConfig, MachineConfig};
pub use error::{EnigmaError, ErrorKind, Result};
pub use language_model::NgramTable;
pub use machine::Enigma;
pub use multiindex::MultiIndexIter;
pub use rotor::Rotor;
pub use scoring::{GroupLikelihoodScorer, PairLikelihoodScorer, TextScorer};
pub use search::{
    AnnealingOutcome, BlockStats, CrackResult, Cracker, search_annealing, search_exhaustive,
    search_greedy_plugboard,
};
pub use swapper::Swapper;
