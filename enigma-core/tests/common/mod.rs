// File:    mod.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Shared machines, sample text and language models for the integration tests.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

#![allow(dead_code)]

use enigma_core::{Alphabet, Enigma, NgramTable, Rotor, Swapper};

/// English sample text the language models are counted from.
pub(crate) const CORPUS: &str = include_str!("../data/corpus.txt");

/// A message that does not occur in the corpus.
pub(crate) const MESSAGE: &str = concat!(
    "the enigma machine is a cipher device developed and used in the early to mid twentieth century ",
    "to protect commercial diplomatic and military communication it was employed extensively by nazi germany ",
    "during world war two in all branches of the german military the enigma has an electromechanical rotor ",
    "mechanism that scrambles the twenty six letters of the alphabet in typical use one person enters text ",
    "on the keyboard and another person writes down which of the lights above the keyboard illuminates",
);

/// [`MESSAGE`] without spaces, ready to be encoded.
pub(crate) fn plaintext() -> String {
    Alphabet::lowercase().normalize(MESSAGE)
}

/// A lowercase machine with one rotor per seed and a full reflector.
pub(crate) fn machine(rotor_seeds: &[u64], plugboard: Swapper) -> Enigma {
    let alphabet = Alphabet::lowercase();
    let n = alphabet.len();
    Enigma::new(
        rotor_seeds.iter().map(|&seed| Rotor::new(n, seed)).collect(),
        plugboard,
        Swapper::with_random_swaps(n, n / 2, 3).unwrap(),
        alphabet,
    )
    .unwrap()
}

/// Encodes [`plaintext`] from `positions`.
pub(crate) fn encrypt(machine: &mut Enigma, positions: &[usize]) -> String {
    machine.set_rotor_positions(positions).unwrap();
    machine.encode(&plaintext()).unwrap()
}

/// Conditional pair probabilities of the corpus.
pub(crate) fn pair_table() -> NgramTable {
    NgramTable::pair_transitions(&Alphabet::lowercase(), CORPUS).unwrap()
}

/// Joint group probabilities of the corpus.
pub(crate) fn group_table(order: usize) -> NgramTable {
    NgramTable::from_corpus(&Alphabet::lowercase(), CORPUS, order).unwrap()
}

/// Share of positions where `a` and `b` agree.
pub(crate) fn agreement(a: &str, b: &str) -> f64 {
    let matches = a.chars().zip(b.chars()).filter(|(x, y)| x == y).count();
    matches as f64 / a.chars().count().max(1) as f64
}
