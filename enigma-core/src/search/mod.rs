// File:    mod.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Shared trial machinery and entry points of the cryptanalysis strategies.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Ciphertext-only cryptanalysis.
//!
//! Every strategy follows the same loop: reconfigure a private copy of the
//! machine, decode the ciphertext, score the candidate plaintext and keep
//! what scores best. The analyst is assumed to know the rotor wiring, the
//! reflector and the alphabet; the rotor start positions and the plugboard
//! are recovered.

mod annealing;
mod exhaustive;
mod greedy;

pub use annealing::{AnnealingOutcome, BlockStats};

use crate::config::AnnealingConfig;
use crate::error::{EnigmaError, Result};
use crate::machine::Enigma;
use crate::scoring::TextScorer;
use crate::swapper::Swapper;
use rand::Rng;
use serde::Serialize;

/// A recovered configuration and the text it decodes to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrackResult {
    /// The ciphertext decoded with the recovered configuration.
    pub plaintext: String,
    /// Recovered rotor start positions, entry rotor first.
    pub rotor_positions: Vec<usize>,
    /// Recovered plugboard.
    pub plugboard: Swapper,
    /// Score of `plaintext`.
    pub score: f64,
}

/// Runs the search strategies against one ciphertext.
///
/// The cracker owns a deep copy of the template machine, so the machine the
/// ciphertext came from is never touched.
pub struct Cracker<'a> {
    machine: Enigma,
    ciphertext: Vec<usize>,
    scorer: &'a dyn TextScorer,
    parallel: bool,
}

impl<'a> Cracker<'a> {
    /// Prepares a search.
    ///
    /// Only the rotor wiring, the reflector and the alphabet of `template`
    /// are used; its plugboard and rotor positions are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::UnknownSymbol`] if the ciphertext contains a
    /// symbol outside the alphabet and [`EnigmaError::EmptyInput`] if it is
    /// too short to be scored.
    pub fn new(template: &Enigma, ciphertext: &str, scorer: &'a dyn TextScorer) -> Result<Self> {
        let ciphertext = template.alphabet().to_indices(ciphertext)?;
        let required = scorer.window().max(1);
        if ciphertext.len() < required {
            return Err(EnigmaError::EmptyInput {
                required,
                actual: ciphertext.len(),
            });
        }

        let mut machine = template.clone();
        machine.set_plugboard(Swapper::new(template.alphabet().len()))?;
        machine.set_rotor_positions(&vec![0; template.rotors().len()])?;

        Ok(Self {
            machine,
            ciphertext,
            scorer,
            parallel: false,
        })
    }

    /// Spreads exhaustive and greedy trials over the rayon thread pool.
    ///
    /// Results are identical to the sequential run.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of symbols, which is also the number of positions per rotor.
    #[must_use]
    pub fn n_positions(&self) -> usize {
        self.machine.alphabet().len()
    }

    /// Number of rotors whose positions are searched.
    #[must_use]
    pub fn n_rotors(&self) -> usize {
        self.machine.rotors().len()
    }

    /// Decodes the ciphertext with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `positions` or `plugboard` do not fit
    /// the machine.
    pub fn decode(&self, positions: &[usize], plugboard: Swapper) -> Result<CrackResult> {
        let mut machine = self.machine.clone();
        machine.set_plugboard(plugboard)?;
        machine.set_rotor_positions(positions)?;
        let decoded = machine.encode_indices(&self.ciphertext);
        let plaintext = machine.alphabet().render(&decoded);
        let score = self.scorer.score(&plaintext);
        Ok(CrackResult {
            plaintext,
            rotor_positions: positions.to_vec(),
            plugboard: machine.plugboard().clone(),
            score,
        })
    }

    fn check_plugs(&self, n_plugs: usize) -> Result<()> {
        let n = self.n_positions();
        if n_plugs > n / 2 {
            return Err(EnigmaError::TooManyPlugs {
                requested: n_plugs,
                positions: n,
                max: n / 2,
            });
        }
        Ok(())
    }

    /// Decodes with `machine`'s current plugboard from `positions` and scores
    /// the result.
    fn trial(&self, machine: &mut Enigma, positions: &[usize]) -> Result<f64> {
        machine.set_rotor_positions(positions)?;
        let decoded = machine.encode_indices(&self.ciphertext);
        Ok(self.scorer.score(&machine.alphabet().render(&decoded)))
    }
}

/// The first candidate with the strictly highest score.
fn first_best<T>(
    candidates: impl IntoIterator<Item = Result<(T, f64)>>,
) -> Result<Option<(T, f64)>> {
    let mut best: Option<(T, f64)> = None;
    for candidate in candidates {
        let (value, score) = candidate?;
        if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
            best = Some((value, score));
        }
    }
    Ok(best)
}

/// Tries every rotor position tuple with an empty plugboard.
///
/// # Errors
///
/// See [`Cracker::new`] and [`Cracker::exhaustive`].
pub fn search_exhaustive(
    template: &Enigma,
    ciphertext: &str,
    scorer: &dyn TextScorer,
) -> Result<CrackResult> {
    Cracker::new(template, ciphertext, scorer)?.exhaustive()
}

/// Exhaustive rotor search followed by greedy plugboard refinement at the
/// best rotor positions.
///
/// # Errors
///
/// See [`Cracker::new`] and [`Cracker::greedy`].
pub fn search_greedy_plugboard(
    template: &Enigma,
    ciphertext: &str,
    n_plugs: usize,
    scorer: &dyn TextScorer,
) -> Result<CrackResult> {
    Cracker::new(template, ciphertext, scorer)?.greedy(n_plugs)
}

/// Joint annealing search over rotor positions and plugboard swaps.
///
/// # Errors
///
/// See [`Cracker::new`] and [`Cracker::anneal`].
pub fn search_annealing<R: Rng + ?Sized>(
    template: &Enigma,
    ciphertext: &str,
    n_plugs: usize,
    scorer: &dyn TextScorer,
    config: &AnnealingConfig,
    rng: &mut R,
) -> Result<AnnealingOutcome> {
    Cracker::new(template, ciphertext, scorer)?.anneal(n_plugs, config, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::rotor::Rotor;

    /// Rewards the letter `e`, so the best decode is the one with most `e`s.
    struct CountE;

    impl TextScorer for CountE {
        fn score(&self, text: &str) -> f64 {
            text.chars().filter(|&c| c == 'e').count() as f64
        }

        fn window(&self) -> usize {
            1
        }
    }

    fn template() -> Enigma {
        let n = 26;
        Enigma::new(
            vec![Rotor::new(n, 21)],
            Swapper::with_random_swaps(n, 4, 41).unwrap(),
            Swapper::with_random_swaps(n, 13, 3).unwrap(),
            Alphabet::lowercase(),
        )
        .unwrap()
    }

    #[test]
    fn test_first_best_keeps_earliest_tie() {
        let best = first_best(vec![Ok(("a", 1.0)), Ok(("b", 3.0)), Ok(("c", 3.0))]).unwrap();
        assert_eq!(best, Some(("b", 3.0)));
        assert_eq!(first_best(Vec::<Result<(u8, f64)>>::new()).unwrap(), None);
    }

    #[test]
    fn test_cracker_ignores_template_plugboard() {
        let machine = template();
        let cracker = Cracker::new(&machine, "hello", &CountE).unwrap();
        let result = cracker.decode(&[0], Swapper::new(26)).unwrap();
        assert_eq!(result.plugboard, Swapper::new(26));
        assert_eq!(machine.plugboard().n_swaps(), 4);
    }

    #[test]
    fn test_rejects_bad_ciphertext() {
        let machine = template();
        assert!(matches!(
            Cracker::new(&machine, "", &CountE),
            Err(EnigmaError::EmptyInput { required: 1, actual: 0 })
        ));
        assert!(matches!(
            Cracker::new(&machine, "ab1", &CountE),
            Err(EnigmaError::UnknownSymbol('1'))
        ));
    }

    #[test]
    fn test_too_many_plugs_fails_before_search() {
        let machine = template();
        assert!(matches!(
            search_greedy_plugboard(&machine, "hello", 14, &CountE),
            Err(EnigmaError::TooManyPlugs { requested: 14, .. })
        ));
    }
}
