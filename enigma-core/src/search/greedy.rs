// File:    greedy.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Greedy plug-by-plug plugboard recovery at fixed rotor positions.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use super::{CrackResult, Cracker, first_best};
use crate::error::Result;
use crate::machine::Enigma;
use rayon::prelude::*;

impl Cracker<'_> {
    /// Exhaustive rotor search followed by [`Cracker::refine_plugboard`] at
    /// the best rotor positions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EnigmaError::TooManyPlugs`] before any search work if
    /// `n_plugs` exceeds half the alphabet.
    pub fn greedy(&self, n_plugs: usize) -> Result<CrackResult> {
        self.check_plugs(n_plugs)?;
        let rotors = self.exhaustive()?;
        self.refine_plugboard(&rotors.rotor_positions, n_plugs)
    }

    /// Recovers `n_plugs` plugboard swaps one at a time at fixed rotor
    /// positions.
    ///
    /// Each round tries every pair of still free positions, keeps the best
    /// scoring one for good and moves on. Chosen swaps are never revisited.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EnigmaError::TooManyPlugs`] if `n_plugs` exceeds half
    /// the alphabet, and a configuration error for invalid `positions`.
    pub fn refine_plugboard(&self, positions: &[usize], n_plugs: usize) -> Result<CrackResult> {
        self.check_plugs(n_plugs)?;
        let mut machine = self.machine.clone();
        machine.set_rotor_positions(positions)?;

        for plug in 0..n_plugs {
            let candidates = free_pairs(&machine);
            let best = if self.parallel {
                let scores = candidates
                    .par_iter()
                    .map_init(
                        || machine.clone(),
                        |worker, &(a, b)| self.try_swap(worker, positions, a, b),
                    )
                    .collect::<Result<Vec<f64>>>()?;
                first_best(candidates.iter().copied().zip(scores).map(Ok))?
            } else {
                first_best(candidates.iter().map(|&(a, b)| {
                    let score = self.try_swap(&mut machine, positions, a, b)?;
                    Ok(((a, b), score))
                }))?
            };

            let Some(((a, b), score)) = best else {
                break;
            };
            machine.plugboard_mut().set_swap(a, b)?;
            log::debug!(
                "Plug {} of {n_plugs}: {a}<->{b} out of {} candidates, score {score:.4}.",
                plug + 1,
                candidates.len()
            );
        }

        let result = self.decode(positions, machine.plugboard().clone())?;
        log::info!(
            "Greedy plugboard search installed {:?}, score {:.4}.",
            result.plugboard.pairs(),
            result.score
        );
        Ok(result)
    }

    fn try_swap(
        &self,
        machine: &mut Enigma,
        positions: &[usize],
        a: usize,
        b: usize,
    ) -> Result<f64> {
        machine.plugboard_mut().set_swap(a, b)?;
        let score = self.trial(machine, positions);
        machine.plugboard_mut().unset_swap(a, b)?;
        score
    }
}

/// Unordered pairs `(a, b)` with `a < b` of free plugboard positions. Self
/// pairs are never produced.
fn free_pairs(machine: &Enigma) -> Vec<(usize, usize)> {
    let free = machine.plugboard().free_positions();
    free.iter()
        .enumerate()
        .flat_map(|(i, &a)| free[i + 1..].iter().map(move |&b| (a, b)))
        .collect()
}
