// File:    exhaustive.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Exhaustive search over every rotor start position tuple.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use super::{CrackResult, Cracker, first_best};
use crate::error::{EnigmaError, Result};
use crate::multiindex::MultiIndexIter;
use crate::swapper::Swapper;
use rayon::prelude::*;

impl Cracker<'_> {
    /// Scores every rotor position tuple with an empty plugboard and returns
    /// the best one. Ties go to the tuple that comes first in odometer order.
    ///
    /// The cost is `N^D` full decodes for `D` rotors.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::InvalidParameter`] if `N^D` overflows.
    pub fn exhaustive(&self) -> Result<CrackResult> {
        let tuples = MultiIndexIter::new(self.n_rotors(), self.n_positions())?;
        let total = tuples.len();
        log::debug!(
            "Exhaustive rotor search over {total} position tuples ({} rotors).",
            self.n_rotors()
        );

        let best = if self.parallel {
            let scores = (0..total)
                .into_par_iter()
                .map_init(
                    || self.machine.clone(),
                    |machine, linear| {
                        let positions = tuples.tuple_at(linear).ok_or(
                            EnigmaError::PositionOutOfRange {
                                position: linear,
                                positions: total,
                            },
                        )?;
                        self.trial(machine, &positions)
                    },
                )
                .collect::<Result<Vec<f64>>>()?;
            first_best(scores.into_iter().enumerate().map(Ok))?
                .and_then(|(linear, score)| Some((tuples.tuple_at(linear)?, score)))
        } else {
            let mut machine = self.machine.clone();
            first_best(tuples.map(|positions| {
                let score = self.trial(&mut machine, &positions)?;
                Ok((positions, score))
            }))?
        };

        // An empty position space cannot happen for a non-empty alphabet.
        let Some((positions, score)) = best else {
            return Err(EnigmaError::InvalidParameter(
                "no rotor positions to search".to_string(),
            ));
        };
        log::info!("Best rotor positions {positions:?} with score {score:.4}.");
        self.decode(&positions, Swapper::new(self.n_positions()))
    }
}
