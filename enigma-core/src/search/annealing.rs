// File:    annealing.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Constant-temperature Metropolis search over rotor positions and plugboard swaps.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use super::{CrackResult, Cracker};
use crate::config::AnnealingConfig;
use crate::error::{EnigmaError, Result};
use crate::machine::Enigma;
use crate::swapper::Swapper;
use rand::Rng;
use serde::Serialize;

/// Summary of one block of annealing iterations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockStats {
    /// Zero-based block number.
    pub block: usize,
    /// Mean of the running score over the block's iterations.
    pub mean_score: f64,
    /// Accepted share of rotor moves, `None` if none were proposed.
    pub rotor_acceptance: Option<f64>,
    /// Accepted share of plugboard moves, `None` if none were proposed.
    pub plug_acceptance: Option<f64>,
}

/// Result of an annealing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnealingOutcome {
    /// The best configuration seen during the run.
    pub result: CrackResult,
    /// Per-block statistics, in order.
    pub blocks: Vec<BlockStats>,
    /// Whether the block means settled before `max_blocks` ran out.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
enum Move {
    Rotor { rotor: usize, previous: usize },
    Plug { from: usize, to: usize },
}

#[derive(Debug, Default)]
struct MoveCounters {
    rotor_proposed: usize,
    rotor_accepted: usize,
    plug_proposed: usize,
    plug_accepted: usize,
}

impl MoveCounters {
    fn record(&mut self, proposal: Move, accepted: bool) {
        match proposal {
            Move::Rotor { .. } => {
                self.rotor_proposed += 1;
                self.rotor_accepted += usize::from(accepted);
            }
            Move::Plug { .. } => {
                self.plug_proposed += 1;
                self.plug_accepted += usize::from(accepted);
            }
        }
    }

    fn rate(accepted: usize, proposed: usize) -> Option<f64> {
        (proposed > 0).then(|| accepted as f64 / proposed as f64)
    }
}

/// The live configuration of the walk.
struct Walk {
    machine: Enigma,
    positions: Vec<usize>,
    can_rotate: bool,
    can_plug: bool,
}

impl Walk {
    fn propose<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Move> {
        let n = self.machine.alphabet().len();
        if self.can_plug && (!self.can_rotate || rng.random_bool(0.5)) {
            let swapped = self.machine.plugboard().swapped_positions();
            let free = self.machine.plugboard().free_positions();
            let from = swapped[rng.random_range(0..swapped.len())];
            let to = free[rng.random_range(0..free.len())];
            self.machine.plugboard_mut().move_swap_endpoint(from, to)?;
            Ok(Move::Plug { from, to })
        } else {
            let rotor = rng.random_range(0..self.positions.len());
            let previous = self.positions[rotor];
            let step = if rng.random_bool(0.5) { 1 } else { n - 1 };
            self.positions[rotor] = (previous + step) % n;
            Ok(Move::Rotor { rotor, previous })
        }
    }

    fn undo(&mut self, proposal: Move) -> Result<()> {
        match proposal {
            Move::Rotor { rotor, previous } => self.positions[rotor] = previous,
            Move::Plug { from, to } => self.machine.plugboard_mut().move_swap_endpoint(to, from)?,
        }
        Ok(())
    }
}

impl Cracker<'_> {
    /// Searches rotor positions and `n_plugs` plugboard swaps jointly with
    /// the Metropolis rule at a constant temperature.
    ///
    /// The walk starts from random positions and a random plugboard. Each
    /// iteration nudges one rotor by one step or moves one end of one swap to
    /// a free position. Improvements are always kept; a worse score is kept
    /// with probability `exp(delta / temperature)`. The run stops when the
    /// mean scores of two consecutive blocks differ by less than the
    /// convergence threshold, or after `max_blocks` blocks.
    ///
    /// # Errors
    ///
    /// Returns [`EnigmaError::TooManyPlugs`] or
    /// [`EnigmaError::InvalidParameter`] for unusable settings, including a
    /// machine with no rotors and no movable plugs.
    pub fn anneal<R: Rng + ?Sized>(
        &self,
        n_plugs: usize,
        config: &AnnealingConfig,
        rng: &mut R,
    ) -> Result<AnnealingOutcome> {
        self.check_plugs(n_plugs)?;
        config.validate()?;
        let n = self.n_positions();
        let mut walk = Walk {
            machine: self.machine.clone(),
            positions: (0..self.n_rotors()).map(|_| rng.random_range(0..n)).collect(),
            can_rotate: self.n_rotors() > 0,
            can_plug: n_plugs > 0 && 2 * n_plugs < n,
        };
        if !(walk.can_rotate || walk.can_plug) {
            return Err(EnigmaError::InvalidParameter(
                "no rotors and no movable plugs to search".to_string(),
            ));
        }
        walk.machine
            .set_plugboard(Swapper::with_random_swaps(n, n_plugs, rng.random())?)?;

        let mut score = self.trial(&mut walk.machine, &walk.positions)?;
        let mut best = (walk.positions.clone(), walk.machine.plugboard().clone(), score);
        let mut blocks: Vec<BlockStats> = Vec::new();
        let mut converged = false;

        for block in 0..config.max_blocks {
            let mut counters = MoveCounters::default();
            let mut score_sum = 0.0;
            for _ in 0..config.block_size {
                let proposal = walk.propose(rng)?;
                let candidate = self.trial(&mut walk.machine, &walk.positions)?;
                let accepted = candidate >= score
                    || rng.random::<f64>() < ((candidate - score) / config.temperature).exp();
                counters.record(proposal, accepted);
                if accepted {
                    score = candidate;
                    if score > best.2 {
                        best = (walk.positions.clone(), walk.machine.plugboard().clone(), score);
                    }
                } else {
                    walk.undo(proposal)?;
                }
                score_sum += score;
            }

            let stats = BlockStats {
                block,
                mean_score: score_sum / config.block_size as f64,
                rotor_acceptance: MoveCounters::rate(
                    counters.rotor_accepted,
                    counters.rotor_proposed,
                ),
                plug_acceptance: MoveCounters::rate(
                    counters.plug_accepted,
                    counters.plug_proposed,
                ),
            };
            log::info!(
                "Annealing block {block}: mean score {:.4}, \
                 rotor acceptance {}, plug acceptance {}.",
                stats.mean_score,
                format_rate(stats.rotor_acceptance),
                format_rate(stats.plug_acceptance)
            );
            let settled = blocks.last().is_some_and(|previous| {
                (stats.mean_score - previous.mean_score).abs() < config.convergence_threshold
            });
            blocks.push(stats);
            if settled {
                converged = true;
                break;
            }
        }

        if !converged {
            log::warn!(
                "Annealing stopped after {} blocks without converging.",
                config.max_blocks
            );
        }
        let (positions, plugboard, _) = best;
        let result = self.decode(&positions, plugboard)?;
        Ok(AnnealingOutcome {
            result,
            blocks,
            converged,
        })
    }
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| "n/a".to_string(), |rate| format!("{:.1}%", rate * 100.0))
}
