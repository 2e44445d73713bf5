// File:    cracking.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: End-to-end recovery of machine settings from ciphertext with language model scoring.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

#![allow(missing_docs)]

mod common;

use common::{agreement, encrypt, group_table, machine, pair_table, plaintext};
use enigma_core::{
    AnnealingConfig, Cracker, EnigmaError, GroupLikelihoodScorer, PairLikelihoodScorer, Swapper,
    search_annealing, search_exhaustive, search_greedy_plugboard,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_exhaustive_then_greedy_recovers_rotors_and_plugboard() {
    let plugboard = Swapper::with_random_swaps(26, 2, 41).unwrap();
    let mut encoder = machine(&[21, 32], plugboard.clone());
    // The sample message is about 420 symbols. With this corpus, messages
    // shorter than about 200 symbols can settle on a neighbouring rotor
    // position such as [3, 5].
    let ciphertext = encrypt(&mut encoder, &[3, 4]);
    assert!(ciphertext.chars().count() >= 200);

    let scorer = PairLikelihoodScorer::new(pair_table()).unwrap();
    let result = search_greedy_plugboard(&encoder, &ciphertext, 2, &scorer).unwrap();

    assert_eq!(result.rotor_positions, vec![3, 4]);
    assert_eq!(result.plugboard, plugboard);
    assert_eq!(result.plaintext, plaintext());
}

#[test]
fn test_exhaustive_with_trigram_scorer() {
    let mut encoder = machine(&[21, 32], Swapper::new(26));
    let ciphertext = encrypt(&mut encoder, &[17, 9]);

    let scorer = GroupLikelihoodScorer::new(group_table(3)).unwrap();
    let result = search_exhaustive(&encoder, &ciphertext, &scorer).unwrap();

    assert_eq!(result.rotor_positions, vec![17, 9]);
    assert_eq!(result.plaintext, plaintext());
    assert_eq!(result.plugboard.n_swaps(), 0);
}

#[test]
fn test_parallel_search_matches_sequential() {
    let plugboard = Swapper::with_random_swaps(26, 1, 7).unwrap();
    let mut encoder = machine(&[5, 6], plugboard);
    let ciphertext = encrypt(&mut encoder, &[20, 1]);

    let scorer = PairLikelihoodScorer::new(pair_table()).unwrap();
    let sequential = Cracker::new(&encoder, &ciphertext, &scorer).unwrap();
    let parallel = Cracker::new(&encoder, &ciphertext, &scorer).unwrap().parallel(true);

    let rotors = sequential.exhaustive().unwrap();
    assert_eq!(rotors, parallel.exhaustive().unwrap());
    assert_eq!(
        sequential.refine_plugboard(&rotors.rotor_positions, 1).unwrap(),
        parallel.refine_plugboard(&rotors.rotor_positions, 1).unwrap()
    );
}

#[test]
fn test_annealing_recovers_single_rotor() {
    let mut encoder = machine(&[34], Swapper::new(26));
    let text = plaintext();
    let message: String = text.chars().take(200).collect();
    encoder.set_rotor_positions(&[11]).unwrap();
    let ciphertext = encoder.encode(&message).unwrap();

    let scorer = PairLikelihoodScorer::new(pair_table()).unwrap();
    let config = AnnealingConfig {
        max_blocks: 50,
        ..AnnealingConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let outcome =
        search_annealing(&encoder, &ciphertext, 0, &scorer, &config, &mut rng).unwrap();

    assert!(agreement(&outcome.result.plaintext, &message) > 0.85);
    assert!(!outcome.blocks.is_empty());
    assert!(outcome.blocks.len() <= 50);
}

#[test]
fn test_annealing_is_reproducible_with_seed() {
    let plugboard = Swapper::with_random_swaps(26, 2, 41).unwrap();
    let mut encoder = machine(&[21], plugboard);
    let ciphertext = encrypt(&mut encoder, &[8]);

    let scorer = PairLikelihoodScorer::new(pair_table()).unwrap();
    let config = AnnealingConfig {
        block_size: 40,
        max_blocks: 5,
        ..AnnealingConfig::default()
    };
    let first = search_annealing(
        &encoder,
        &ciphertext,
        2,
        &scorer,
        &config,
        &mut StdRng::seed_from_u64(5),
    )
    .unwrap();
    let second = search_annealing(
        &encoder,
        &ciphertext,
        2,
        &scorer,
        &config,
        &mut StdRng::seed_from_u64(5),
    )
    .unwrap();
    assert_eq!(first, second);
    assert_eq!(first.result.plugboard.n_swaps(), 2);
}

#[test]
fn test_ciphertext_shorter_than_window() {
    let encoder = machine(&[21], Swapper::new(26));
    let scorer = GroupLikelihoodScorer::new(group_table(3)).unwrap();
    assert!(matches!(
        search_exhaustive(&encoder, "ab", &scorer),
        Err(EnigmaError::EmptyInput {
            required: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_greedy_rejects_too_many_plugs() {
    let encoder = machine(&[21], Swapper::new(26));
    let scorer = PairLikelihoodScorer::new(pair_table()).unwrap();
    let err = search_greedy_plugboard(&encoder, "hello", 14, &scorer).unwrap_err();
    assert!(matches!(err, EnigmaError::TooManyPlugs { max: 13, .. }));
}
