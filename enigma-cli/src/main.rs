// File:    main.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Command-line front end for encoding messages and cracking ciphertexts.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

#![deny(missing_docs)]
//! A command-line interface for the rotor cipher machine and its cryptanalysis.

use clap::{Parser, Subcommand, ValueEnum};
use enigma_core::{
    Alphabet, AnnealingConfig, BlockStats, CrackResult, Cracker, Enigma, GroupLikelihoodScorer,
    MachineConfig, NgramTable, PairLikelihoodScorer, TextScorer,
};
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Environment variable consulted when `--machine` is not given.
const MACHINE_ENV: &str = "ENIGMA_MACHINE";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Encode a message with rotors at 3, 4 and 7\nenigma-cli encode ./message.txt --positions 3,4,7\n\n# Decode it again, checking the ciphertext against its metadata\nenigma-cli decode --input ./message.txt.enc --output ./message.out --positions 3,4,7 --metadata ./message.txt.enc.metadata.json\n\n# Build a pair transition model from sample text\nenigma-cli stats --corpus ./books.txt --output ./pairs.json --transitions\n\n# Recover rotor positions and 10 plugs\nenigma-cli crack --input ./message.txt.enc --model ./pairs.json --strategy greedy --plugs 10 --parallel\n\n# Use a machine other than the default one\nenigma-cli --machine ./machine.json crack --input ./intercept.txt --model ./pairs.json"
)]
struct Cli {
    /// Path to a JSON machine configuration. Falls back to $ENIGMA_MACHINE, then to the built-in machine.
    #[arg(long, global = true)]
    machine: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a text file
    Encode {
        /// Path to the plaintext. Characters outside the alphabet are dropped.
        #[arg()]
        input: PathBuf,

        /// Rotor start positions, entry rotor first, separated by commas.
        #[arg(short, long, value_delimiter = ',', required = true)]
        positions: Vec<usize>,

        /// Path to the ciphertext. If omitted, uses the input filename with a .enc extension.
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,
    },
    /// Decode a ciphertext with known rotor positions
    Decode {
        /// Path to the ciphertext
        #[arg(short, long)]
        input: PathBuf,

        /// Path to save the decoded text
        #[arg(short, long)]
        output: PathBuf,

        /// Rotor start positions used for encoding, separated by commas.
        #[arg(short, long, value_delimiter = ',', required = true)]
        positions: Vec<usize>,

        /// Path to the ciphertext metadata file. The ciphertext is verified against it.
        #[arg(long, value_name = "METADATA_FILE")]
        metadata: Option<PathBuf>,
    },
    /// Build an n-gram language model from sample text
    Stats {
        /// Path to the sample text
        #[arg(short, long)]
        corpus: PathBuf,

        /// Path to save the model as JSON
        #[arg(short, long)]
        output: PathBuf,

        /// Group width of the joint frequency table
        #[arg(long, default_value_t = 2)]
        order: usize,

        /// Build conditional next-symbol probabilities instead of joint frequencies
        #[arg(long)]
        transitions: bool,
    },
    /// Recover the machine settings of a ciphertext
    Crack {
        /// Path to the ciphertext
        #[arg(short, long)]
        input: PathBuf,

        /// Path to a language model written by 'stats'
        #[arg(short, long)]
        model: PathBuf,

        /// The search to run
        #[arg(long, value_enum, default_value_t = Strategy::Greedy)]
        strategy: Strategy,

        /// How candidate plaintexts are scored
        #[arg(long, value_enum, default_value_t = ScorerKind::Pair)]
        scorer: ScorerKind,

        /// Number of plugboard swaps to recover
        #[arg(long, default_value_t = 0)]
        plugs: usize,

        /// Seed for the annealing walk. A random seed is drawn and logged if omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Path to a JSON annealing configuration. Missing fields take their defaults.
        #[arg(long, value_name = "CONFIG_FILE")]
        anneal_config: Option<PathBuf>,

        /// Spread exhaustive and greedy trials over all cores
        #[arg(long)]
        parallel: bool,

        /// Path to save a JSON report of the result
        #[arg(long, value_name = "REPORT_FILE")]
        report: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum Strategy {
    /// Every rotor position tuple, empty plugboard
    Exhaustive,
    /// Exhaustive rotor search, then plugs one at a time
    Greedy,
    /// Joint annealing over rotors and plugs
    Anneal,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum ScorerKind {
    /// Mean pair log-likelihood, needs an order 2 model
    Pair,
    /// Mean group log-likelihood with a penalty for unknown groups
    Group,
}

/// Metadata stored alongside the ciphertext.
#[derive(Serialize, Deserialize)]
struct CiphertextMetadata {
    message_id: String,
    rotor_count: usize,
    length: usize,
    ciphertext_hash: String,
}

/// Everything `crack` found, as written to `--report`.
#[derive(Serialize)]
struct CrackReport {
    strategy: Strategy,
    scorer: ScorerKind,
    rotor_positions: Vec<usize>,
    plugboard: Vec<String>,
    score: f64,
    plaintext: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    converged: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    blocks: Vec<BlockStats>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let mut machine = load_machine(cli.machine.as_deref());

    match cli.command {
        Commands::Encode {
            input,
            positions,
            output,
        } => {
            let output = output.unwrap_or_else(|| {
                let mut new_path = input.as_os_str().to_owned();
                new_path.push(".enc");
                PathBuf::from(new_path)
            });
            encode(&mut machine, &input, &output, &positions);
        }
        Commands::Decode {
            input,
            output,
            positions,
            metadata,
        } => decode(&mut machine, &input, &output, &positions, metadata.as_deref()),
        Commands::Stats {
            corpus,
            output,
            order,
            transitions,
        } => stats(machine.alphabet(), &corpus, &output, order, transitions),
        Commands::Crack {
            input,
            model,
            strategy,
            scorer,
            plugs,
            seed,
            anneal_config,
            parallel,
            report,
        } => {
            let options = CrackOptions {
                strategy,
                scorer,
                plugs,
                seed,
                anneal_config,
                parallel,
            };
            crack(&machine, &input, &model, &options, report.as_deref());
        }
    }
}

/// Logs `message` and terminates with status 1.
fn fail(message: &str) -> ! {
    error!("{message}");
    std::process::exit(1);
}

fn load_machine(flag: Option<&Path>) -> Enigma {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(MACHINE_ENV).map(PathBuf::from));
    let config = match path {
        Some(path) => {
            info!("Loading machine configuration from '{}'.", path.display());
            MachineConfig::load(&path).unwrap_or_else(|e| {
                fail(&format!(
                    "Failed to load machine configuration '{}': {e}",
                    path.display()
                ))
            })
        }
        None => {
            info!("Using the built-in machine configuration.");
            MachineConfig::default()
        }
    };
    config
        .build()
        .unwrap_or_else(|e| fail(&format!("Invalid machine configuration: {e}")))
}

fn read_text(path: &Path, what: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Failed to read {what} '{}': {e}", path.display())))
}

/// Reads a ciphertext file, ignoring a trailing line break.
fn read_ciphertext(path: &Path) -> String {
    read_text(path, "ciphertext")
        .trim_end_matches(['\r', '\n'])
        .to_string()
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn run_machine(machine: &mut Enigma, positions: &[usize], text: &str) -> String {
    machine
        .set_rotor_positions(positions)
        .unwrap_or_else(|e| fail(&format!("Invalid rotor positions: {e}")));
    machine
        .encode(text)
        .unwrap_or_else(|e| fail(&format!("Failed to run the machine: {e}")))
}

fn encode(machine: &mut Enigma, input: &Path, output: &Path, positions: &[usize]) {
    let plaintext = machine.alphabet().normalize(&read_text(input, "input file"));
    if plaintext.is_empty() {
        fail(&format!(
            "Input file '{}' contains no symbols of the alphabet.",
            input.display()
        ));
    }
    info!(
        "Encoding {} symbols from '{}' at rotor positions {positions:?}.",
        plaintext.chars().count(),
        input.display()
    );
    let ciphertext = run_machine(machine, positions, &plaintext);
    fs::write(output, &ciphertext)
        .unwrap_or_else(|e| fail(&format!("Failed to write output file: {e}")));

    let metadata = CiphertextMetadata {
        message_id: Uuid::new_v4().to_string(),
        rotor_count: machine.rotors().len(),
        length: ciphertext.chars().count(),
        ciphertext_hash: sha256_hex(ciphertext.as_bytes()),
    };
    let metadata_path = format!("{}.metadata.json", output.display());
    let metadata_str = serde_json::to_string_pretty(&metadata)
        .unwrap_or_else(|e| fail(&format!("Failed to serialize metadata: {e}")));
    fs::write(&metadata_path, metadata_str)
        .unwrap_or_else(|e| fail(&format!("Failed to write metadata file: {e}")));

    println!("{}", metadata.message_id);
    info!(
        "Encoded '{}' to '{}', metadata saved to '{metadata_path}'.",
        input.display(),
        output.display()
    );
}

fn decode(
    machine: &mut Enigma,
    input: &Path,
    output: &Path,
    positions: &[usize],
    metadata: Option<&Path>,
) {
    let ciphertext = read_ciphertext(input);
    if let Some(meta_path) = metadata {
        let meta: CiphertextMetadata = serde_json::from_str(&read_text(meta_path, "metadata file"))
            .unwrap_or_else(|e| fail(&format!("Failed to parse metadata file: {e}")));
        if sha256_hex(ciphertext.as_bytes()) != meta.ciphertext_hash {
            fail("Ciphertext hash does not match metadata hash. The file may be corrupt or tampered with. Aborting.");
        }
        if meta.rotor_count != machine.rotors().len() {
            fail(&format!(
                "Message '{}' was encoded with {} rotors, but the machine has {}.",
                meta.message_id,
                meta.rotor_count,
                machine.rotors().len()
            ));
        }
        info!("Ciphertext matches message '{}'.", meta.message_id);
    }

    let plaintext = run_machine(machine, positions, &ciphertext);
    fs::write(output, plaintext)
        .unwrap_or_else(|e| fail(&format!("Failed to write output file: {e}")));
    println!(
        "Successfully decoded '{}' to '{}'",
        input.display(),
        output.display()
    );
}

fn stats(alphabet: &Alphabet, corpus: &Path, output: &Path, order: usize, transitions: bool) {
    let text = read_text(corpus, "corpus");
    let table = if transitions {
        if order != 2 {
            warn!("Transition models always have order 2; ignoring --order {order}.");
        }
        NgramTable::pair_transitions(alphabet, &text)
    } else {
        NgramTable::from_corpus(alphabet, &text, order)
    }
    .unwrap_or_else(|e| fail(&format!("Failed to build language model: {e}")));

    table
        .save(output)
        .unwrap_or_else(|e| fail(&format!("Failed to save language model: {e}")));
    println!(
        "Saved {} groups of order {} to '{}'",
        table.len(),
        table.order(),
        output.display()
    );
}

/// Search settings of the `crack` command.
struct CrackOptions {
    strategy: Strategy,
    scorer: ScorerKind,
    plugs: usize,
    seed: Option<u64>,
    anneal_config: Option<PathBuf>,
    parallel: bool,
}

fn build_scorer(kind: ScorerKind, table: NgramTable) -> Box<dyn TextScorer> {
    match kind {
        ScorerKind::Pair => Box::new(
            PairLikelihoodScorer::new(table)
                .unwrap_or_else(|e| fail(&format!("Unusable model for pair scoring: {e}"))),
        ),
        ScorerKind::Group => Box::new(
            GroupLikelihoodScorer::new(table)
                .unwrap_or_else(|e| fail(&format!("Unusable model for group scoring: {e}"))),
        ),
    }
}

fn crack(
    machine: &Enigma,
    input: &Path,
    model: &Path,
    options: &CrackOptions,
    report: Option<&Path>,
) {
    let ciphertext = read_ciphertext(input);
    let table = NgramTable::load(model).unwrap_or_else(|e| {
        fail(&format!(
            "Failed to load language model '{}': {e}",
            model.display()
        ))
    });
    let scorer = build_scorer(options.scorer, table);
    let cracker = Cracker::new(machine, &ciphertext, scorer.as_ref())
        .unwrap_or_else(|e| fail(&format!("Cannot search this ciphertext: {e}")))
        .parallel(options.parallel);

    info!(
        "Cracking {} symbols with the {:?} strategy.",
        ciphertext.chars().count(),
        options.strategy
    );
    let mut seed = None;
    let mut converged = None;
    let mut blocks = Vec::new();
    let outcome = match options.strategy {
        Strategy::Exhaustive => {
            if options.plugs > 0 {
                warn!("The exhaustive strategy leaves the plugboard empty; ignoring --plugs.");
            }
            cracker.exhaustive()
        }
        Strategy::Greedy => cracker.greedy(options.plugs),
        Strategy::Anneal => {
            let config = options.anneal_config.as_deref().map_or_else(
                AnnealingConfig::default,
                |path| {
                    AnnealingConfig::load(path).unwrap_or_else(|e| {
                        fail(&format!("Failed to load annealing configuration: {e}"))
                    })
                },
            );
            let walk_seed = options.seed.unwrap_or_else(rand::random);
            info!("Annealing with seed {walk_seed}.");
            seed = Some(walk_seed);
            cracker
                .anneal(options.plugs, &config, &mut StdRng::seed_from_u64(walk_seed))
                .map(|outcome| {
                    converged = Some(outcome.converged);
                    blocks = outcome.blocks;
                    outcome.result
                })
        }
    };
    let result = outcome.unwrap_or_else(|e| fail(&format!("Search failed: {e}")));

    let plugboard = plug_labels(machine.alphabet(), &result);
    println!("{}", result.plaintext);
    println!(
        "Rotor positions: {}",
        result
            .rotor_positions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    );
    println!("Plugboard: {}", plugboard.join(" "));
    println!("Score: {:.4}", result.score);

    if let Some(report_path) = report {
        let report = CrackReport {
            strategy: options.strategy,
            scorer: options.scorer,
            rotor_positions: result.rotor_positions,
            plugboard,
            score: result.score,
            plaintext: result.plaintext,
            seed,
            converged,
            blocks,
        };
        let report_str = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| fail(&format!("Failed to serialize report: {e}")));
        fs::write(report_path, report_str)
            .unwrap_or_else(|e| fail(&format!("Failed to write report file: {e}")));
        info!("Report saved to '{}'.", report_path.display());
    }
}

/// Installed plugs as two-symbol labels such as `"ab"`.
fn plug_labels(alphabet: &Alphabet, result: &CrackResult) -> Vec<String> {
    result
        .plugboard
        .pairs()
        .into_iter()
        .filter_map(|(a, b)| Some([alphabet.symbol(a)?, alphabet.symbol(b)?].iter().collect()))
        .collect()
}
