// File:    cli_workflow.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: End-to-end tests of the encode, decode, stats and crack commands.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

#![allow(missing_docs)]
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const CORPUS: &str = include_str!("../../enigma-core/tests/data/corpus.txt");

const MESSAGE: &str = "Rotor machines scramble every letter with a different alphabet, \
    so counting letters alone does not reveal the message. The settings still leave \
    patterns behind, and a patient analyst who knows how the language usually flows \
    can test each setting in turn until the text starts to read like ordinary words.";

fn enigma_cli() -> Command {
    let mut cmd = Command::cargo_bin("enigma-cli").expect("Failed to find enigma-cli binary");
    cmd.env_remove("ENIGMA_MACHINE");
    cmd
}

fn normalized_message() -> String {
    MESSAGE
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A two rotor machine without plugs, small enough to search quickly.
fn write_small_machine(path: &Path) {
    fs::write(
        path,
        r#"{
  "alphabet": "abcdefghijklmnopqrstuvwxyz",
  "rotor_seeds": [21, 32],
  "reflector_seed": 3,
  "plugs": 0,
  "plugboard_seed": 41
}"#,
    )
    .unwrap();
}

#[test]
fn test_encode_decode_roundtrip() {
    // 1. Setup
    let temp_dir = tempdir().unwrap();
    let input_path = temp_dir.path().join("message.txt");
    let encoded_path = temp_dir.path().join("message.enc");
    let metadata_path = temp_dir.path().join("message.enc.metadata.json");
    let decoded_path = temp_dir.path().join("message.out");
    fs::write(&input_path, MESSAGE).unwrap();

    // 2. Encode with the default machine and capture the message id
    let output = enigma_cli()
        .arg("encode")
        .arg(&input_path)
        .arg("--positions")
        .arg("3,4,7")
        .arg("--output")
        .arg(&encoded_path)
        .output()
        .expect("Failed to execute encode");
    assert!(output.status.success());
    let message_id = String::from_utf8(output.stdout).unwrap().trim().to_string();
    assert_eq!(message_id.len(), 36, "Message id should be a UUID");

    let ciphertext = fs::read_to_string(&encoded_path).unwrap();
    assert_eq!(ciphertext.len(), normalized_message().len());
    assert_ne!(ciphertext, normalized_message());

    let metadata: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&metadata_path).unwrap()).unwrap();
    assert_eq!(metadata["message_id"], message_id.as_str());
    assert_eq!(metadata["rotor_count"], 3);
    assert_eq!(metadata["length"], ciphertext.len());

    // 3. Decode with the metadata check
    enigma_cli()
        .arg("decode")
        .arg("--input")
        .arg(&encoded_path)
        .arg("--output")
        .arg(&decoded_path)
        .arg("--positions")
        .arg("3,4,7")
        .arg("--metadata")
        .arg(&metadata_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully decoded"));
    assert_eq!(fs::read_to_string(&decoded_path).unwrap(), normalized_message());
}

#[test]
fn test_decode_rejects_tampered_ciphertext() {
    let temp_dir = tempdir().unwrap();
    let input_path = temp_dir.path().join("message.txt");
    let encoded_path = temp_dir.path().join("message.txt.enc");
    let metadata_path = temp_dir.path().join("message.txt.enc.metadata.json");
    let decoded_path = temp_dir.path().join("message.out");
    fs::write(&input_path, MESSAGE).unwrap();

    // Without --output the ciphertext lands next to the input
    enigma_cli()
        .arg("encode")
        .arg(&input_path)
        .arg("-p")
        .arg("0,0,0")
        .assert()
        .success();
    assert!(metadata_path.exists());

    let mut ciphertext = fs::read_to_string(&encoded_path).unwrap();
    let last = ciphertext.pop().unwrap();
    ciphertext.push(if last == 'a' { 'b' } else { 'a' });
    fs::write(&encoded_path, ciphertext).unwrap();

    enigma_cli()
        .arg("decode")
        .arg("-i")
        .arg(&encoded_path)
        .arg("-o")
        .arg(&decoded_path)
        .arg("-p")
        .arg("0,0,0")
        .arg("--metadata")
        .arg(&metadata_path)
        .assert()
        .failure();
    assert!(!decoded_path.exists());
}

#[test]
fn test_wrong_position_count_fails() {
    let temp_dir = tempdir().unwrap();
    let input_path = temp_dir.path().join("message.txt");
    fs::write(&input_path, MESSAGE).unwrap();

    enigma_cli()
        .arg("encode")
        .arg(&input_path)
        .arg("--positions")
        .arg("1,2")
        .assert()
        .failure();
}

#[test]
fn test_stats_writes_model() {
    let temp_dir = tempdir().unwrap();
    let corpus_path = temp_dir.path().join("corpus.txt");
    let joint_path = temp_dir.path().join("trigrams.json");
    let pairs_path = temp_dir.path().join("pairs.json");
    fs::write(&corpus_path, CORPUS).unwrap();

    enigma_cli()
        .arg("stats")
        .arg("--corpus")
        .arg(&corpus_path)
        .arg("--output")
        .arg(&joint_path)
        .arg("--order")
        .arg("3")
        .assert()
        .success()
        .stdout(predicate::str::contains("of order 3"));
    let joint: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&joint_path).unwrap()).unwrap();
    assert_eq!(joint["order"], 3);
    assert!(joint["log_probs"]["the"].is_number());

    enigma_cli()
        .arg("stats")
        .arg("-c")
        .arg(&corpus_path)
        .arg("-o")
        .arg(&pairs_path)
        .arg("--transitions")
        .assert()
        .success()
        .stdout(predicate::str::contains("of order 2"));
    assert!(pairs_path.exists());
}

#[test]
fn test_crack_recovers_positions() {
    // 1. Setup a small machine and a pair model
    let temp_dir = tempdir().unwrap();
    let machine_path = temp_dir.path().join("machine.json");
    let corpus_path = temp_dir.path().join("corpus.txt");
    let model_path = temp_dir.path().join("pairs.json");
    let input_path = temp_dir.path().join("message.txt");
    let encoded_path = temp_dir.path().join("message.enc");
    let report_path = temp_dir.path().join("report.json");
    write_small_machine(&machine_path);
    fs::write(&corpus_path, CORPUS).unwrap();
    fs::write(&input_path, MESSAGE).unwrap();

    enigma_cli()
        .arg("stats")
        .arg("--corpus")
        .arg(&corpus_path)
        .arg("--output")
        .arg(&model_path)
        .arg("--transitions")
        .assert()
        .success();

    // 2. Encode through the environment variable instead of --machine
    enigma_cli()
        .env("ENIGMA_MACHINE", &machine_path)
        .arg("encode")
        .arg(&input_path)
        .arg("--positions")
        .arg("12,5")
        .arg("--output")
        .arg(&encoded_path)
        .assert()
        .success();

    // 3. Crack it
    enigma_cli()
        .arg("--machine")
        .arg(&machine_path)
        .arg("crack")
        .arg("--input")
        .arg(&encoded_path)
        .arg("--model")
        .arg(&model_path)
        .arg("--strategy")
        .arg("exhaustive")
        .arg("--parallel")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(normalized_message()))
        .stdout(predicate::str::contains("Rotor positions: 12,5"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["strategy"], "exhaustive");
    assert_eq!(report["scorer"], "pair");
    assert_eq!(report["rotor_positions"], serde_json::json!([12, 5]));
    assert_eq!(report["plugboard"], serde_json::json!([]));
}

#[test]
fn test_crack_rejects_too_many_plugs() {
    let temp_dir = tempdir().unwrap();
    let corpus_path = temp_dir.path().join("corpus.txt");
    let model_path = temp_dir.path().join("pairs.json");
    let encoded_path = temp_dir.path().join("message.enc");
    fs::write(&corpus_path, CORPUS).unwrap();
    fs::write(&encoded_path, "qwertyuiopasdfghjkl").unwrap();

    enigma_cli()
        .arg("stats")
        .arg("-c")
        .arg(&corpus_path)
        .arg("-o")
        .arg(&model_path)
        .arg("--transitions")
        .assert()
        .success();

    enigma_cli()
        .arg("crack")
        .arg("-i")
        .arg(&encoded_path)
        .arg("-m")
        .arg(&model_path)
        .arg("--plugs")
        .arg("14")
        .assert()
        .failure();
}

#[test]
fn test_crack_rejects_group_model_without_room_for_penalty() {
    let temp_dir = tempdir().unwrap();
    let model_path = temp_dir.path().join("certain.json");
    let encoded_path = temp_dir.path().join("message.enc");
    fs::write(
        &model_path,
        r#"{"order": 2, "missing": -10.0, "log_probs": {"ab": 0.0}}"#,
    )
    .unwrap();
    fs::write(&encoded_path, "qwertyuiopasdfghjkl").unwrap();

    enigma_cli()
        .arg("crack")
        .arg("-i")
        .arg(&encoded_path)
        .arg("-m")
        .arg(&model_path)
        .arg("--scorer")
        .arg("group")
        .assert()
        .failure();
}
