use std::process::Command;

use hex_literal::hex;
use mapproof::{proof_file, HasherKind, Options};
use mapproof_core::{
    hasher::{Blake3Hasher, Sha2Hasher},
    BinaryKey, KeyPath, MapEntry, ProofEntry, ProofStatus, UncheckedMapProof,
};

const FOUR_LEAF_ROOT: [u8; 32] =
    hex!("5578d07b4227346cd3eb9bce9de74fec064669afc3fc79ed2a569d685d2bcee1");

fn key(first_byte: u8) -> KeyPath {
    let mut key = [0u8; 32];
    key[0] = first_byte;
    key
}

// Two present entries, the other half of the four-leaf tree as a proof entry, and a missing key.
fn four_leaf_proof() -> UncheckedMapProof {
    let mut right_half = [0u8; 32];
    right_half[0] = 1;
    let right_half = ProofEntry::new(
        BinaryKey::branch(right_half, 1).unwrap(),
        hex!("dd82c3edbf9700f0c1a6363cf8bf5d15aaefdc8a2aceaba5863330615a8710ce"),
    );
    UncheckedMapProof::new(
        vec![right_half],
        vec![
            MapEntry::new(key(0), b"v0".to_vec()),
            MapEntry::new(key(2), b"v1".to_vec()),
        ],
        vec![key(4)],
    )
}

fn write_proof(dir: &tempfile::TempDir, proof: &UncheckedMapProof) -> std::path::PathBuf {
    let path = dir.path().join("proof.bin");
    proof_file::store(&path, proof).unwrap();
    path
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let proof = four_leaf_proof();
    let path = write_proof(&dir, &proof);
    assert_eq!(proof_file::load(&path).unwrap(), proof);
}

#[test]
fn check_matching_root() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_proof(&dir, &four_leaf_proof());

    let mut options = Options::new();
    options.path(&path);
    options.expected_root(FOUR_LEAF_ROOT);
    let outcome = mapproof::check(&options).unwrap();

    assert!(outcome.is_verified());
    assert_eq!(outcome.root_matches, Some(true));
    assert_eq!(outcome.proof.get(&key(2)), Ok(Some(&b"v1"[..])));
    assert_eq!(outcome.proof.get(&key(4)), Ok(None));
}

#[test]
fn check_with_other_hasher_mismatches() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_proof(&dir, &four_leaf_proof());

    let mut options = Options::new();
    options.path(&path);
    options.hasher(HasherKind::Blake3);
    options.expected_root(FOUR_LEAF_ROOT);
    let outcome = mapproof::check(&options).unwrap();

    assert!(outcome.proof.is_correct());
    assert_eq!(outcome.root_matches, Some(false));
    assert!(!outcome.is_verified());
}

#[test]
fn check_with_dispatches_on_hasher() {
    let proof = four_leaf_proof();
    assert_eq!(
        mapproof::check_with(HasherKind::Sha2, &proof),
        proof.check::<Sha2Hasher>()
    );
    assert_eq!(
        mapproof::check_with(HasherKind::Blake3, &proof),
        proof.check::<Blake3Hasher>()
    );
}

#[test]
fn check_invalid_proof() {
    let dir = tempfile::tempdir().unwrap();
    let mut proof = four_leaf_proof();
    proof.missing_keys.push(key(0));
    let path = write_proof(&dir, &proof);

    let mut options = Options::new();
    options.path(&path);
    let outcome = mapproof::check(&options).unwrap();

    assert_eq!(outcome.proof.status(), ProofStatus::DuplicatePath);
    assert_eq!(outcome.root_matches, None);
    assert!(!outcome.is_verified());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proof.bin");
    std::fs::write(&path, [0xFF; 10]).unwrap();

    let mut options = Options::new();
    options.path(&path);
    assert!(mapproof::check(&options).is_err());

    options.path(dir.path().join("absent.bin"));
    assert!(mapproof::check(&options).is_err());
}

fn mapproof_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mapproof"))
}

#[test]
fn cli_verify() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_proof(&dir, &four_leaf_proof());

    let output = mapproof_cmd()
        .arg("verify")
        .arg(&path)
        .arg("--root")
        .arg(hex::encode(FOUR_LEAF_ROOT))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(&format!("root: 0x{}", hex::encode(FOUR_LEAF_ROOT))));
    assert!(stdout.contains("root matches"));

    let output = mapproof_cmd()
        .arg("verify")
        .arg(&path)
        .arg("--root")
        .arg(hex::encode([0u8; 32]))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_rejects_invalid_proof() {
    let dir = tempfile::tempdir().unwrap();
    let mut proof = four_leaf_proof();
    proof.proof.push(proof.proof[0]);
    let path = write_proof(&dir, &proof);

    let output = mapproof_cmd().arg("verify").arg(&path).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_proof(&dir, &four_leaf_proof());

    let output = mapproof_cmd().arg("inspect").arg(&path).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("proof entries: 1"));
    assert!(stdout.contains("Branch(1)"));
    assert!(stdout.contains("missing keys: 1"));
}
