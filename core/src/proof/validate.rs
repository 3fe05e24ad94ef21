//! Structural validation of flat map proofs.
//!
//! Validation happens before any hashing. A proof which passes it can be folded into a root
//! without ambiguity: the merged list of proof entries and requested leaves is strictly
//! ascending and no node in it lies beneath another.

use alloc::collections::BTreeSet;
use core::cmp::Ordering;

use super::{MapEntry, ProofEntry, ProofStatus};
use crate::key::{BinaryKey, KeyPath};

/// Check the structure of a proof for the given requested keys.
///
/// The checks run in order and the first failure wins:
///   1. Adjacent proof entries must be strictly ascending ([`ProofStatus::InvalidOrder`],
///      [`ProofStatus::DuplicatePath`]) and the first may not be a prefix of the second
///      ([`ProofStatus::EmbeddedPath`]).
///   2. No proof entry may be a prefix of the leaf of a requested key, present or missing
///      ([`ProofStatus::EmbeddedPath`]).
///   3. A present key may appear only once, and never also as a missing key
///      ([`ProofStatus::DuplicatePath`]). Repeated missing keys are accepted.
///
/// Returns [`ProofStatus::Correct`] if all checks pass.
pub fn validate_structure(
    proof: &[ProofEntry],
    entries: &[MapEntry],
    missing_keys: &[KeyPath],
) -> ProofStatus {
    let requested = entries.iter().map(|entry| &entry.key).chain(missing_keys);

    let outcome = check_proof_order(proof)
        .and_then(|()| check_requested_not_embedded(proof, requested))
        .and_then(|()| check_present_unique(entries, missing_keys));

    match outcome {
        Ok(()) => ProofStatus::Correct,
        Err(status) => status,
    }
}

fn check_proof_order(proof: &[ProofEntry]) -> Result<(), ProofStatus> {
    for (index, pair) in proof.windows(2).enumerate() {
        let (prev, next) = (&pair[0].key, &pair[1].key);
        let status = match prev.cmp(next) {
            Ordering::Greater => ProofStatus::InvalidOrder,
            Ordering::Equal => ProofStatus::DuplicatePath,
            Ordering::Less if prev.is_prefix_of(next) => ProofStatus::EmbeddedPath,
            Ordering::Less => continue,
        };
        tracing::debug!(index, ?prev, ?next, %status, "rejecting proof entries");
        return Err(status);
    }
    Ok(())
}

// Relies on the proof being sorted and free of embedded entries. In that case the only entry
// which may be a prefix of a leaf is the greatest entry not exceeding it.
fn check_requested_not_embedded<'a>(
    proof: &[ProofEntry],
    requested: impl Iterator<Item = &'a KeyPath>,
) -> Result<(), ProofStatus> {
    for key in requested {
        let leaf = BinaryKey::leaf(*key);
        let after = proof.partition_point(|entry| entry.key <= leaf);
        if let Some(entry) = after.checked_sub(1).map(|index| &proof[index]) {
            if entry.key.is_prefix_of(&leaf) {
                tracing::debug!(?leaf, entry = ?entry.key, "proof entry covers a requested key");
                return Err(ProofStatus::EmbeddedPath);
            }
        }
    }
    Ok(())
}

// Missing keys never reach the fold, so only present keys can make it ambiguous.
fn check_present_unique(
    entries: &[MapEntry],
    missing_keys: &[KeyPath],
) -> Result<(), ProofStatus> {
    let mut present = BTreeSet::new();
    for entry in entries {
        if !present.insert(&entry.key) {
            tracing::debug!(key = %hex::encode(entry.key), "present key requested more than once");
            return Err(ProofStatus::DuplicatePath);
        }
    }
    if let Some(key) = missing_keys.iter().find(|key| present.contains(key)) {
        tracing::debug!(key = %hex::encode(key), "key requested as both present and missing");
        return Err(ProofStatus::DuplicatePath);
    }
    Ok(())
}
