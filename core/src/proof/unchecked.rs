//! Map proofs as received from an untrusted source.

use alloc::collections::{BTreeMap, BTreeSet};
use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use super::{
    reconstruct::root_hash, validate::validate_structure, CheckedMapProof, MapEntry, ProofEntry,
    ProofStatus,
};
use crate::{
    hasher::{Hash, ProofHasher},
    key::KeyPath,
};

/// A flat map proof that has not been checked yet.
///
/// The proof entries must be sorted in trie order. The present entries and missing keys may
/// come in any order. A present key may be given only once and not also as missing; repeated
/// missing keys are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct UncheckedMapProof {
    /// Hashes of the subtrees not covered by the requested keys.
    pub proof: Vec<ProofEntry>,
    /// Entries claimed to be present in the map.
    pub entries: Vec<MapEntry>,
    /// Keys claimed to be absent from the map.
    pub missing_keys: Vec<KeyPath>,
}

impl UncheckedMapProof {
    /// Create a new unchecked proof.
    pub fn new(proof: Vec<ProofEntry>, entries: Vec<MapEntry>, missing_keys: Vec<KeyPath>) -> Self {
        UncheckedMapProof {
            proof,
            entries,
            missing_keys,
        }
    }

    /// Check the structure of the proof and reconstruct its root hash.
    ///
    /// This never fails: a malformed proof yields a [`CheckedMapProof`] carrying the reason in
    /// its status.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(
            proof = self.proof.len(),
            entries = self.entries.len(),
            missing = self.missing_keys.len(),
        )
    )]
    pub fn check<H: ProofHasher>(&self) -> CheckedMapProof {
        let status = validate_structure(&self.proof, &self.entries, &self.missing_keys);
        if !status.is_correct() {
            return CheckedMapProof::invalid(status);
        }

        match root_hash::<H>(&self.proof, &self.entries) {
            Ok(root) => {
                let entries: BTreeMap<KeyPath, Vec<u8>> = self
                    .entries
                    .iter()
                    .map(|entry| (entry.key, entry.value.clone()))
                    .collect();
                let missing_keys: BTreeSet<KeyPath> = self.missing_keys.iter().copied().collect();
                CheckedMapProof::correct(root, entries, missing_keys)
            }
            Err(status) => CheckedMapProof::invalid(status),
        }
    }

    /// Check the proof and require its root hash to equal `expected_root`.
    pub fn verify<H: ProofHasher>(
        &self,
        expected_root: &Hash,
    ) -> Result<CheckedMapProof, VerificationError> {
        let checked = self.check::<H>();
        let actual = checked
            .root_hash()
            .map_err(|_| VerificationError::Invalid(checked.status()))?;

        if actual != *expected_root {
            tracing::debug!(
                expected = %hex::encode(expected_root),
                actual = %hex::encode(actual),
                "map proof root mismatch",
            );
            return Err(VerificationError::RootMismatch {
                expected: *expected_root,
                actual,
            });
        }
        Ok(checked)
    }
}

/// Errors in verifying a map proof against a trusted root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    /// The proof is structurally invalid.
    Invalid(ProofStatus),
    /// The proof is well-formed but leads to a different root.
    RootMismatch {
        /// The trusted root.
        expected: Hash,
        /// The root reconstructed from the proof.
        actual: Hash,
    },
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationError::Invalid(status) => write!(f, "invalid map proof: {status}"),
            VerificationError::RootMismatch { expected, actual } => write!(
                f,
                "root mismatch: expected 0x{}, proof leads to 0x{}",
                hex::encode(expected),
                hex::encode(actual),
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VerificationError {}
