//! The result of checking a map proof.

use alloc::collections::{BTreeMap, BTreeSet};
use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use super::ProofStatus;
use crate::{hasher::Hash, key::KeyPath};

/// Errors when reading from a [`CheckedMapProof`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The proof is not correct, so nothing beyond its status can be read.
    InvalidProof(ProofStatus),
    /// The key was neither requested as present nor as missing.
    UnrequestedKey,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::InvalidProof(status) => write!(f, "invalid proof: {status}"),
            AccessError::UnrequestedKey => f.write_str("key was not requested in the proof"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AccessError {}

/// A map proof which has been checked.
///
/// The status is always available. Everything else is available only if the status is
/// [`ProofStatus::Correct`] and fails with [`AccessError::InvalidProof`] otherwise.
///
/// Checking does not involve a trusted root. A correct proof proves the requested entries
/// against [`CheckedMapProof::root_hash`], which must be compared against the trusted root by
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedMapProof {
    status: ProofStatus,
    root_hash: Hash,
    entries: BTreeMap<KeyPath, Vec<u8>>,
    missing_keys: BTreeSet<KeyPath>,
}

impl CheckedMapProof {
    pub(crate) fn correct(
        root_hash: Hash,
        entries: BTreeMap<KeyPath, Vec<u8>>,
        missing_keys: BTreeSet<KeyPath>,
    ) -> Self {
        CheckedMapProof {
            status: ProofStatus::Correct,
            root_hash,
            entries,
            missing_keys,
        }
    }

    pub(crate) fn invalid(status: ProofStatus) -> Self {
        CheckedMapProof {
            status,
            root_hash: [0; 32],
            entries: BTreeMap::new(),
            missing_keys: BTreeSet::new(),
        }
    }

    /// The status of the proof.
    pub fn status(&self) -> ProofStatus {
        self.status
    }

    /// Whether the proof is structurally correct.
    pub fn is_correct(&self) -> bool {
        self.status.is_correct()
    }

    /// The root hash reconstructed from the proof.
    pub fn root_hash(&self) -> Result<Hash, AccessError> {
        self.ensure_correct()?;
        Ok(self.root_hash)
    }

    /// Whether the reconstructed root hash equals `expected`.
    pub fn compare_with_root_hash(&self, expected: &Hash) -> Result<bool, AccessError> {
        Ok(self.root_hash()? == *expected)
    }

    /// The entries proven to be present, by key.
    pub fn entries(&self) -> Result<&BTreeMap<KeyPath, Vec<u8>>, AccessError> {
        self.ensure_correct()?;
        Ok(&self.entries)
    }

    /// The keys proven to be absent.
    pub fn missing_keys(&self) -> Result<&BTreeSet<KeyPath>, AccessError> {
        self.ensure_correct()?;
        Ok(&self.missing_keys)
    }

    /// Get the value of a requested key. `None` means the key is proven to be absent.
    pub fn get(&self, key: &KeyPath) -> Result<Option<&[u8]>, AccessError> {
        self.ensure_correct()?;
        if let Some(value) = self.entries.get(key) {
            Ok(Some(value))
        } else if self.missing_keys.contains(key) {
            Ok(None)
        } else {
            Err(AccessError::UnrequestedKey)
        }
    }

    /// Whether a requested key is proven to be present.
    pub fn contains(&self, key: &KeyPath) -> Result<bool, AccessError> {
        self.get(key).map(|value| value.is_some())
    }

    fn ensure_correct(&self) -> Result<(), AccessError> {
        if self.is_correct() {
            Ok(())
        } else {
            Err(AccessError::InvalidProof(self.status))
        }
    }
}
