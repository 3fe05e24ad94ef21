//! The atoms of a flat map proof.

use core::fmt;

use crate::{
    hasher::Hash,
    key::{BinaryKey, KeyPath, MalformedKey, RAW_KEY_SIZE},
};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// The size of the wire form of a [`ProofEntry`]: a raw key followed by a hash.
pub const PROOF_ENTRY_SIZE: usize = RAW_KEY_SIZE + 32;

/// A node of the trie which is not expanded in a proof: its position and its hash.
///
/// Proof entries are the siblings of the requested paths. Serialized with borsh, an entry is
/// exactly its [`PROOF_ENTRY_SIZE`]-byte wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct ProofEntry {
    /// The position of the node.
    pub key: BinaryKey,
    /// The hash of the node.
    pub hash: Hash,
}

impl ProofEntry {
    /// Create a new proof entry.
    pub fn new(key: BinaryKey, hash: Hash) -> Self {
        ProofEntry { key, hash }
    }

    /// Decode an entry from its wire form.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, MalformedEntry> {
        if raw.len() != PROOF_ENTRY_SIZE {
            return Err(MalformedEntry::InvalidLength(raw.len()));
        }
        let key = BinaryKey::from_bytes(&raw[..RAW_KEY_SIZE])?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&raw[RAW_KEY_SIZE..]);
        Ok(ProofEntry { key, hash })
    }

    /// Encode the entry in its wire form.
    pub fn to_bytes(&self) -> [u8; PROOF_ENTRY_SIZE] {
        let mut raw = [0u8; PROOF_ENTRY_SIZE];
        raw[..RAW_KEY_SIZE].copy_from_slice(&self.key.to_bytes());
        raw[RAW_KEY_SIZE..].copy_from_slice(&self.hash);
        raw
    }
}

/// Reasons a [`ProofEntry`] cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedEntry {
    /// The wire form does not have exactly [`PROOF_ENTRY_SIZE`] bytes.
    InvalidLength(usize),
    /// The key is malformed.
    Key(MalformedKey),
}

impl From<MalformedKey> for MalformedEntry {
    fn from(err: MalformedKey) -> Self {
        MalformedEntry::Key(err)
    }
}

impl fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedEntry::InvalidLength(len) => {
                write!(f, "proof entry has {len} bytes, expected {PROOF_ENTRY_SIZE}")
            }
            MalformedEntry::Key(err) => write!(f, "proof entry key: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MalformedEntry {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MalformedEntry::InvalidLength(_) => None,
            MalformedEntry::Key(err) => Some(err),
        }
    }
}

/// A key-value pair claimed to be present in the map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct MapEntry {
    /// The user key.
    pub key: KeyPath,
    /// The value stored under the key.
    pub value: Vec<u8>,
}

impl MapEntry {
    /// Create a new map entry.
    pub fn new(key: KeyPath, value: impl Into<Vec<u8>>) -> Self {
        MapEntry {
            key,
            value: value.into(),
        }
    }
}
