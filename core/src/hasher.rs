//! Hashers (feature-gated) and utilities for implementing them.

use crate::key::BinaryKey;

/// The output of every hash function used by the map.
pub type Hash = [u8; 32];

/// The hash scheme of a map proof.
///
/// Verification is generic over this trait, so a proof is always checked against the exact
/// scheme the map was committed with. The scheme decides how values, leaves and branches are
/// hashed and what the root of an empty map is.
pub trait ProofHasher {
    /// The root hash of a map with no entries.
    const EMPTY_ROOT: Hash;

    /// Hash a value stored in the map.
    fn hash_value(value: &[u8]) -> Hash;

    /// Hash a leaf node given its key and the hash of its value.
    fn hash_leaf(key: &BinaryKey, value_hash: &Hash) -> Hash;

    /// Hash a branch node given the keys and hashes of its two children, left child first.
    fn hash_branch(left: &BinaryKey, left_hash: &Hash, right: &BinaryKey, right_hash: &Hash)
        -> Hash;
}

/// A simple trait for representing binary hash functions.
pub trait BinaryHash {
    /// The root hash of an empty map.
    const EMPTY_ROOT: Hash = [0; 32];

    /// Bytes prepended to the input of every leaf hash. Empty by default.
    const LEAF_DOMAIN: &'static [u8] = &[];

    /// Bytes prepended to the input of every branch hash. Empty by default.
    const BRANCH_DOMAIN: &'static [u8] = &[];

    /// Given a bit-string, produce a 32-byte hash.
    fn hash(input: &[u8]) -> Hash;

    /// Hash the concatenation of `parts`.
    ///
    /// Implementations with a streaming interface should override this to avoid the copy.
    fn hash_concat(parts: &[&[u8]]) -> Hash {
        Self::hash(&parts.concat())
    }
}

/// A proof hasher constructed from a simple binary hasher.
///
/// Nodes are hashed as
///
/// ```text
/// leaf   = H(LEAF_DOMAIN || raw_key || value_hash)
/// branch = H(BRANCH_DOMAIN || left_hash || right_hash || left_raw_key || right_raw_key)
/// ```
///
/// where `raw_key` is the 34-byte canonical encoding of a [`BinaryKey`].
pub struct BinaryHasher<H>(core::marker::PhantomData<H>);

impl<H: BinaryHash> ProofHasher for BinaryHasher<H> {
    const EMPTY_ROOT: Hash = H::EMPTY_ROOT;

    fn hash_value(value: &[u8]) -> Hash {
        H::hash(value)
    }

    fn hash_leaf(key: &BinaryKey, value_hash: &Hash) -> Hash {
        H::hash_concat(&[H::LEAF_DOMAIN, &key.to_bytes(), value_hash])
    }

    fn hash_branch(
        left: &BinaryKey,
        left_hash: &Hash,
        right: &BinaryKey,
        right_hash: &Hash,
    ) -> Hash {
        H::hash_concat(&[
            H::BRANCH_DOMAIN,
            left_hash,
            right_hash,
            &left.to_bytes(),
            &right.to_bytes(),
        ])
    }
}

#[cfg(any(feature = "blake3-hasher", test))]
pub use blake3::Blake3Hasher;

/// A proof hasher making use of blake3.
#[cfg(any(feature = "blake3-hasher", test))]
pub mod blake3 {
    use super::{BinaryHash, BinaryHasher, Hash};

    /// A [`BinaryHash`] implementation for Blake3.
    pub struct Blake3BinaryHasher;

    /// A wrapper around Blake3 for verifying map proofs.
    pub type Blake3Hasher = BinaryHasher<Blake3BinaryHasher>;

    impl BinaryHash for Blake3BinaryHasher {
        fn hash(value: &[u8]) -> Hash {
            blake3::hash(value).into()
        }

        fn hash_concat(parts: &[&[u8]]) -> Hash {
            let mut hasher = blake3::Hasher::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().into()
        }
    }
}

#[cfg(any(feature = "sha2-hasher", test))]
pub use sha2::Sha2Hasher;

/// A proof hasher making use of sha2-256.
#[cfg(any(feature = "sha2-hasher", test))]
pub mod sha2 {
    use super::{BinaryHash, BinaryHasher, Hash};
    use sha2::{Digest, Sha256};

    /// A [`BinaryHash`] implementation for Sha2.
    pub struct Sha2BinaryHasher;

    /// A wrapper around sha2-256 for verifying map proofs.
    pub type Sha2Hasher = BinaryHasher<Sha2BinaryHasher>;

    impl BinaryHash for Sha2BinaryHasher {
        fn hash(value: &[u8]) -> Hash {
            let mut hasher = Sha256::new();
            hasher.update(value);
            hasher.finalize().into()
        }

        fn hash_concat(parts: &[&[u8]]) -> Hash {
            let mut hasher = Sha256::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BinaryHash, BinaryHasher, Blake3Hasher, Hash, ProofHasher, Sha2Hasher};
    use crate::key::BinaryKey;
    use hex_literal::hex;

    #[test]
    fn sha2_value_hash() {
        assert_eq!(
            Sha2Hasher::hash_value(b"v0"),
            hex!("0270da4daac514f30bece5788a87ad7b800f59476d0d7e6f70d4b61fbc4f5e9e"),
        );
    }

    #[test]
    fn streaming_matches_concatenation() {
        let left = BinaryKey::leaf([1; 32]);
        let right = BinaryKey::branch([0; 32], 3).unwrap();

        let mut buf = alloc::vec::Vec::new();
        buf.extend_from_slice(&[7; 32]);
        buf.extend_from_slice(&[9; 32]);
        buf.extend_from_slice(&left.to_bytes());
        buf.extend_from_slice(&right.to_bytes());

        assert_eq!(
            Sha2Hasher::hash_branch(&left, &[7; 32], &right, &[9; 32]),
            super::sha2::Sha2BinaryHasher::hash(&buf),
        );
        assert_eq!(
            Blake3Hasher::hash_branch(&left, &[7; 32], &right, &[9; 32]),
            super::blake3::Blake3BinaryHasher::hash(&buf),
        );
    }

    #[test]
    fn default_empty_root_is_zero() {
        assert_eq!(<Sha2Hasher as ProofHasher>::EMPTY_ROOT, [0; 32]);
        assert_eq!(<Blake3Hasher as ProofHasher>::EMPTY_ROOT, [0; 32]);
    }

    struct Tagged;

    impl BinaryHash for Tagged {
        const EMPTY_ROOT: Hash = [0xEE; 32];
        const LEAF_DOMAIN: &'static [u8] = b"leaf";
        const BRANCH_DOMAIN: &'static [u8] = b"branch";

        fn hash(input: &[u8]) -> Hash {
            super::sha2::Sha2BinaryHasher::hash(input)
        }
    }

    #[test]
    fn domains_are_prepended() {
        let key = BinaryKey::leaf([3; 32]);
        let value_hash = [5; 32];

        let mut buf = b"leaf".to_vec();
        buf.extend_from_slice(&key.to_bytes());
        buf.extend_from_slice(&value_hash);

        assert_eq!(
            BinaryHasher::<Tagged>::hash_leaf(&key, &value_hash),
            Tagged::hash(&buf),
        );
        assert_ne!(
            BinaryHasher::<Tagged>::hash_leaf(&key, &value_hash),
            Sha2Hasher::hash_leaf(&key, &value_hash),
        );
        assert_eq!(<BinaryHasher<Tagged> as ProofHasher>::EMPTY_ROOT, [0xEE; 32]);
    }
}
