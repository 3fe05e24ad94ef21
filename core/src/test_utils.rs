//! Helpers for building keys from bit strings in tests.
//!
//! A bit string lists bits in index order: the first character is bit 0. Spaces, underscores and
//! `|` are ignored, so `"1111 1111 | 10"` is a 10-bit prefix.

use crate::key::{BinaryKey, KeyPath, KEY_SIZE_BITS};

/// Parse a bit string into a key slice.
pub fn key_path(bits: &str) -> KeyPath {
    let mut key = [0u8; 32];
    for (index, bit) in bit_chars(bits).enumerate() {
        assert!(index < KEY_SIZE_BITS, "bit string too long: {bits}");
        if bit {
            key[index / 8] |= 1 << (index % 8);
        }
    }
    key
}

/// A branch key with the given bits as its prefix.
pub fn branch_key(bits: &str) -> BinaryKey {
    BinaryKey::branch(key_path(bits), bit_chars(bits).count()).unwrap()
}

/// A leaf key whose leading bits are given, padded with zeros.
pub fn leaf_key(bits: &str) -> BinaryKey {
    BinaryKey::leaf(key_path(bits))
}

fn bit_chars(bits: &str) -> impl Iterator<Item = bool> + '_ {
    bits.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '|'))
        .map(|c| match c {
            '0' => false,
            '1' => true,
            other => panic!("unexpected character {other:?} in bit string"),
        })
}
