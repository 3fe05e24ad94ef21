//! Core types and verification routines for flat Merkle-Patricia map proofs.
//!
//! A map of 256-bit keys to arbitrary values is committed to by the root of a binary
//! Merkle-Patricia trie. This crate defines the positions within that trie ([`key`]), the hash
//! schemes used to commit to it ([`hasher`]) and the verification of flat proofs of presence and
//! absence against its root ([`proof`]).
//!
//! Verification does not require the standard library, but does require Rust's alloc crate.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod hasher;
pub mod key;
pub mod proof;

#[cfg(test)]
mod test_utils;

pub use hasher::{BinaryHash, BinaryHasher, Hash, ProofHasher};
pub use key::{BinaryKey, KeyPath, MalformedKey, NodeType};
pub use proof::{
    AccessError, CheckedMapProof, MapEntry, ProofEntry, ProofStatus, UncheckedMapProof,
    VerificationError,
};
