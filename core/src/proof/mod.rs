//! Flat map proofs and proof verification.
//!
//! The map is committed to by the root of a binary Merkle-Patricia trie. A flat map proof
//! authenticates a set of present key-value pairs and a set of absent keys against that root
//! without the trie itself: it carries the hashes of every subtree that the requested keys do
//! not touch, as a list of [`ProofEntry`]s sorted in trie order.
//!
//! Verification happens in two steps. First the structure of the proof is validated: the
//! entries must be strictly ascending and no entry may be an ancestor of another entry or of a
//! requested key. Then the requested entries are merged into the proof and the whole list is
//! folded into a single root hash. The result is a [`CheckedMapProof`], which carries the
//! [`ProofStatus`] and, if the proof is well-formed, the reconstructed root.
//!
//! A correct status does not mean that the proof is valid for a particular map: the caller
//! still has to compare the reconstructed root against a trusted one, either directly or with
//! [`UncheckedMapProof::verify`].

pub use checked::{AccessError, CheckedMapProof};
pub use entry::{MalformedEntry, MapEntry, ProofEntry, PROOF_ENTRY_SIZE};
pub use reconstruct::ProofShape;
pub use unchecked::{UncheckedMapProof, VerificationError};
pub use validate::validate_structure;

use core::fmt;

mod checked;
mod entry;
mod reconstruct;
mod unchecked;
mod validate;

/// The outcome of checking the structure of a map proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofStatus {
    /// The proof is well-formed and a root hash could be reconstructed.
    Correct,
    /// The proof entries are not in ascending order.
    InvalidOrder,
    /// Two proof entries, or two requested keys, share a path.
    DuplicatePath,
    /// A proof entry is an ancestor of another proof entry or of a requested key.
    EmbeddedPath,
    /// A proof consisting of a single node names a branch rather than a leaf.
    NonTerminalNode,
}

impl ProofStatus {
    /// Whether this is [`ProofStatus::Correct`].
    pub fn is_correct(self) -> bool {
        self == ProofStatus::Correct
    }
}

impl fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ProofStatus::Correct => "proof is correct",
            ProofStatus::InvalidOrder => "proof entries are in invalid order",
            ProofStatus::DuplicatePath => "proof contains duplicate paths",
            ProofStatus::EmbeddedPath => "proof contains an embedded path",
            ProofStatus::NonTerminalNode => "single-node proof does not end in a leaf",
        };
        f.write_str(description)
    }
}
