//! Verification of flat Merkle-Patricia map proofs stored in files.
//!
//! The proof engine lives in [`mapproof_core`]; this crate loads proofs from disk, picks the hash
//! scheme at runtime and reports the outcome.

pub use options::{HasherKind, Options};

pub mod proof_file;

mod options;

use mapproof_core::{
    hasher::{Blake3Hasher, Sha2Hasher},
    CheckedMapProof, Hash, UncheckedMapProof,
};

/// The outcome of checking a proof file.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The checked proof.
    pub proof: CheckedMapProof,
    /// Whether the reconstructed root equals the expected one. `None` if no root was expected or
    /// the proof is invalid.
    pub root_matches: Option<bool>,
}

impl Outcome {
    /// Whether the proof is correct and, if a root was expected, matches it.
    pub fn is_verified(&self) -> bool {
        self.proof.is_correct() && self.root_matches != Some(false)
    }
}

/// Load the proof named by the options and check it with the configured hasher.
///
/// Fails only if the file cannot be read or decoded. An invalid proof or a root mismatch is
/// reported through the [`Outcome`].
pub fn check(options: &Options) -> anyhow::Result<Outcome> {
    let unchecked = proof_file::load(&options.path)?;
    let proof = check_with(options.hasher, &unchecked);

    let root_matches = match (options.expected_root, proof.root_hash()) {
        (Some(expected), Ok(actual)) => Some(expected == actual),
        _ => None,
    };

    match (proof.root_hash(), root_matches) {
        (Err(_), _) => tracing::info!(status = %proof.status(), "map proof is invalid"),
        (Ok(root), Some(false)) => {
            tracing::warn!(root = %hex::encode(root), "map proof leads to an unexpected root")
        }
        (Ok(root), _) => tracing::info!(root = %hex::encode(root), "map proof is correct"),
    }

    Ok(Outcome {
        proof,
        root_matches,
    })
}

/// Check a proof with the given hash scheme.
pub fn check_with(hasher: HasherKind, proof: &UncheckedMapProof) -> CheckedMapProof {
    match hasher {
        HasherKind::Sha2 => proof.check::<Sha2Hasher>(),
        HasherKind::Blake3 => proof.check::<Blake3Hasher>(),
    }
}

/// Parse a 32-byte hash from hex, with or without a `0x` prefix.
pub fn parse_hash(s: &str) -> anyhow::Result<Hash> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected 32 bytes, got {len}"))
}

#[cfg(test)]
mod tests {
    use super::parse_hash;

    #[test]
    fn parses_hashes() {
        let hex = "5578d07b4227346cd3eb9bce9de74fec064669afc3fc79ed2a569d685d2bcee1";
        let hash = parse_hash(hex).unwrap();
        assert_eq!(hash[0], 0x55);
        assert_eq!(parse_hash(&format!("0x{hex}")).unwrap(), hash);

        assert!(parse_hash("abcd").is_err());
        assert!(parse_hash("zz").is_err());
    }
}
