//! Reading and writing proofs as borsh-encoded files.

use std::path::Path;

use anyhow::Context as _;
use mapproof_core::UncheckedMapProof;

/// Load an unchecked proof from a file.
pub fn load(path: &Path) -> anyhow::Result<UncheckedMapProof> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read proof file {}", path.display()))?;
    let proof = borsh::from_slice::<UncheckedMapProof>(&bytes)
        .with_context(|| format!("failed to decode proof file {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        proof = proof.proof.len(),
        entries = proof.entries.len(),
        missing = proof.missing_keys.len(),
        "loaded map proof",
    );
    Ok(proof)
}

/// Store an unchecked proof to a file, replacing any existing content.
pub fn store(path: &Path, proof: &UncheckedMapProof) -> anyhow::Result<()> {
    let bytes = borsh::to_vec(proof)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write proof file {}", path.display()))
}
