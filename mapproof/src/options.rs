use std::path::PathBuf;

use mapproof_core::Hash;

/// The hash scheme a map was committed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HasherKind {
    /// sha2-256.
    #[default]
    Sha2,
    /// blake3.
    Blake3,
}

/// Options when verifying a proof file with [`crate::check`].
#[derive(Debug, Clone)]
pub struct Options {
    /// The path to the borsh-encoded proof.
    pub(crate) path: PathBuf,
    pub(crate) hasher: HasherKind,
    /// The trusted root. If absent, the proof is only checked for structure.
    pub(crate) expected_root: Option<Hash>,
}

impl Options {
    /// Create a new `Options` instance with the default values.
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("proof.bin"),
            hasher: HasherKind::default(),
            expected_root: None,
        }
    }

    /// Set the path to the proof file.
    pub fn path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    /// Set the hash scheme used to reconstruct the root.
    ///
    /// Default: sha2.
    pub fn hasher(&mut self, hasher: HasherKind) {
        self.hasher = hasher;
    }

    /// Set the trusted root the reconstructed root must match.
    pub fn expected_root(&mut self, root: Hash) {
        self.expected_root = Some(root);
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
