use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mapproof::{HasherKind, Options};
use mapproof_core::Hash;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a proof file and reconstruct its root.
    ///
    /// Exits with an error if the proof is invalid or does not lead to the expected root.
    Verify(VerifyParams),
    /// Print the contents of a proof file without checking it.
    Inspect {
        /// The borsh-encoded proof file.
        file: PathBuf,
    },
}

#[derive(Clone, Debug, Args)]
pub struct VerifyParams {
    /// The borsh-encoded proof file.
    pub file: PathBuf,

    /// The trusted root hash, in hex.
    ///
    /// If not provided, the reconstructed root is printed but not compared.
    #[arg(long, short, value_parser = parse_root)]
    pub root: Option<Hash>,

    /// The hash scheme the map was committed with.
    #[arg(long, value_enum, default_value_t = HasherKind::Sha2)]
    pub hasher: HasherKind,
}

impl VerifyParams {
    pub fn options(&self) -> Options {
        let mut options = Options::new();
        options.path(&self.file);
        options.hasher(self.hasher);
        if let Some(root) = self.root {
            options.expected_root(root);
        }
        options
    }
}

fn parse_root(s: &str) -> Result<Hash, String> {
    mapproof::parse_hash(s).map_err(|err| err.to_string())
}
