use anyhow::{bail, Result};
use clap::Parser as _;
use mapproof_core::UncheckedMapProof;

mod cli;
mod logging;

fn main() -> Result<()> {
    logging::init()?;
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Verify(params) => verify(&params),
        cli::Command::Inspect { file } => {
            let proof = mapproof::proof_file::load(&file)?;
            inspect(&proof);
            Ok(())
        }
    }
}

fn verify(params: &cli::VerifyParams) -> Result<()> {
    let outcome = mapproof::check(&params.options())?;
    let proof = &outcome.proof;

    println!("status: {:?}", proof.status());
    let root = match proof.root_hash() {
        Ok(root) => root,
        Err(_) => bail!("invalid proof: {}", proof.status()),
    };
    println!("root: 0x{}", hex::encode(root));

    if let Some(expected) = params.root {
        if outcome.root_matches != Some(true) {
            bail!(
                "root mismatch: expected 0x{}, proof leads to 0x{}",
                hex::encode(expected),
                hex::encode(root)
            );
        }
        println!("root matches");
    }

    // UNWRAP: the proof is correct at this point.
    let entries = proof.entries().unwrap();
    let missing = proof.missing_keys().unwrap();
    for (key, value) in entries {
        println!("present 0x{} ({} bytes)", hex::encode(key), value.len());
    }
    for key in missing {
        println!("absent 0x{}", hex::encode(key));
    }
    Ok(())
}

fn inspect(proof: &UncheckedMapProof) {
    println!("proof entries: {}", proof.proof.len());
    for entry in &proof.proof {
        println!("  {:?} 0x{}", entry.key, hex::encode(entry.hash));
    }
    println!("present entries: {}", proof.entries.len());
    for entry in &proof.entries {
        println!(
            "  0x{} ({} bytes)",
            hex::encode(entry.key),
            entry.value.len()
        );
    }
    println!("missing keys: {}", proof.missing_keys.len());
    for key in &proof.missing_keys {
        println!("  0x{}", hex::encode(key));
    }
}
