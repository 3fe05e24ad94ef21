#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mapproof_core::{
    hasher::Sha2Hasher, BinaryKey, KeyPath, MapEntry, ProofEntry, ProofHasher, ProofStatus,
    UncheckedMapProof,
};

fuzz_target!(|run: Run| {
    let entries: Vec<MapEntry> = run
        .map
        .iter()
        .map(|(key, value)| MapEntry::new(*key, value.clone()))
        .collect();

    let full = UncheckedMapProof::new(Vec::new(), entries.clone(), Vec::new());
    let full = full.check::<Sha2Hasher>();
    assert_eq!(full.status(), ProofStatus::Correct);
    let root = full.root_hash().unwrap();

    // A single leaf proof entry carries the root itself, not a value hash.
    if entries.len() < 2 {
        return;
    }

    // Move some of the entries into the proof, as leaves carrying their value hash.
    let mut proof = Vec::new();
    let mut requested = Vec::new();
    let hidden = run.hidden.iter().copied().chain(std::iter::repeat(false));
    for (entry, hide) in entries.into_iter().zip(hidden) {
        if hide {
            let value_hash = Sha2Hasher::hash_value(&entry.value);
            proof.push(ProofEntry::new(BinaryKey::leaf(entry.key), value_hash));
        } else {
            requested.push(entry);
        }
    }
    proof.sort_by(|a, b| a.key.cmp(&b.key));
    requested.reverse();

    let partial = UncheckedMapProof::new(proof, requested, Vec::new());
    let partial = partial.verify::<Sha2Hasher>(&root).unwrap();
    for (key, value) in &run.map {
        if let Ok(Some(found)) = partial.get(key) {
            assert_eq!(found, &value[..]);
        }
    }
});

#[derive(Debug, Arbitrary)]
struct Run {
    map: BTreeMap<KeyPath, Vec<u8>>,
    hidden: Vec<bool>,
}
