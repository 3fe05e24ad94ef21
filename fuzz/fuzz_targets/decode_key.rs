#![no_main]

use libfuzzer_sys::fuzz_target;
use mapproof_core::{key::RAW_KEY_SIZE, BinaryKey, NodeType};

fuzz_target!(|raw: &[u8]| {
    let Ok(key) = BinaryKey::from_bytes(raw) else {
        return;
    };

    assert_eq!(raw.len(), RAW_KEY_SIZE);
    assert_eq!(&key.to_bytes()[..], raw);
    match key.node_type() {
        NodeType::Leaf => assert_eq!(key.significant_bits(), 256),
        NodeType::Branch => {
            assert!(key.significant_bits() < 256);
            assert!((key.significant_bits()..256).all(|bit| !key.bit(bit)));
        }
    }
});
