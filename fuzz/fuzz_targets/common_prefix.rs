#![no_main]

mod common;

use std::cmp::Ordering;

use common::Split;
use libfuzzer_sys::fuzz_target;
use mapproof_core::BinaryKey;

fuzz_target!(|split: Split| {
    let Split {
        prefix,
        left,
        right,
    } = split;
    let len = prefix.significant_bits();

    assert_eq!(left.common_prefix(&right), prefix);
    assert_eq!(right.common_prefix(&left), prefix);
    assert!(prefix.is_prefix_of(&left));
    assert!(prefix.is_prefix_of(&right));
    assert!(!left.is_prefix_of(&right));

    assert!(!left.bit(len) && right.bit(len));
    assert_eq!(left.cmp(&right), Ordering::Less);
    assert_eq!(right.cmp(&left), Ordering::Greater);
    assert!(prefix < left && prefix < right);

    // A branch one bit past the split covers exactly one side.
    if len + 1 < 256 {
        let mut slice = *right.key_slice();
        for bit in len + 1..256 {
            slice[bit / 8] &= !(1 << (bit % 8));
        }
        let right_branch = BinaryKey::branch(slice, len + 1).unwrap();
        assert!(right_branch.is_prefix_of(&right));
        assert!(!right_branch.is_prefix_of(&left));
        assert_eq!(right_branch.common_prefix(&left), prefix);
        assert!(left < right_branch && right_branch < right);
    }

    // Every shorter prefix is shared by both leaves.
    for shorter_len in [0, len / 2, len] {
        let mut slice = *prefix.key_slice();
        for bit in shorter_len..256 {
            slice[bit / 8] &= !(1 << (bit % 8));
        }
        let shorter = BinaryKey::branch(slice, shorter_len).unwrap();
        assert!(shorter.is_prefix_of(&left));
        assert!(shorter.is_prefix_of(&right));
        assert_eq!(shorter.common_prefix(&prefix), shorter);
    }
});
