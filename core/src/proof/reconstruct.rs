//! Folding a flat proof into a root hash.
//!
//! The proof entries and the leaves of the requested entries are merged into a single list in
//! trie order. Walking this list left to right, adjacent nodes are joined into their parent
//! branch as soon as it is known that no later node lies beneath that branch. The nodes which
//! still await their right sibling form the contour: the right edge of the part of the trie
//! rebuilt so far.

use alloc::vec::Vec;

use super::{MapEntry, ProofEntry, ProofStatus};
use crate::{
    hasher::{Hash, ProofHasher},
    key::{BinaryKey, KEY_SIZE_BITS},
};

/// The shape of a proof, which determines how its root is computed.
#[derive(Debug, Clone, Copy)]
pub enum ProofShape<'a> {
    /// No proof entries and no present entries: the map is empty.
    Empty,
    /// A single proof entry naming a leaf, whose hash is the root.
    SingleLeaf(&'a ProofEntry),
    /// A single proof entry naming a branch. A branch cannot be the whole trie.
    SingleBranch(&'a ProofEntry),
    /// A single present entry and no proof entries: the map holds only that entry.
    SingleEntry(&'a MapEntry),
    /// Two or more nodes to be folded.
    General,
}

impl<'a> ProofShape<'a> {
    /// Classify a proof by its number of nodes.
    pub fn of(proof: &'a [ProofEntry], entries: &'a [MapEntry]) -> Self {
        match (proof, entries) {
            ([], []) => ProofShape::Empty,
            ([single], []) if single.key.is_leaf() => ProofShape::SingleLeaf(single),
            ([single], []) => ProofShape::SingleBranch(single),
            ([], [single]) => ProofShape::SingleEntry(single),
            _ => ProofShape::General,
        }
    }
}

/// Compute the root hash of a structurally valid proof.
///
/// Fails only with [`ProofStatus::NonTerminalNode`], for a proof made of a single branch.
pub(crate) fn root_hash<H: ProofHasher>(
    proof: &[ProofEntry],
    entries: &[MapEntry],
) -> Result<Hash, ProofStatus> {
    match ProofShape::of(proof, entries) {
        ProofShape::Empty => Ok(H::EMPTY_ROOT),
        ProofShape::SingleLeaf(entry) => Ok(entry.hash),
        ProofShape::SingleBranch(entry) => {
            tracing::debug!(key = ?entry.key, "single-node proof names a branch");
            Err(ProofStatus::NonTerminalNode)
        }
        ProofShape::SingleEntry(entry) => {
            let value_hash = H::hash_value(&entry.value);
            Ok(H::hash_leaf(&BinaryKey::leaf(entry.key), &value_hash))
        }
        ProofShape::General => {
            let mut nodes: Vec<ProofEntry> = entries
                .iter()
                .map(|entry| {
                    ProofEntry::new(BinaryKey::leaf(entry.key), H::hash_value(&entry.value))
                })
                .chain(proof.iter().copied())
                .collect();
            nodes.sort_unstable_by(|a, b| a.key.cmp(&b.key));
            Ok(fold::<H>(nodes))
        }
    }
}

// Requires at least two nodes in ascending order, none a prefix of another.
fn fold<H: ProofHasher>(nodes: Vec<ProofEntry>) -> Hash {
    let mut nodes = nodes.into_iter();
    // UNWRAP: at least two nodes are provided.
    let first = nodes.next().unwrap();
    let second = nodes.next().unwrap();

    let mut contour = Contour::<H>::new(first, second);
    for node in nodes {
        contour.push(node);
    }
    contour.finish()
}

struct Contour<H> {
    stack: Vec<ProofEntry>,
    // The common prefix of the two topmost nodes: the key of the branch joining them.
    last_prefix: BinaryKey,
    _marker: core::marker::PhantomData<H>,
}

impl<H: ProofHasher> Contour<H> {
    fn new(first: ProofEntry, second: ProofEntry) -> Self {
        let mut stack = Vec::with_capacity(KEY_SIZE_BITS);
        let last_prefix = first.key.common_prefix(&second.key);
        stack.push(first);
        stack.push(second);
        Contour {
            stack,
            last_prefix,
            _marker: core::marker::PhantomData,
        }
    }

    fn push(&mut self, node: ProofEntry) {
        let new_prefix = self.top().key.common_prefix(&node.key);
        // Every branch deeper than the one joining the top with `node` is complete.
        while self.stack.len() > 1
            && new_prefix.significant_bits() < self.last_prefix.significant_bits()
        {
            self.fold_top();
        }
        self.stack.push(node);
        self.last_prefix = new_prefix;
    }

    fn finish(mut self) -> Hash {
        while self.stack.len() > 1 {
            self.fold_top();
        }
        self.top().hash
    }

    // Replace the two topmost nodes with the branch joining them.
    fn fold_top(&mut self) {
        // UNWRAP: only called with at least two nodes on the stack.
        let right = self.stack.pop().unwrap();
        let left = self.stack.pop().unwrap();

        let branch = ProofEntry::new(
            self.last_prefix,
            H::hash_branch(&left.key, &left.hash, &right.key, &right.hash),
        );
        tracing::trace!(key = ?branch.key, depth = self.stack.len(), "folded contour");

        if let Some(below) = self.stack.last() {
            self.last_prefix = below.key.common_prefix(&self.last_prefix);
        }
        self.stack.push(branch);
    }

    fn top(&self) -> &ProofEntry {
        // UNWRAP: the stack never drops below one node.
        self.stack.last().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::{root_hash, ProofShape};
    use crate::{
        hasher::{Hash, ProofHasher, Sha2Hasher},
        key::BinaryKey,
        proof::{MapEntry, ProofEntry, ProofStatus},
        test_utils::{branch_key, key_path, leaf_key},
    };

    fn entry(key: BinaryKey) -> ProofEntry {
        ProofEntry::new(key, *key.key_slice())
    }

    fn leaf_hash(key: &str, value: &[u8]) -> Hash {
        Sha2Hasher::hash_leaf(&leaf_key(key), &Sha2Hasher::hash_value(value))
    }

    fn branch_hash(left: &ProofEntry, right: &ProofEntry) -> Hash {
        Sha2Hasher::hash_branch(&left.key, &left.hash, &right.key, &right.hash)
    }

    #[test]
    fn shapes() {
        let leaf = entry(leaf_key("1"));
        let branch = entry(branch_key("1"));
        let map_entry = MapEntry::new(key_path("1"), b"v".to_vec());

        assert!(matches!(ProofShape::of(&[], &[]), ProofShape::Empty));
        assert!(matches!(
            ProofShape::of(&[leaf], &[]),
            ProofShape::SingleLeaf(_)
        ));
        assert!(matches!(
            ProofShape::of(&[branch], &[]),
            ProofShape::SingleBranch(_)
        ));
        assert!(matches!(
            ProofShape::of(&[], &[map_entry.clone()]),
            ProofShape::SingleEntry(_)
        ));
        assert!(matches!(
            ProofShape::of(&[branch], &[map_entry]),
            ProofShape::General
        ));
        assert!(matches!(
            ProofShape::of(&[leaf, branch], &[]),
            ProofShape::General
        ));
    }

    #[test]
    fn empty_root() {
        assert_eq!(root_hash::<Sha2Hasher>(&[], &[]), Ok([0; 32]));
    }

    #[test]
    fn single_leaf_entry_is_root() {
        let leaf = ProofEntry::new(leaf_key("0110"), [0x42; 32]);
        assert_eq!(root_hash::<Sha2Hasher>(&[leaf], &[]), Ok([0x42; 32]));
    }

    #[test]
    fn single_branch_is_rejected() {
        let branch = entry(branch_key("0110"));
        assert_eq!(
            root_hash::<Sha2Hasher>(&[branch], &[]),
            Err(ProofStatus::NonTerminalNode)
        );
    }

    #[test]
    fn single_present_entry_is_its_leaf() {
        let entries = [MapEntry::new(key_path("01"), b"testValue".to_vec())];
        assert_eq!(
            root_hash::<Sha2Hasher>(&[], &entries),
            Ok(leaf_hash("01", b"testValue"))
        );
    }

    #[test]
    fn two_nodes_join_under_their_common_prefix() {
        let left = entry(branch_key("0011"));
        let right = entry(leaf_key("01"));
        let joined = branch_hash(&left, &right);
        assert_eq!(root_hash::<Sha2Hasher>(&[left, right], &[]), Ok(joined));
    }

    #[test]
    fn present_entries_contribute_value_hashes() {
        let proof = [entry(branch_key("1"))];
        let entries = [MapEntry::new(key_path("01"), b"testValue".to_vec())];

        let left = ProofEntry::new(leaf_key("01"), Sha2Hasher::hash_value(b"testValue"));
        let expected = branch_hash(&left, &proof[0]);
        assert_eq!(root_hash::<Sha2Hasher>(&proof, &entries), Ok(expected));
    }

    #[test]
    fn deeper_pair_folds_before_shallower_sibling() {
        // 00 and 01 share "0", which then joins with "1" at the root.
        let a = entry(branch_key("00"));
        let b = entry(branch_key("01"));
        let c = entry(branch_key("1"));

        let ab = ProofEntry::new(branch_key("0"), branch_hash(&a, &b));
        let expected = branch_hash(&ab, &c);
        assert_eq!(root_hash::<Sha2Hasher>(&[a, b, c], &[]), Ok(expected));
    }

    #[test]
    fn shallow_pair_waits_for_deeper_subtree() {
        // "0" joins with the subtree of "10" and "11" at the root.
        let a = entry(branch_key("0"));
        let b = entry(branch_key("10"));
        let c = entry(branch_key("11"));

        let bc = ProofEntry::new(branch_key("1"), branch_hash(&b, &c));
        let expected = branch_hash(&a, &bc);
        assert_eq!(root_hash::<Sha2Hasher>(&[a, b, c], &[]), Ok(expected));
    }

    #[test]
    fn fold_is_independent_of_input_order() {
        let proof = [
            entry(branch_key("000")),
            entry(branch_key("001")),
            entry(branch_key("1")),
        ];
        let entries = [
            MapEntry::new(key_path("0101"), b"a".to_vec()),
            MapEntry::new(key_path("011"), b"b".to_vec()),
            MapEntry::new(key_path("0100"), b"c".to_vec()),
        ];
        let mut reversed = entries.clone();
        reversed.reverse();

        assert_eq!(
            root_hash::<Sha2Hasher>(&proof, &entries),
            root_hash::<Sha2Hasher>(&proof, &reversed),
        );
    }
}
