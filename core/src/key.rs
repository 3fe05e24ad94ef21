//! Positions within the binary trie.
//!
//! The map is a binary Merkle-Patricia trie over 256-bit keys. Every node of the trie is
//! addressed by a [`BinaryKey`]: leaves by the full 256-bit key, branches by the bit-prefix
//! shared by everything beneath them.
//!
//! Bits are numbered from 0 to 255, least-significant-bit first within each byte. That is, bit
//! `i` of a key is `(key[i / 8] >> (i % 8)) & 1`. Viewed as a little-endian 256-bit integer, bit
//! `i` of the key is bit `i` of the integer, which is what the prefix arithmetic below relies on.

use bitvec::prelude::*;
use core::{cmp::Ordering, fmt};
use ruint::Uint;

/// The size of a user key in bytes.
pub const KEY_SIZE: usize = 32;

/// The size of a user key in bits.
pub const KEY_SIZE_BITS: usize = KEY_SIZE * 8;

/// The size of the canonical encoding of a [`BinaryKey`]: node type, key slice, prefix length.
pub const RAW_KEY_SIZE: usize = KEY_SIZE + 2;

/// A 256-bit user key, as it is stored in the map.
pub type KeyPath = [u8; KEY_SIZE];

type Bits = Uint<256, 4>;

/// The kind of trie node a [`BinaryKey`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// An internal node, identified by a prefix of fewer than 256 bits.
    Branch,
    /// A terminal node, identified by a full 256-bit key.
    Leaf,
}

impl NodeType {
    /// The tag used as the first byte of the canonical encoding.
    pub fn code(self) -> u8 {
        match self {
            NodeType::Branch => 0,
            NodeType::Leaf => 1,
        }
    }

    /// Decode a node type tag.
    pub fn from_code(code: u8) -> Result<Self, MalformedKey> {
        match code {
            0 => Ok(NodeType::Branch),
            1 => Ok(NodeType::Leaf),
            other => Err(MalformedKey::UnknownNodeType(other)),
        }
    }
}

/// Reasons a [`BinaryKey`] cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKey {
    /// The encoding does not have exactly [`RAW_KEY_SIZE`] bytes.
    InvalidLength(usize),
    /// The node type tag is neither branch nor leaf.
    UnknownNodeType(u8),
    /// A branch prefix must be shorter than [`KEY_SIZE_BITS`].
    SignificantBitsOutOfRange(usize),
    /// A branch key slice has set bits at or beyond its prefix length.
    BitsPastPrefix(usize),
    /// A leaf encoding carries a nonzero prefix-length byte.
    LeafLengthByte(u8),
}

impl fmt::Display for MalformedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedKey::InvalidLength(len) => {
                write!(f, "binary key has {len} bytes, expected {RAW_KEY_SIZE}")
            }
            MalformedKey::UnknownNodeType(code) => write!(f, "unknown node type tag {code}"),
            MalformedKey::SignificantBitsOutOfRange(bits) => {
                write!(f, "branch prefix of {bits} bits, must be below {KEY_SIZE_BITS}")
            }
            MalformedKey::BitsPastPrefix(bits) => {
                write!(f, "branch key slice has set bits after its {bits}-bit prefix")
            }
            MalformedKey::LeafLengthByte(byte) => {
                write!(f, "leaf key has prefix-length byte {byte}, must be zero")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MalformedKey {}

/// The position of a node within the trie.
///
/// A leaf key has all 256 bits significant. A branch key has `significant_bits` in `0..256`
/// and every bit of its key slice at or beyond that length is zero. Both invariants are
/// enforced on construction, so a `BinaryKey` is always well-formed.
///
/// # Ordering
///
/// Keys are ordered the way an in-order traversal of the trie visits them: compare bits from
/// bit 0 up to the shorter prefix length, the key with a `1` at the first differing bit is
/// greater. If no bit differs, the shorter key (the prefix) is the smaller one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryKey {
    node_type: NodeType,
    key_slice: KeyPath,
    // 256 for leaves.
    significant_bits: u16,
}

impl BinaryKey {
    /// Create the leaf key for a user key.
    pub fn leaf(key: KeyPath) -> Self {
        BinaryKey {
            node_type: NodeType::Leaf,
            key_slice: key,
            significant_bits: KEY_SIZE_BITS as u16,
        }
    }

    /// Create a branch key from a key slice and the length of its prefix in bits.
    ///
    /// Fails if the prefix is 256 bits or longer, or if the slice has set bits beyond the
    /// prefix.
    pub fn branch(key_slice: KeyPath, significant_bits: usize) -> Result<Self, MalformedKey> {
        if significant_bits >= KEY_SIZE_BITS {
            return Err(MalformedKey::SignificantBitsOutOfRange(significant_bits));
        }
        if as_bits(&key_slice) >> significant_bits != Bits::ZERO {
            return Err(MalformedKey::BitsPastPrefix(significant_bits));
        }
        Ok(BinaryKey {
            node_type: NodeType::Branch,
            key_slice,
            significant_bits: significant_bits as u16,
        })
    }

    /// Decode a key from its canonical encoding: a node type tag, the 32-byte key slice and the
    /// prefix length in bits (zero for leaves).
    pub fn from_bytes(raw: &[u8]) -> Result<Self, MalformedKey> {
        let raw: &[u8; RAW_KEY_SIZE] = raw
            .try_into()
            .map_err(|_| MalformedKey::InvalidLength(raw.len()))?;

        let node_type = NodeType::from_code(raw[0])?;
        let mut key_slice = [0u8; KEY_SIZE];
        key_slice.copy_from_slice(&raw[1..=KEY_SIZE]);
        let len_byte = raw[RAW_KEY_SIZE - 1];

        match node_type {
            NodeType::Branch => Self::branch(key_slice, len_byte as usize),
            NodeType::Leaf if len_byte == 0 => Ok(Self::leaf(key_slice)),
            NodeType::Leaf => Err(MalformedKey::LeafLengthByte(len_byte)),
        }
    }

    /// Encode the key in its canonical form. This is the byte string fed to the hash function.
    pub fn to_bytes(&self) -> [u8; RAW_KEY_SIZE] {
        let mut raw = [0u8; RAW_KEY_SIZE];
        raw[0] = self.node_type.code();
        raw[1..=KEY_SIZE].copy_from_slice(&self.key_slice);
        raw[RAW_KEY_SIZE - 1] = match self.node_type {
            NodeType::Branch => self.significant_bits as u8,
            NodeType::Leaf => 0,
        };
        raw
    }

    /// The kind of node this key refers to.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Whether this is a leaf key.
    pub fn is_leaf(&self) -> bool {
        self.node_type == NodeType::Leaf
    }

    /// The key slice. Only the first [`Self::significant_bits`] bits carry information.
    pub fn key_slice(&self) -> &KeyPath {
        &self.key_slice
    }

    /// The number of significant bits: the prefix length for branches, 256 for leaves.
    pub fn significant_bits(&self) -> usize {
        self.significant_bits as usize
    }

    /// Get the bit at `index`. Bits past the prefix of a branch are always unset.
    ///
    /// Panics if `index` is 256 or greater.
    pub fn bit(&self, index: usize) -> bool {
        self.key_slice.view_bits::<Lsb0>()[index]
    }

    /// Get the longest branch key which is a prefix of both keys.
    ///
    /// The common prefix of a key with itself is the key. Otherwise the result is always a
    /// branch, including for two distinct leaves.
    pub fn common_prefix(&self, other: &BinaryKey) -> BinaryKey {
        if self == other {
            return *self;
        }

        let shorter = core::cmp::min(self.significant_bits(), other.significant_bits());
        // 256 when the patterns agree everywhere, i.e. one prefix is a zero-padded extension of
        // the other. The shorter length wins in that case.
        let first_diff = (self.bits() ^ other.bits()).trailing_zeros();
        let len = core::cmp::min(first_diff, shorter);

        // `self != other` and the lengths are bounded by the shorter key, so `len < 256`.
        BinaryKey {
            node_type: NodeType::Branch,
            key_slice: truncate(&self.key_slice, len),
            significant_bits: len as u16,
        }
    }

    /// Whether every significant bit of this key matches the corresponding bit of `other`.
    ///
    /// A key is a prefix of itself.
    pub fn is_prefix_of(&self, other: &BinaryKey) -> bool {
        let len = self.significant_bits();
        if len > other.significant_bits() {
            return false;
        }
        (self.bits() ^ other.bits()) & prefix_mask(len) == Bits::ZERO
    }

    fn bits(&self) -> Bits {
        as_bits(&self.key_slice)
    }
}

impl Ord for BinaryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let shorter = core::cmp::min(self.significant_bits(), other.significant_bits());
        let first_diff = (self.bits() ^ other.bits()).trailing_zeros();
        if first_diff < shorter {
            if self.bit(first_diff) {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        } else {
            self.significant_bits.cmp(&other.significant_bits)
        }
    }
}

impl PartialOrd for BinaryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for BinaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node_type {
            NodeType::Leaf => write!(f, "Leaf(0x{})", hex::encode(self.key_slice)),
            NodeType::Branch => {
                f.write_str("Branch(")?;
                let prefix = &self.key_slice.view_bits::<Lsb0>()[..self.significant_bits()];
                for bit in prefix.iter().by_vals() {
                    f.write_str(if bit { "1" } else { "0" })?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(feature = "borsh")]
impl borsh::BorshSerialize for BinaryKey {
    fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

#[cfg(feature = "borsh")]
impl borsh::BorshDeserialize for BinaryKey {
    fn deserialize_reader<R: borsh::io::Read>(reader: &mut R) -> borsh::io::Result<Self> {
        let mut raw = [0u8; RAW_KEY_SIZE];
        reader.read_exact(&mut raw)?;
        BinaryKey::from_bytes(&raw).map_err(|_| {
            borsh::io::Error::new(borsh::io::ErrorKind::InvalidData, "malformed binary key")
        })
    }
}

fn as_bits(key: &KeyPath) -> Bits {
    Bits::from_le_bytes(*key)
}

// A mask with the low `len` bits set. `len` may be anywhere in `0..=256`.
fn prefix_mask(len: usize) -> Bits {
    if len == 0 {
        Bits::ZERO
    } else {
        Bits::MAX >> (KEY_SIZE_BITS - len)
    }
}

// Clear every bit at or beyond `len`.
pub(crate) fn truncate(key: &KeyPath, len: usize) -> KeyPath {
    (as_bits(key) & prefix_mask(len)).to_le_bytes()
}
