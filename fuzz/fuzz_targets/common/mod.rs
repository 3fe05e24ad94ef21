use arbitrary::Arbitrary;
use bitvec::{order::Lsb0, view::BitView};
use mapproof_core::{BinaryKey, KeyPath};

/// Two leaves which diverge right after `prefix`, with `left` taking the unset bit.
#[derive(Debug)]
pub struct Split {
    pub prefix: BinaryKey,
    pub left: BinaryKey,
    pub right: BinaryKey,
}

impl<'a> Arbitrary<'a> for Split {
    fn arbitrary(input: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let len = input.int_in_range(0..=255)?;
        let mut left = KeyPath::default();
        let mut right = KeyPath::default();
        input.fill_buffer(&mut left)?;
        input.fill_buffer(&mut right)?;

        right.view_bits_mut::<Lsb0>()[..len].copy_from_bitslice(&left.view_bits::<Lsb0>()[..len]);
        left.view_bits_mut::<Lsb0>().set(len, false);
        right.view_bits_mut::<Lsb0>().set(len, true);

        let mut prefix = left;
        prefix.view_bits_mut::<Lsb0>()[len..].fill(false);
        let prefix =
            BinaryKey::branch(prefix, len).map_err(|_| arbitrary::Error::IncorrectFormat)?;

        Ok(Self {
            prefix,
            left: BinaryKey::leaf(left),
            right: BinaryKey::leaf(right),
        })
    }
}
