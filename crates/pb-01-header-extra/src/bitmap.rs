//! Signer bitmap.

use bitvec::prelude::{BitVec, Lsb0};

/// Byte-addressed little-endian bitset selecting validators by roster index.
///
/// Bit `i` lives in byte `i / 8` under mask `1 << (i % 8)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bitmap {
    bits: BitVec<u8, Lsb0>,
}

impl Bitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap raw bitmap bytes as read from the wire.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bits: BitVec::from_vec(bytes),
        }
    }

    /// Build a bitmap with the given indices set.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bitmap = Self::new();
        for index in indices {
            bitmap.set(index);
        }
        bitmap
    }

    /// Raw bytes, as written to the wire.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// Set bit `index`, growing the byte buffer as needed.
    pub fn set(&mut self, index: usize) {
        if index >= self.bits.len() {
            let bytes = index / 8 + 1;
            self.bits.resize(bytes * 8, false);
        }
        self.bits.set(index, true);
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.bits.get(index).is_some_and(|bit| *bit)
    }

    /// Indices of set bits, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Capacity in bits (always a multiple of 8).
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Highest set index, if any.
    pub fn highest_set(&self) -> Option<usize> {
        self.bits.last_one()
    }
}
