//! Aggregated commit signatures.

use rlp::{Encodable, Rlp, RlpStream};

use crate::bitmap::Bitmap;
use crate::codec;
use crate::errors::HeaderResult;

/// An aggregated BLS signature plus the bitmap of contributing validators.
///
/// The signature is kept as raw bytes: an empty signature is a valid wire
/// value (used in the header-hash pre-image) and is only parsed into a curve
/// point when verified against a roster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregatedSignature {
    pub signature: Vec<u8>,
    pub bitmap: Bitmap,
}

impl AggregatedSignature {
    pub fn new(signature: Vec<u8>, bitmap: Bitmap) -> Self {
        Self { signature, bitmap }
    }

    /// The empty signature, encoded as `[0x80, 0x80]`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.signature.is_empty() && self.bitmap.is_empty()
    }

    pub(crate) fn from_rlp(rlp: &Rlp<'_>, field: &'static str) -> HeaderResult<Self> {
        codec::expect_list(rlp, field, 2)?;
        let signature: Vec<u8> = codec::value(rlp, 0, field)?;
        let bitmap: Vec<u8> = codec::value(rlp, 1, field)?;
        Ok(Self {
            signature,
            bitmap: Bitmap::from_bytes(bitmap),
        })
    }
}

impl Encodable for AggregatedSignature {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        codec::append_bytes(s, &self.signature);
        codec::append_bytes(s, self.bitmap.as_bytes());
    }
}
