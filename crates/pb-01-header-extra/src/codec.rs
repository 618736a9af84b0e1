//! RLP helpers shared by the codec types.

use rlp::{Decodable, Rlp, RlpStream};

use crate::errors::{HeaderError, HeaderResult};

/// The empty RLP list, written for absent optional fields.
pub const EMPTY_LIST: u8 = 0xc0;

/// Parse `bytes` as exactly one RLP list of `expected` items.
pub fn list<'a>(bytes: &'a [u8], field: &'static str, expected: usize) -> HeaderResult<Rlp<'a>> {
    let rlp = Rlp::new(bytes);
    let info = rlp
        .payload_info()
        .map_err(|source| HeaderError::Rlp { field, source })?;
    if info.total() > bytes.len() {
        return Err(HeaderError::Rlp {
            field,
            source: rlp::DecoderError::RlpIsTooShort,
        });
    }
    if info.total() < bytes.len() {
        return Err(HeaderError::TrailingBytes {
            field,
            extra: bytes.len() - info.total(),
        });
    }
    expect_list(&rlp, field, expected)?;
    Ok(rlp)
}

/// Check that `rlp` is a list of `expected` items.
pub fn expect_list(rlp: &Rlp<'_>, field: &'static str, expected: usize) -> HeaderResult<()> {
    if !rlp.is_list() {
        return Err(HeaderError::Rlp {
            field,
            source: rlp::DecoderError::RlpExpectedToBeList,
        });
    }
    let actual = rlp
        .item_count()
        .map_err(|source| HeaderError::Rlp { field, source })?;
    if actual != expected {
        return Err(HeaderError::WrongItemCount {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Item `index` of a list.
pub fn at<'a>(rlp: &Rlp<'a>, index: usize, field: &'static str) -> HeaderResult<Rlp<'a>> {
    rlp.at(index)
        .map_err(|source| HeaderError::Rlp { field, source })
}

/// Decode item `index` as a scalar value.
pub fn value<T: Decodable>(rlp: &Rlp<'_>, index: usize, field: &'static str) -> HeaderResult<T> {
    rlp.val_at(index)
        .map_err(|source| HeaderError::Rlp { field, source })
}

/// Decode item `index` as a byte string of exactly `N` bytes.
pub fn fixed<const N: usize>(
    rlp: &Rlp<'_>,
    index: usize,
    field: &'static str,
) -> HeaderResult<[u8; N]> {
    let bytes: Vec<u8> = value(rlp, index, field)?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| HeaderError::InvalidLength {
            field,
            expected: N,
            actual: b.len(),
        })
}

/// Whether an item is the empty list used for an absent field.
pub fn is_absent(rlp: &Rlp<'_>) -> bool {
    rlp.is_list() && rlp.item_count().map(|n| n == 0).unwrap_or(false)
}

/// Append a byte string.
pub fn append_bytes(stream: &mut RlpStream, bytes: &[u8]) {
    stream.append(&bytes.to_vec());
}
