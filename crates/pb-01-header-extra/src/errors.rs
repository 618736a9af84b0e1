//! Codec errors.

use pb_02_bls_signer::BlsError;
use thiserror::Error;

/// Errors raised while decoding header extension data.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HeaderError {
    #[error("Extra data too short: {actual} bytes, need at least {minimum}")]
    ExtraTooShort { actual: usize, minimum: usize },

    #[error("Malformed RLP in {field}: {source}")]
    Rlp {
        field: &'static str,
        #[source]
        source: rlp::DecoderError,
    },

    #[error("{field}: expected a list of {expected} items, got {actual}")]
    WrongItemCount {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field}: {extra} trailing bytes after RLP payload")]
    TrailingBytes { field: &'static str, extra: usize },

    #[error("Invalid BLS public key for added validator {index}: {source}")]
    InvalidPublicKey {
        index: usize,
        #[source]
        source: BlsError,
    },
}

pub type HeaderResult<T> = Result<T, HeaderError>;
