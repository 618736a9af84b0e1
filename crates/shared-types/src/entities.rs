//! # Core Primitives
//!
//! Hashes, addresses and helpers shared by the consensus and bridge crates.

use crate::errors::ParseError;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte keccak256 hash.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// The all-zero hash. Also used as the "not finalized / malformed" sentinel
/// returned by header hashing.
pub const ZERO_HASH: Hash = [0u8; 32];

/// The all-zero address.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Compute keccak256 over the given bytes.
pub fn keccak256(data: impl AsRef<[u8]>) -> Hash {
    use sha3::{Digest, Keccak256};

    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    hasher.finalize().into()
}

/// Format an address as `0x`-prefixed lowercase hex.
pub fn address_to_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Format a hash as `0x`-prefixed lowercase hex.
pub fn hash_to_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Parse a 20-byte address from hex, with or without `0x` prefix.
pub fn parse_address(raw: &str) -> Result<Address, ParseError> {
    let bytes = decode_hex(raw)?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| ParseError::InvalidLength {
            expected: 20,
            actual: b.len(),
        })
}

/// Parse a 32-byte hash from hex, with or without `0x` prefix.
pub fn parse_hash(raw: &str) -> Result<Hash, ParseError> {
    let bytes = decode_hex(raw)?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| ParseError::InvalidLength {
            expected: 32,
            actual: b.len(),
        })
}

/// Decode hex with an optional `0x` prefix.
pub fn decode_hex(raw: &str) -> Result<Vec<u8>, ParseError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| ParseError::InvalidHex(e.to_string()))
}

/// Parse an unsigned 256-bit integer given either in decimal or as `0x` hex.
///
/// Negative values, empty strings and values wider than 256 bits are rejected.
pub fn parse_uint256_or_hex(raw: &str) -> Result<U256, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::InvalidUint256(raw.to_string()));
    }

    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(digits) if !digits.is_empty() => U256::from_str_radix(digits, 16).ok(),
        Some(_) => None,
        None => U256::from_dec_str(trimmed).ok(),
    };

    parsed.ok_or_else(|| ParseError::InvalidUint256(raw.to_string()))
}

/// Encode a U256 as a 32-byte big-endian word.
pub fn u256_to_be_bytes(value: &U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}
