//! BLS error types.

use thiserror::Error;

/// Errors from BLS key handling, aggregation and verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlsError {
    /// Secret key bytes are not a valid scalar
    #[error("Invalid BLS private key")]
    InvalidPrivateKey,

    /// Public key bytes are not a valid, non-identity G1 point
    #[error("Invalid BLS public key")]
    InvalidPublicKey,

    /// Signature bytes are not a valid G2 point in the prime-order subgroup
    #[error("Invalid BLS signature encoding")]
    InvalidSignature,

    /// Key generation failed
    #[error("BLS key generation failed: {0}")]
    KeyGeneration(String),

    /// Cannot aggregate an empty list
    #[error("Cannot aggregate empty list")]
    EmptyAggregation,

    /// Point addition failed during aggregation
    #[error("BLS aggregation failed")]
    AggregationFailed,

    /// KOSK proof did not verify for the claimed address
    #[error("Invalid KOSK signature for validator {address}")]
    InvalidKoskSignature { address: String },
}
