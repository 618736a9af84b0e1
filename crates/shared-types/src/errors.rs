//! # Error Types
//!
//! Parsing errors for primitives supplied by operators or configuration.

use thiserror::Error;

/// Errors raised while parsing primitive values from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Input was not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded bytes had the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Input was not a valid unsigned 256-bit integer.
    #[error("Invalid uint256 value: {0:?}")]
    InvalidUint256(String),
}
