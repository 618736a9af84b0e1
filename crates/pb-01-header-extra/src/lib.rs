//! # Header Extension Codec (PB-01)
//!
//! Encodes and decodes the consensus payload carried in a block header's
//! `extra` field, and computes the canonical header hash.
//!
//! ## Wire Layout
//!
//! ```text
//! extra = vanity[32] ‖ rlp([Validators, Parent, Committed, Checkpoint])
//! ```
//!
//! An absent field is written as the empty list `0xc0`.
//!
//! ## Header Hash
//!
//! The hash pre-image replaces `Committed` with an empty signature, so a header
//! hashes the same before and after its commit seal is attached. An `extra`
//! that cannot be decoded hashes to [`shared_types::ZERO_HASH`].

#![warn(clippy::all)]

pub mod bitmap;
pub mod checkpoint;
pub mod codec;
pub mod errors;
pub mod extra;
pub mod header;
pub mod signature;
pub mod validator;

pub use bitmap::Bitmap;
pub use checkpoint::CheckpointData;
pub use errors::{HeaderError, HeaderResult};
pub use extra::{Extra, EXTRA_VANITY};
pub use header::{header_hash, Header};
pub use signature::AggregatedSignature;
pub use validator::{ValidatorMetadata, ValidatorSetDelta};
