//! # BLS Signature Engine (PB-02)
//!
//! BLS12-381 primitives for validator attestations.
//!
//! ## Curve Layout
//!
//! This uses blst's `min_pk` variant:
//! - Public keys are on G1 (48 bytes compressed)
//! - Signatures are on G2 (96 bytes compressed)
//!
//! ## Domain Separation
//!
//! Every sign and verify call takes a [`Domain`]. Each domain maps to its own
//! hash-to-curve DST, so a checkpoint attestation can never be replayed as a
//! validator-set attestation and vice versa. There is no domain-less API.
//!
//! ## KOSK
//!
//! Validators prove knowledge of their secret key at registration by signing
//! `address ‖ uint256(chainId)` under [`Domain::ValidatorSet`]. See [`kosk`].

#![warn(clippy::all)]

pub mod domain;
pub mod errors;
pub mod keys;
pub mod kosk;
pub mod signature;

pub use domain::Domain;
pub use errors::BlsError;
pub use keys::{PrivateKey, PublicKey};
pub use kosk::{kosk_message, make_kosk_signature, verify_kosk_signature};
pub use signature::{aggregate_public_keys, aggregate_signatures, Signature, Signatures};

/// Compressed public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 48;

/// Compressed signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 96;
