//! # Checkpoint Builder (PB-04)
//!
//! Commits ordered state-sync events into a keccak Merkle root carried by
//! [`pb_01_header_extra::CheckpointData`], and produces the proofs users
//! need to exit on the root chain.
//!
//! Event IDs are contiguous. A gap is an error, never skipped over.
//! Nothing here performs I/O.

#![warn(clippy::all)]

pub mod domain;

pub use domain::*;
