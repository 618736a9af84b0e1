//! # Shared Types Crate
//!
//! Primitive types used across the PolyBridge subsystems.
//!
//! ## Design Principles
//!
//! - **Plain byte arrays**: hashes and addresses are fixed-size arrays so every
//!   subsystem can copy and compare them without conversions.
//! - **One parsing path**: amounts, addresses and hashes coming from
//!   configuration or operator input are parsed here and nowhere else.

pub mod entities;
pub mod errors;
pub mod serde_hex;

pub use entities::*;
pub use errors::*;
