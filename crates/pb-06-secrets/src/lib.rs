//! # Key Manager (PB-06)
//!
//! Supplies the validator's ECDSA, BLS and network keys plus its KOSK
//! registration signature through the [`SecretsManager`] capability.
//!
//! ## Backends
//!
//! | Type | Adapter |
//! |------|---------|
//! | `local` | [`LocalSecretsManager`], one file per secret under a data dir |
//! | `in-memory` | [`InMemorySecretsManager`] |
//! | `hashicorp-vault`, `aws-ssm`, `gcp-ssm` | embedder-registered factories |
//!
//! The backend is picked at startup from [`SecretsManagerConfig`] through the
//! [`SecretsManagerRegistry`]. Everything else depends only on the trait.
//!
//! ## Stored Formats
//!
//! Keys and the KOSK signature are stored as lowercase hex text.

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod helper;
pub mod ports;
pub mod registry;

pub use adapters::{InMemorySecretsManager, LocalSecretsManager};
pub use domain::*;
pub use ports::outbound::SecretsManager;
pub use registry::{SecretsManagerFactory, SecretsManagerRegistry};
