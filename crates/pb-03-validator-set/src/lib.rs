//! # Validator Set & Uptime Tracker (PB-03)
//!
//! Holds the active validator roster and decides whether an aggregated BLS
//! signature carries a quorum.
//!
//! ## Roster Versions
//!
//! A [`ValidatorSet`] is immutable once built. Epoch transitions call
//! [`ValidatorSet::apply_delta`], which returns a new version; the
//! [`ValidatorSetTracker`] swaps the shared `Arc` wholesale so concurrent
//! header verification always sees one consistent roster.
//!
//! ## Quorum
//!
//! Signed power `p` over total active power `T` is a quorum iff `3p > 2T`,
//! evaluated in 512-bit arithmetic.
//!
//! ## Uptime
//!
//! [`UptimeTracker`] counts, per validator, the blocks whose commit seal the
//! validator contributed to. Counts reset every epoch.

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::inbound::ValidatorSetQueries;
pub use service::ValidatorSetTracker;
