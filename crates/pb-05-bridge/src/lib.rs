//! # Bridge Transaction Orchestrator (PB-05)
//!
//! Turns bridge intents into root-chain contract calls and settles them.
//!
//! ## Deposit Protocol
//!
//! ```text
//! [mint (test mode)] → approve(predicate, Σ amounts) → mined
//!                                   │
//!                 ┌─────────────────┼─────────────────┐
//!                 ▼                 ▼                 ▼
//!           depositTo(A)      depositTo(B)      depositTo(C)
//! ```
//!
//! The approval is a hard prerequisite: no leg is broadcast before its
//! receipt reports success.
//!
//! ## Partial Failure
//!
//! Legs run concurrently under a shared cancellation flag. The first failing
//! leg raises the flag; legs not yet started are never broadcast. Legs
//! already broadcast cannot be recalled and run to completion. The resulting
//! [`BridgeError::BatchFailed`] lists which legs confirmed, which failed
//! later (with their errors), which are still unsettled and which never
//! started, so callers can reconcile.
//!
//! ## Single-Transaction Flows
//!
//! Whitelisting, registration, staking and exits require both a successful
//! receipt and the expected event log. A successful receipt without the log
//! is a failure.

#![warn(clippy::all)]

pub mod adapters;
pub mod contracts;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryTxRelayer;
pub use domain::*;
pub use ports::outbound::TxRelayer;
pub use service::BridgeOrchestrator;
