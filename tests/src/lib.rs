//! # PolyBridge Test Suite
//!
//! Cross-crate flows that no single subsystem can exercise on its own.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (seal verification, extra codec)
//! └── src/
//!     ├── fixtures.rs   # Local chain driven by in-process validator keys
//!     └── integration/
//!         ├── consensus_flow.rs   # Epoch transitions end to end
//!         ├── checkpoint_flow.rs  # Checkpoint submission and exits
//!         ├── bridge_flow.rs      # Node bootstrap to batch deposits
//!         └── onboarding_flow.rs  # Whitelist, register, stake, join roster
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pb-tests
//! cargo test -p pb-tests integration::bridge_flow
//! cargo bench -p pb-tests
//! ```

#[cfg(test)]
pub mod fixtures;
pub mod integration;
