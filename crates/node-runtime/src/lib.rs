//! # PolyBridge Node Runtime
//!
//! Wires the subsystems into a consensus node.
//!
//! ## Header Pipeline
//!
//! ```text
//! proposer:  ValidatorSetTracker ──roster──→ build_extra ──→ Extra::encode
//!                                                 │
//!                         validators sign seal_message(header) ──→ Committed
//!
//! receiver:  verify_header(header, parent)   [read-only, concurrent]
//!                 │  decode Extra, require Checkpoint
//!                 │  Committed over this header   ← roster of its epoch
//!                 │  Parent over the parent       ← roster of the parent's epoch
//!                 │  delta exactly at epoch end, valid against roster
//!                 ▼
//!            finalize_block(verified)        [serialised]
//!                 │  record uptime
//!                 └─ epoch end → transition roster → EpochSummary
//! ```
//!
//! ## Modules
//!
//! - `config` - chain and node configuration
//! - `consensus` - header verification and epoch finalisation
//! - `node` - bootstrap from configuration and secrets
//! - `telemetry` - tracing subscriber installation

pub mod config;
pub mod consensus;
pub mod errors;
pub mod node;
pub mod telemetry;

pub use config::{NodeConfig, PolyBftConfig};
pub use consensus::{ConsensusRuntime, EpochSummary, VerifiedHeader};
pub use errors::{RuntimeError, RuntimeResult};
pub use node::NodeRuntime;
