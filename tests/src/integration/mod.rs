//! Cross-subsystem integration flows.

pub mod bridge_flow;
pub mod checkpoint_flow;
pub mod consensus_flow;
pub mod onboarding_flow;
