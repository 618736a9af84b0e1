//! Ports for the bridge orchestrator.

pub mod outbound;
