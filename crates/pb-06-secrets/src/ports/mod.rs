//! Ports for key management.

pub mod outbound;
