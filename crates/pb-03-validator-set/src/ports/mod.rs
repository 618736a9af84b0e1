//! Ports for the validator set subsystem.

pub mod inbound;
