//! Domain layer for key management.

mod config;
mod errors;
mod names;
mod network;
mod wallet;

pub use config::*;
pub use errors::*;
pub use names::*;
pub use network::*;
pub use wallet::*;
