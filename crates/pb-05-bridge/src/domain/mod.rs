//! Domain layer for the bridge orchestrator.

mod config;
mod entities;
mod errors;
mod outcome;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use outcome::*;
