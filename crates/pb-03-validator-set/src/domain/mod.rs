//! Domain layer for the validator set subsystem.

mod epoch;
mod errors;
mod uptime;
mod validator_set;

pub use epoch::*;
pub use errors::*;
pub use uptime::*;
pub use validator_set::*;
