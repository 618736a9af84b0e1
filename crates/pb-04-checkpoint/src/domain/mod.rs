//! Domain layer for checkpoints.

mod builder;
mod errors;
mod event;
mod exit;
mod merkle;
mod store;

pub use builder::*;
pub use errors::*;
pub use event::*;
pub use exit::*;
pub use merkle::*;
pub use store::*;
