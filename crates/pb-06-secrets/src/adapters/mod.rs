//! Secrets backends.

mod in_memory;
mod local;

pub use in_memory::InMemorySecretsManager;
pub use local::LocalSecretsManager;
