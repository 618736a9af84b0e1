//! Outbound secrets storage capability.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{SecretName, SecretsResult};

/// A store of named secrets.
///
/// Implementations must refuse to overwrite: `set_secret` on an existing name
/// fails with `AlreadyExists`.
#[async_trait]
pub trait SecretsManager: Send + Sync {
    async fn has_secret(&self, name: SecretName) -> SecretsResult<bool>;

    /// Fails with `NotFound` if absent.
    async fn get_secret(&self, name: SecretName) -> SecretsResult<Zeroizing<Vec<u8>>>;

    async fn set_secret(&self, name: SecretName, value: &[u8]) -> SecretsResult<()>;

    async fn remove_secret(&self, name: SecretName) -> SecretsResult<()>;
}
