use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use zeroize::Zeroizing;

use crate::domain::{SecretName, SecretsError, SecretsResult};
use crate::ports::outbound::SecretsManager;

/// Process-local secrets, for tests and ephemeral dev nodes.
#[derive(Default)]
pub struct InMemorySecretsManager {
    secrets: RwLock<HashMap<SecretName, Zeroizing<Vec<u8>>>>,
}

impl InMemorySecretsManager {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretsManager for InMemorySecretsManager {
    async fn has_secret(&self, name: SecretName) -> SecretsResult<bool> {
        Ok(self.secrets.read().contains_key(&name))
    }

    async fn get_secret(&self, name: SecretName) -> SecretsResult<Zeroizing<Vec<u8>>> {
        self.secrets
            .read()
            .get(&name)
            .cloned()
            .ok_or(SecretsError::NotFound { name })
    }

    async fn set_secret(&self, name: SecretName, value: &[u8]) -> SecretsResult<()> {
        let mut secrets = self.secrets.write();
        if secrets.contains_key(&name) {
            return Err(SecretsError::AlreadyExists { name });
        }
        secrets.insert(name, Zeroizing::new(value.to_vec()));
        Ok(())
    }

    async fn remove_secret(&self, name: SecretName) -> SecretsResult<()> {
        self.secrets
            .write()
            .remove(&name)
            .map(|_| ())
            .ok_or(SecretsError::NotFound { name })
    }
}
