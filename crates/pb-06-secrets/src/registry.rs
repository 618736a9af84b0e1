//! Startup-time backend selection.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::adapters::{InMemorySecretsManager, LocalSecretsManager};
use crate::domain::{SecretsError, SecretsManagerConfig, SecretsManagerType, SecretsResult, PATH_KEY};
use crate::ports::outbound::SecretsManager;

/// Builds a backend from its config.
pub type SecretsManagerFactory =
    Arc<dyn Fn(&SecretsManagerConfig) -> SecretsResult<Arc<dyn SecretsManager>> + Send + Sync>;

/// Maps backend types to factories.
///
/// `local` and `in-memory` are registered by default. Remote backends are
/// supplied by the embedder with [`SecretsManagerRegistry::register`].
pub struct SecretsManagerRegistry {
    factories: HashMap<SecretsManagerType, SecretsManagerFactory>,
}

impl Default for SecretsManagerRegistry {
    fn default() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(SecretsManagerType::Local, Arc::new(local_factory));
        registry.register(
            SecretsManagerType::InMemory,
            Arc::new(|_: &SecretsManagerConfig| {
                Ok(Arc::new(InMemorySecretsManager::new()) as Arc<dyn SecretsManager>)
            }),
        );
        registry
    }
}

impl SecretsManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the factory for `kind`.
    pub fn register(&mut self, kind: SecretsManagerType, factory: SecretsManagerFactory) {
        self.factories.insert(kind, factory);
    }

    pub fn supports(&self, kind: SecretsManagerType) -> bool {
        self.factories.contains_key(&kind)
    }

    pub fn create(&self, config: &SecretsManagerConfig) -> SecretsResult<Arc<dyn SecretsManager>> {
        let factory = self
            .factories
            .get(&config.kind)
            .ok_or(SecretsError::UnsupportedBackend { kind: config.kind })?;
        let manager = factory(config)?;
        info!(kind = %config.kind, "[pb-06] Secrets manager initialised");
        Ok(manager)
    }
}

fn local_factory(config: &SecretsManagerConfig) -> SecretsResult<Arc<dyn SecretsManager>> {
    let path = config
        .extra
        .get(PATH_KEY)
        .ok_or(SecretsError::MissingConfig("extra.path"))?;
    Ok(Arc::new(LocalSecretsManager::new(path)))
}
