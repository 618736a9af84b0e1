//! Node bootstrap: configuration, keys and the consensus runtime.

use std::sync::Arc;

use pb_02_bls_signer::verify_kosk_signature;
use pb_05_bridge::{BridgeOrchestrator, TxRelayer};
use pb_06_secrets::{helper, Account, SecretsError, SecretsManager, SecretsManagerRegistry};
use shared_types::address_to_hex;
use tracing::{info, warn};

use crate::config::NodeConfig;
use crate::consensus::ConsensusRuntime;
use crate::errors::RuntimeResult;

/// A bootstrapped node.
pub struct NodeRuntime {
    config: NodeConfig,
    secrets: Arc<dyn SecretsManager>,
    account: Account,
    consensus: Arc<ConsensusRuntime>,
}

impl NodeRuntime {
    /// Validate `config`, open the configured secrets backend and load the
    /// validator account from it.
    pub async fn bootstrap(
        config: NodeConfig,
        registry: &SecretsManagerRegistry,
    ) -> RuntimeResult<Self> {
        let secrets = registry.create(&config.secrets)?;
        Self::bootstrap_with(config, secrets).await
    }

    /// Like [`NodeRuntime::bootstrap`], with an already opened backend.
    pub async fn bootstrap_with(
        config: NodeConfig,
        secrets: Arc<dyn SecretsManager>,
    ) -> RuntimeResult<Self> {
        config.validate()?;
        let chain_id = config.polybft.chain_id;
        let account = helper::load_account(secrets.as_ref()).await?;

        // A stored proof must be for this chain
        if let Some(signature) = helper::load_bls_signature(secrets.as_ref()).await? {
            verify_kosk_signature(
                &signature,
                &account.bls_public_key(),
                &account.address(),
                chain_id,
            )
            .map_err(SecretsError::from)?;
        }

        let consensus = ConsensusRuntime::new(
            chain_id,
            config.polybft.epoch_schedule()?,
            config.polybft.genesis_validator_set()?,
        );

        let runtime = Self {
            config,
            secrets,
            account,
            consensus: Arc::new(consensus),
        };
        let address = address_to_hex(&runtime.account.address());
        if runtime.is_validator() {
            info!(chain_id, %address, "[pb-06] Node bootstrapped as validator");
        } else {
            warn!(chain_id, %address, "[pb-06] Account is not in the current validator set");
        }
        Ok(runtime)
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn secrets(&self) -> Arc<dyn SecretsManager> {
        Arc::clone(&self.secrets)
    }

    pub fn consensus(&self) -> Arc<ConsensusRuntime> {
        Arc::clone(&self.consensus)
    }

    /// Whether the loaded account is an active member of the current roster.
    pub fn is_validator(&self) -> bool {
        self.consensus
            .validators()
            .current()
            .is_active(&self.account.address())
    }

    /// Bridge orchestrator over `relayer`, configured from the node config.
    pub fn bridge(&self, relayer: Arc<dyn TxRelayer>) -> BridgeOrchestrator {
        BridgeOrchestrator::new(relayer, self.config.orchestrator.clone())
    }
}
