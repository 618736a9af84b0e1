//! # Node Configuration
//!
//! Chain parameters (`engine.polybft` section of the chain config), root-chain
//! bridge addresses and node-local settings.
//!
//! Amounts are accepted as decimal or `0x` hex strings. BLS material in the
//! genesis validator list is hex; every genesis validator must carry a valid
//! KOSK signature for the configured chain id.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use pb_01_header_extra::ValidatorMetadata;
use pb_02_bls_signer::{verify_kosk_signature, PublicKey, Signature};
use pb_03_validator_set::{EpochSchedule, ValidatorSet, ValidatorSetError};
use pb_06_secrets::SecretsManagerConfig;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use shared_types::{address_to_hex, decode_hex, serde_hex, Address, Hash, U256};
use thiserror::Error;

pub use pb_05_bridge::OrchestratorConfig;

use crate::telemetry::TelemetryConfig;

/// Epoch of the genesis roster. Block 0 is trusted; blocks 1..=epochSize
/// belong to epoch 1.
pub const GENESIS_EPOCH: u64 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid epoch schedule: {0}")]
    Schedule(#[source] ValidatorSetError),

    #[error("Genesis validator set is empty")]
    EmptyValidatorSet,

    #[error("Genesis validator #{index} ({address}): {reason}")]
    InvalidValidator {
        index: usize,
        address: String,
        reason: String,
    },

    #[error("Invalid genesis validator set: {0}")]
    GenesisSet(#[source] ValidatorSetError),

    #[error(transparent)]
    Orchestrator(#[from] pb_05_bridge::BridgeError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Name, symbol and decimals of the native token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Polygon".into(),
            symbol: "MATIC".into(),
            decimals: 18,
        }
    }
}

/// A validator as listed in the genesis file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisValidator {
    #[serde(with = "serde_hex::address")]
    pub address: Address,
    /// Hex-encoded compressed BLS public key.
    pub bls_key: String,
    /// Hex-encoded KOSK signature over `address ‖ chainId`.
    pub bls_signature: String,
    #[serde(with = "serde_hex::opt_uint256", default)]
    pub balance: Option<U256>,
    #[serde(with = "serde_hex::opt_uint256", default)]
    pub stake: Option<U256>,
    #[serde(default)]
    pub multi_addr: String,
}

impl GenesisValidator {
    fn invalid(&self, index: usize, reason: impl ToString) -> ConfigError {
        ConfigError::InvalidValidator {
            index,
            address: address_to_hex(&self.address),
            reason: reason.to_string(),
        }
    }

    pub fn bls_public_key(&self) -> Result<PublicKey, String> {
        let bytes = decode_hex(&self.bls_key).map_err(|e| e.to_string())?;
        PublicKey::from_bytes(&bytes).map_err(|e| e.to_string())
    }

    pub fn kosk_signature(&self) -> Result<Signature, String> {
        let bytes = decode_hex(&self.bls_signature).map_err(|e| e.to_string())?;
        Signature::from_bytes(&bytes).map_err(|e| e.to_string())
    }

    /// Roster entry with voting power equal to the stake, after checking the
    /// KOSK signature against `chain_id`.
    pub fn to_validator_metadata(
        &self,
        index: usize,
        chain_id: u64,
    ) -> ConfigResult<ValidatorMetadata> {
        let bls_key = self.bls_public_key().map_err(|e| self.invalid(index, e))?;
        let signature = self.kosk_signature().map_err(|e| self.invalid(index, e))?;
        verify_kosk_signature(&signature, &bls_key, &self.address, chain_id)
            .map_err(|e| self.invalid(index, e))?;

        let stake = self.stake.unwrap_or_default();
        if stake.is_zero() {
            return Err(self.invalid(index, "zero stake"));
        }
        Ok(ValidatorMetadata::new(self.address, bls_key, stake))
    }
}

/// Root-chain contract addresses used by the bridge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(rename = "stateSenderAddress", with = "serde_hex::address")]
    pub state_sender_addr: Address,
    #[serde(rename = "checkpointManagerAddress", with = "serde_hex::address")]
    pub checkpoint_manager_addr: Address,
    #[serde(rename = "exitHelperAddress", with = "serde_hex::address")]
    pub exit_helper_addr: Address,
    #[serde(rename = "erc20PredicateAddress", with = "serde_hex::address")]
    pub root_erc20_predicate_addr: Address,
    #[serde(rename = "nativeERC20Address", with = "serde_hex::address")]
    pub root_native_erc20_addr: Address,
    #[serde(rename = "erc721PredicateAddress", with = "serde_hex::address")]
    pub root_erc721_predicate_addr: Address,
    #[serde(rename = "erc1155PredicateAddress", with = "serde_hex::address")]
    pub root_erc1155_predicate_addr: Address,
    #[serde(rename = "jsonRPCEndpoint")]
    pub json_rpc_endpoint: String,
    /// Root-chain block to start tracking each contract's events from,
    /// keyed by `0x` address.
    #[serde(rename = "eventTrackerStartBlocks", default)]
    pub event_tracker_start_blocks: BTreeMap<String, u64>,
}

impl BridgeConfig {
    /// Configured start block for `contract`, or 0.
    pub fn event_tracker_start_block(&self, contract: &Address) -> u64 {
        let wanted = address_to_hex(contract);
        self.event_tracker_start_blocks
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(&wanted))
            .map(|(_, block)| *block)
            .unwrap_or(0)
    }
}

/// Addresses of a root-chain deployment, as written by the deployer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootchainConfig {
    pub json_rpc_addr: String,
    pub state_sender_address: Address,
    pub checkpoint_manager_address: Address,
    pub bls_address: Address,
    pub bn256_g2_address: Address,
    pub exit_helper_address: Address,
    pub root_erc20_predicate_address: Address,
    pub root_native_erc20_address: Address,
    pub erc20_template_address: Address,
    pub root_erc721_predicate_address: Address,
    pub root_erc721_address: Address,
    pub root_erc1155_predicate_address: Address,
    pub root_erc1155_address: Address,
}

impl RootchainConfig {
    pub fn to_bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            state_sender_addr: self.state_sender_address,
            checkpoint_manager_addr: self.checkpoint_manager_address,
            exit_helper_addr: self.exit_helper_address,
            root_erc20_predicate_addr: self.root_erc20_predicate_address,
            root_native_erc20_addr: self.root_native_erc20_address,
            root_erc721_predicate_addr: self.root_erc721_predicate_address,
            root_erc1155_predicate_addr: self.root_erc1155_predicate_address,
            json_rpc_endpoint: self.json_rpc_addr.clone(),
            event_tracker_start_blocks: BTreeMap::new(),
        }
    }
}

/// The `engine.polybft` chain parameters.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyBftConfig {
    pub chain_id: u64,
    pub initial_validator_set: Vec<GenesisValidator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge: Option<BridgeConfig>,
    pub epoch_size: u64,
    #[serde(default)]
    pub epoch_reward: u64,
    pub sprint_size: u64,
    /// Target block interval, in milliseconds on the wire.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub block_time: Duration,
    #[serde(with = "serde_hex::address", default)]
    pub governance: Address,
    #[serde(rename = "mintableNative", default)]
    pub mintable_native_token: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_token_config: Option<TokenConfig>,
    #[serde(with = "serde_hex::hash", default)]
    pub initial_trie_root: Hash,
}

impl PolyBftConfig {
    pub fn is_bridge_enabled(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn epoch_schedule(&self) -> ConfigResult<EpochSchedule> {
        EpochSchedule::new(self.epoch_size, self.sprint_size).map_err(ConfigError::Schedule)
    }

    /// Genesis roster entries, each KOSK-verified.
    pub fn genesis_validators(&self) -> ConfigResult<Vec<ValidatorMetadata>> {
        if self.initial_validator_set.is_empty() {
            return Err(ConfigError::EmptyValidatorSet);
        }
        self.initial_validator_set
            .iter()
            .enumerate()
            .map(|(index, v)| v.to_validator_metadata(index, self.chain_id))
            .collect()
    }

    pub fn genesis_validator_set(&self) -> ConfigResult<ValidatorSet> {
        ValidatorSet::new(GENESIS_EPOCH, self.genesis_validators()?)
            .map_err(ConfigError::GenesisSet)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.epoch_schedule()?;
        self.genesis_validator_set()?;
        Ok(())
    }
}

/// Everything a node needs at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    pub polybft: PolyBftConfig,
    #[serde(default)]
    pub secrets: SecretsManagerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

impl NodeConfig {
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.polybft.validate()?;
        self.orchestrator.validate()?;
        Ok(())
    }
}
