//! # PolyBridge Node
//!
//! Loads the node configuration, installs tracing, opens the secrets backend
//! and runs until interrupted.
//!
//! ## Startup Sequence
//!
//! 1. Read config from the first argument or `PB_CONFIG`
//! 2. Install the tracing subscriber
//! 3. Validate chain parameters and the genesis validator set
//! 4. Load the validator account from the secrets backend
//! 5. Signal ready, wait for Ctrl+C

use anyhow::{Context, Result};
use node_runtime::telemetry::init_tracing;
use node_runtime::{NodeConfig, NodeRuntime};
use pb_06_secrets::SecretsManagerRegistry;
use tracing::info;

const CONFIG_ENV: &str = "PB_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "polybridge.json";

fn config_path() -> String {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let path = config_path();
    let config =
        NodeConfig::load(&path).with_context(|| format!("loading node config from {path}"))?;

    init_tracing(&config.telemetry).context("installing tracing subscriber")?;

    let registry = SecretsManagerRegistry::new();
    let node = NodeRuntime::bootstrap(config, &registry)
        .await
        .context("bootstrapping node")?;

    let consensus = node.consensus();
    let roster = consensus.validators().current();
    info!(
        chain_id = consensus.chain_id(),
        epoch = roster.epoch(),
        validators = roster.len(),
        bridge = node.config().polybft.is_bridge_enabled(),
        "[pb-03] Node is running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c().await?;
    info!("[pb-03] Shutdown complete");
    Ok(())
}
