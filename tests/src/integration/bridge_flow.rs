//! # Bridge Flow
//!
//! A node boots from its JSON config and a local secrets directory, then
//! uses the loaded account to drive batch transfers through the bridge
//! orchestrator, including a batch where one leg reverts.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_sol_types::SolCall;
    use node_runtime::{NodeConfig, NodeRuntime};
    use pb_05_bridge::adapters::{calldata_mentions, Script};
    use pb_05_bridge::contracts::{approveCall, depositToCall, mintCall};
    use pb_05_bridge::{BridgeError, BridgeTransferRequest, InMemoryTxRelayer, TransferDirection};
    use pb_06_secrets::{helper, SecretsManagerConfig, SecretsManagerRegistry};
    use serde_json::json;
    use shared_types::{address_to_hex, Address, U256};

    use crate::fixtures::{Validator, CHAIN_ID};

    const TOKEN: Address = [0x70; 20];
    const PREDICATE: Address = [0x71; 20];

    fn config_json(secrets_dir: &str, genesis: &[serde_json::Value]) -> String {
        json!({
            "polybft": {
                "chainId": CHAIN_ID,
                "initialValidatorSet": genesis,
                "epochSize": 10,
                "sprintSize": 5,
                "blockTime": 2000
            },
            "secrets": { "type": "local", "extra": { "path": secrets_dir } },
            "telemetry": { "logLevel": "debug", "format": "json" },
            "orchestrator": {
                "receiptTimeout": 1000,
                "pollInterval": 10,
                "maxConcurrentLegs": 3
            }
        })
        .to_string()
    }

    /// Provision keys under a fresh directory and boot a node whose account
    /// is the only genesis validator.
    async fn boot() -> (NodeRuntime, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().display().to_string();
        let registry = SecretsManagerRegistry::new();

        let secrets = registry.create(&SecretsManagerConfig::local(&path)).unwrap();
        helper::init_ecdsa_validator_key(secrets.as_ref()).await.unwrap();
        helper::init_bls_validator_key(secrets.as_ref()).await.unwrap();
        let account = helper::load_account(secrets.as_ref()).await.unwrap();
        helper::init_validator_bls_signature(secrets.as_ref(), &account, CHAIN_ID)
            .await
            .unwrap();

        let entry = Validator::with_key(account.address(), account.bls.clone()).genesis_entry(100);
        let raw = config_json(&path, &[serde_json::to_value(entry).unwrap()]);
        let config_path = dir.path().join("polybridge.json");
        std::fs::write(&config_path, raw).unwrap();

        let config = NodeConfig::load(&config_path).unwrap();
        let node = NodeRuntime::bootstrap(config, &registry).await.unwrap();
        (node, dir)
    }

    fn request(receivers: &[Address], amounts: &[&str]) -> BridgeTransferRequest {
        let receivers: Vec<String> = receivers.iter().map(address_to_hex).collect();
        BridgeTransferRequest::parse(TOKEN, PREDICATE, &receivers, amounts).unwrap()
    }

    #[tokio::test]
    async fn test_node_deposits_with_loaded_account() {
        let (node, _dir) = boot().await;
        assert!(node.is_validator());
        let sender = &node.account().ecdsa;

        let relayer = Arc::new(InMemoryTxRelayer::new());
        let bridge = node.bridge(relayer.clone());
        assert_eq!(bridge.config().max_concurrent_legs, 3);

        let receivers = [[0xa1; 20], [0xa2; 20]];
        let request = request(&receivers, &["1000", "0x7d0"]).with_test_mode(true);
        let outcome = bridge.deposit_erc20(&request, sender).await.unwrap();

        assert_eq!(outcome.direction, TransferDirection::Deposit);
        assert_eq!(outcome.sender, sender.address());
        assert_eq!(outcome.tx_hashes.len(), 2);

        let sent = relayer.sent();
        assert_eq!(sent.len(), 4);
        assert!(sent.iter().all(|s| s.txn.from == sender.address()));

        let mint = mintCall::abi_decode(&sent[0].txn.input, true).unwrap();
        assert_eq!(mint.amount, alloy_primitives::U256::from(3000));
        let approve = approveCall::abi_decode(&sent[1].txn.input, true).unwrap();
        assert_eq!(approve.spender.0 .0, PREDICATE);
        assert_eq!(approve.amount, alloy_primitives::U256::from(3000));

        let mut deposited: Vec<Address> = sent[2..]
            .iter()
            .map(|s| depositToCall::abi_decode(&s.txn.input, true).unwrap().receiver.0 .0)
            .collect();
        deposited.sort();
        assert_eq!(deposited, receivers.to_vec());

        let rendered = outcome.to_string();
        assert!(rendered.starts_with("[DEPOSIT ERC20]"));
        assert!(rendered.contains(&address_to_hex(&receivers[1])));
    }

    #[tokio::test]
    async fn test_partial_batch_failure_then_retry() {
        let (node, _dir) = boot().await;
        let sender = &node.account().ecdsa;
        let (a, b, c) = ([0xa1; 20], [0xb2; 20], [0xc3; 20]);

        let relayer = Arc::new(InMemoryTxRelayer::new());
        relayer.script(calldata_mentions(b), Script::revert().after_polls(1));
        let err = node
            .bridge(relayer.clone())
            .deposit_erc20(&request(&[a, b, c], &["1", "2", "3"]), sender)
            .await
            .unwrap_err();

        let BridgeError::BatchFailed {
            source,
            failed,
            confirmed,
            failed_after,
            unconfirmed,
            not_started,
        } = err
        else {
            panic!("expected a batch failure");
        };
        assert!(matches!(*source, BridgeError::Reverted { .. }));
        assert_eq!(failed.receiver, b);
        let mut confirmed: Vec<Address> = confirmed.iter().map(|l| l.receiver).collect();
        confirmed.sort();
        assert_eq!(confirmed, vec![a, c]);
        assert!(failed_after.is_empty());
        assert!(unconfirmed.is_empty());
        assert!(not_started.is_empty());

        // Retry only the failed leg on a healthy relayer
        let retry_relayer = Arc::new(InMemoryTxRelayer::new());
        let amount = failed.amount.to_string();
        let retry = request(&[failed.receiver], &[amount.as_str()]);
        let outcome = node
            .bridge(retry_relayer.clone())
            .deposit_erc20(&retry, sender)
            .await
            .unwrap();
        assert_eq!(outcome.legs[0].amount, U256::from(2));
        assert_eq!(retry_relayer.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_withdraw_skips_approval() {
        let (node, _dir) = boot().await;
        let relayer = Arc::new(InMemoryTxRelayer::new());
        let outcome = node
            .bridge(relayer.clone())
            .withdraw_erc20(&request(&[[0xd4; 20]], &["5"]), &node.account().ecdsa)
            .await
            .unwrap();

        assert_eq!(outcome.direction, TransferDirection::Withdraw);
        assert_eq!(relayer.sent().len(), 1);
        assert_eq!(relayer.sent()[0].txn.to, PREDICATE);
    }

    #[test]
    fn test_request_validation() {
        let receivers = vec![address_to_hex(&[0xa1; 20])];
        assert!(matches!(
            BridgeTransferRequest::parse(TOKEN, PREDICATE, &receivers, &["1", "2"]),
            Err(BridgeError::InvalidRequest(_))
        ));
        assert!(matches!(
            BridgeTransferRequest::parse(TOKEN, PREDICATE, &receivers, &["ten"]),
            Err(BridgeError::InvalidAmount { index: 0, .. })
        ));
        assert!(matches!(
            BridgeTransferRequest::parse(TOKEN, PREDICATE, &["0x12"], &["1"]),
            Err(BridgeError::InvalidReceiver { index: 0, .. })
        ));
    }
}
