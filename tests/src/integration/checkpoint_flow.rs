//! # Checkpoint Flow
//!
//! State sync events travel from the event store into an epoch-ending
//! block's checkpoint, the sealed checkpoint is submitted to the root-chain
//! checkpoint manager, and a user exits one committed event with a Merkle
//! proof against the submitted event root.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use alloy_sol_types::SolCall;
    use pb_01_header_extra::ValidatorSetDelta;
    use pb_02_bls_signer::Domain;
    use pb_03_validator_set::EpochSchedule;
    use pb_04_checkpoint::{CheckpointBuilder, ExitProof, StateSyncEvent, StateSyncStore};
    use pb_05_bridge::adapters::Script;
    use pb_05_bridge::contracts::{event_log, exitCall, submitCall, ExitProcessed};
    use pb_05_bridge::{
        BridgeError, BridgeOrchestrator, CheckpointSubmission, InMemoryTxRelayer,
        OrchestratorConfig,
    };
    use pb_06_secrets::EcdsaKeyPair;
    use shared_types::{keccak256, Address};

    use crate::fixtures::{LocalChain, Validator, CHAIN_ID};

    const EPOCH_SIZE: u64 = 4;
    const CHECKPOINT_MANAGER: Address = [0xc0; 20];
    const EXIT_HELPER: Address = [0xe0; 20];

    fn event(id: u64) -> StateSyncEvent {
        StateSyncEvent {
            id,
            sender: [0x51; 20],
            receiver: [0x52; 20],
            data: format!("deposit #{id}").into_bytes(),
        }
    }

    fn orchestrator(relayer: &Arc<InMemoryTxRelayer>) -> BridgeOrchestrator {
        BridgeOrchestrator::new(
            relayer.clone(),
            OrchestratorConfig {
                receipt_timeout: Duration::from_secs(1),
                poll_interval: Duration::from_millis(10),
                max_concurrent_legs: 4,
            },
        )
    }

    #[tokio::test]
    async fn test_events_to_checkpoint_to_exit() {
        let validators: Vec<Validator> = (1..=4).map(Validator::new).collect();
        let signers: Vec<Address> = validators[..3].iter().map(|v| v.address).collect();
        let mut chain = LocalChain::new(EpochSchedule::new(EPOCH_SIZE, 2).unwrap(), &validators);

        // Events arrive out of order; the store hands them back contiguous
        let mut store = StateSyncStore::new(0);
        for id in [2, 1, 3] {
            assert!(store.insert(event(id)).unwrap());
        }
        let mut builder = CheckpointBuilder::new(0);
        let pending = store.pending();
        let built = builder.build(1, &pending).unwrap();
        assert_eq!(builder.last_committed_id(), 3);

        chain.advance_to(EPOCH_SIZE - 1, &signers).unwrap();
        let boundary = chain
            .propose(&signers, Some(ValidatorSetDelta::default()), built.event_root)
            .unwrap();
        let (verified, summary) = chain.import(boundary).unwrap();
        assert!(summary.is_some());

        let checkpoint = verified.extra.checkpoint.clone().unwrap();
        assert_eq!(checkpoint.event_root, built.event_root);
        assert_eq!(checkpoint.epoch_number, 1);
        assert_eq!(checkpoint.start_block, 1);
        assert_eq!(checkpoint.end_block, EPOCH_SIZE);

        // The seal the root chain sees verifies against the epoch-1 roster
        let seal = verified.extra.committed.clone().unwrap();
        let roster = chain.runtime.validators().for_epoch(1).unwrap();
        let signing_hash = checkpoint.signing_hash(CHAIN_ID, verified.number, &verified.hash);
        roster
            .verify_aggregated(&seal, &signing_hash, Domain::CheckpointManager)
            .unwrap();

        let relayer = Arc::new(InMemoryTxRelayer::new());
        let bridge = orchestrator(&relayer);
        let sender = EcdsaKeyPair::generate();
        let submission =
            CheckpointSubmission::new(&checkpoint, verified.number, verified.hash, &seal);
        let tx_hash = bridge
            .submit_checkpoint(CHECKPOINT_MANAGER, &submission, &sender)
            .await
            .unwrap();

        let sent = relayer.sent();
        assert_eq!(sent[0].hash, tx_hash);
        let call = submitCall::abi_decode(&sent[0].txn.input, true).unwrap();
        assert_eq!(call.checkpoint.eventRoot.0, built.event_root);
        assert_eq!(call.checkpoint.epoch, alloy_primitives::U256::from(1));
        assert_eq!(call.checkpointMetadata.blockHash.0, verified.hash);
        assert_eq!(call.checkpointMetadata.currentValidatorSetHash.0, roster.hash());
        assert_eq!(call.signature.to_vec(), seal.signature);
        assert_eq!(call.bitmap.to_vec(), seal.bitmap.as_bytes().to_vec());

        // Exit event #2 against the submitted root
        let committed = store.commit_through(3).unwrap();
        assert!(store.pending().is_empty());
        let proof = ExitProof::new(&committed, 2, verified.number).unwrap();
        assert!(proof.verify());
        assert_eq!(proof.event_root, checkpoint.event_root);
        assert_eq!(keccak256(&proof.unhashed_leaf), event(2).leaf_hash());

        relayer.script(
            |txn| txn.to == EXIT_HELPER,
            Script::success().with_logs(vec![event_log(
                EXIT_HELPER,
                &ExitProcessed {
                    id: alloy_primitives::U256::from(2),
                    success: true,
                    returnData: Default::default(),
                },
            )]),
        );
        let outcome = bridge.exit(EXIT_HELPER, &proof, &sender).await.unwrap();
        assert_eq!(outcome.event_id, 2);

        let exit = relayer.sent().pop().unwrap();
        let call = exitCall::abi_decode(&exit.txn.input, true).unwrap();
        assert_eq!(call.blockNumber, alloy_primitives::U256::from(EPOCH_SIZE));
        assert_eq!(call.leafIndex, alloy_primitives::U256::from(1));
        assert_eq!(call.unhashedLeaf.to_vec(), event(2).encode());
        assert_eq!(call.proof.len(), proof.proof.len());
    }

    #[tokio::test]
    async fn test_failed_exit_is_reported() {
        let events: Vec<StateSyncEvent> = (1..=2).map(event).collect();
        let proof = ExitProof::new(&events, 1, EPOCH_SIZE).unwrap();

        let relayer = Arc::new(InMemoryTxRelayer::new());
        relayer.script(
            |_| true,
            Script::success().with_logs(vec![event_log(
                EXIT_HELPER,
                &ExitProcessed {
                    id: alloy_primitives::U256::from(1),
                    success: false,
                    returnData: Default::default(),
                },
            )]),
        );
        let err = orchestrator(&relayer)
            .exit(EXIT_HELPER, &proof, &EcdsaKeyPair::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::ExitFailed { event_id: 1 }));
    }

    #[test]
    fn test_checkpoint_rejects_event_gap() {
        let mut builder = CheckpointBuilder::new(0);
        builder.build(1, &[event(1), event(2)]).unwrap();
        assert!(builder.build(2, &[event(4)]).is_err());
        assert_eq!(builder.last_committed_id(), 2);
    }
}
