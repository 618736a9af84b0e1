//! Bridge orchestrator service.

use std::collections::HashSet;
use std::sync::Arc;

use alloy_sol_types::SolEvent;
use pb_02_bls_signer::{make_kosk_signature, verify_kosk_signature};
use pb_04_checkpoint::ExitProof;
use pb_06_secrets::{Account, EcdsaKeyPair};
use shared_types::{address_to_hex, hash_to_hex, Address, U256};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::contracts::{self, native_address, VALIDATOR_SET_CONTRACT};
use crate::domain::{
    BridgeError, BridgeResult, BridgeTransferRequest, CheckpointSubmission, ExitOutcome,
    OrchestratorConfig, Receipt, RegistrationOutcome, StakeOutcome, Transaction,
    TransferDirection, TransferLeg, TransferOutcome, TxHash, WhitelistOutcome,
};
use crate::ports::outbound::TxRelayer;

/// Result of one fan-out leg.
enum LegOutcome {
    Confirmed(TxHash),
    /// Cancelled before broadcast.
    Skipped,
    Failed(BridgeError),
}

/// Submit one transaction and wait until it is mined successfully.
async fn submit_and_confirm(
    relayer: &dyn TxRelayer,
    config: &OrchestratorConfig,
    txn: Transaction,
    signer: &EcdsaKeyPair,
    label: &str,
) -> BridgeResult<Receipt> {
    let hash = relayer
        .send_transaction(txn, signer)
        .await
        .map_err(|source| BridgeError::Submission {
            label: label.to_string(),
            source,
        })?;
    debug!(label, tx_hash = %hash_to_hex(&hash), "[pb-05] Transaction broadcast");

    let poll = async {
        loop {
            match relayer.get_receipt(hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => tokio::time::sleep(config.poll_interval).await,
                Err(source) => {
                    return Err(BridgeError::Relayer {
                        label: label.to_string(),
                        source,
                    })
                }
            }
        }
    };
    let receipt = tokio::time::timeout(config.receipt_timeout, poll)
        .await
        .map_err(|_| BridgeError::ReceiptTimeout {
            label: label.to_string(),
            tx_hash: hash_to_hex(&hash),
            waited: config.receipt_timeout,
        })??;

    if !receipt.is_success() {
        return Err(BridgeError::Reverted {
            label: label.to_string(),
            tx_hash: hash_to_hex(&hash),
        });
    }
    Ok(receipt)
}

/// First log emitted by `emitter` that decodes as `E` and satisfies `accept`.
fn find_event<E: SolEvent>(
    receipt: &Receipt,
    emitter: Address,
    accept: impl Fn(&E) -> bool,
) -> Option<E> {
    receipt
        .logs
        .iter()
        .filter(|log| log.address == emitter)
        .filter_map(contracts::decode_event::<E>)
        .find(|event| accept(event))
}

fn missing_log(label: &str, event: &'static str, receipt: &Receipt) -> BridgeError {
    BridgeError::MissingLog {
        label: label.to_string(),
        event,
        tx_hash: hash_to_hex(&receipt.tx_hash),
    }
}

/// Drives bridge and validator-lifecycle transactions through a [`TxRelayer`].
pub struct BridgeOrchestrator {
    relayer: Arc<dyn TxRelayer>,
    config: OrchestratorConfig,
    validator_set: Address,
}

impl BridgeOrchestrator {
    pub fn new(relayer: Arc<dyn TxRelayer>, config: OrchestratorConfig) -> Self {
        Self {
            relayer,
            config,
            validator_set: VALIDATOR_SET_CONTRACT,
        }
    }

    /// Target a validator set contract other than the system address.
    pub fn with_validator_set_contract(mut self, address: Address) -> Self {
        self.validator_set = address;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    async fn submit(
        &self,
        label: &str,
        txn: Transaction,
        signer: &EcdsaKeyPair,
    ) -> BridgeResult<Receipt> {
        submit_and_confirm(self.relayer.as_ref(), &self.config, txn, signer, label).await
    }

    /// Deposit root-chain ERC-20 tokens to child-chain receivers.
    ///
    /// Approves the predicate for the aggregate amount, waits for the approval
    /// to be mined, then fans out one `depositTo` per receiver.
    pub async fn deposit_erc20(
        &self,
        request: &BridgeTransferRequest,
        sender: &EcdsaKeyPair,
    ) -> BridgeResult<TransferOutcome> {
        let total = request.aggregate_amount()?;
        let from = sender.address();

        if request.test_mode {
            let mint =
                Transaction::call(from, request.token, contracts::encode_mint(&from, &total));
            self.submit("mint", mint, sender).await?;
            debug!(amount = %total, "[pb-05] Minted deposit amount to sender");
        }

        let approve = Transaction::call(
            from,
            request.token,
            contracts::encode_approve(&request.predicate, &total),
        );
        self.submit("approve", approve, sender).await?;
        info!(
            predicate = %address_to_hex(&request.predicate),
            amount = %total,
            "[pb-05] Predicate approved"
        );

        let tx_hashes = self
            .fan_out(&request.legs, sender, |leg| {
                Transaction::call(
                    from,
                    request.predicate,
                    contracts::encode_deposit_to(&request.token, &leg.receiver, &leg.amount),
                )
            })
            .await?;

        info!(legs = request.legs.len(), "[pb-05] Deposit settled");
        Ok(TransferOutcome {
            direction: TransferDirection::Deposit,
            sender: from,
            legs: request.legs.clone(),
            tx_hashes,
        })
    }

    /// Withdraw child-chain ERC-20 tokens to root-chain receivers.
    pub async fn withdraw_erc20(
        &self,
        request: &BridgeTransferRequest,
        sender: &EcdsaKeyPair,
    ) -> BridgeResult<TransferOutcome> {
        request.aggregate_amount()?;
        let from = sender.address();

        let tx_hashes = self
            .fan_out(&request.legs, sender, |leg| {
                Transaction::call(
                    from,
                    request.predicate,
                    contracts::encode_withdraw_to(&request.token, &leg.receiver, &leg.amount),
                )
            })
            .await?;

        info!(legs = request.legs.len(), "[pb-05] Withdrawal settled");
        Ok(TransferOutcome {
            direction: TransferDirection::Withdraw,
            sender: from,
            legs: request.legs.clone(),
            tx_hashes,
        })
    }

    /// Release a committed state sync event on the root chain.
    pub async fn exit(
        &self,
        exit_helper: Address,
        proof: &ExitProof,
        sender: &EcdsaKeyPair,
    ) -> BridgeResult<ExitOutcome> {
        let label = format!("exit #{}", proof.event_id);
        let txn = Transaction::call(sender.address(), exit_helper, contracts::encode_exit(proof));
        let receipt = self.submit(&label, txn, sender).await?;

        let id = alloy_primitives::U256::from(proof.event_id);
        let processed =
            find_event::<contracts::ExitProcessed>(&receipt, exit_helper, |e| e.id == id)
                .ok_or_else(|| missing_log(&label, "ExitProcessed", &receipt))?;
        if !processed.success {
            return Err(BridgeError::ExitFailed {
                event_id: proof.event_id,
            });
        }

        info!(event_id = proof.event_id, "[pb-05] Exit processed");
        Ok(ExitOutcome {
            event_id: proof.event_id,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Whitelist validators; every address must come back in an
    /// `AddedToWhitelist` log.
    pub async fn whitelist_validators(
        &self,
        validators: &[Address],
        owner: &EcdsaKeyPair,
    ) -> BridgeResult<WhitelistOutcome> {
        if validators.is_empty() {
            return Err(BridgeError::InvalidRequest("no validators to whitelist".into()));
        }
        let label = "addToWhitelist";
        let txn = Transaction::call(
            owner.address(),
            self.validator_set,
            contracts::encode_add_to_whitelist(validators),
        );
        let receipt = self.submit(label, txn, owner).await?;

        for validator in validators {
            find_event::<contracts::AddedToWhitelist>(&receipt, self.validator_set, |e| {
                native_address(e.validator) == *validator
            })
            .ok_or_else(|| missing_log(label, "AddedToWhitelist", &receipt))?;
        }

        info!(count = validators.len(), "[pb-05] Validators whitelisted");
        Ok(WhitelistOutcome {
            validators: validators.to_vec(),
            tx_hash: receipt.tx_hash,
        })
    }

    /// Register `account` with a proof of possession of its BLS key.
    pub async fn register_validator(
        &self,
        account: &Account,
        chain_id: u64,
    ) -> BridgeResult<RegistrationOutcome> {
        let address = account.address();
        let bls_key = account.bls_public_key();
        let signature = make_kosk_signature(&account.bls, &address, chain_id);
        verify_kosk_signature(&signature, &bls_key, &address, chain_id)?;

        let label = "register";
        let txn = Transaction::call(
            address,
            self.validator_set,
            contracts::encode_register(&signature.to_bytes(), &bls_key.to_bytes()),
        );
        let receipt = self.submit(label, txn, &account.ecdsa).await?;

        find_event::<contracts::NewValidator>(&receipt, self.validator_set, |e| {
            native_address(e.validator) == address
        })
        .ok_or_else(|| missing_log(label, "NewValidator", &receipt))?;

        info!(validator = %address_to_hex(&address), "[pb-05] Validator registered");
        Ok(RegistrationOutcome {
            validator: address,
            bls_key: format!("0x{}", hex::encode(bls_key.to_bytes())),
            tx_hash: receipt.tx_hash,
        })
    }

    pub async fn stake(
        &self,
        validator: &EcdsaKeyPair,
        amount: U256,
    ) -> BridgeResult<StakeOutcome> {
        if amount.is_zero() {
            return Err(BridgeError::InvalidRequest("stake amount must be positive".into()));
        }
        let address = validator.address();
        let label = "stake";
        let txn = Transaction::call(address, self.validator_set, contracts::encode_stake())
            .with_value(amount);
        let receipt = self.submit(label, txn, validator).await?;

        find_event::<contracts::Staked>(&receipt, self.validator_set, |e| {
            native_address(e.validator) == address
        })
        .ok_or_else(|| missing_log(label, "Staked", &receipt))?;

        info!(validator = %address_to_hex(&address), amount = %amount, "[pb-05] Stake confirmed");
        Ok(StakeOutcome {
            validator: address,
            amount,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Submit a signed checkpoint to the checkpoint manager.
    pub async fn submit_checkpoint(
        &self,
        checkpoint_manager: Address,
        submission: &CheckpointSubmission,
        sender: &EcdsaKeyPair,
    ) -> BridgeResult<TxHash> {
        let label = format!("checkpoint epoch {}", submission.epoch);
        let txn = Transaction::call(
            sender.address(),
            checkpoint_manager,
            contracts::encode_submit(submission),
        );
        let receipt = self.submit(&label, txn, sender).await?;

        info!(
            epoch = submission.epoch,
            block = submission.block_number,
            "[pb-05] Checkpoint submitted"
        );
        Ok(receipt.tx_hash)
    }

    /// Run one transaction per leg, at most `max_concurrent_legs` at a time.
    ///
    /// The first failure cancels legs not yet broadcast. Returns hashes in
    /// leg order when every leg confirms.
    async fn fan_out<F>(
        &self,
        legs: &[TransferLeg],
        signer: &EcdsaKeyPair,
        build: F,
    ) -> BridgeResult<Vec<TxHash>>
    where
        F: Fn(&TransferLeg) -> Transaction,
    {
        let signer = Arc::new(signer.clone());
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let cancel_tx = Arc::new(cancel_tx);
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_legs.max(1)));
        let mut tasks = JoinSet::new();
        let mut spawned = Vec::with_capacity(legs.len());
        let mut not_started = Vec::new();

        for (position, leg) in legs.iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|err| BridgeError::TaskAborted {
                    label: leg.to_string(),
                    reason: err.to_string(),
                })?;
            let cancelled = *cancel_rx.borrow();
            if cancelled {
                debug!(
                    remaining = legs.len() - position,
                    "[pb-05] Batch cancelled, remaining legs not started"
                );
                not_started.extend_from_slice(&legs[position..]);
                break;
            }

            let txn = build(leg);
            let relayer = self.relayer.clone();
            let config = self.config.clone();
            let signer = signer.clone();
            let cancel_tx = cancel_tx.clone();
            let cancel_rx = cancel_rx.clone();
            let leg = leg.clone();
            spawned.push(leg.clone());

            tasks.spawn(async move {
                let _permit = permit;
                let cancelled = *cancel_rx.borrow();
                if cancelled {
                    return (leg, LegOutcome::Skipped);
                }
                let label = leg.to_string();
                match submit_and_confirm(relayer.as_ref(), &config, txn, &signer, &label).await {
                    Ok(receipt) => (leg, LegOutcome::Confirmed(receipt.tx_hash)),
                    Err(err) => {
                        cancel_tx.send_replace(true);
                        (leg, LegOutcome::Failed(err))
                    }
                }
            });
        }

        let mut confirmed = Vec::new();
        let mut failed_after = Vec::new();
        let mut unconfirmed = Vec::new();
        let mut first_failure: Option<(TransferLeg, BridgeError)> = None;
        let mut reported = HashSet::new();
        let mut aborted = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((leg, outcome)) => {
                    reported.insert(leg.index);
                    match outcome {
                        LegOutcome::Confirmed(hash) => confirmed.push((leg, hash)),
                        LegOutcome::Skipped => not_started.push(leg),
                        LegOutcome::Failed(err) => {
                            warn!(%leg, error = %err, "[pb-05] Transfer leg failed");
                            if first_failure.is_none() {
                                first_failure = Some((leg, err));
                            } else if err.is_outcome_unknown() {
                                unconfirmed.push((leg, err));
                            } else {
                                failed_after.push((leg, err));
                            }
                        }
                    }
                }
                Err(join_err) => aborted.push(join_err.to_string()),
            }
        }

        // Legs whose task died without reporting back
        let mut aborted = aborted.into_iter();
        for leg in spawned.into_iter().filter(|leg| !reported.contains(&leg.index)) {
            let reason = aborted.next().unwrap_or_default();
            let label = leg.to_string();
            let err = BridgeError::TaskAborted { label, reason };
            if first_failure.is_none() {
                first_failure = Some((leg, err));
            } else {
                unconfirmed.push((leg, err));
            }
        }

        confirmed.sort_by_key(|(leg, _)| leg.index);
        failed_after.sort_by_key(|(leg, _)| leg.index);
        unconfirmed.sort_by_key(|(leg, _)| leg.index);
        not_started.sort_by_key(|leg| leg.index);

        match first_failure {
            None => Ok(confirmed.into_iter().map(|(_, hash)| hash).collect()),
            Some((failed, source)) => {
                warn!(
                    %failed,
                    confirmed = confirmed.len(),
                    failed_after = failed_after.len(),
                    unconfirmed = unconfirmed.len(),
                    not_started = not_started.len(),
                    "[pb-05] Batch stopped at first failure"
                );
                Err(BridgeError::BatchFailed {
                    source: Box::new(source),
                    failed,
                    confirmed: confirmed.into_iter().map(|(leg, _)| leg).collect(),
                    failed_after,
                    unconfirmed,
                    not_started,
                })
            }
        }
    }
}
