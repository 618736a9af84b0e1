//! Scriptable in-process relayer.
//!
//! Every broadcast is recorded. Outcomes are chosen by the first matching
//! script; unmatched transactions are mined successfully on the first poll.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use pb_06_secrets::EcdsaKeyPair;
use shared_types::{address_to_hex, keccak256, Address};
use tracing::debug;

use crate::domain::{Log, Receipt, ReceiptStatus, RelayerError, Transaction, TxHash};
use crate::ports::outbound::TxRelayer;

type TxMatcher = Arc<dyn Fn(&Transaction) -> bool + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedResult {
    Success,
    Revert,
    /// Refuse the broadcast.
    Reject(String),
    /// Accept the broadcast but never produce a receipt.
    NeverMined,
}

#[derive(Clone, Debug)]
pub struct Script {
    pub result: ScriptedResult,
    /// Polls answered with "not mined" before the receipt appears.
    pub pending_polls: u32,
    pub logs: Vec<Log>,
}

impl Script {
    fn with_result(result: ScriptedResult) -> Self {
        Self {
            result,
            pending_polls: 0,
            logs: Vec::new(),
        }
    }

    pub fn success() -> Self {
        Self::with_result(ScriptedResult::Success)
    }

    pub fn revert() -> Self {
        Self::with_result(ScriptedResult::Revert)
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self::with_result(ScriptedResult::Reject(reason.into()))
    }

    pub fn never_mined() -> Self {
        Self::with_result(ScriptedResult::NeverMined)
    }

    pub fn after_polls(mut self, polls: u32) -> Self {
        self.pending_polls = polls;
        self
    }

    pub fn with_logs(mut self, logs: Vec<Log>) -> Self {
        self.logs = logs;
        self
    }
}

/// Match transactions whose calldata contains `address` as an ABI word.
pub fn calldata_mentions(address: Address) -> impl Fn(&Transaction) -> bool + Send + Sync {
    move |txn| txn.input.windows(20).any(|w| w == address)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentTransaction {
    pub hash: TxHash,
    pub txn: Transaction,
}

struct PendingReceipt {
    remaining_polls: u32,
    receipt: Option<Receipt>,
}

#[derive(Default)]
struct Inner {
    scripts: Vec<(TxMatcher, Script)>,
    sent: Vec<SentTransaction>,
    receipts: HashMap<TxHash, PendingReceipt>,
    nonce: u64,
    block: u64,
}

#[derive(Default)]
pub struct InMemoryTxRelayer {
    inner: Mutex<Inner>,
}

impl InMemoryTxRelayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an outcome for transactions matching `matcher`.
    pub fn script(
        &self,
        matcher: impl Fn(&Transaction) -> bool + Send + Sync + 'static,
        script: Script,
    ) {
        self.inner.lock().scripts.push((Arc::new(matcher), script));
    }

    /// Broadcast transactions in submission order.
    pub fn sent(&self) -> Vec<SentTransaction> {
        self.inner.lock().sent.clone()
    }
}

#[async_trait]
impl TxRelayer for InMemoryTxRelayer {
    async fn send_transaction(
        &self,
        txn: Transaction,
        signer: &EcdsaKeyPair,
    ) -> Result<TxHash, RelayerError> {
        if txn.from != signer.address() {
            return Err(RelayerError::Rejected(format!(
                "signer {} does not match sender {}",
                address_to_hex(&signer.address()),
                address_to_hex(&txn.from)
            )));
        }

        let mut inner = self.inner.lock();
        let script = inner
            .scripts
            .iter()
            .find(|(matcher, _)| matcher(&txn))
            .map(|(_, script)| script.clone())
            .unwrap_or_else(Script::success);

        if let ScriptedResult::Reject(reason) = &script.result {
            return Err(RelayerError::Rejected(reason.clone()));
        }

        let mut preimage = Vec::with_capacity(20 + 8 + 20 + txn.input.len());
        preimage.extend_from_slice(&txn.from);
        preimage.extend_from_slice(&inner.nonce.to_be_bytes());
        preimage.extend_from_slice(&txn.to);
        preimage.extend_from_slice(&txn.input);
        let hash = keccak256(&preimage);
        inner.nonce += 1;

        let receipt = match script.result {
            ScriptedResult::NeverMined => None,
            ref result => {
                inner.block += 1;
                Some(Receipt {
                    tx_hash: hash,
                    status: if *result == ScriptedResult::Success {
                        ReceiptStatus::Success
                    } else {
                        ReceiptStatus::Failed
                    },
                    block_number: inner.block,
                    logs: script.logs.clone(),
                })
            }
        };
        inner.receipts.insert(
            hash,
            PendingReceipt {
                remaining_polls: script.pending_polls,
                receipt,
            },
        );
        debug!(
            to = %address_to_hex(&txn.to),
            nonce = inner.nonce,
            "[pb-05] Transaction accepted"
        );
        inner.sent.push(SentTransaction { hash, txn });
        Ok(hash)
    }

    async fn get_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, RelayerError> {
        let mut inner = self.inner.lock();
        let Some(pending) = inner.receipts.get_mut(&hash) else {
            return Ok(None);
        };
        if pending.remaining_polls > 0 {
            pending.remaining_polls -= 1;
            return Ok(None);
        }
        Ok(pending.receipt.clone())
    }
}
