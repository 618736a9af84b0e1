//! Transactions, receipts and transfer requests.

use std::fmt;

use pb_01_header_extra::{AggregatedSignature, CheckpointData};
use serde::{Deserialize, Serialize};
use shared_types::{
    address_to_hex, parse_address, parse_uint256_or_hex, serde_hex, Address, Hash, U256,
};

use super::errors::{BridgeError, BridgeResult};

pub type TxHash = Hash;

/// A contract call to be signed and broadcast by the relayer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(with = "serde_hex::address")]
    pub from: Address,
    #[serde(with = "serde_hex::address")]
    pub to: Address,
    #[serde(with = "serde_hex::bytes")]
    pub input: Vec<u8>,
    pub value: U256,
}

impl Transaction {
    pub fn call(from: Address, to: Address, input: Vec<u8>) -> Self {
        Self {
            from,
            to,
            input,
            value: U256::zero(),
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Success,
    Failed,
}

/// An event log as emitted in a receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    #[serde(with = "serde_hex::address")]
    pub address: Address,
    pub topics: Vec<Hash>,
    #[serde(with = "serde_hex::bytes")]
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(with = "serde_hex::hash")]
    pub tx_hash: TxHash,
    pub status: ReceiptStatus,
    pub block_number: u64,
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

/// One receiver/amount pair of a batched transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLeg {
    /// Position within the original request.
    pub index: usize,
    #[serde(with = "serde_hex::address")]
    pub receiver: Address,
    pub amount: U256,
}

impl fmt::Display for TransferLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "leg #{} ({} <- {})",
            self.index,
            address_to_hex(&self.receiver),
            self.amount
        )
    }
}

/// A batched ERC-20 transfer across the bridge.
///
/// For deposits `token` is the root token and `predicate` the root predicate;
/// for withdrawals they are the child-chain counterparts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeTransferRequest {
    pub token: Address,
    pub predicate: Address,
    pub legs: Vec<TransferLeg>,
    /// Mint the aggregate amount to the sender before approving.
    pub test_mode: bool,
}

impl BridgeTransferRequest {
    /// Parse receivers and amounts as given by an operator.
    ///
    /// Amounts may be decimal or `0x` hex. Lists must be non-empty and of
    /// equal length.
    pub fn parse<R, A>(
        token: Address,
        predicate: Address,
        receivers: &[R],
        amounts: &[A],
    ) -> BridgeResult<Self>
    where
        R: AsRef<str>,
        A: AsRef<str>,
    {
        if receivers.len() != amounts.len() {
            return Err(BridgeError::InvalidRequest(format!(
                "{} receivers but {} amounts",
                receivers.len(),
                amounts.len()
            )));
        }
        if receivers.is_empty() {
            return Err(BridgeError::InvalidRequest("no receivers given".into()));
        }

        let legs = receivers
            .iter()
            .zip(amounts)
            .enumerate()
            .map(|(index, (receiver, amount))| {
                Ok(TransferLeg {
                    index,
                    receiver: parse_address(receiver.as_ref())
                        .map_err(|source| BridgeError::InvalidReceiver { index, source })?,
                    amount: parse_uint256_or_hex(amount.as_ref())
                        .map_err(|source| BridgeError::InvalidAmount { index, source })?,
                })
            })
            .collect::<BridgeResult<Vec<_>>>()?;

        Ok(Self {
            token,
            predicate,
            legs,
            test_mode: false,
        })
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Sum of all leg amounts; fails rather than wrapping.
    pub fn aggregate_amount(&self) -> BridgeResult<U256> {
        self.legs.iter().try_fold(U256::zero(), |acc, leg| {
            acc.checked_add(leg.amount).ok_or(BridgeError::AmountOverflow)
        })
    }
}

/// A signed checkpoint ready for the checkpoint manager contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckpointSubmission {
    pub block_hash: Hash,
    pub block_number: u64,
    pub block_round: u64,
    pub epoch: u64,
    pub current_validator_set_hash: Hash,
    pub event_root: Hash,
    pub signature: Vec<u8>,
    pub bitmap: Vec<u8>,
}

impl CheckpointSubmission {
    pub fn new(
        checkpoint: &CheckpointData,
        block_number: u64,
        block_hash: Hash,
        seal: &AggregatedSignature,
    ) -> Self {
        Self {
            block_hash,
            block_number,
            block_round: checkpoint.block_round,
            epoch: checkpoint.epoch_number,
            current_validator_set_hash: checkpoint.current_validators_hash,
            event_root: checkpoint.event_root,
            signature: seal.signature.clone(),
            bitmap: seal.bitmap.as_bytes().to_vec(),
        }
    }
}
