//! Bridge error types.

use std::time::Duration;

use shared_types::ParseError;
use thiserror::Error;

use super::entities::TransferLeg;

/// Errors from the transaction relay collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayerError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),
}

/// Bridge orchestration errors.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    #[error("Invalid transfer request: {0}")]
    InvalidRequest(String),

    #[error("Invalid receiver #{index}: {source}")]
    InvalidReceiver {
        index: usize,
        #[source]
        source: ParseError,
    },

    #[error("Invalid amount #{index}: {source}")]
    InvalidAmount {
        index: usize,
        #[source]
        source: ParseError,
    },

    #[error("Aggregate amount overflows uint256")]
    AmountOverflow,

    #[error("Invalid orchestrator config: {0}")]
    InvalidConfig(String),

    /// The relayer refused or failed to broadcast.
    #[error("{label}: submission failed: {source}")]
    Submission {
        label: String,
        #[source]
        source: RelayerError,
    },

    /// Polling for the receipt failed.
    #[error("{label}: receipt query failed: {source}")]
    Relayer {
        label: String,
        #[source]
        source: RelayerError,
    },

    #[error("{label}: transaction {tx_hash} reverted")]
    Reverted { label: String, tx_hash: String },

    #[error("{label}: no receipt for {tx_hash} within {waited:?}")]
    ReceiptTimeout {
        label: String,
        tx_hash: String,
        waited: Duration,
    },

    /// Receipt succeeded but the expected event was not emitted.
    #[error("{label}: receipt for {tx_hash} carries no {event} log")]
    MissingLog {
        label: String,
        event: &'static str,
        tx_hash: String,
    },

    #[error("Exit of state sync event {event_id} was processed but failed")]
    ExitFailed { event_id: u64 },

    #[error("{label}: task aborted: {reason}")]
    TaskAborted { label: String, reason: String },

    #[error(transparent)]
    Bls(#[from] pb_02_bls_signer::BlsError),

    /// A fan-out batch stopped at its first failure.
    #[error(
        "Batch failed at {failed}: {source} (confirmed: {}, failed after: {}, unconfirmed: {}, not started: {})",
        .confirmed.len(),
        .failed_after.len(),
        .unconfirmed.len(),
        .not_started.len()
    )]
    BatchFailed {
        source: Box<BridgeError>,
        failed: TransferLeg,
        /// Broadcast and mined successfully. Not rolled back.
        confirmed: Vec<TransferLeg>,
        /// Later legs with a settled failure: reverted on chain or refused
        /// by the relayer.
        failed_after: Vec<(TransferLeg, BridgeError)>,
        /// Broadcast, but whether it settled is unknown.
        unconfirmed: Vec<(TransferLeg, BridgeError)>,
        /// Never broadcast because the batch was cancelled first.
        not_started: Vec<TransferLeg>,
    },
}

impl BridgeError {
    /// Whether the transaction may still settle after this error.
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(
            self,
            BridgeError::ReceiptTimeout { .. }
                | BridgeError::Relayer { .. }
                | BridgeError::TaskAborted { .. }
        )
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
