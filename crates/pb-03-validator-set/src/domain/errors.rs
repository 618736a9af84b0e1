//! Validator set errors.

use pb_02_bls_signer::BlsError;
use shared_types::U256;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidatorSetError {
    #[error("Duplicate validator {address}")]
    DuplicateValidator { address: String },

    #[error("Validator {address} is already active")]
    AlreadyActive { address: String },

    #[error("Removed index {index} out of range for roster of {size}")]
    RemovedIndexOutOfRange { index: usize, size: usize },

    #[error("Total voting power would become negative")]
    NegativeVotingPower,

    #[error("Total voting power overflows 256 bits")]
    VotingPowerOverflow,

    #[error("Signer index {index} out of range for roster of {size}")]
    BitmapOutOfRange { index: usize, size: usize },

    #[error("Signer index {index} is not an active validator")]
    InactiveSigner { index: usize },

    #[error("Aggregated signature has no signers")]
    NoSigners,

    #[error("Malformed aggregated signature: {0}")]
    MalformedSignature(#[from] BlsError),

    #[error("Aggregated signature does not verify against the selected signers")]
    SignatureMismatch,

    #[error("Quorum not reached: signed power {signed}, need {threshold}")]
    QuorumNotReached { signed: U256, threshold: U256 },

    #[error("Invalid epoch schedule: epoch size {epoch_size}, sprint size {sprint_size}")]
    InvalidEpochSchedule { epoch_size: u64, sprint_size: u64 },

    #[error("Uptime for block {block} already recorded (last recorded {last})")]
    UptimeAlreadyRecorded { block: u64, last: u64 },
}

pub type ValidatorSetResult<T> = Result<T, ValidatorSetError>;
