//! Runtime error types.

use pb_01_header_extra::HeaderError;
use pb_03_validator_set::ValidatorSetError;
use pb_06_secrets::SecretsError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Genesis header is trusted and cannot be verified")]
    GenesisNotVerifiable,

    #[error("Header {number} does not follow parent {parent}")]
    NotChild { number: u64, parent: u64 },

    #[error("Header {number}: parent hash mismatch")]
    ParentHashMismatch { number: u64 },

    #[error("Header {number}: undecodable extra: {source}")]
    Extra {
        number: u64,
        #[source]
        source: HeaderError,
    },

    #[error("Header {number}: missing committed seal")]
    MissingCommittedSeal { number: u64 },

    #[error("Header {number}: missing parent seal")]
    MissingParentSeal { number: u64 },

    #[error("No validator set held for epoch {epoch}")]
    UnknownEpoch { epoch: u64 },

    #[error("Header {number}: {seal} seal rejected: {source}")]
    InvalidSeal {
        number: u64,
        seal: &'static str,
        #[source]
        source: ValidatorSetError,
    },

    #[error("Header {number}: epoch-ending block carries no validator set delta")]
    MissingDelta { number: u64 },

    #[error("Header {number}: validator set delta outside an epoch end")]
    UnexpectedDelta { number: u64 },

    #[error("Header {number}: invalid validator set delta: {source}")]
    InvalidDelta {
        number: u64,
        #[source]
        source: ValidatorSetError,
    },

    #[error("Header {number}: no checkpoint")]
    MissingCheckpoint { number: u64 },

    #[error("Header {number}: checkpoint {field} does not match the roster")]
    CheckpointMismatch { number: u64, field: &'static str },

    #[error("Header {number} belongs to epoch {epoch}, current epoch is {current}")]
    StaleHeader { number: u64, epoch: u64, current: u64 },

    #[error(transparent)]
    ValidatorSet(#[from] ValidatorSetError),

    #[error(transparent)]
    Secrets(#[from] SecretsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Telemetry initialisation failed: {0}")]
    Telemetry(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
