use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckpointError {
    /// Event IDs skipped a value.
    #[error("State sync event gap: expected id {expected}, got {got}")]
    EventGap { expected: u64, got: u64 },

    /// Same ID seen with a different payload.
    #[error("Conflicting state sync event {id}")]
    ConflictingEvent { id: u64 },

    /// No event ID follows `last`.
    #[error("State sync event IDs exhausted after {last}")]
    IdSpaceExhausted { last: u64 },

    #[error("Unknown state sync event {id}")]
    UnknownEvent { id: u64 },

    #[error("Leaf index {index} out of range for {leaves} leaves")]
    LeafIndexOutOfRange { index: usize, leaves: usize },
}

pub type CheckpointResult<T> = Result<T, CheckpointError>;
