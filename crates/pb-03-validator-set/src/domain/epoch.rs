//! Epoch and sprint arithmetic.

use serde::{Deserialize, Serialize};

use super::errors::{ValidatorSetError, ValidatorSetResult};

/// Fixed-size block ranges at whose ends roster and reward accounting happen.
///
/// Block 0 is genesis and belongs to epoch 0. Epoch `e >= 1` covers blocks
/// `(e - 1) * epoch_size + 1 ..= e * epoch_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochSchedule {
    epoch_size: u64,
    sprint_size: u64,
}

impl EpochSchedule {
    /// Sizes must be non-zero and the sprint must divide the epoch.
    pub fn new(epoch_size: u64, sprint_size: u64) -> ValidatorSetResult<Self> {
        if epoch_size == 0 || sprint_size == 0 || epoch_size % sprint_size != 0 {
            return Err(ValidatorSetError::InvalidEpochSchedule {
                epoch_size,
                sprint_size,
            });
        }
        Ok(Self {
            epoch_size,
            sprint_size,
        })
    }

    pub fn epoch_size(&self) -> u64 {
        self.epoch_size
    }

    pub fn sprint_size(&self) -> u64 {
        self.sprint_size
    }

    pub fn epoch_of(&self, block: u64) -> u64 {
        if block == 0 {
            0
        } else {
            (block - 1) / self.epoch_size + 1
        }
    }

    pub fn is_end_of_epoch(&self, block: u64) -> bool {
        block > 0 && block % self.epoch_size == 0
    }

    pub fn is_end_of_sprint(&self, block: u64) -> bool {
        block > 0 && block % self.sprint_size == 0
    }

    /// First block of `epoch`; genesis for epoch 0.
    pub fn first_block_of(&self, epoch: u64) -> u64 {
        epoch.saturating_sub(1).saturating_mul(self.epoch_size) + u64::from(epoch > 0)
    }

    /// Last block of `epoch`.
    pub fn last_block_of(&self, epoch: u64) -> u64 {
        epoch.saturating_mul(self.epoch_size)
    }
}
