//! Per-epoch liveness counters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared_types::Address;

use super::errors::{ValidatorSetError, ValidatorSetResult};
use super::validator_set::ValidatorSet;

/// Blocks signed by one validator during an epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeEntry {
    #[serde(with = "shared_types::serde_hex::address")]
    pub address: Address,
    pub signed_blocks: u64,
}

/// Uptime report for one finished epoch, in roster order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Uptime {
    pub epoch: u64,
    pub entries: Vec<UptimeEntry>,
    pub total_blocks: u64,
}

impl Uptime {
    pub fn signed_blocks(&self, address: &Address) -> u64 {
        self.entries
            .iter()
            .find(|e| &e.address == address)
            .map_or(0, |e| e.signed_blocks)
    }
}

/// Counts committed-seal participation within the current epoch.
///
/// Counters only grow until [`UptimeTracker::end_epoch`] resets them. Each
/// block height is counted at most once, so a sibling candidate at an already
/// counted height is rejected.
#[derive(Debug, Default)]
pub struct UptimeTracker {
    epoch: u64,
    counts: HashMap<Address, u64>,
    last_recorded: Option<u64>,
    total_blocks: u64,
}

impl UptimeTracker {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            ..Self::default()
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Count one block for each signer.
    pub fn record<'a>(
        &mut self,
        block: u64,
        signers: impl IntoIterator<Item = &'a Address>,
    ) -> ValidatorSetResult<()> {
        if let Some(last) = self.last_recorded {
            if block <= last {
                return Err(ValidatorSetError::UptimeAlreadyRecorded { block, last });
            }
        }
        for address in signers {
            *self.counts.entry(*address).or_default() += 1;
        }
        self.last_recorded = Some(block);
        self.total_blocks += 1;
        Ok(())
    }

    pub fn signed_blocks(&self, address: &Address) -> u64 {
        self.counts.get(address).copied().unwrap_or(0)
    }

    /// Close the epoch: report counts for every member of `roster` in roster
    /// order, then start counting the next epoch from zero.
    pub fn end_epoch(&mut self, roster: &ValidatorSet) -> Uptime {
        let entries = roster
            .validators()
            .iter()
            .map(|v| UptimeEntry {
                address: v.address,
                signed_blocks: self.counts.get(&v.address).copied().unwrap_or(0),
            })
            .collect();
        let report = Uptime {
            epoch: self.epoch,
            entries,
            total_blocks: self.total_blocks,
        };

        self.epoch += 1;
        self.counts.clear();
        self.total_blocks = 0;
        report
    }
}
