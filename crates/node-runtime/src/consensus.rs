//! Header verification and epoch finalisation.
//!
//! Verification only reads roster snapshots and may run concurrently for
//! sibling candidates. Finalisation is serialised: it records uptime and, at
//! an epoch end, swaps in the next roster.

use std::sync::Arc;

use parking_lot::Mutex;
use pb_01_header_extra::{
    AggregatedSignature, CheckpointData, Extra, Header, ValidatorSetDelta,
};
use pb_02_bls_signer::Domain;
use pb_03_validator_set::{
    EpochSchedule, Uptime, UptimeTracker, ValidatorSet, ValidatorSetTracker,
};
use shared_types::{hash_to_hex, Address, Hash, U256};
use tracing::{debug, info};

use crate::errors::{RuntimeError, RuntimeResult};

/// A header that passed [`ConsensusRuntime::verify_header`].
#[derive(Clone, Debug)]
pub struct VerifiedHeader {
    pub number: u64,
    pub hash: Hash,
    pub epoch: u64,
    pub extra: Extra,
    /// Committed-seal signers, in roster order.
    pub signers: Vec<Address>,
    pub signed_power: U256,
}

/// Produced when an epoch-ending block is finalised.
#[derive(Clone, Debug)]
pub struct EpochSummary {
    pub epoch: u64,
    pub uptime: Uptime,
    pub next_validators: Arc<ValidatorSet>,
}

pub struct ConsensusRuntime {
    chain_id: u64,
    schedule: EpochSchedule,
    validators: ValidatorSetTracker,
    uptime: Mutex<UptimeTracker>,
}

impl ConsensusRuntime {
    pub fn new(chain_id: u64, schedule: EpochSchedule, genesis: ValidatorSet) -> Self {
        let epoch = genesis.epoch();
        Self {
            chain_id,
            schedule,
            validators: ValidatorSetTracker::new(genesis),
            uptime: Mutex::new(UptimeTracker::new(epoch)),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn schedule(&self) -> &EpochSchedule {
        &self.schedule
    }

    pub fn validators(&self) -> &ValidatorSetTracker {
        &self.validators
    }

    fn roster_for(&self, epoch: u64) -> RuntimeResult<Arc<ValidatorSet>> {
        self.validators
            .for_epoch(epoch)
            .ok_or(RuntimeError::UnknownEpoch { epoch })
    }

    /// The message validators sign for `header`: the checkpoint signing hash
    /// bound to the chain id, block number and header hash.
    pub fn seal_message(&self, header: &Header, extra: &Extra) -> RuntimeResult<Hash> {
        let checkpoint = extra
            .checkpoint
            .as_ref()
            .ok_or(RuntimeError::MissingCheckpoint {
                number: header.number,
            })?;
        Ok(checkpoint.signing_hash(self.chain_id, header.number, &header.hash()))
    }

    /// Roster expected after `number`: the delta applied at an epoch end,
    /// the same roster otherwise.
    fn next_roster(
        &self,
        number: u64,
        roster: &ValidatorSet,
        delta: Option<&ValidatorSetDelta>,
    ) -> RuntimeResult<Option<ValidatorSet>> {
        if self.schedule.is_end_of_epoch(number) {
            let delta = delta.ok_or(RuntimeError::MissingDelta { number })?;
            let next = roster
                .apply_delta(delta, roster.epoch() + 1)
                .map_err(|source| RuntimeError::InvalidDelta { number, source })?;
            Ok(Some(next))
        } else if delta.is_some_and(|d| !d.is_empty()) {
            Err(RuntimeError::UnexpectedDelta { number })
        } else {
            Ok(None)
        }
    }

    /// Build the `extra` payload a proposer embeds in block `number`.
    ///
    /// `committed` is left empty for validators to fill in; the checkpoint
    /// commits to the current and next roster hashes.
    pub fn build_extra(
        &self,
        number: u64,
        parent_seal: Option<AggregatedSignature>,
        delta: Option<ValidatorSetDelta>,
        event_root: Hash,
    ) -> RuntimeResult<Extra> {
        let epoch = self.schedule.epoch_of(number);
        let roster = self.roster_for(epoch)?;
        let delta = if self.schedule.is_end_of_epoch(number) {
            Some(delta.unwrap_or_default())
        } else {
            delta
        };
        let next = self.next_roster(number, &roster, delta.as_ref())?;
        let current_hash = roster.hash();

        let checkpoint = CheckpointData {
            block_round: 0,
            epoch_number: epoch,
            start_block: self.schedule.first_block_of(epoch),
            end_block: number,
            current_validators_hash: current_hash,
            next_validators_hash: next.as_ref().map_or(current_hash, ValidatorSet::hash),
            event_root,
        };

        Ok(Extra {
            validators: delta.filter(|_| next.is_some()),
            parent: parent_seal,
            committed: Some(AggregatedSignature::empty()),
            checkpoint: Some(checkpoint),
        })
    }

    /// Verify `header` against its `parent`. Takes no write locks.
    pub fn verify_header(
        &self,
        header: &Header,
        parent: &Header,
    ) -> RuntimeResult<VerifiedHeader> {
        let number = header.number;
        if number == 0 {
            return Err(RuntimeError::GenesisNotVerifiable);
        }
        if parent.number + 1 != number {
            return Err(RuntimeError::NotChild {
                number,
                parent: parent.number,
            });
        }
        if header.parent_hash != parent.hash() {
            return Err(RuntimeError::ParentHashMismatch { number });
        }

        let extra = header
            .extra()
            .map_err(|source| RuntimeError::Extra { number, source })?;
        let epoch = self.schedule.epoch_of(number);
        let roster = self.roster_for(epoch)?;
        let checkpoint = extra
            .checkpoint
            .as_ref()
            .ok_or(RuntimeError::MissingCheckpoint { number })?;

        // Committed seal over this block
        let committed = extra
            .committed
            .as_ref()
            .filter(|seal| !seal.is_empty())
            .ok_or(RuntimeError::MissingCommittedSeal { number })?;
        let message = self.seal_message(header, &extra)?;
        let signed_power = roster
            .verify_aggregated(committed, &message, Domain::CheckpointManager)
            .map_err(|source| RuntimeError::InvalidSeal {
                number,
                seal: "committed",
                source,
            })?;

        // Parent seal; genesis has none
        if parent.number > 0 {
            let parent_seal = extra
                .parent
                .as_ref()
                .filter(|seal| !seal.is_empty())
                .ok_or(RuntimeError::MissingParentSeal { number })?;
            let parent_extra = parent
                .extra()
                .map_err(|source| RuntimeError::Extra {
                    number: parent.number,
                    source,
                })?;
            let parent_roster = self.roster_for(self.schedule.epoch_of(parent.number))?;
            parent_roster
                .verify_aggregated(
                    parent_seal,
                    &self.seal_message(parent, &parent_extra)?,
                    Domain::CheckpointManager,
                )
                .map_err(|source| RuntimeError::InvalidSeal {
                    number,
                    seal: "parent",
                    source,
                })?;
        }

        let next = self.next_roster(number, &roster, extra.validators.as_ref())?;

        let current_hash = roster.hash();
        if checkpoint.epoch_number != epoch {
            return Err(RuntimeError::CheckpointMismatch {
                number,
                field: "epochNumber",
            });
        }
        if checkpoint.current_validators_hash != current_hash {
            return Err(RuntimeError::CheckpointMismatch {
                number,
                field: "currentValidatorsHash",
            });
        }
        let expected_next = next.as_ref().map_or(current_hash, ValidatorSet::hash);
        if checkpoint.next_validators_hash != expected_next {
            return Err(RuntimeError::CheckpointMismatch {
                number,
                field: "nextValidatorsHash",
            });
        }

        let signers = roster
            .signers(&committed.bitmap)?
            .into_iter()
            .map(|v| v.address)
            .collect();

        let hash = header.hash();
        debug!(
            number,
            hash = %hash_to_hex(&hash),
            signed_power = %signed_power,
            "[pb-03] Header verified"
        );
        Ok(VerifiedHeader {
            number,
            hash,
            epoch,
            extra,
            signers,
            signed_power,
        })
    }

    /// Finalise a verified header on the canonical chain.
    ///
    /// Only one candidate per height is accepted; a sibling finalised later
    /// fails on the uptime height check and changes nothing.
    pub fn finalize_block(
        &self,
        verified: &VerifiedHeader,
    ) -> RuntimeResult<Option<EpochSummary>> {
        let mut uptime = self.uptime.lock();

        let current = self.validators.current();
        if verified.epoch != current.epoch() {
            return Err(RuntimeError::StaleHeader {
                number: verified.number,
                epoch: verified.epoch,
                current: current.epoch(),
            });
        }

        let end_of_epoch = self.schedule.is_end_of_epoch(verified.number);
        let delta = verified.extra.validators.clone().unwrap_or_default();
        if end_of_epoch {
            // Fail before anything is recorded
            current
                .apply_delta(&delta, current.epoch() + 1)
                .map_err(|source| RuntimeError::InvalidDelta {
                    number: verified.number,
                    source,
                })?;
        }

        uptime.record(verified.number, verified.signers.iter())?;
        if !end_of_epoch {
            return Ok(None);
        }

        let report = uptime.end_epoch(&current);
        let next_validators = self.validators.transition(&delta)?;
        info!(
            epoch = report.epoch,
            blocks = report.total_blocks,
            next_epoch = next_validators.epoch(),
            "[pb-03] Epoch finalised"
        );
        Ok(Some(EpochSummary {
            epoch: report.epoch,
            uptime: report,
            next_validators,
        }))
    }
}
