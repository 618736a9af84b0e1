use pb_01_header_extra::CheckpointData;
use shared_types::{hash_to_hex, Hash};
use tracing::debug;

use super::errors::{CheckpointError, CheckpointResult};
use super::event::StateSyncEvent;
use super::merkle::MerkleTree;

/// Merkle root over the events' leaf hashes, in order.
pub fn event_root(events: &[StateSyncEvent]) -> Hash {
    MerkleTree::new(events.iter().map(StateSyncEvent::leaf_hash).collect()).root()
}

/// Assembles checkpoint commitments over contiguous event ranges.
#[derive(Debug, Clone, Default)]
pub struct CheckpointBuilder {
    last_committed_id: u64,
}

impl CheckpointBuilder {
    /// `last_committed_id` is 0 when nothing has been committed yet.
    pub fn new(last_committed_id: u64) -> Self {
        Self { last_committed_id }
    }

    pub fn last_committed_id(&self) -> u64 {
        self.last_committed_id
    }

    /// Commit `events` for `epoch`.
    ///
    /// Events must continue exactly from the last committed ID. On success the
    /// builder advances past the last event; on error it is unchanged. The
    /// returned data carries the epoch and event root; block range and
    /// validator hashes are the caller's to fill in.
    pub fn build(
        &mut self,
        epoch: u64,
        events: &[StateSyncEvent],
    ) -> CheckpointResult<CheckpointData> {
        let mut last = self.last_committed_id;
        for event in events {
            let expected = last
                .checked_add(1)
                .ok_or(CheckpointError::IdSpaceExhausted { last })?;
            if event.id != expected {
                return Err(CheckpointError::EventGap {
                    expected,
                    got: event.id,
                });
            }
            last = event.id;
        }

        let root = event_root(events);
        if let Some(last) = events.last() {
            self.last_committed_id = last.id;
        }

        debug!(
            epoch,
            events = events.len(),
            last_committed_id = self.last_committed_id,
            event_root = %hash_to_hex(&root),
            "[pb-04] Checkpoint built"
        );

        Ok(CheckpointData {
            epoch_number: epoch,
            event_root: root,
            ..CheckpointData::default()
        })
    }
}
