use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::errors::{CheckpointError, CheckpointResult};
use super::event::StateSyncEvent;

/// Relayed state-sync events awaiting commitment, keyed by ID.
///
/// Ingestion is idempotent: an event already held or already committed is
/// ignored. A conflicting payload for a held ID, or an ID that skips ahead,
/// is rejected.
#[derive(Debug, Default)]
pub struct StateSyncStore {
    last_committed_id: u64,
    events: BTreeMap<u64, StateSyncEvent>,
}

impl StateSyncStore {
    pub fn new(last_committed_id: u64) -> Self {
        Self {
            last_committed_id,
            events: BTreeMap::new(),
        }
    }

    pub fn last_committed_id(&self) -> u64 {
        self.last_committed_id
    }

    /// The ID the next new event must carry.
    pub fn next_expected_id(&self) -> CheckpointResult<u64> {
        let last = self
            .events
            .last_key_value()
            .map_or(self.last_committed_id, |(id, _)| *id);
        last.checked_add(1)
            .ok_or(CheckpointError::IdSpaceExhausted { last })
    }

    /// Ingest one event. Returns `Ok(true)` if it was new.
    pub fn insert(&mut self, event: StateSyncEvent) -> CheckpointResult<bool> {
        if event.id <= self.last_committed_id {
            debug!(id = event.id, "[pb-04] Ignoring already committed event");
            return Ok(false);
        }
        if let Some(existing) = self.events.get(&event.id) {
            if existing == &event {
                return Ok(false);
            }
            warn!(id = event.id, "[pb-04] Conflicting state sync event");
            return Err(CheckpointError::ConflictingEvent { id: event.id });
        }
        let expected = self.next_expected_id()?;
        if event.id != expected {
            return Err(CheckpointError::EventGap {
                expected,
                got: event.id,
            });
        }
        self.events.insert(event.id, event);
        Ok(true)
    }

    pub fn get(&self, id: u64) -> Option<&StateSyncEvent> {
        self.events.get(&id)
    }

    /// Events not yet committed, in ID order.
    pub fn pending(&self) -> Vec<StateSyncEvent> {
        self.events.values().cloned().collect()
    }

    /// Mark every event up to and including `id` as committed and hand them
    /// back for exit-proof construction.
    pub fn commit_through(&mut self, id: u64) -> CheckpointResult<Vec<StateSyncEvent>> {
        if id <= self.last_committed_id {
            return Ok(Vec::new());
        }
        if !self.events.contains_key(&id) {
            return Err(CheckpointError::UnknownEvent { id });
        }
        let rest = match id.checked_add(1) {
            Some(next) => self.events.split_off(&next),
            None => BTreeMap::new(),
        };
        let committed = std::mem::replace(&mut self.events, rest);
        self.last_committed_id = id;
        Ok(committed.into_values().collect())
    }
}
