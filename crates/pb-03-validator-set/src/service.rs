//! Shared, versioned roster handle.

use std::sync::Arc;

use parking_lot::RwLock;
use pb_01_header_extra::ValidatorSetDelta;
use shared_types::{hash_to_hex, Address, U256};
use tracing::info;

use crate::domain::{ValidatorSet, ValidatorSetResult};
use crate::ports::inbound::ValidatorSetQueries;

struct Versions {
    current: Arc<ValidatorSet>,
    previous: Option<Arc<ValidatorSet>>,
}

/// Owns the current and previous roster versions.
///
/// Readers clone an `Arc` and verify against it without holding the lock.
/// [`ValidatorSetTracker::transition`] builds the next version off to the side
/// and swaps it in.
pub struct ValidatorSetTracker {
    versions: RwLock<Versions>,
}

impl ValidatorSetTracker {
    pub fn new(genesis: ValidatorSet) -> Self {
        Self {
            versions: RwLock::new(Versions {
                current: Arc::new(genesis),
                previous: None,
            }),
        }
    }

    pub fn current(&self) -> Arc<ValidatorSet> {
        self.versions.read().current.clone()
    }

    pub fn previous(&self) -> Option<Arc<ValidatorSet>> {
        self.versions.read().previous.clone()
    }

    /// The roster that governs `epoch`, if still held.
    pub fn for_epoch(&self, epoch: u64) -> Option<Arc<ValidatorSet>> {
        let versions = self.versions.read();
        if versions.current.epoch() == epoch {
            return Some(versions.current.clone());
        }
        versions
            .previous
            .as_ref()
            .filter(|p| p.epoch() == epoch)
            .cloned()
    }

    /// Apply `delta` to the current roster and make the result current.
    ///
    /// On error nothing changes.
    pub fn transition(&self, delta: &ValidatorSetDelta) -> ValidatorSetResult<Arc<ValidatorSet>> {
        let mut versions = self.versions.write();
        let next_epoch = versions.current.epoch() + 1;
        let next = Arc::new(versions.current.apply_delta(delta, next_epoch)?);

        info!(
            epoch = next_epoch,
            validators = next.len(),
            total_voting_power = %next.total_voting_power(),
            hash = %hash_to_hex(&next.hash()),
            "[pb-03] Validator set transitioned"
        );

        let old = std::mem::replace(&mut versions.current, next.clone());
        versions.previous = Some(old);
        Ok(next)
    }
}

impl ValidatorSetQueries for ValidatorSetTracker {
    fn voting_power_of(&self, address: &Address) -> U256 {
        self.current().voting_power_of(address)
    }

    fn quorum_threshold(&self) -> U256 {
        self.current().quorum_threshold()
    }

    fn is_active(&self, address: &Address) -> bool {
        self.current().is_active(address)
    }

    fn total_voting_power(&self) -> U256 {
        self.current().total_voting_power()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidatorSetError;
    use pb_01_header_extra::{Bitmap, ValidatorMetadata};
    use pb_02_bls_signer::PrivateKey;

    fn genesis() -> ValidatorSet {
        let validators = (1..=3u8)
            .map(|i| {
                let key = PrivateKey::generate().unwrap();
                ValidatorMetadata::new([i; 20], key.public_key(), U256::from(10u64))
            })
            .collect();
        ValidatorSet::new(0, validators).unwrap()
    }

    #[test]
    fn test_transition_swaps_versions() {
        let tracker = ValidatorSetTracker::new(genesis());
        let before = tracker.current();

        let delta = ValidatorSetDelta {
            added: vec![],
            removed: Bitmap::from_indices([0]),
        };
        let next = tracker.transition(&delta).unwrap();

        assert_eq!(next.epoch(), 1);
        assert_eq!(tracker.current().len(), 2);
        // Readers holding the old Arc still see the old roster.
        assert_eq!(before.len(), 3);
        assert_eq!(tracker.previous().unwrap().epoch(), 0);
        assert_eq!(tracker.for_epoch(0).unwrap().len(), 3);
        assert_eq!(tracker.for_epoch(1).unwrap().len(), 2);
        assert!(tracker.for_epoch(2).is_none());
    }

    #[test]
    fn test_failed_transition_leaves_state() {
        let tracker = ValidatorSetTracker::new(genesis());
        let delta = ValidatorSetDelta {
            added: vec![],
            removed: Bitmap::from_indices([7]),
        };
        assert!(matches!(
            tracker.transition(&delta),
            Err(ValidatorSetError::RemovedIndexOutOfRange { .. })
        ));
        assert_eq!(tracker.current().epoch(), 0);
        assert!(tracker.previous().is_none());
    }

    #[test]
    fn test_queries_follow_current() {
        let tracker = ValidatorSetTracker::new(genesis());
        assert_eq!(
            ValidatorSetQueries::total_voting_power(&tracker),
            U256::from(30u64)
        );
        assert!(ValidatorSetQueries::is_active(&tracker, &[1; 20]));

        let delta = ValidatorSetDelta {
            added: vec![],
            removed: Bitmap::from_indices([0]),
        };
        tracker.transition(&delta).unwrap();
        assert!(!ValidatorSetQueries::is_active(&tracker, &[1; 20]));
        assert_eq!(
            ValidatorSetQueries::quorum_threshold(&tracker),
            U256::from(14u64)
        );
    }
}
