//! Inbound query API.

use shared_types::{Address, U256};

use crate::domain::ValidatorSet;

/// Read-only roster queries used by block verification and reward accounting.
pub trait ValidatorSetQueries {
    fn voting_power_of(&self, address: &Address) -> U256;

    fn quorum_threshold(&self) -> U256;

    fn is_active(&self, address: &Address) -> bool;

    fn total_voting_power(&self) -> U256;
}

impl ValidatorSetQueries for ValidatorSet {
    fn voting_power_of(&self, address: &Address) -> U256 {
        ValidatorSet::voting_power_of(self, address)
    }

    fn quorum_threshold(&self) -> U256 {
        ValidatorSet::quorum_threshold(self)
    }

    fn is_active(&self, address: &Address) -> bool {
        ValidatorSet::is_active(self, address)
    }

    fn total_voting_power(&self) -> U256 {
        ValidatorSet::total_voting_power(self)
    }
}
