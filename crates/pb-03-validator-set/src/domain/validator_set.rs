//! Immutable roster snapshots.

use std::collections::{HashMap, HashSet};

use pb_01_header_extra::{AggregatedSignature, Bitmap, ValidatorMetadata, ValidatorSetDelta};
use pb_02_bls_signer::{Domain, PublicKey, Signature};
use rlp::RlpStream;
use shared_types::{address_to_hex, keccak256, Address, Hash, U256};

use super::errors::{ValidatorSetError, ValidatorSetResult};

/// One version of the validator roster.
///
/// Index order is significant: signer bitmaps and removal bitmaps address
/// validators by position.
#[derive(Clone, Debug)]
pub struct ValidatorSet {
    epoch: u64,
    validators: Vec<ValidatorMetadata>,
    total_voting_power: U256,
    /// Quick lookup by address
    lookup: HashMap<Address, usize>,
}

impl ValidatorSet {
    /// Build a roster for `epoch`.
    ///
    /// Rejects duplicate addresses and totals that overflow 256 bits. Only
    /// active validators count toward the total.
    pub fn new(epoch: u64, validators: Vec<ValidatorMetadata>) -> ValidatorSetResult<Self> {
        let mut lookup = HashMap::with_capacity(validators.len());
        let mut total = U256::zero();
        for (index, v) in validators.iter().enumerate() {
            if lookup.insert(v.address, index).is_some() {
                return Err(ValidatorSetError::DuplicateValidator {
                    address: address_to_hex(&v.address),
                });
            }
            if v.is_active {
                total = total
                    .checked_add(v.voting_power)
                    .ok_or(ValidatorSetError::VotingPowerOverflow)?;
            }
        }
        Ok(Self {
            epoch,
            validators,
            total_voting_power: total,
            lookup,
        })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn validators(&self) -> &[ValidatorMetadata] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ValidatorMetadata> {
        self.validators.get(index)
    }

    pub fn get_by_address(&self, address: &Address) -> Option<&ValidatorMetadata> {
        self.index_of(address).map(|idx| &self.validators[idx])
    }

    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.lookup.get(address).copied()
    }

    /// Voting power of an active validator; zero for unknown or inactive ones.
    pub fn voting_power_of(&self, address: &Address) -> U256 {
        match self.get_by_address(address) {
            Some(v) if v.is_active => v.voting_power,
            _ => U256::zero(),
        }
    }

    pub fn is_active(&self, address: &Address) -> bool {
        self.get_by_address(address).is_some_and(|v| v.is_active)
    }

    pub fn total_voting_power(&self) -> U256 {
        self.total_voting_power
    }

    /// Smallest signed power that is a quorum: `floor(2T / 3) + 1`.
    pub fn quorum_threshold(&self) -> U256 {
        let two_thirds = self.total_voting_power.full_mul(U256::from(2u8)) / 3u8;
        U256::try_from(two_thirds)
            .unwrap_or(U256::MAX)
            .saturating_add(U256::one())
    }

    /// Whether `signed` power is strictly more than two thirds of the total.
    pub fn has_quorum(&self, signed: U256) -> bool {
        signed.full_mul(U256::from(3u8)) > self.total_voting_power.full_mul(U256::from(2u8))
    }

    /// Validators selected by `bitmap`, in index order.
    pub fn signers(&self, bitmap: &Bitmap) -> ValidatorSetResult<Vec<&ValidatorMetadata>> {
        bitmap
            .indices()
            .map(|index| match self.validators.get(index) {
                Some(v) if v.is_active => Ok(v),
                Some(_) => Err(ValidatorSetError::InactiveSigner { index }),
                None => Err(ValidatorSetError::BitmapOutOfRange {
                    index,
                    size: self.validators.len(),
                }),
            })
            .collect()
    }

    /// Summed voting power of the validators selected by `bitmap`.
    pub fn signers_power(&self, bitmap: &Bitmap) -> ValidatorSetResult<U256> {
        self.signers(bitmap)?
            .into_iter()
            .try_fold(U256::zero(), |acc, v| acc.checked_add(v.voting_power))
            .ok_or(ValidatorSetError::VotingPowerOverflow)
    }

    /// Verify an aggregated seal over `message` and require a quorum.
    ///
    /// The aggregate public key is summed from exactly the validators the
    /// bitmap selects. Returns the signed voting power.
    pub fn verify_aggregated(
        &self,
        aggregated: &AggregatedSignature,
        message: &[u8],
        domain: Domain,
    ) -> ValidatorSetResult<U256> {
        let signers = self.signers(&aggregated.bitmap)?;
        if signers.is_empty() {
            return Err(ValidatorSetError::NoSigners);
        }

        let signature = Signature::from_bytes(&aggregated.signature)?;
        let keys: Vec<PublicKey> = signers.iter().map(|v| v.bls_key.clone()).collect();
        if !signature.verify_aggregated(message, &keys, domain) {
            return Err(ValidatorSetError::SignatureMismatch);
        }

        let signed = self.signers_power(&aggregated.bitmap)?;
        if !self.has_quorum(signed) {
            return Err(ValidatorSetError::QuorumNotReached {
                signed,
                threshold: self.quorum_threshold(),
            });
        }
        Ok(signed)
    }

    /// Produce the roster for `next_epoch` with `delta` applied.
    ///
    /// Survivors keep their relative order and added validators are appended.
    /// `self` is left untouched.
    pub fn apply_delta(
        &self,
        delta: &ValidatorSetDelta,
        next_epoch: u64,
    ) -> ValidatorSetResult<ValidatorSet> {
        if let Some(index) = delta.removed.highest_set() {
            if index >= self.validators.len() {
                return Err(ValidatorSetError::RemovedIndexOutOfRange {
                    index,
                    size: self.validators.len(),
                });
            }
        }

        let mut added_addresses = HashSet::with_capacity(delta.added.len());
        for v in &delta.added {
            if !added_addresses.insert(v.address) {
                return Err(ValidatorSetError::DuplicateValidator {
                    address: address_to_hex(&v.address),
                });
            }
            if let Some(index) = self.index_of(&v.address) {
                if !delta.removed.is_set(index) {
                    return Err(ValidatorSetError::AlreadyActive {
                        address: address_to_hex(&v.address),
                    });
                }
            }
        }

        let removed_power = self
            .validators
            .iter()
            .enumerate()
            .filter(|(index, v)| v.is_active && delta.removed.is_set(*index))
            .try_fold(U256::zero(), |acc, (_, v)| acc.checked_add(v.voting_power))
            .ok_or(ValidatorSetError::VotingPowerOverflow)?;
        let added_power = delta
            .added
            .iter()
            .filter(|v| v.is_active)
            .try_fold(U256::zero(), |acc, v| acc.checked_add(v.voting_power))
            .ok_or(ValidatorSetError::VotingPowerOverflow)?;
        let expected_total = self
            .total_voting_power
            .checked_add(added_power)
            .ok_or(ValidatorSetError::VotingPowerOverflow)?
            .checked_sub(removed_power)
            .ok_or(ValidatorSetError::NegativeVotingPower)?;

        let roster: Vec<ValidatorMetadata> = self
            .validators
            .iter()
            .enumerate()
            .filter(|(index, _)| !delta.removed.is_set(*index))
            .map(|(_, v)| v.clone())
            .chain(delta.added.iter().cloned())
            .collect();

        let next = ValidatorSet::new(next_epoch, roster)?;
        debug_assert_eq!(next.total_voting_power, expected_total);
        Ok(next)
    }

    /// Commitment to the ordered roster, used for checkpoint validator hashes.
    pub fn hash(&self) -> Hash {
        let mut s = RlpStream::new();
        s.append_list::<ValidatorMetadata, _>(&self.validators);
        keccak256(s.out())
    }
}
