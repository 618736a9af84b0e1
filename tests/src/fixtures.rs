//! Shared fixtures: a local chain sealed by in-process validator keys.

use std::collections::HashMap;

use node_runtime::config::GenesisValidator;
use node_runtime::{ConsensusRuntime, EpochSummary, RuntimeError, RuntimeResult, VerifiedHeader};
use pb_01_header_extra::{
    AggregatedSignature, Bitmap, Extra, Header, ValidatorMetadata, ValidatorSetDelta,
};
use pb_02_bls_signer::{aggregate_signatures, make_kosk_signature, Domain, PrivateKey};
use pb_03_validator_set::{EpochSchedule, ValidatorSet};
use shared_types::{Address, Hash, U256};

pub const CHAIN_ID: u64 = 100;

/// A validator identity with its consensus key.
#[derive(Clone, Debug)]
pub struct Validator {
    pub address: Address,
    pub key: PrivateKey,
}

impl Validator {
    pub fn new(byte: u8) -> Self {
        Self::with_key([byte; 20], PrivateKey::generate().unwrap())
    }

    pub fn with_key(address: Address, key: PrivateKey) -> Self {
        Self { address, key }
    }

    pub fn metadata(&self, stake: u64) -> ValidatorMetadata {
        ValidatorMetadata::new(self.address, self.key.public_key(), U256::from(stake))
    }

    /// Genesis file entry with a KOSK proof for [`CHAIN_ID`].
    pub fn genesis_entry(&self, stake: u64) -> GenesisValidator {
        let proof = make_kosk_signature(&self.key, &self.address, CHAIN_ID);
        GenesisValidator {
            address: self.address,
            bls_key: hex::encode(self.key.public_key().to_bytes()),
            bls_signature: hex::encode(proof.to_bytes()),
            balance: None,
            stake: Some(U256::from(stake)),
            multi_addr: String::new(),
        }
    }
}

/// Drives a [`ConsensusRuntime`] the way a proposer and its peers would:
/// build `extra`, collect seals, verify against the head, finalise.
pub struct LocalChain {
    pub runtime: ConsensusRuntime,
    keys: HashMap<Address, PrivateKey>,
    head: Header,
}

impl LocalChain {
    /// Genesis roster of `validators`, one unit of stake each.
    pub fn new(schedule: EpochSchedule, validators: &[Validator]) -> Self {
        let roster = validators.iter().map(|v| v.metadata(1)).collect();
        let genesis = ValidatorSet::new(1, roster).unwrap();
        let mut chain = Self {
            runtime: ConsensusRuntime::new(CHAIN_ID, schedule, genesis),
            keys: HashMap::new(),
            head: Header {
                extra_data: Extra::default().encode(),
                ..Header::default()
            },
        };
        for v in validators {
            chain.enroll(v);
        }
        chain
    }

    /// Make `validator`'s key available for sealing.
    pub fn enroll(&mut self, validator: &Validator) {
        self.keys.insert(validator.address, validator.key.clone());
    }

    pub fn head(&self) -> &Header {
        &self.head
    }

    /// Propose the next block sealed by `signers`.
    pub fn propose(
        &self,
        signers: &[Address],
        delta: Option<ValidatorSetDelta>,
        event_root: Hash,
    ) -> RuntimeResult<Header> {
        let number = self.head.number + 1;
        let parent_seal = self
            .head
            .extra()
            .ok()
            .and_then(|extra| extra.committed)
            .filter(|seal| !seal.is_empty());
        let extra = self
            .runtime
            .build_extra(number, parent_seal, delta, event_root)?;

        let epoch = self.runtime.schedule().epoch_of(number);
        let roster = self
            .runtime
            .validators()
            .for_epoch(epoch)
            .ok_or(RuntimeError::UnknownEpoch { epoch })?;
        let claims: Vec<(usize, Address)> = signers
            .iter()
            .map(|address| (roster.index_of(address).unwrap(), *address))
            .collect();
        Ok(self.seal(number, extra, &claims))
    }

    /// Seal with explicit `(bitmap index, key owner)` claims.
    pub fn seal(&self, number: u64, mut extra: Extra, claims: &[(usize, Address)]) -> Header {
        let mut header = Header {
            parent_hash: self.head.hash(),
            number,
            timestamp: self.head.timestamp + 2,
            extra_data: extra.encode(),
            ..Header::default()
        };
        let message = self.runtime.seal_message(&header, &extra).unwrap();
        let signatures: Vec<_> = claims
            .iter()
            .map(|(_, address)| self.keys[address].sign(&message, Domain::CheckpointManager))
            .collect();
        let aggregated = aggregate_signatures(&signatures).unwrap();
        extra.committed = Some(AggregatedSignature::new(
            aggregated.to_bytes().to_vec(),
            Bitmap::from_indices(claims.iter().map(|(index, _)| *index)),
        ));
        header.extra_data = extra.encode();
        header
    }

    /// Verify `header` against the head, finalise it and advance.
    pub fn import(
        &mut self,
        header: Header,
    ) -> RuntimeResult<(VerifiedHeader, Option<EpochSummary>)> {
        let verified = self.runtime.verify_header(&header, &self.head)?;
        let summary = self.runtime.finalize_block(&verified)?;
        self.head = header;
        Ok((verified, summary))
    }

    /// Propose and import blocks until the head reaches `number`.
    pub fn advance_to(&mut self, number: u64, signers: &[Address]) -> RuntimeResult<()> {
        while self.head.number < number {
            let delta = self
                .runtime
                .schedule()
                .is_end_of_epoch(self.head.number + 1)
                .then(ValidatorSetDelta::default);
            let header = self.propose(signers, delta, [0; 32])?;
            self.import(header)?;
        }
        Ok(())
    }
}
