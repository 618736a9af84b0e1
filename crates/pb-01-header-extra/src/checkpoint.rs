//! Checkpoint metadata carried in epoch-ending headers.

use rlp::{Encodable, Rlp, RlpStream};
use serde::{Deserialize, Serialize};
use shared_types::{keccak256, Hash};

use crate::codec;
use crate::errors::HeaderResult;

/// Commitment a block makes for root-chain checkpoint submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointData {
    pub block_round: u64,
    pub epoch_number: u64,
    /// First child-chain block covered.
    pub start_block: u64,
    /// Last child-chain block covered.
    pub end_block: u64,
    #[serde(with = "shared_types::serde_hex::hash")]
    pub current_validators_hash: Hash,
    #[serde(with = "shared_types::serde_hex::hash")]
    pub next_validators_hash: Hash,
    /// Merkle root over the state-sync events in the range.
    #[serde(with = "shared_types::serde_hex::hash")]
    pub event_root: Hash,
}

impl CheckpointData {
    /// The message validators sign, under the checkpoint-manager domain, to
    /// attest this checkpoint at `block_number` with `block_hash`.
    pub fn signing_hash(&self, chain_id: u64, block_number: u64, block_hash: &Hash) -> Hash {
        let mut s = RlpStream::new_list(8);
        s.append(&chain_id);
        s.append(&block_number);
        codec::append_bytes(&mut s, block_hash);
        s.append(&self.block_round);
        s.append(&self.epoch_number);
        codec::append_bytes(&mut s, &self.event_root);
        codec::append_bytes(&mut s, &self.current_validators_hash);
        codec::append_bytes(&mut s, &self.next_validators_hash);
        keccak256(s.out())
    }

    pub(crate) fn from_rlp(rlp: &Rlp<'_>) -> HeaderResult<Self> {
        const FIELD: &str = "checkpoint";
        codec::expect_list(rlp, FIELD, 7)?;
        Ok(Self {
            block_round: codec::value(rlp, 0, FIELD)?,
            epoch_number: codec::value(rlp, 1, FIELD)?,
            start_block: codec::value(rlp, 2, FIELD)?,
            end_block: codec::value(rlp, 3, FIELD)?,
            current_validators_hash: codec::fixed(rlp, 4, FIELD)?,
            next_validators_hash: codec::fixed(rlp, 5, FIELD)?,
            event_root: codec::fixed(rlp, 6, FIELD)?,
        })
    }
}

impl Encodable for CheckpointData {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(7);
        s.append(&self.block_round);
        s.append(&self.epoch_number);
        s.append(&self.start_block);
        s.append(&self.end_block);
        codec::append_bytes(s, &self.current_validators_hash);
        codec::append_bytes(s, &self.next_validators_hash);
        codec::append_bytes(s, &self.event_root);
    }
}
