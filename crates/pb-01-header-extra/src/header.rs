//! Block header and its canonical hash.

use rlp::RlpStream;
use serde::{Deserialize, Serialize};
use shared_types::{keccak256, Address, Hash, ZERO_HASH};
use tracing::debug;

use crate::codec;
use crate::errors::HeaderResult;
use crate::extra::Extra;

/// The subset of a child-chain block header the consensus layer hashes.
///
/// `extra_data` is opaque to the base chain and owned by consensus.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    #[serde(with = "shared_types::serde_hex::hash")]
    pub parent_hash: Hash,
    #[serde(with = "shared_types::serde_hex::address")]
    pub miner: Address,
    #[serde(with = "shared_types::serde_hex::hash")]
    pub state_root: Hash,
    #[serde(with = "shared_types::serde_hex::hash")]
    pub tx_root: Hash,
    #[serde(with = "shared_types::serde_hex::hash")]
    pub receipts_root: Hash,
    pub number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub extra_data: Vec<u8>,
    #[serde(with = "shared_types::serde_hex::hash")]
    pub mix_hash: Hash,
    pub base_fee: u64,
}

impl Header {
    /// Canonical hash, or [`ZERO_HASH`] if `extra_data` does not decode.
    pub fn hash(&self) -> Hash {
        header_hash(self)
    }

    /// Decode the consensus payload.
    pub fn extra(&self) -> HeaderResult<Extra> {
        Extra::decode(&self.extra_data)
    }

    fn rlp_with_extra(&self, extra: &[u8]) -> Vec<u8> {
        let mut s = RlpStream::new_list(12);
        codec::append_bytes(&mut s, &self.parent_hash);
        codec::append_bytes(&mut s, &self.miner);
        codec::append_bytes(&mut s, &self.state_root);
        codec::append_bytes(&mut s, &self.tx_root);
        codec::append_bytes(&mut s, &self.receipts_root);
        s.append(&self.number);
        s.append(&self.gas_limit);
        s.append(&self.gas_used);
        s.append(&self.timestamp);
        codec::append_bytes(&mut s, extra);
        codec::append_bytes(&mut s, &self.mix_hash);
        s.append(&self.base_fee);
        s.out().to_vec()
    }
}

/// Hash `header` with its commit seal stripped from `extra`.
///
/// Malformed or undersized `extra` yields the all-zero hash instead of an
/// error; peers probe unfinished headers this way.
pub fn header_hash(header: &Header) -> Hash {
    match header.extra() {
        Ok(extra) => keccak256(header.rlp_with_extra(&extra.clean())),
        Err(err) => {
            debug!(
                number = header.number,
                error = %err,
                "[pb-01] Undecodable extra, hashing to zero"
            );
            ZERO_HASH
        }
    }
}
