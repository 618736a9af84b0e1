//! Validator metadata and epoch-boundary deltas.

use pb_02_bls_signer::PublicKey;
use rlp::{Encodable, Rlp, RlpStream};
use serde::{Deserialize, Serialize};
use shared_types::{Address, U256};

use crate::bitmap::Bitmap;
use crate::codec;
use crate::errors::{HeaderError, HeaderResult};

/// One validator as carried in a delta and held in the roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorMetadata {
    #[serde(with = "shared_types::serde_hex::address")]
    pub address: Address,
    pub bls_key: PublicKey,
    pub voting_power: U256,
    pub is_active: bool,
}

impl ValidatorMetadata {
    pub fn new(address: Address, bls_key: PublicKey, voting_power: U256) -> Self {
        Self {
            address,
            bls_key,
            voting_power,
            is_active: true,
        }
    }

    pub(crate) fn from_rlp(rlp: &Rlp<'_>, index: usize) -> HeaderResult<Self> {
        const FIELD: &str = "validator";
        codec::expect_list(rlp, FIELD, 4)?;
        let address = codec::fixed::<20>(rlp, 0, FIELD)?;
        let key_bytes: Vec<u8> = codec::value(rlp, 1, FIELD)?;
        let bls_key = PublicKey::from_bytes(&key_bytes)
            .map_err(|source| HeaderError::InvalidPublicKey { index, source })?;
        Ok(Self {
            address,
            bls_key,
            voting_power: codec::value(rlp, 2, FIELD)?,
            is_active: codec::value(rlp, 3, FIELD)?,
        })
    }
}

impl Encodable for ValidatorMetadata {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        codec::append_bytes(s, &self.address);
        codec::append_bytes(s, &self.bls_key.to_bytes());
        s.append(&self.voting_power);
        s.append(&self.is_active);
    }
}

/// Roster change applied at an epoch boundary.
///
/// `removed` indexes the roster as it stood before the delta.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatorSetDelta {
    pub added: Vec<ValidatorMetadata>,
    pub removed: Bitmap,
}

impl ValidatorSetDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.count_ones() == 0
    }

    pub(crate) fn from_rlp(rlp: &Rlp<'_>) -> HeaderResult<Self> {
        const FIELD: &str = "validators";
        codec::expect_list(rlp, FIELD, 2)?;
        let added_rlp = codec::at(rlp, 0, FIELD)?;
        if !added_rlp.is_list() {
            return Err(HeaderError::Rlp {
                field: FIELD,
                source: rlp::DecoderError::RlpExpectedToBeList,
            });
        }
        let added = added_rlp
            .iter()
            .enumerate()
            .map(|(index, item)| ValidatorMetadata::from_rlp(&item, index))
            .collect::<HeaderResult<Vec<_>>>()?;
        let removed: Vec<u8> = codec::value(rlp, 1, FIELD)?;
        Ok(Self {
            added,
            removed: Bitmap::from_bytes(removed),
        })
    }
}

impl Encodable for ValidatorSetDelta {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append_list::<ValidatorMetadata, _>(&self.added);
        codec::append_bytes(s, self.removed.as_bytes());
    }
}
