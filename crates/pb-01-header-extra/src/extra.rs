//! The consensus payload carried in `header.extra`.

use rlp::{Rlp, RlpStream};

use crate::checkpoint::CheckpointData;
use crate::codec::{self, EMPTY_LIST};
use crate::errors::{HeaderError, HeaderResult};
use crate::signature::AggregatedSignature;
use crate::validator::ValidatorSetDelta;

/// Size of the opaque vanity prefix in front of the RLP payload.
pub const EXTRA_VANITY: usize = 32;

/// Decoded consensus payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extra {
    /// Roster delta; present only on epoch-ending blocks.
    pub validators: Option<ValidatorSetDelta>,
    /// Commit seal of the parent block.
    pub parent: Option<AggregatedSignature>,
    /// Commit seal of this block. Excluded from the header-hash pre-image.
    pub committed: Option<AggregatedSignature>,
    pub checkpoint: Option<CheckpointData>,
}

impl Extra {
    /// Encode with a zeroed vanity prefix.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; EXTRA_VANITY];
        out.extend_from_slice(&self.rlp_payload());
        out
    }

    /// Decode `vanity ‖ rlp`. The vanity bytes are not interpreted.
    pub fn decode(bytes: &[u8]) -> HeaderResult<Self> {
        if bytes.len() < EXTRA_VANITY {
            return Err(HeaderError::ExtraTooShort {
                actual: bytes.len(),
                minimum: EXTRA_VANITY,
            });
        }

        let rlp = codec::list(&bytes[EXTRA_VANITY..], "extra", 4)?;

        let validators = optional(&rlp, 0, "validators", ValidatorSetDelta::from_rlp)?;
        let parent = optional(&rlp, 1, "parent", |item| {
            AggregatedSignature::from_rlp(item, "parent")
        })?;
        let committed = optional(&rlp, 2, "committed", |item| {
            AggregatedSignature::from_rlp(item, "committed")
        })?;
        let checkpoint = optional(&rlp, 3, "checkpoint", CheckpointData::from_rlp)?;

        Ok(Self {
            validators,
            parent,
            committed,
            checkpoint,
        })
    }

    /// A copy with `committed` replaced by the empty signature, encoded. This
    /// is the `extra` that goes into the header-hash pre-image.
    pub fn clean(&self) -> Vec<u8> {
        Self {
            committed: Some(AggregatedSignature::empty()),
            ..self.clone()
        }
        .encode()
    }

    fn rlp_payload(&self) -> Vec<u8> {
        let mut s = RlpStream::new_list(4);
        match &self.validators {
            Some(delta) => s.append(delta),
            None => s.append_raw(&[EMPTY_LIST], 1),
        };
        for seal in [&self.parent, &self.committed] {
            match seal {
                Some(sig) => s.append(sig),
                None => s.append_raw(&[EMPTY_LIST], 1),
            };
        }
        match &self.checkpoint {
            Some(cp) => s.append(cp),
            None => s.append_raw(&[EMPTY_LIST], 1),
        };
        s.out().to_vec()
    }
}

fn optional<'a, T>(
    rlp: &Rlp<'a>,
    index: usize,
    field: &'static str,
    decode: impl FnOnce(&Rlp<'a>) -> HeaderResult<T>,
) -> HeaderResult<Option<T>> {
    let item = codec::at(rlp, index, field)?;
    if codec::is_absent(&item) {
        return Ok(None);
    }
    decode(&item).map(Some)
}
