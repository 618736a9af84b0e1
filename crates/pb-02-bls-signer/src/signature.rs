//! BLS signatures and aggregation.

use std::fmt;

use blst::min_pk::{
    AggregatePublicKey, AggregateSignature, PublicKey as BlstPublicKey,
    Signature as BlstSignature,
};
use blst::BLST_ERROR;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::Domain;
use crate::errors::BlsError;
use crate::keys::PublicKey;
use crate::SIGNATURE_LENGTH;

/// A BLS signature (G2, 96 bytes compressed). May be a single or an
/// aggregated signature.
#[derive(Clone)]
pub struct Signature(BlstSignature);

impl Signature {
    pub(crate) fn from_blst(inner: BlstSignature) -> Self {
        Self(inner)
    }

    /// Parse a compressed signature, including the subgroup check.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(BlsError::InvalidSignature);
        }
        BlstSignature::sig_validate(bytes, true)
            .map(Signature)
            .map_err(|_| BlsError::InvalidSignature)
    }

    /// Compressed 96-byte encoding.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.compress()
    }

    /// Verify this signature over `message` for a single public key.
    pub fn verify(&self, message: &[u8], public_key: &PublicKey, domain: Domain) -> bool {
        self.0
            .verify(false, message, domain.dst(), &[], &public_key.0, false)
            == BLST_ERROR::BLST_SUCCESS
    }

    /// Verify this aggregated signature over one `message` signed by every
    /// key in `public_keys`.
    ///
    /// Returns `false` for an empty key list.
    pub fn verify_aggregated(
        &self,
        message: &[u8],
        public_keys: &[PublicKey],
        domain: Domain,
    ) -> bool {
        match aggregate_public_keys(public_keys) {
            Ok(aggregated) => self.verify(message, &aggregated, domain),
            Err(_) => false,
        }
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Signature {}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(0x{})", hex::encode(self.to_bytes()))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.to_bytes())))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let bytes = shared_types::decode_hex(&raw).map_err(serde::de::Error::custom)?;
        Signature::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Signatures collected from several validators over one message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signatures(Vec<Signature>);

impl Signatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, signature: Signature) {
        self.0.push(signature);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum the collected points into one signature.
    pub fn aggregate(&self) -> Result<Signature, BlsError> {
        aggregate_signatures(&self.0)
    }
}

impl FromIterator<Signature> for Signatures {
    fn from_iter<I: IntoIterator<Item = Signature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Aggregate signatures over the same message into one.
pub fn aggregate_signatures(signatures: &[Signature]) -> Result<Signature, BlsError> {
    if signatures.is_empty() {
        return Err(BlsError::EmptyAggregation);
    }
    let refs: Vec<&BlstSignature> = signatures.iter().map(|s| &s.0).collect();
    AggregateSignature::aggregate(&refs, false)
        .map(|agg| Signature(agg.to_signature()))
        .map_err(|_| BlsError::AggregationFailed)
}

/// Aggregate public keys by point addition.
pub fn aggregate_public_keys(public_keys: &[PublicKey]) -> Result<PublicKey, BlsError> {
    if public_keys.is_empty() {
        return Err(BlsError::EmptyAggregation);
    }
    let refs: Vec<&BlstPublicKey> = public_keys.iter().map(|k| &k.0).collect();
    AggregatePublicKey::aggregate(&refs, false)
        .map(|agg| PublicKey(agg.to_public_key()))
        .map_err(|_| BlsError::AggregationFailed)
}
