//! BLS key types.

use std::fmt;
use std::hash::{Hash, Hasher};

use blst::min_pk::{PublicKey as BlstPublicKey, SecretKey};
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, Zeroizing};

use crate::domain::Domain;
use crate::errors::BlsError;
use crate::signature::Signature;
use crate::PUBLIC_KEY_LENGTH;

/// A validator's BLS secret key.
///
/// Debug output is redacted. The raw scalar only leaves this type through
/// [`PrivateKey::to_bytes`], which hands back a zeroizing buffer.
pub struct PrivateKey {
    secret: SecretKey,
}

impl PrivateKey {
    /// Generate a new random key.
    pub fn generate() -> Result<Self, BlsError> {
        let mut ikm = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut ikm);
        let secret = SecretKey::key_gen(&ikm, &[])
            .map_err(|e| BlsError::KeyGeneration(format!("{e:?}")));
        ikm.zeroize();
        Ok(Self { secret: secret? })
    }

    /// Restore from a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        let secret = SecretKey::from_bytes(bytes).map_err(|_| BlsError::InvalidPrivateKey)?;
        Ok(Self { secret })
    }

    /// Serialize the secret scalar.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.to_bytes())
    }

    /// Restore from hex, with or without `0x`.
    pub fn from_hex(raw: &str) -> Result<Self, BlsError> {
        let bytes = Zeroizing::new(
            shared_types::decode_hex(raw).map_err(|_| BlsError::InvalidPrivateKey)?,
        );
        Self::from_bytes(&bytes)
    }

    /// Lowercase hex of the secret scalar, without prefix.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_bytes().as_slice()))
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.secret.sk_to_pk())
    }

    /// Sign `message` under `domain`.
    pub fn sign(&self, message: &[u8], domain: Domain) -> Signature {
        Signature::from_blst(self.secret.sign(message, domain.dst(), &[]))
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret.clone(),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A validator's BLS public key (G1, 48 bytes compressed).
#[derive(Clone)]
pub struct PublicKey(pub(crate) BlstPublicKey);

impl PublicKey {
    /// Parse a compressed public key.
    ///
    /// The point must decode, lie in the prime-order subgroup and not be the
    /// identity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(BlsError::InvalidPublicKey);
        }
        BlstPublicKey::key_validate(bytes)
            .map(PublicKey)
            .map_err(|_| BlsError::InvalidPublicKey)
    }

    /// Compressed 48-byte encoding.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.compress()
    }

    /// Verify `signature` over `message` under `domain`.
    pub fn verify(&self, message: &[u8], signature: &Signature, domain: Domain) -> bool {
        signature.verify(message, self, domain)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(0x{})", hex::encode(self.to_bytes()))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(self.to_bytes())))
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let bytes = shared_types::decode_hex(&raw).map_err(serde::de::Error::custom)?;
        PublicKey::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}
