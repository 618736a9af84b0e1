//! Network identity key.

use ed25519_dalek::SigningKey;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::errors::{SecretsError, SecretsResult};
use super::names::SecretName;

/// ed25519 key identifying the node on the p2p network.
pub struct NetworkKey {
    signing_key: SigningKey,
}

impl NetworkKey {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> SecretsResult<Self> {
        let secret: [u8; 32] = bytes.try_into().map_err(|_| SecretsError::InvalidKey {
            name: SecretName::NetworkKey,
            reason: format!("expected 32 bytes, got {}", bytes.len()),
        })?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&secret),
        })
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Hex of `sha256(public_key)`.
    pub fn node_id(&self) -> String {
        hex::encode(Sha256::digest(self.public_key()))
    }
}
