//! secp256k1 wallet keys and validator accounts.

use std::fmt;

use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use pb_02_bls_signer::{PrivateKey, PublicKey};
use shared_types::{address_to_hex, keccak256, Address, Hash};
use zeroize::Zeroizing;

use super::errors::{SecretsError, SecretsResult};
use super::names::SecretName;

/// secp256k1 key with Ethereum-style address derivation.
#[derive(Clone)]
pub struct EcdsaKeyPair {
    signing_key: SigningKey,
    address: Address,
}

impl EcdsaKeyPair {
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut rand::thread_rng()))
    }

    /// Restore from a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> SecretsResult<Self> {
        if bytes.len() != 32 {
            return Err(SecretsError::InvalidKey {
                name: SecretName::ValidatorKey,
                reason: format!("expected 32 bytes, got {}", bytes.len()),
            });
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|e| SecretsError::InvalidKey {
            name: SecretName::ValidatorKey,
            reason: e.to_string(),
        })?;
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let point = signing_key.verifying_key().to_encoded_point(false);
        let digest = keccak256(&point.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&digest[12..]);
        Self {
            signing_key,
            address,
        }
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }

    /// `keccak256(uncompressed_pubkey[1..])[12..]`
    pub fn address(&self) -> Address {
        self.address
    }

    /// Recoverable signature `r ‖ s ‖ v` over a 32-byte digest.
    pub fn sign_hash(&self, hash: &Hash) -> SecretsResult<[u8; 65]> {
        let (signature, recovery_id): (Signature, RecoveryId) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|e| SecretsError::InvalidKey {
                name: SecretName::ValidatorKey,
                reason: e.to_string(),
            })?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(out)
    }
}

impl fmt::Debug for EcdsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaKeyPair")
            .field("address", &address_to_hex(&self.address))
            .finish_non_exhaustive()
    }
}

/// A validator's signing identity: transaction key plus consensus key.
#[derive(Clone, Debug)]
pub struct Account {
    pub ecdsa: EcdsaKeyPair,
    pub bls: PrivateKey,
}

impl Account {
    pub fn generate() -> SecretsResult<Self> {
        Ok(Self {
            ecdsa: EcdsaKeyPair::generate(),
            bls: PrivateKey::generate()?,
        })
    }

    pub fn address(&self) -> Address {
        self.ecdsa.address()
    }

    pub fn bls_public_key(&self) -> PublicKey {
        self.bls.public_key()
    }
}
