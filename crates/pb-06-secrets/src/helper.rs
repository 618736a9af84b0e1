//! Key initialisation and loading on top of a [`SecretsManager`].
//!
//! `init_*` helpers generate fresh material and refuse to run if the secret
//! already exists. `load_*` helpers return `None` when the secret is absent.

use pb_02_bls_signer::{make_kosk_signature, PrivateKey, PublicKey, Signature};
use shared_types::{address_to_hex, decode_hex, Address};
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::{
    Account, EcdsaKeyPair, NetworkKey, SecretName, SecretsError, SecretsResult,
};
use crate::ports::outbound::SecretsManager;

async fn ensure_absent(sm: &dyn SecretsManager, name: SecretName) -> SecretsResult<()> {
    if sm.has_secret(name).await? {
        return Err(SecretsError::AlreadyInitialized { name });
    }
    Ok(())
}

async fn store_hex(sm: &dyn SecretsManager, name: SecretName, bytes: &[u8]) -> SecretsResult<()> {
    let encoded = Zeroizing::new(hex::encode(bytes));
    sm.set_secret(name, encoded.as_bytes()).await
}

async fn load_hex(
    sm: &dyn SecretsManager,
    name: SecretName,
) -> SecretsResult<Option<Zeroizing<Vec<u8>>>> {
    if !sm.has_secret(name).await? {
        return Ok(None);
    }
    let raw = sm.get_secret(name).await?;
    let text = std::str::from_utf8(&raw).map_err(|e| SecretsError::InvalidKey {
        name,
        reason: e.to_string(),
    })?;
    let bytes = decode_hex(text).map_err(|e| SecretsError::InvalidKey {
        name,
        reason: e.to_string(),
    })?;
    Ok(Some(Zeroizing::new(bytes)))
}

/// Generate and store the validator's ECDSA key. Returns its address.
pub async fn init_ecdsa_validator_key(sm: &dyn SecretsManager) -> SecretsResult<Address> {
    ensure_absent(sm, SecretName::ValidatorKey).await?;
    let key = EcdsaKeyPair::generate();
    store_hex(sm, SecretName::ValidatorKey, key.to_bytes().as_slice()).await?;
    info!(address = %address_to_hex(&key.address()), "[pb-06] Validator key initialised");
    Ok(key.address())
}

/// Generate and store the validator's BLS key. Returns its public key.
pub async fn init_bls_validator_key(sm: &dyn SecretsManager) -> SecretsResult<PublicKey> {
    ensure_absent(sm, SecretName::ValidatorBlsKey).await?;
    let key = PrivateKey::generate()?;
    store_hex(sm, SecretName::ValidatorBlsKey, key.to_bytes().as_slice()).await?;
    Ok(key.public_key())
}

/// Generate and store the network identity key. Returns the node id.
pub async fn init_network_key(sm: &dyn SecretsManager) -> SecretsResult<String> {
    ensure_absent(sm, SecretName::NetworkKey).await?;
    let key = NetworkKey::generate();
    store_hex(sm, SecretName::NetworkKey, key.to_bytes().as_slice()).await?;
    Ok(key.node_id())
}

/// Sign and store the KOSK proof for `account` on `chain_id`.
pub async fn init_validator_bls_signature(
    sm: &dyn SecretsManager,
    account: &Account,
    chain_id: u64,
) -> SecretsResult<Signature> {
    ensure_absent(sm, SecretName::ValidatorBlsSignature).await?;
    let signature = make_kosk_signature(&account.bls, &account.address(), chain_id);
    store_hex(sm, SecretName::ValidatorBlsSignature, &signature.to_bytes()).await?;
    Ok(signature)
}

pub async fn load_validator_address(sm: &dyn SecretsManager) -> SecretsResult<Option<Address>> {
    load_hex(sm, SecretName::ValidatorKey)
        .await?
        .map(|bytes| EcdsaKeyPair::from_bytes(&bytes).map(|k| k.address()))
        .transpose()
}

pub async fn load_bls_public_key(sm: &dyn SecretsManager) -> SecretsResult<Option<PublicKey>> {
    load_hex(sm, SecretName::ValidatorBlsKey)
        .await?
        .map(|bytes| {
            PrivateKey::from_bytes(&bytes)
                .map(|k| k.public_key())
                .map_err(SecretsError::from)
        })
        .transpose()
}

pub async fn load_node_id(sm: &dyn SecretsManager) -> SecretsResult<Option<String>> {
    load_hex(sm, SecretName::NetworkKey)
        .await?
        .map(|bytes| NetworkKey::from_bytes(&bytes).map(|k| k.node_id()))
        .transpose()
}

pub async fn load_bls_signature(sm: &dyn SecretsManager) -> SecretsResult<Option<Signature>> {
    load_hex(sm, SecretName::ValidatorBlsSignature)
        .await?
        .map(|bytes| Signature::from_bytes(&bytes).map_err(SecretsError::from))
        .transpose()
}

/// Load the ECDSA and BLS keys as one account. Both must exist.
pub async fn load_account(sm: &dyn SecretsManager) -> SecretsResult<Account> {
    let ecdsa = load_hex(sm, SecretName::ValidatorKey)
        .await?
        .ok_or(SecretsError::NotFound {
            name: SecretName::ValidatorKey,
        })?;
    let bls = load_hex(sm, SecretName::ValidatorBlsKey)
        .await?
        .ok_or(SecretsError::NotFound {
            name: SecretName::ValidatorBlsKey,
        })?;
    Ok(Account {
        ecdsa: EcdsaKeyPair::from_bytes(&ecdsa)?,
        bls: PrivateKey::from_bytes(&bls)?,
    })
}
