//! Knowledge-of-secret-key proofs.
//!
//! A validator registering on the root chain signs `address ‖ uint256(chainId)`
//! under [`Domain::ValidatorSet`]. Binding the address stops a key from being
//! registered by anyone but its owner; binding the chain id stops replay across
//! chains.

use shared_types::{address_to_hex, u256_to_be_bytes, Address, U256};

use crate::domain::Domain;
use crate::errors::BlsError;
use crate::keys::{PrivateKey, PublicKey};
use crate::signature::Signature;

/// Length of the KOSK message: 20-byte address plus a 32-byte word.
pub const KOSK_MESSAGE_LENGTH: usize = 52;

/// Build the KOSK message for `address` on `chain_id`.
pub fn kosk_message(address: &Address, chain_id: u64) -> [u8; KOSK_MESSAGE_LENGTH] {
    let mut message = [0u8; KOSK_MESSAGE_LENGTH];
    message[..20].copy_from_slice(address);
    message[20..].copy_from_slice(&u256_to_be_bytes(&U256::from(chain_id)));
    message
}

/// Produce a KOSK proof for `address` on `chain_id`.
pub fn make_kosk_signature(key: &PrivateKey, address: &Address, chain_id: u64) -> Signature {
    key.sign(&kosk_message(address, chain_id), Domain::ValidatorSet)
}

/// Check a KOSK proof.
pub fn verify_kosk_signature(
    signature: &Signature,
    public_key: &PublicKey,
    address: &Address,
    chain_id: u64,
) -> Result<(), BlsError> {
    if signature.verify(&kosk_message(address, chain_id), public_key, Domain::ValidatorSet) {
        Ok(())
    } else {
        Err(BlsError::InvalidKoskSignature {
            address: address_to_hex(address),
        })
    }
}
