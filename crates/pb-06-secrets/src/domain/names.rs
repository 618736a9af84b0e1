use std::fmt;

use serde::{Deserialize, Serialize};

/// The named secrets a validator node holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretName {
    /// secp256k1 key that signs root-chain transactions.
    ValidatorKey,
    /// BLS key that signs seals and checkpoints.
    ValidatorBlsKey,
    /// ed25519 network identity key.
    NetworkKey,
    /// KOSK proof over the validator address and chain id.
    ValidatorBlsSignature,
}

impl SecretName {
    pub const ALL: [SecretName; 4] = [
        SecretName::ValidatorKey,
        SecretName::ValidatorBlsKey,
        SecretName::NetworkKey,
        SecretName::ValidatorBlsSignature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecretName::ValidatorKey => "validator-key",
            SecretName::ValidatorBlsKey => "validator-bls-key",
            SecretName::NetworkKey => "network-key",
            SecretName::ValidatorBlsSignature => "validator-bls-signature",
        }
    }

    /// File location relative to a local data directory.
    pub fn relative_path(&self) -> &'static str {
        match self {
            SecretName::ValidatorKey => "consensus/validator.key",
            SecretName::ValidatorBlsKey => "consensus/validator-bls.key",
            SecretName::NetworkKey => "libp2p/libp2p.key",
            SecretName::ValidatorBlsSignature => "consensus/validator.sig",
        }
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
