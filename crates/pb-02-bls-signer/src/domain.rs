//! Signing domains.

use std::fmt;

/// Hash-to-curve ciphersuite shared by all domains.
const CIPHERSUITE: &str = "BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// The context a BLS signature is produced for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Block seals and checkpoint attestations submitted to the checkpoint manager.
    CheckpointManager,
    /// Validator-set attestations, including KOSK registration proofs.
    ValidatorSet,
}

impl Domain {
    /// Human-readable domain name.
    pub fn name(&self) -> &'static str {
        match self {
            Domain::CheckpointManager => "DOMAIN_CHECKPOINT_MANAGER",
            Domain::ValidatorSet => "DOMAIN_CHILD_VALIDATOR_SET",
        }
    }

    /// Domain separation tag passed to hash-to-curve.
    pub fn dst(&self) -> &'static [u8] {
        match self {
            Domain::CheckpointManager => {
                b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_DOMAIN_CHECKPOINT_MANAGER"
            }
            Domain::ValidatorSet => {
                b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_DOMAIN_CHILD_VALIDATOR_SET"
            }
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
