//! Operator-facing results of bridge commands.
//!
//! Each outcome renders as an aligned `key | value` block.

use std::fmt;

use serde::Serialize;
use shared_types::{address_to_hex, hash_to_hex, serde_hex, Address, U256};

use super::entities::{TransferLeg, TxHash};

fn write_kv(f: &mut fmt::Formatter<'_>, title: &str, rows: &[(&str, String)]) -> fmt::Result {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    writeln!(f, "[{title}]")?;
    for (key, value) in rows {
        writeln!(f, "{key:<width$} | {value}")?;
    }
    Ok(())
}

fn join<T>(items: impl IntoIterator<Item = T>, render: impl Fn(T) -> String) -> String {
    items.into_iter().map(render).collect::<Vec<_>>().join(", ")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Deposit,
    Withdraw,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "DEPOSIT ERC20"),
            Self::Withdraw => write!(f, "WITHDRAW ERC20"),
        }
    }
}

/// Settled batch transfer. Hashes are in leg order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    pub direction: TransferDirection,
    #[serde(with = "serde_hex::address")]
    pub sender: Address,
    pub legs: Vec<TransferLeg>,
    #[serde(with = "serde_hex::hashes")]
    pub tx_hashes: Vec<TxHash>,
}

pub type DepositOutcome = TransferOutcome;

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_kv(
            f,
            &self.direction.to_string(),
            &[
                ("Sender", address_to_hex(&self.sender)),
                ("Receivers", join(&self.legs, |l| address_to_hex(&l.receiver))),
                ("Amounts", join(&self.legs, |l| l.amount.to_string())),
                ("Transactions", join(&self.tx_hashes, hash_to_hex)),
            ],
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WhitelistOutcome {
    #[serde(with = "serde_hex::addresses")]
    pub validators: Vec<Address>,
    #[serde(with = "serde_hex::hash")]
    pub tx_hash: TxHash,
}

impl fmt::Display for WhitelistOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_kv(
            f,
            "WHITELIST VALIDATORS",
            &[
                ("Validator addresses", join(&self.validators, address_to_hex)),
                ("Transaction", hash_to_hex(&self.tx_hash)),
            ],
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistrationOutcome {
    #[serde(with = "serde_hex::address")]
    pub validator: Address,
    pub bls_key: String,
    #[serde(with = "serde_hex::hash")]
    pub tx_hash: TxHash,
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_kv(
            f,
            "VALIDATOR REGISTRATION",
            &[
                ("Validator address", address_to_hex(&self.validator)),
                ("BLS public key", self.bls_key.clone()),
                ("Transaction", hash_to_hex(&self.tx_hash)),
            ],
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StakeOutcome {
    #[serde(with = "serde_hex::address")]
    pub validator: Address,
    pub amount: U256,
    #[serde(with = "serde_hex::hash")]
    pub tx_hash: TxHash,
}

impl fmt::Display for StakeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_kv(
            f,
            "VALIDATOR STAKING",
            &[
                ("Validator address", address_to_hex(&self.validator)),
                ("Amount staked", self.amount.to_string()),
                ("Transaction", hash_to_hex(&self.tx_hash)),
            ],
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExitOutcome {
    pub event_id: u64,
    #[serde(with = "serde_hex::hash")]
    pub tx_hash: TxHash,
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_kv(
            f,
            "EXIT ERC20",
            &[
                ("Exit event ID", self.event_id.to_string()),
                ("Transaction", hash_to_hex(&self.tx_hash)),
            ],
        )
    }
}
