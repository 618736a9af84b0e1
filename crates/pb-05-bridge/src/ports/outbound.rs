//! Outbound ports (driven side).

use async_trait::async_trait;
use pb_06_secrets::EcdsaKeyPair;

use crate::domain::{Receipt, RelayerError, Transaction, TxHash};

/// Signs and broadcasts transactions and reports their receipts.
///
/// Nonce management and fee estimation belong to the implementation.
#[async_trait]
pub trait TxRelayer: Send + Sync {
    /// Sign `txn` with `signer` and broadcast it.
    async fn send_transaction(
        &self,
        txn: Transaction,
        signer: &EcdsaKeyPair,
    ) -> Result<TxHash, RelayerError>;

    /// `None` while the transaction is not yet mined.
    async fn get_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, RelayerError>;
}
