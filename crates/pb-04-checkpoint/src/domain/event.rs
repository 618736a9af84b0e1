use rlp::RlpStream;
use serde::{Deserialize, Serialize};
use shared_types::{keccak256, Address, Hash};

/// A cross-chain message emitted on the root chain for the child chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSyncEvent {
    pub id: u64,
    #[serde(with = "shared_types::serde_hex::address")]
    pub sender: Address,
    #[serde(with = "shared_types::serde_hex::address")]
    pub receiver: Address,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub data: Vec<u8>,
}

impl StateSyncEvent {
    /// RLP encoding `[id, sender, receiver, data]`; the unhashed Merkle leaf.
    pub fn encode(&self) -> Vec<u8> {
        let mut s = RlpStream::new_list(4);
        s.append(&self.id);
        s.append(&self.sender.to_vec());
        s.append(&self.receiver.to_vec());
        s.append(&self.data);
        s.out().to_vec()
    }

    pub fn leaf_hash(&self) -> Hash {
        keccak256(self.encode())
    }
}
