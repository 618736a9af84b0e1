use shared_types::Hash;

use super::errors::{CheckpointError, CheckpointResult};
use super::event::StateSyncEvent;
use super::merkle::{verify_proof, MerkleTree};

/// Everything the root-chain exit helper needs to release one committed event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExitProof {
    pub event_id: u64,
    pub leaf_index: u64,
    /// RLP-encoded event; its keccak is the Merkle leaf.
    pub unhashed_leaf: Vec<u8>,
    pub proof: Vec<Hash>,
    /// Child-chain block whose checkpoint committed the event.
    pub checkpoint_block: u64,
    pub event_root: Hash,
}

impl ExitProof {
    /// Build a proof for `event_id` within the events one checkpoint committed.
    pub fn new(
        committed: &[StateSyncEvent],
        event_id: u64,
        checkpoint_block: u64,
    ) -> CheckpointResult<Self> {
        let index = committed
            .iter()
            .position(|e| e.id == event_id)
            .ok_or(CheckpointError::UnknownEvent { id: event_id })?;
        let tree = MerkleTree::new(committed.iter().map(StateSyncEvent::leaf_hash).collect());
        Ok(Self {
            event_id,
            leaf_index: index as u64,
            unhashed_leaf: committed[index].encode(),
            proof: tree.proof(index)?,
            checkpoint_block,
            event_root: tree.root(),
        })
    }

    /// Check the proof against its own root.
    pub fn verify(&self) -> bool {
        let leaf = shared_types::keccak256(&self.unhashed_leaf);
        usize::try_from(self.leaf_index)
            .map(|index| verify_proof(&leaf, index, &self.proof, &self.event_root))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::event_root;

    fn committed() -> Vec<StateSyncEvent> {
        (11..=15)
            .map(|id| StateSyncEvent {
                id,
                sender: [3; 20],
                receiver: [4; 20],
                data: vec![id as u8; 3],
            })
            .collect()
    }

    #[test]
    fn test_exit_proof_matches_checkpoint_root() {
        let events = committed();
        let proof = ExitProof::new(&events, 13, 100).unwrap();
        assert_eq!(proof.leaf_index, 2);
        assert_eq!(proof.event_root, event_root(&events));
        assert!(proof.verify());
    }

    #[test]
    fn test_tampered_leaf_fails() {
        let mut proof = ExitProof::new(&committed(), 15, 100).unwrap();
        proof.unhashed_leaf[0] ^= 1;
        assert!(!proof.verify());
    }

    #[test]
    fn test_unknown_event() {
        assert_eq!(
            ExitProof::new(&committed(), 99, 100).unwrap_err(),
            CheckpointError::UnknownEvent { id: 99 }
        );
    }
}
