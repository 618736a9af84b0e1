//! Binary keccak Merkle tree.
//!
//! Odd levels duplicate their last node. An empty tree has the zero root and a
//! single-leaf tree's root is the leaf.

use shared_types::{keccak256, Hash, ZERO_HASH};

use super::errors::{CheckpointError, CheckpointResult};

#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// `levels[0]` are the leaves, the last level is the root.
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    pub fn new(leaves: Vec<Hash>) -> Self {
        let mut levels = vec![leaves];
        loop {
            let Some(level) = levels.last() else { break };
            if level.len() <= 1 {
                break;
            }
            let next: Vec<Hash> = level
                .chunks(2)
                .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
            levels.push(next);
        }
        Self { levels }
    }

    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    pub fn root(&self) -> Hash {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(ZERO_HASH)
    }

    /// Sibling path from leaf `index` up to the root.
    pub fn proof(&self, index: usize) -> CheckpointResult<Vec<Hash>> {
        let leaves = self.leaf_count();
        if index >= leaves {
            return Err(CheckpointError::LeafIndexOutOfRange { index, leaves });
        }
        let mut path = Vec::with_capacity(self.levels.len().saturating_sub(1));
        let mut position = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = position ^ 1;
            path.push(*level.get(sibling).unwrap_or(&level[position]));
            position /= 2;
        }
        Ok(path)
    }
}

/// Check that `leaf` at `index` hashes up to `root` along `proof`.
pub fn verify_proof(leaf: &Hash, index: usize, proof: &[Hash], root: &Hash) -> bool {
    let mut node = *leaf;
    let mut position = index;
    for sibling in proof {
        node = if position % 2 == 0 {
            hash_pair(&node, sibling)
        } else {
            hash_pair(sibling, &node)
        };
        position /= 2;
    }
    position == 0 && &node == root
}

fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left);
    buf[32..].copy_from_slice(right);
    keccak256(buf)
}
