//! Merkle tree construction and inclusion proofs.
//!
//! Leaves are lowercase hex SHA-256 digests. A parent hashes the UTF-8
//! bytes of its two children's hex strings concatenated; an odd trailing
//! node is promoted to the next level unchanged. A single leaf is its own
//! root.

use sha2::{Digest, Sha256};
use tracing::debug;

use pactum_contracts::error::{PactumError, PactumResult};

/// Which side of the running hash a proof sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One sibling on the path from a leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStep {
    /// The sibling's hex hash.
    pub hash: String,
    /// Where the sibling goes in the concatenation.
    pub side: Side,
}

/// An inclusion proof for one leaf.
///
/// Promoted (odd trailing) levels contribute no step — the running hash
/// carries up unchanged, exactly as in the tree build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    /// The leaf's index in the original ordered leaf set.
    pub index: usize,
    /// The leaf hash the proof starts from.
    pub leaf_hash: String,
    /// Siblings from the leaf level upward.
    pub path: Vec<ProofStep>,
}

impl MerkleProof {
    /// Recompute the root from this proof and compare it to `root`.
    ///
    /// Tampering with the leaf hash or any sibling in the path flips the
    /// result to false.
    pub fn verify(&self, root: &str) -> bool {
        let mut current = self.leaf_hash.clone();
        for step in &self.path {
            current = match step.side {
                Side::Left => combine(&step.hash, &current),
                Side::Right => combine(&current, &step.hash),
            };
        }
        current == root
    }
}

/// Hash two child hex strings into their parent.
fn combine(left: &str, right: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    hex::encode(hasher.finalize())
}

/// An ordered Merkle tree over leaf hashes.
///
/// The full level structure is retained so proofs can be generated for any
/// index without rebuilding.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// `levels[0]` is the leaf level; the last level holds the single root.
    levels: Vec<Vec<String>>,
}

impl MerkleTree {
    /// Build a tree over `leaves`, bottom-up.
    ///
    /// Fails with `PROTO_EMPTY_TREE` on an empty leaf set.
    pub fn build(leaves: &[String]) -> PactumResult<Self> {
        if leaves.is_empty() {
            return Err(PactumError::EmptyTree);
        }

        let mut levels: Vec<Vec<String>> = vec![leaves.to_vec()];
        while levels.last().map(Vec::len) != Some(1) {
            let current = levels.last().expect("levels is never empty");
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [left, right] => next.push(combine(left, right)),
                    // Odd trailing node: promoted unchanged.
                    [single] => next.push(single.clone()),
                    _ => unreachable!("chunks(2) yields one or two elements"),
                }
            }
            levels.push(next);
        }

        debug!(
            leaf_count = leaves.len(),
            depth = levels.len(),
            root = %levels.last().expect("built above")[0],
            "merkle tree built"
        );

        Ok(Self { levels })
    }

    /// The root hash — the tree's content identifier.
    pub fn root(&self) -> &str {
        &self.levels.last().expect("a built tree always has a root")[0]
    }

    /// Number of leaves the tree was built over.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Generate the inclusion proof for the leaf at `index`.
    ///
    /// Fails with `PROTO_PROOF_INDEX` when `index` is out of range.
    pub fn proof(&self, index: usize) -> PactumResult<MerkleProof> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(PactumError::ProofIndex { index, leaf_count });
        }

        let mut path = Vec::new();
        let mut idx = index;
        // Walk every level below the root, recording the sibling (if any).
        for level in &self.levels[..self.levels.len() - 1] {
            if idx % 2 == 0 {
                // Right sibling, unless this node was promoted.
                if idx + 1 < level.len() {
                    path.push(ProofStep {
                        hash: level[idx + 1].clone(),
                        side: Side::Right,
                    });
                }
            } else {
                path.push(ProofStep {
                    hash: level[idx - 1].clone(),
                    side: Side::Left,
                });
            }
            idx /= 2;
        }

        Ok(MerkleProof {
            index,
            leaf_hash: self.levels[0][index].clone(),
            path,
        })
    }
}
