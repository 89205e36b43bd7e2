//! Depth-parametric sparse Merkle path verification.
//!
//! One fold serves all three protocol trees (asset, account, NFT); the only
//! differences across trees are the depth constant and the shape of the
//! leaf value fed in. The index is walked least-significant-bit first: bit
//! `i` of the index decides whether the running value is the left or right
//! input at level `i`.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::crypto::poseidon_hash2;
use crate::error::DesertError;
use crate::serialization::fr_hex_vec;

/// Authentication path for one leaf of a fixed-depth sparse Merkle tree.
///
/// The sibling list is ordered leaf-to-root and must have exactly as many
/// entries as the tree is deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MerkleProof {
    /// Position of the authenticated leaf.
    pub index: u64,
    /// Sibling hashes from leaf level upward.
    #[serde(with = "fr_hex_vec")]
    pub siblings: Vec<Fr>,
}

impl MerkleProof {
    pub fn new(index: u64, siblings: Vec<Fr>) -> Self {
        Self { index, siblings }
    }

    /// Re-derive the root committed to by this path for the given leaf.
    pub fn compute_root(&self, leaf: Fr, depth: usize) -> Result<Fr, DesertError> {
        compute_merkle_root(leaf, self.index, &self.siblings, depth)
    }
}

/// Fold a leaf and its sibling path into the tree root.
///
/// Structural preconditions are checked before any hashing: the sibling
/// count must equal `depth` ([`DesertError::InvalidProofLength`]) and the
/// index must fit in `depth` bits ([`DesertError::IndexOutOfRange`]).
///
/// # Arguments
/// * `leaf` - Hash of the domain record at the proven position
/// * `index` - Leaf position; bit `i` (LSB first) selects the orientation
///   at level `i`
/// * `siblings` - Sibling hashes, ordered leaf-to-root
/// * `depth` - Tree depth, a protocol constant for each tree kind
///
/// # Returns
/// * The recomputed root commitment
pub fn compute_merkle_root(
    leaf: Fr,
    index: u64,
    siblings: &[Fr],
    depth: usize,
) -> Result<Fr, DesertError> {
    if siblings.len() != depth {
        return Err(DesertError::InvalidProofLength {
            expected: depth,
            actual: siblings.len(),
        });
    }
    if (depth as u32) < u64::BITS && index >> depth != 0 {
        return Err(DesertError::IndexOutOfRange { index, depth });
    }

    let mut current = leaf;
    for (level, sibling) in siblings.iter().enumerate() {
        current = if (index >> level) & 1 == 0 {
            poseidon_hash2(current, *sibling)?
        } else {
            poseidon_hash2(*sibling, current)?
        };
        trace!(level, "folded merkle level");
    }
    Ok(current)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Reference sparse-tree builder, standing in for the off-chain indexer
    //! that constructs the snapshot trees and serves proofs.

    use std::collections::HashMap;

    use ark_bn254::Fr;

    use super::MerkleProof;
    use crate::crypto::poseidon_hash2;

    pub(crate) struct TestTree {
        depth: usize,
        /// defaults[level] is the hash of an empty subtree of that height.
        defaults: Vec<Fr>,
        leaves: HashMap<u64, Fr>,
    }

    impl TestTree {
        pub fn new(depth: usize, empty_leaf: Fr) -> Self {
            let mut defaults = vec![empty_leaf];
            for level in 0..depth {
                let node = defaults[level];
                defaults.push(poseidon_hash2(node, node).unwrap());
            }
            Self {
                depth,
                defaults,
                leaves: HashMap::new(),
            }
        }

        pub fn set(&mut self, index: u64, leaf: Fr) {
            assert!(
                (self.depth as u32) >= u64::BITS || index >> self.depth == 0,
                "leaf index wider than tree depth"
            );
            self.leaves.insert(index, leaf);
        }

        fn node(&self, level: usize, index: u64) -> Fr {
            if level == 0 {
                return self.leaves.get(&index).copied().unwrap_or(self.defaults[0]);
            }
            // Prune subtrees with no populated leaves.
            if !self.leaves.keys().any(|key| key >> level == index) {
                return self.defaults[level];
            }
            let left = self.node(level - 1, index << 1);
            let right = self.node(level - 1, (index << 1) | 1);
            poseidon_hash2(left, right).unwrap()
        }

        pub fn root(&self) -> Fr {
            self.node(self.depth, 0)
        }

        pub fn proof(&self, index: u64) -> MerkleProof {
            let siblings = (0..self.depth)
                .map(|level| self.node(level, (index >> level) ^ 1))
                .collect();
            MerkleProof::new(index, siblings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::TestTree;
    use super::*;
    use ark_ff::Zero;

    const DEPTH: usize = 8;

    fn populated_tree() -> TestTree {
        let mut tree = TestTree::new(DEPTH, Fr::zero());
        for (index, value) in [(0u64, 11u64), (3, 22), (7, 33), (200, 44), (255, 55)] {
            tree.set(index, Fr::from(value));
        }
        tree
    }

    #[test]
    fn test_proofs_reproduce_builder_root() {
        let tree = populated_tree();
        let root = tree.root();

        for (index, value) in [(0u64, 11u64), (3, 22), (7, 33), (200, 44), (255, 55)] {
            let proof = tree.proof(index);
            let computed = proof.compute_root(Fr::from(value), DEPTH).unwrap();
            assert_eq!(computed, root, "leaf {} failed to fold to the root", index);
        }
    }

    #[test]
    fn test_unpopulated_position_proves_empty_leaf() {
        let tree = populated_tree();
        let proof = tree.proof(42);
        assert_eq!(proof.compute_root(Fr::zero(), DEPTH).unwrap(), tree.root());
    }

    #[test]
    fn test_flipping_any_sibling_changes_root() {
        let tree = populated_tree();
        let root = tree.root();
        let proof = tree.proof(3);

        for level in 0..DEPTH {
            let mut tampered = proof.clone();
            tampered.siblings[level] += Fr::from(1u64);
            let computed = tampered.compute_root(Fr::from(22u64), DEPTH).unwrap();
            assert_ne!(computed, root, "tampered sibling {} went unnoticed", level);
        }
    }

    #[test]
    fn test_flipping_any_index_bit_changes_root() {
        let tree = populated_tree();
        let root = tree.root();
        let proof = tree.proof(3);

        for bit in 0..DEPTH {
            let mut tampered = proof.clone();
            tampered.index ^= 1 << bit;
            let computed = tampered.compute_root(Fr::from(22u64), DEPTH).unwrap();
            assert_ne!(computed, root, "tampered index bit {} went unnoticed", bit);
        }
    }

    #[test]
    fn test_wrong_leaf_changes_root() {
        let tree = populated_tree();
        let proof = tree.proof(3);
        let computed = proof.compute_root(Fr::from(23u64), DEPTH).unwrap();
        assert_ne!(computed, tree.root());
    }

    #[test]
    fn test_invalid_proof_length_is_structural() {
        // Raised independently of leaf or index validity.
        for actual in [0usize, DEPTH - 1, DEPTH + 1] {
            let siblings = vec![Fr::zero(); actual];
            assert_eq!(
                compute_merkle_root(Fr::from(1u64), 0, &siblings, DEPTH),
                Err(DesertError::InvalidProofLength {
                    expected: DEPTH,
                    actual
                })
            );
        }
    }

    #[test]
    fn test_index_out_of_range_is_structural() {
        let siblings = vec![Fr::zero(); DEPTH];
        let index = 1u64 << DEPTH;
        assert_eq!(
            compute_merkle_root(Fr::from(1u64), index, &siblings, DEPTH),
            Err(DesertError::IndexOutOfRange {
                index,
                depth: DEPTH
            })
        );

        // The widest representable index is still in range.
        let index = (1u64 << DEPTH) - 1;
        assert!(compute_merkle_root(Fr::from(1u64), index, &siblings, DEPTH).is_ok());
    }

    #[test]
    fn test_random_leaves_fold_to_builder_root() {
        use ark_std::{test_rng, UniformRand};

        let mut rng = test_rng();
        let mut tree = TestTree::new(DEPTH, Fr::zero());
        let leaves: Vec<(u64, Fr)> = (0..12u64)
            .map(|i| (i * 17 % 256, Fr::rand(&mut rng)))
            .collect();
        for (index, leaf) in &leaves {
            tree.set(*index, *leaf);
        }

        let root = tree.root();
        for (index, leaf) in &leaves {
            let proof = tree.proof(*index);
            assert_eq!(proof.compute_root(*leaf, DEPTH).unwrap(), root);
        }
    }

    #[test]
    fn test_fold_is_idempotent() {
        let tree = populated_tree();
        let proof = tree.proof(7);
        let first = proof.compute_root(Fr::from(33u64), DEPTH).unwrap();
        let second = proof.compute_root(Fr::from(33u64), DEPTH).unwrap();
        assert_eq!(first, second);
    }
}
