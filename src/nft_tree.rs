//! Global NFT tree (depth 39).
//!
//! The NFT leaf is a 5-ary hash over the creator, owner, content hash,
//! treasury rate and content type. `collection_id` travels with the exit
//! data and the public root-calculator signature but is not part of the
//! leaf preimage; collection membership is checked elsewhere in the
//! protocol. This asymmetry matches the reference behavior and is kept
//! deliberately (see DESIGN.md).

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use crate::crypto::poseidon_hash5;
use crate::error::DesertError;
use crate::merkle_proof::compute_merkle_root;
use crate::serialization::fr_hex;

/// Depth of the NFT tree. Protocol constant.
pub const NFT_TREE_DEPTH: usize = 39;

/// Snapshot record for one NFT, as served by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NftExitData {
    /// NFT identifier; also the leaf position in the NFT tree.
    pub nft_index: u64,
    /// Account that minted the NFT.
    pub creator_account_index: u32,
    /// Account holding the NFT at snapshot time.
    pub owner_account_index: u32,
    /// 256-bit content digest, reduced into the field by the indexer.
    #[serde(with = "fr_hex")]
    pub nft_content_hash: Fr,
    /// Royalty rate owed to the creator.
    #[serde(with = "fr_hex")]
    pub creator_treasury_rate: Fr,
    /// Collection the NFT belongs to. Not part of the leaf hash.
    pub collection_id: u32,
    /// Content type discriminator.
    #[serde(with = "fr_hex")]
    pub nft_content_type: Fr,
}

impl NftExitData {
    pub fn leaf_hash(&self) -> Result<Fr, DesertError> {
        nft_leaf_hash(
            self.creator_account_index,
            self.owner_account_index,
            self.nft_content_hash,
            self.creator_treasury_rate,
            self.nft_content_type,
        )
    }
}

/// Hash an NFT record into its tree leaf (5-ary, `collection_id` excluded).
pub fn nft_leaf_hash(
    creator_account_index: u32,
    owner_account_index: u32,
    nft_content_hash: Fr,
    creator_treasury_rate: Fr,
    nft_content_type: Fr,
) -> Result<Fr, DesertError> {
    poseidon_hash5([
        Fr::from(creator_account_index),
        Fr::from(owner_account_index),
        nft_content_hash,
        creator_treasury_rate,
        nft_content_type,
    ])
}

/// Re-derive the NFT tree root from one NFT record and its path.
///
/// # Arguments
/// * `nft_index` - NFT identifier, used as the leaf index
/// * `creator_account_index`, `owner_account_index` - Account identifiers
/// * `nft_content_hash` - Content digest
/// * `creator_treasury_rate` - Creator royalty rate
/// * `collection_id` - Collection identifier; carried for interface parity
///   with the exit data but excluded from the leaf preimage
/// * `nft_content_type` - Content type discriminator
/// * `siblings` - Sibling path, exactly [`NFT_TREE_DEPTH`] entries
///
/// # Returns
/// * The recomputed NFT tree root
#[allow(clippy::too_many_arguments)]
pub fn get_nft_root(
    nft_index: u64,
    creator_account_index: u32,
    owner_account_index: u32,
    nft_content_hash: Fr,
    creator_treasury_rate: Fr,
    _collection_id: u32,
    nft_content_type: Fr,
    siblings: &[Fr],
) -> Result<Fr, DesertError> {
    let leaf = nft_leaf_hash(
        creator_account_index,
        owner_account_index,
        nft_content_hash,
        creator_treasury_rate,
        nft_content_type,
    )?;
    compute_merkle_root(leaf, nft_index, siblings, NFT_TREE_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle_proof::testing::TestTree;
    use ark_ff::Zero;

    fn sample_nft() -> NftExitData {
        NftExitData {
            nft_index: 6,
            creator_account_index: 3,
            owner_account_index: 17,
            nft_content_hash: Fr::from(0xabcdef0123456789u64),
            creator_treasury_rate: Fr::from(50u64),
            collection_id: 4,
            nft_content_type: Fr::from(1u64),
        }
    }

    fn empty_nft_leaf() -> Fr {
        nft_leaf_hash(0, 0, Fr::zero(), Fr::zero(), Fr::zero()).unwrap()
    }

    #[test]
    fn test_nft_root_matches_reference_builder() {
        let nft = sample_nft();
        let mut tree = TestTree::new(NFT_TREE_DEPTH, empty_nft_leaf());
        tree.set(nft.nft_index, nft.leaf_hash().unwrap());

        let proof = tree.proof(nft.nft_index);
        let root = get_nft_root(
            nft.nft_index,
            nft.creator_account_index,
            nft.owner_account_index,
            nft.nft_content_hash,
            nft.creator_treasury_rate,
            nft.collection_id,
            nft.nft_content_type,
            &proof.siblings,
        )
        .unwrap();
        assert_eq!(root, tree.root());
    }

    #[test]
    fn test_collection_id_does_not_enter_leaf() {
        let nft = sample_nft();
        let mut other = nft.clone();
        other.collection_id = nft.collection_id + 1;
        assert_eq!(nft.leaf_hash().unwrap(), other.leaf_hash().unwrap());
    }

    #[test]
    fn test_owner_change_changes_leaf() {
        let nft = sample_nft();
        let mut other = nft.clone();
        other.owner_account_index = nft.owner_account_index + 1;
        assert_ne!(nft.leaf_hash().unwrap(), other.leaf_hash().unwrap());
    }

    #[test]
    fn test_path_length_is_enforced() {
        let nft = sample_nft();
        let siblings = vec![Fr::zero(); ACCOUNT_DEPTH_MISMATCH];
        assert_eq!(
            get_nft_root(
                nft.nft_index,
                nft.creator_account_index,
                nft.owner_account_index,
                nft.nft_content_hash,
                nft.creator_treasury_rate,
                nft.collection_id,
                nft.nft_content_type,
                &siblings,
            ),
            Err(DesertError::InvalidProofLength {
                expected: NFT_TREE_DEPTH,
                actual: ACCOUNT_DEPTH_MISMATCH
            })
        );
    }

    // A 31-entry path is a plausible caller mistake (account-tree proof
    // passed where an NFT proof belongs).
    const ACCOUNT_DEPTH_MISMATCH: usize = 31;
}
