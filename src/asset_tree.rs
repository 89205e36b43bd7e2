//! Per-account asset tree (depth 15).
//!
//! Each account owns one asset tree; the asset identifier doubles as the
//! tree index, so the leaf commits only to the balance fields. Position
//! authenticates identity: a proof for the wrong `asset_id` folds to a
//! different root even when the leaf value is correct.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use crate::crypto::poseidon_hash2;
use crate::error::DesertError;
use crate::merkle_proof::compute_merkle_root;
use crate::serialization::fr_hex;

/// Depth of every asset tree. Protocol constant.
pub const ASSET_TREE_DEPTH: usize = 15;

/// Snapshot record for one asset of one account, as served by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssetExitData {
    /// Asset identifier; also the leaf position in the asset tree.
    pub asset_id: u32,
    /// Balance at snapshot time.
    #[serde(with = "fr_hex")]
    pub amount: Fr,
    /// 0/1 flag tracking offer cancellation state.
    #[serde(with = "fr_hex")]
    pub offer_canceled_or_finalized: Fr,
}

impl AssetExitData {
    pub fn leaf_hash(&self) -> Result<Fr, DesertError> {
        asset_leaf_hash(self.amount, self.offer_canceled_or_finalized)
    }
}

/// Hash an asset record into its tree leaf.
pub fn asset_leaf_hash(amount: Fr, offer_canceled_or_finalized: Fr) -> Result<Fr, DesertError> {
    poseidon_hash2(amount, offer_canceled_or_finalized)
}

/// Re-derive the asset tree root from one asset record and its path.
///
/// # Arguments
/// * `asset_id` - Asset identifier, used as the leaf index
/// * `amount` - Balance at snapshot time
/// * `offer_canceled_or_finalized` - 0/1 offer state flag
/// * `siblings` - Sibling path, exactly [`ASSET_TREE_DEPTH`] entries
///
/// # Returns
/// * The recomputed asset tree root
pub fn get_asset_root(
    asset_id: u32,
    amount: Fr,
    offer_canceled_or_finalized: Fr,
    siblings: &[Fr],
) -> Result<Fr, DesertError> {
    let leaf = asset_leaf_hash(amount, offer_canceled_or_finalized)?;
    compute_merkle_root(leaf, asset_id as u64, siblings, ASSET_TREE_DEPTH)
}
