//! Global account tree (depth 31).
//!
//! The account leaf embeds the root of that account's asset tree, so the
//! account tree commits transitively to every asset balance. The order of
//! the six leaf fields is a protocol constant: reordering produces a
//! different, non-matching hash with no structural error.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use crate::crypto::poseidon_hash6;
use crate::error::DesertError;
use crate::merkle_proof::compute_merkle_root;
use crate::serialization::fr_hex;

/// Depth of the account tree. Protocol constant.
pub const ACCOUNT_TREE_DEPTH: usize = 31;

/// Snapshot record for one account, as served by the indexer.
///
/// The asset root is not part of this record; it is always recomputed from
/// the asset proof during verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountExitData {
    /// Account identifier; also the leaf position in the account tree.
    pub account_id: u32,
    /// Layer-1 address bound to the account (160-bit value).
    #[serde(with = "fr_hex")]
    pub l1_address: Fr,
    /// X coordinate of the account public key.
    #[serde(with = "fr_hex")]
    pub pub_key_x: Fr,
    /// Y coordinate of the account public key.
    #[serde(with = "fr_hex")]
    pub pub_key_y: Fr,
    /// Transaction nonce at snapshot time.
    #[serde(with = "fr_hex")]
    pub nonce: Fr,
    /// NFT collection nonce at snapshot time.
    #[serde(with = "fr_hex")]
    pub collection_nonce: Fr,
}

impl AccountExitData {
    pub fn leaf_hash(&self, asset_root: Fr) -> Result<Fr, DesertError> {
        account_leaf_hash(
            self.l1_address,
            self.pub_key_x,
            self.pub_key_y,
            self.nonce,
            self.collection_nonce,
            asset_root,
        )
    }
}

/// Hash an account record into its tree leaf. Field order is fixed.
pub fn account_leaf_hash(
    l1_address: Fr,
    pub_key_x: Fr,
    pub_key_y: Fr,
    nonce: Fr,
    collection_nonce: Fr,
    asset_root: Fr,
) -> Result<Fr, DesertError> {
    poseidon_hash6([
        l1_address,
        pub_key_x,
        pub_key_y,
        nonce,
        collection_nonce,
        asset_root,
    ])
}

/// Re-derive the account tree root from one account record and its path.
///
/// # Arguments
/// * `account_id` - Account identifier, used as the leaf index
/// * `l1_address`, `pub_key_x`, `pub_key_y`, `nonce`, `collection_nonce` -
///   Account fields in protocol order
/// * `asset_root` - Root of this account's asset tree
/// * `siblings` - Sibling path, exactly [`ACCOUNT_TREE_DEPTH`] entries
///
/// # Returns
/// * The recomputed account tree root
#[allow(clippy::too_many_arguments)]
pub fn get_account_root(
    account_id: u32,
    l1_address: Fr,
    pub_key_x: Fr,
    pub_key_y: Fr,
    nonce: Fr,
    collection_nonce: Fr,
    asset_root: Fr,
    siblings: &[Fr],
) -> Result<Fr, DesertError> {
    let leaf = account_leaf_hash(
        l1_address,
        pub_key_x,
        pub_key_y,
        nonce,
        collection_nonce,
        asset_root,
    )?;
    compute_merkle_root(leaf, account_id as u64, siblings, ACCOUNT_TREE_DEPTH)
}
