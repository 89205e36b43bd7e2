//! Global state commitment.
//!
//! The published state root is the 2-ary hash of the account tree root and
//! the NFT tree root. This module also declares the empty-tree roots: the
//! root of a tree whose every leaf is the hash of the all-zero record,
//! folded upward with `hash2(h, h)` per level. A claim without an NFT part
//! verifies against the empty NFT root.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::Zero;

use crate::asset_tree::{asset_leaf_hash, ASSET_TREE_DEPTH};
use crate::crypto::poseidon_hash2;
use crate::error::DesertError;
use crate::nft_tree::{nft_leaf_hash, NFT_TREE_DEPTH};

/// Combine the two tree roots into the global state commitment.
pub fn compose_state_root(account_root: Fr, nft_root: Fr) -> Result<Fr, DesertError> {
    poseidon_hash2(account_root, nft_root)
}

/// Root of an asset tree with no populated leaves.
pub fn empty_asset_root() -> Result<Fr, DesertError> {
    static ROOT: OnceLock<Fr> = OnceLock::new();
    if let Some(root) = ROOT.get() {
        return Ok(*root);
    }
    let leaf = asset_leaf_hash(Fr::zero(), Fr::zero())?;
    let root = fold_empty(leaf, ASSET_TREE_DEPTH)?;
    Ok(*ROOT.get_or_init(|| root))
}

/// Root of the NFT tree with no populated leaves.
pub fn empty_nft_root() -> Result<Fr, DesertError> {
    static ROOT: OnceLock<Fr> = OnceLock::new();
    if let Some(root) = ROOT.get() {
        return Ok(*root);
    }
    let leaf = nft_leaf_hash(0, 0, Fr::zero(), Fr::zero(), Fr::zero())?;
    let root = fold_empty(leaf, NFT_TREE_DEPTH)?;
    Ok(*ROOT.get_or_init(|| root))
}

fn fold_empty(empty_leaf: Fr, depth: usize) -> Result<Fr, DesertError> {
    let mut current = empty_leaf;
    for _ in 0..depth {
        current = poseidon_hash2(current, current)?;
    }
    Ok(current)
}
