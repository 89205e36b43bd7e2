//! Exit-proof verification.
//!
//! This module orchestrates the root calculators into the full desert-mode
//! check: recompute the asset tree root from the asset record, embed it in
//! the account leaf, recompute the account tree root, pick up the NFT tree
//! root (recomputed from the NFT claim, or the declared empty root), and
//! compare the composed state commitment against the claimed one.
//!
//! The account leaf always embeds the engine-recomputed asset root, never a
//! caller-supplied value. The asset proof and the account proof therefore
//! have to be mutually consistent; they cannot be satisfied independently.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::account_tree::{get_account_root, AccountExitData};
use crate::asset_tree::{get_asset_root, AssetExitData};
use crate::error::DesertError;
use crate::merkle_proof::MerkleProof;
use crate::nft_tree::{get_nft_root, NftExitData};
use crate::state_root::{compose_state_root, empty_nft_root};

/// NFT part of an exit claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftClaim {
    #[serde(rename = "NftExitData")]
    pub nft: NftExitData,
    #[serde(rename = "NftMerkleProof")]
    pub proof: MerkleProof,
}

/// One exit claim: an asset record, its owning account record, the proofs
/// authenticating both, and optionally an NFT record with its proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitClaim {
    #[serde(rename = "AssetExitData")]
    pub asset: AssetExitData,
    #[serde(rename = "AssetMerkleProof")]
    pub asset_proof: MerkleProof,
    #[serde(rename = "AccountExitData")]
    pub account: AccountExitData,
    #[serde(rename = "AccountMerkleProof")]
    pub account_proof: MerkleProof,
    #[serde(rename = "Nft", skip_serializing_if = "Option::is_none", default)]
    pub nft: Option<NftClaim>,
}

// Tree position comes from the exit record; a proof declaring a different
// position is structurally inconsistent and rejected before hashing.
fn check_proof_index(expected: u64, proof: &MerkleProof) -> Result<(), DesertError> {
    if proof.index != expected {
        return Err(DesertError::IndexMismatch {
            expected,
            actual: proof.index,
        });
    }
    Ok(())
}

/// Recompute the asset tree root for the asset part of a claim.
///
/// The record's `asset_id` addresses the tree; a proof declaring a
/// contradicting position fails with [`DesertError::IndexMismatch`].
pub fn verify_asset(data: &AssetExitData, proof: &MerkleProof) -> Result<Fr, DesertError> {
    check_proof_index(data.asset_id as u64, proof)?;
    get_asset_root(
        data.asset_id,
        data.amount,
        data.offer_canceled_or_finalized,
        &proof.siblings,
    )
}

/// Recompute the account tree root, embedding the given asset root.
pub fn verify_account(
    data: &AccountExitData,
    asset_root: Fr,
    proof: &MerkleProof,
) -> Result<Fr, DesertError> {
    check_proof_index(data.account_id as u64, proof)?;
    get_account_root(
        data.account_id,
        data.l1_address,
        data.pub_key_x,
        data.pub_key_y,
        data.nonce,
        data.collection_nonce,
        asset_root,
        &proof.siblings,
    )
}

/// Recompute the NFT tree root for the NFT part of a claim.
pub fn verify_nft(data: &NftExitData, proof: &MerkleProof) -> Result<Fr, DesertError> {
    check_proof_index(data.nft_index, proof)?;
    get_nft_root(
        data.nft_index,
        data.creator_account_index,
        data.owner_account_index,
        data.nft_content_hash,
        data.creator_treasury_rate,
        data.collection_id,
        data.nft_content_type,
        &proof.siblings,
    )
}

/// Compose the state commitment and compare it to the claimed root.
///
/// Returns the composed commitment on success so callers can inspect it;
/// disagreement is classified as [`DesertError::RootMismatch`] without
/// echoing the raw roots back.
pub fn verify_state(
    account_root: Fr,
    nft_root: Fr,
    claimed_state_root: Fr,
) -> Result<Fr, DesertError> {
    let composed = compose_state_root(account_root, nft_root)?;
    if composed != claimed_state_root {
        return Err(DesertError::RootMismatch);
    }
    Ok(composed)
}

/// Verify one exit claim against a previously published state root.
///
/// The claimed root is a trusted input; this engine checks the claim
/// against it and does not re-derive it from scratch. Verification is
/// deterministic, pure and synchronous; a mismatch is terminal for the
/// claim.
///
/// # Arguments
/// * `claimed_state_root` - The published state commitment being exited
///   against
/// * `claim` - Exit data and authentication paths
///
/// # Returns
/// * `Ok(())` when the claim is consistent with the published root
pub fn verify_exit_proof(claimed_state_root: Fr, claim: &ExitClaim) -> Result<(), DesertError> {
    let asset_root = verify_asset(&claim.asset, &claim.asset_proof)?;
    debug!(asset_id = claim.asset.asset_id, asset_root = %asset_root, "recomputed asset tree root");

    let account_root = verify_account(&claim.account, asset_root, &claim.account_proof)?;
    debug!(account_id = claim.account.account_id, account_root = %account_root, "recomputed account tree root");

    let nft_root = match &claim.nft {
        Some(nft_claim) => {
            let root = verify_nft(&nft_claim.nft, &nft_claim.proof)?;
            debug!(nft_index = nft_claim.nft.nft_index, nft_root = %root, "recomputed nft tree root");
            root
        }
        None => empty_nft_root()?,
    };

    verify_state(account_root, nft_root, claimed_state_root)?;
    Ok(())
}

/// Verify a batch of independent exit claims against one published root.
///
/// Fail-fast: the first failing claim aborts the batch. Claims touch only
/// their own stack-local state, so callers needing throughput can shard
/// the slice across threads instead.
pub fn verify_exit_proofs(
    claimed_state_root: Fr,
    claims: &[ExitClaim],
) -> Result<(), DesertError> {
    for claim in claims {
        verify_exit_proof(claimed_state_root, claim)?;
    }
    Ok(())
}

/// Boolean convenience wrapper over [`verify_exit_proof`].
pub fn is_valid_exit_proof(claimed_state_root: Fr, claim: &ExitClaim) -> bool {
    verify_exit_proof(claimed_state_root, claim).is_ok()
}
