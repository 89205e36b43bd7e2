//! Desert-mode (mass-exit) proof verification engine.
//!
//! When a layer-2 ledger halts, participants recover funds by proving,
//! against the last published state root, that their asset balance,
//! account record, or NFT record existed in the final valid snapshot.
//! This crate implements the verification side of that procedure: fixed
//! depth sparse Merkle trees keyed by domain identifiers, composed into a
//! single commitment with circom-compatible Poseidon over the BN254
//! scalar field.
//!
//! Tree construction and proof generation belong to the off-chain
//! indexer; settlement and payout belong to the dispute contract layer.
//! Everything here is a pure, synchronous function over immutable inputs.

pub mod account_tree;
pub mod asset_tree;
pub mod crypto;
pub mod error;
pub mod exit_proof;
pub mod merkle_proof;
pub mod nft_tree;
pub mod serialization;
pub mod state_root;

pub use account_tree::{get_account_root, AccountExitData, ACCOUNT_TREE_DEPTH};
pub use asset_tree::{get_asset_root, AssetExitData, ASSET_TREE_DEPTH};
pub use error::DesertError;
pub use exit_proof::{
    is_valid_exit_proof, verify_exit_proof, verify_exit_proofs, ExitClaim, NftClaim,
};
pub use merkle_proof::{compute_merkle_root, MerkleProof};
pub use nft_tree::{get_nft_root, NftExitData, NFT_TREE_DEPTH};
pub use state_root::{compose_state_root, empty_asset_root, empty_nft_root};
