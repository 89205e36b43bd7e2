//! Error taxonomy for the desert verifier.
//!
//! Every failure is classified and recoverable by the caller. Structural
//! errors (`FieldElementOutOfRange`, `UnsupportedArity`, `InvalidProofLength`,
//! `IndexOutOfRange`) are raised before any hashing happens, so a malformed
//! claim never consumes hash-computation work. `RootMismatch` is the routine
//! outcome for a well-formed but invalid or stale claim.

use thiserror::Error;

/// Classified verification failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesertError {
    /// A raw unsigned integer at the decoding boundary is not a canonical
    /// field element (value >= the BN254 scalar modulus, or not a valid
    /// encoding at all). The engine refuses to reduce silently so that
    /// encoding bugs surface early.
    #[error("value `{value}` is not a canonical BN254 scalar field element")]
    FieldElementOutOfRange { value: String },

    /// The hash primitive was invoked with an input count outside {2, 5, 6}.
    /// Unreachable from the fixed call sites inside this crate; seeing it
    /// indicates a programming error in the caller.
    #[error("poseidon arity {arity} is not supported (expected 2, 5 or 6)")]
    UnsupportedArity { arity: usize },

    /// The sibling list does not have exactly `expected` entries for the
    /// tree it authenticates. Never silently truncated or padded.
    #[error("merkle proof carries {actual} siblings, tree depth is {expected}")]
    InvalidProofLength { expected: usize, actual: usize },

    /// The leaf index needs more bits than the tree depth provides.
    #[error("leaf index {index} does not fit in {depth} bits")]
    IndexOutOfRange { index: u64, depth: usize },

    /// The position declared by an authentication path disagrees with the
    /// identifier of the exit record it accompanies. The record id is the
    /// authoritative tree position; a proof cut for another position is
    /// rejected before any hashing.
    #[error("merkle proof declares leaf index {actual}, exit record expects {expected}")]
    IndexMismatch { expected: u64, actual: u64 },

    /// The hash backend reported a failure the arity precheck did not
    /// anticipate. Indicates an internal error, not bad claim data.
    #[error("poseidon backend failure: {message}")]
    Hash { message: String },

    /// The recomputed commitment disagrees with the claimed one. The proof
    /// is well-formed; it just does not match the published root.
    #[error("recomputed state commitment does not match the claimed root")]
    RootMismatch,
}
