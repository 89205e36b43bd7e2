//! Cryptographic primitives for the desert verifier.
//!
//! This module provides the field hash used everywhere else in the engine:
//! circom-compatible Poseidon over the BN254 scalar field, at the three
//! fixed arities the protocol commits to (2 for tree nodes and the asset
//! leaf, 5 for the NFT leaf, 6 for the account leaf). It also owns the
//! strict conversions between raw big-endian integers and field elements.

use ark_bn254::Fr;
use ark_ff::{BigInt, BigInteger, PrimeField};
use light_poseidon::{Poseidon, PoseidonHasher};

use crate::error::DesertError;

/// Poseidon input arities supported by the protocol.
pub const SUPPORTED_ARITIES: [usize; 3] = [2, 5, 6];

/// Byte length of a serialized field element.
pub const FIELD_ELEMENT_LENGTH: usize = 32;

/// Compute the Poseidon hash of a sequence of field elements.
///
/// Deterministic and pure. Defined only for input counts in {2, 5, 6};
/// any other arity fails with [`DesertError::UnsupportedArity`] before any
/// hashing work is done.
///
/// # Arguments
/// * `inputs` - Field elements to absorb, in protocol order
///
/// # Returns
/// * Poseidon digest as a field element
pub fn poseidon_hash(inputs: &[Fr]) -> Result<Fr, DesertError> {
    let arity = inputs.len();
    if !SUPPORTED_ARITIES.contains(&arity) {
        return Err(DesertError::UnsupportedArity { arity });
    }

    // The arity is validated above, so parameter setup cannot fail for a
    // reachable input; a residual backend error is internal, not caller data.
    let mut poseidon = Poseidon::<Fr>::new_circom(arity).map_err(|e| DesertError::Hash {
        message: e.to_string(),
    })?;
    poseidon.hash(inputs).map_err(|e| DesertError::Hash {
        message: e.to_string(),
    })
}

/// 2-ary Poseidon: tree node combination, asset leaves, state composition.
pub fn poseidon_hash2(left: Fr, right: Fr) -> Result<Fr, DesertError> {
    poseidon_hash(&[left, right])
}

/// 5-ary Poseidon: NFT leaf construction.
pub fn poseidon_hash5(inputs: [Fr; 5]) -> Result<Fr, DesertError> {
    poseidon_hash(&inputs)
}

/// 6-ary Poseidon: account leaf construction.
pub fn poseidon_hash6(inputs: [Fr; 6]) -> Result<Fr, DesertError> {
    poseidon_hash(&inputs)
}

/// Decode a 32-byte big-endian integer into a field element.
///
/// Values greater than or equal to the BN254 scalar modulus are rejected
/// with [`DesertError::FieldElementOutOfRange`] instead of being reduced.
/// Silent reduction would mask encoding bugs in exit data served by the
/// indexer.
pub fn fr_from_be_bytes(bytes: &[u8; FIELD_ELEMENT_LENGTH]) -> Result<Fr, DesertError> {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.rchunks(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(buf);
    }

    Fr::from_bigint(BigInt::new(limbs)).ok_or_else(|| DesertError::FieldElementOutOfRange {
        value: format!("0x{}", hex::encode(bytes)),
    })
}

/// Decode a hex string (with or without `0x` prefix) into a field element.
///
/// Accepts up to 64 hex digits; shorter strings are left-padded with
/// zeros the way the indexer's JSON encodes sibling paths. Any malformed
/// or out-of-range encoding fails with
/// [`DesertError::FieldElementOutOfRange`].
pub fn fr_from_hex(input: &str) -> Result<Fr, DesertError> {
    let out_of_range = || DesertError::FieldElementOutOfRange {
        value: input.to_string(),
    };

    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if digits.is_empty() || digits.len() > 2 * FIELD_ELEMENT_LENGTH {
        return Err(out_of_range());
    }

    // hex::decode requires an even digit count; odd-length values get a
    // leading zero, matching big-endian integer semantics.
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        &padded
    } else {
        digits
    };

    let decoded = hex::decode(digits).map_err(|_| out_of_range())?;
    let mut bytes = [0u8; FIELD_ELEMENT_LENGTH];
    bytes[FIELD_ELEMENT_LENGTH - decoded.len()..].copy_from_slice(&decoded);
    fr_from_be_bytes(&bytes)
}

/// Serialize a field element as 32 big-endian bytes.
pub fn fr_to_be_bytes(value: Fr) -> [u8; FIELD_ELEMENT_LENGTH] {
    let encoded = value.into_bigint().to_bytes_be();
    let mut bytes = [0u8; FIELD_ELEMENT_LENGTH];
    bytes[FIELD_ELEMENT_LENGTH - encoded.len()..].copy_from_slice(&encoded);
    bytes
}

/// Serialize a field element as a `0x`-prefixed big-endian hex string.
pub fn fr_to_hex(value: Fr) -> String {
    format!("0x{}", hex::encode(fr_to_be_bytes(value)))
}
