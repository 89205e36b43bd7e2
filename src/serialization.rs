//! Serde adapters for field elements.
//!
//! The off-chain indexer serves exit data as JSON with field elements
//! encoded as big-endian hex strings. Decoding goes through the strict
//! conversions in [`crate::crypto`], so an out-of-range or malformed value
//! is a deserialization error rather than a silently reduced element.

/// `#[serde(with = "fr_hex")]` adapter for a single field element.
pub mod fr_hex {
    use ark_bn254::Fr;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::crypto::{fr_from_hex, fr_to_hex};

    pub fn serialize<S>(value: &Fr, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&fr_to_hex(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        fr_from_hex(&encoded).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "fr_hex_vec")]` adapter for sibling lists.
pub mod fr_hex_vec {
    use ark_bn254::Fr;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::crypto::{fr_from_hex, fr_to_hex};

    pub fn serialize<S>(values: &[Fr], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(values.iter().map(|value| fr_to_hex(*value)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Fr>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|item| fr_from_hex(item).map_err(serde::de::Error::custom))
            .collect()
    }
}
