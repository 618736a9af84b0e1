//! Serde helpers for `0x`-prefixed hex fields in JSON configuration.
//!
//! Usage: `#[serde(with = "shared_types::serde_hex::address")]`.

/// `Address` as `0x`-prefixed hex.
pub mod address {
    use crate::{address_to_hex, parse_address, Address};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Address, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&address_to_hex(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Address, D::Error> {
        let raw = String::deserialize(d)?;
        parse_address(&raw).map_err(D::Error::custom)
    }
}

/// `Hash` as `0x`-prefixed hex.
pub mod hash {
    use crate::{hash_to_hex, parse_hash, Hash};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Hash, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hash_to_hex(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Hash, D::Error> {
        let raw = String::deserialize(d)?;
        parse_hash(&raw).map_err(D::Error::custom)
    }
}

/// Arbitrary bytes as `0x`-prefixed hex.
pub mod bytes {
    use crate::decode_hex;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(value)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(d)?;
        decode_hex(&raw).map_err(D::Error::custom)
    }
}

/// `Vec<Address>` as a list of `0x`-prefixed hex strings.
pub mod addresses {
    use crate::{address_to_hex, parse_address, Address};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[Address], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(value.iter().map(address_to_hex))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Address>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|raw| parse_address(raw).map_err(D::Error::custom))
            .collect()
    }
}

/// `Vec<Hash>` as a list of `0x`-prefixed hex strings.
pub mod hashes {
    use crate::{hash_to_hex, parse_hash, Hash};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &[Hash], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(value.iter().map(hash_to_hex))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Hash>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|raw| parse_hash(raw).map_err(D::Error::custom))
            .collect()
    }
}

/// Optional `U256` written as `0x` hex and read from either decimal or hex.
pub mod opt_uint256 {
    use crate::{parse_uint256_or_hex, U256};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<U256>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_str(&format!("{:#x}", v)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<U256>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|r| parse_uint256_or_hex(&r).map_err(D::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Address, U256};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "super::address")]
        addr: Address,
        #[serde(with = "super::opt_uint256", default)]
        stake: Option<U256>,
    }

    #[test]
    fn test_sample_json_roundtrip() {
        let json = r#"{"addr":"0x0101010101010101010101010101010101010101","stake":"1000"}"#;
        let parsed: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.addr, [1u8; 20]);
        assert_eq!(parsed.stake, Some(U256::from(1000u64)));

        let back = serde_json::to_string(&parsed).unwrap();
        assert!(back.contains("0x3e8"));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Batch {
        #[serde(with = "super::addresses")]
        receivers: Vec<Address>,
        #[serde(with = "super::hashes")]
        txs: Vec<crate::Hash>,
    }

    #[test]
    fn test_lists_serialise_as_hex_strings() {
        let batch = Batch {
            receivers: vec![[0xaa; 20]],
            txs: vec![[0x0b; 32]],
        };
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["receivers"][0], format!("0x{}", "aa".repeat(20)));
        assert_eq!(json["txs"][0], format!("0x{}", "0b".repeat(32)));
        let back: Batch = serde_json::from_value(json).unwrap();
        assert_eq!(back, batch);
    }

    #[test]
    fn test_missing_stake_is_none() {
        let json = r#"{"addr":"0x0101010101010101010101010101010101010101"}"#;
        let parsed: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.stake, None);
    }
}
