//! Serde codecs for the JSON-RPC quantity encoding.

/// `u64` as a `0x`-prefixed minimal hex quantity.
pub mod quantity {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = String::deserialize(deserializer)?;
        let digits = value
            .strip_prefix("0x")
            .ok_or_else(|| de::Error::custom("quantity must have a 0x prefix"))?;
        u64::from_str_radix(digits, 16).map_err(de::Error::custom)
    }

    /// `Option<u64>` as a quantity, omitting `None`.
    pub mod opt {
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<u64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<u64>, D::Error> {
            let Some(value) = Option::<String>::deserialize(deserializer)? else {
                return Ok(None)
            };
            let digits = value
                .strip_prefix("0x")
                .ok_or_else(|| de::Error::custom("quantity must have a 0x prefix"))?;
            u64::from_str_radix(digits, 16).map(Some).map_err(de::Error::custom)
        }
    }
}
