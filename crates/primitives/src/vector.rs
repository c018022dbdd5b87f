use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A state-transition test vector: genesis accounts, the raw transactions to
/// force into a batch, and the expected post-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestVector {
    /// Vector identifier.
    pub id: u64,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The pre-state accounts.
    pub genesis: Vec<GenesisAccount>,
    /// The transactions included in the forced batch.
    pub transactions: Vec<VectorTransaction>,
    /// The state root before the batch is processed.
    pub expected_old_root: B256,
    /// The state root after the batch is processed.
    pub expected_new_root: B256,
    /// The expected post-state leaves.
    #[serde(default)]
    pub expected_new_leaves: Vec<crate::ExpectedLeaf>,
}

impl TestVector {
    /// Loads a file containing an array of test vectors.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Self>, VectorError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Returns the concatenated raw transaction payloads, the byte string a
    /// forced-batch submission carries to L1.
    pub fn raw_batch(&self) -> Bytes {
        let mut data = Vec::new();
        for tx in &self.transactions {
            data.extend_from_slice(&tx.raw_tx);
        }
        data.into()
    }
}

/// A pre-state account in a test vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisAccount {
    /// The account address.
    pub address: Address,
    /// The starting balance in wei.
    #[serde(with = "serde_helpers::dec_u256")]
    pub balance: U256,
    /// The starting nonce.
    #[serde(default, with = "serde_helpers::dec_u64")]
    pub nonce: u64,
    /// Deployed bytecode for contract accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode: Option<Bytes>,
    /// The account private key, present for accounts the harness signs with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<B256>,
}

/// A transaction in a test vector, both decoded fields and the signed raw
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorTransaction {
    /// The sender.
    pub from: Address,
    /// The recipient.
    pub to: Address,
    /// The value transferred in wei.
    #[serde(with = "serde_helpers::dec_u256")]
    pub value: U256,
    /// The sender nonce.
    #[serde(with = "serde_helpers::dec_u64")]
    pub nonce: u64,
    /// The gas limit.
    #[serde(with = "serde_helpers::dec_u64")]
    pub gas_limit: u64,
    /// The gas price in wei.
    #[serde(with = "serde_helpers::dec_u256")]
    pub gas_price: U256,
    /// The signed RLP-encoded transaction.
    pub raw_tx: Bytes,
}

/// An error loading a test-vector file.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    /// The file could not be read.
    #[error("failed to read vector file: {0}")]
    Io(#[from] std::io::Error),
    /// The file contents could not be parsed.
    #[error("failed to parse vector file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serde helpers for the vector format's decimal-string numbers.
pub(crate) mod serde_helpers {
    /// Decimal-string (or 0x-prefixed hex) `U256` fields.
    pub(crate) mod dec_u256 {
        use alloy_primitives::U256;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub(crate) fn serialize<S: Serializer>(
            value: &U256,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&value.to_string())
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<U256, D::Error> {
            let raw = String::deserialize(deserializer)?;
            let parsed = match raw.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16),
                None => U256::from_str_radix(&raw, 10),
            };
            parsed.map_err(de::Error::custom)
        }
    }

    /// `u64` fields encoded as either numbers or decimal strings.
    pub(crate) mod dec_u64 {
        use serde::{de, Deserializer, Serializer};
        use std::fmt;

        pub(crate) fn serialize<S: Serializer>(
            value: &u64,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&value.to_string())
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<u64, D::Error> {
            struct Visitor;

            impl de::Visitor<'_> for Visitor {
                type Value = u64;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a u64 or a decimal string")
                }

                fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
                    Ok(value)
                }

                fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
                    value.parse().map_err(E::custom)
                }
            }

            deserializer.deserialize_any(Visitor)
        }
    }
}
