use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Byte encoding used by a store to turn models into backend records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Codec {
    /// Human-readable JSON via `serde_json`.
    #[default]
    Json,
    /// Compact binary via `bitcode`'s serde support.
    #[cfg(feature = "bitcode")]
    Bitcode,
}

impl Codec {
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, String> {
        match self {
            Codec::Json => serde_json::to_vec(value).map_err(|e| e.to_string()),
            #[cfg(feature = "bitcode")]
            Codec::Bitcode => bitcode::serialize(value).map_err(|e| e.to_string()),
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, String> {
        match self {
            Codec::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            #[cfg(feature = "bitcode")]
            Codec::Bitcode => bitcode::deserialize(bytes).map_err(|e| e.to_string()),
        }
    }
}
