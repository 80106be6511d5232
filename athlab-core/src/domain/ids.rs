use super::series::PriceSeries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic dataset hash (content hash of a validated price series).
///
/// Two reports with the same `DatasetHash` were computed from identical input,
/// regardless of where the prices came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    pub fn from_hash(hash: &str) -> Self {
        Self(hash.to_string())
    }

    /// BLAKE3 over every date and the little-endian bytes of every price.
    pub fn of_series(series: &PriceSeries) -> Self {
        let mut hasher = blake3::Hasher::new();
        for obs in series {
            hasher.update(obs.date.to_string().as_bytes());
            hasher.update(&obs.price.to_le_bytes());
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    /// First 12 characters, for display.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(12) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
