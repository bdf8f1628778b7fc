//! Structure fingerprints
//!
//! Provides [`StructureHash`], a 32-byte Blake3 digest of a version's node
//! snapshot. Evaluations carry it next to the version number so a stored
//! evaluation can always be checked against the structure it answered.

use inspecta_schema::Node;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Blake3 digest of a node forest's JSON encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StructureHash([u8; 32]);

impl StructureHash {
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Fingerprint a node forest
    ///
    /// Node serialization has a fixed field order and no maps, so the JSON
    /// encoding is canonical.
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn of(nodes: &[Node]) -> Result<Self, HashError> {
        let json = serde_json::to_vec(nodes)?;
        Ok(Self(*blake3::hash(&json).as_bytes()))
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }

    /// All zeros: records written before fingerprints existed
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl Display for StructureHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for StructureHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HashError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl serde::Serialize for StructureHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for StructureHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when working with structure hashes
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Invalid hash length
    #[error("invalid hash length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspecta_schema::{normalize, RawNode};

    fn tree(title: &str) -> Vec<Node> {
        normalize(&[RawNode::titled(title)]).unwrap()
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(
            StructureHash::of(&tree("Estado")).unwrap(),
            StructureHash::of(&tree("Estado")).unwrap()
        );
    }

    #[test]
    fn hash_tracks_structure() {
        assert_ne!(
            StructureHash::of(&tree("Estado")).unwrap(),
            StructureHash::of(&tree("Luces")).unwrap()
        );
    }

    #[test]
    fn display_and_parse() {
        let hash = StructureHash::of(&tree("Estado")).unwrap();
        let parsed: StructureHash = hash.to_string().parse().unwrap();
        assert_eq!(hash, parsed);
        assert!(hash.to_string().starts_with(&hash.short()));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let result = "abcd".parse::<StructureHash>();
        assert!(matches!(
            result,
            Err(HashError::InvalidLength { expected: 32, actual: 2 })
        ));
    }

    #[test]
    fn zero_default() {
        assert!(StructureHash::default().is_zero());
        assert!(!StructureHash::of(&[]).unwrap().is_zero());
    }

    #[test]
    fn serde_as_hex_string() {
        let hash = StructureHash::of(&tree("Estado")).unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json.len(), 66);
        let decoded: StructureHash = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, hash);
    }
}
