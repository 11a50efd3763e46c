//! Content hashing for Schema Definitions
//!
//! [`SchemaHash`] keys the compiled-schema cache. Two definitions with the same
//! canonical JSON encoding share a hash and therefore a compiled validator.

use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// A 32-byte Blake3 hash of a Schema Definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaHash([u8; 32]);

impl SchemaHash {
    /// Hash a Schema Definition by its compact JSON encoding
    #[inline]
    #[must_use]
    pub fn of(definition: &Value) -> Self {
        Self::compute(definition.to_string().as_bytes())
    }

    /// Compute Blake3 hash of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for SchemaHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_is_deterministic() {
        let a = SchemaHash::of(&json!({"headline": "string", "images": {"items": "string"}}));
        let b = SchemaHash::of(&json!({"images": {"items": "string"}, "headline": "string"}));
        assert_eq!(a, b);
    }

    #[test]
    fn hash_is_sensitive_to_content() {
        let a = SchemaHash::of(&json!({"headline": "string"}));
        let b = SchemaHash::of(&json!({"headline": "string?"}));
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_hex() {
        let hash = SchemaHash::compute(b"schema");
        assert_eq!(hash.to_string().len(), 64);
        assert_eq!(hash.short().len(), 16);
        assert!(hash.to_string().starts_with(&hash.short()));
    }
}
