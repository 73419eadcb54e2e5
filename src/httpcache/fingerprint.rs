//! Fingerprint Engine
//!
//! Deterministic content hashing for cache validation.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{ApiError, Result};

// == Fingerprint ==
/// Computes a strong ETag for any serializable snapshot.
///
/// The content is first round-tripped through `serde_json::Value`, whose
/// object maps are keyed by a sorted map, so the serialized bytes are
/// independent of struct field order. The canonical bytes are hashed with
/// SHA-256 and the hex digest is returned quoted, ready for an `ETag`
/// header.
///
/// Pure function of the content: equal fingerprints iff the canonical
/// serializations are byte-identical.
pub fn fingerprint<T: Serialize>(content: &T) -> Result<String> {
    let value = serde_json::to_value(content)
        .map_err(|e| ApiError::Internal(format!("fingerprint serialization failed: {}", e)))?;
    let canonical = serde_json::to_vec(&value)
        .map_err(|e| ApiError::Internal(format!("fingerprint serialization failed: {}", e)))?;

    let digest = Sha256::digest(&canonical);
    Ok(format!("\"{}\"", hex::encode(digest)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Ab {
        a: u32,
        b: u32,
    }

    #[derive(Serialize)]
    struct Ba {
        b: u32,
        a: u32,
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let v = json!({"id": "b1", "title": "Clean Code"});
        assert_eq!(fingerprint(&v).unwrap(), fingerprint(&v).unwrap());
    }

    #[test]
    fn test_fingerprint_independent_of_field_order() {
        let ab = Ab { a: 1, b: 2 };
        let ba = Ba { b: 2, a: 1 };
        assert_eq!(fingerprint(&ab).unwrap(), fingerprint(&ba).unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let v1 = json!({"id": "b1", "available": true});
        let v2 = json!({"id": "b1", "available": false});
        assert_ne!(fingerprint(&v1).unwrap(), fingerprint(&v2).unwrap());
    }

    #[test]
    fn test_fingerprint_is_quoted_hex() {
        let fp = fingerprint(&json!([1, 2, 3])).unwrap();
        assert!(fp.starts_with('"') && fp.ends_with('"'));
        // SHA-256 hex digest is 64 characters
        assert_eq!(fp.len(), 66);
    }
}
