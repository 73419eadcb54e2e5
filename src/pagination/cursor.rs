//! Cursor Codec Module
//!
//! Opaque forward-pagination tokens: base64url-encoded canonical JSON of
//! `{"afterId": <integer>}`. Clients must treat the token as opaque; the
//! only stable contract is that it stays a single URL-safe string.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

// == Cursor ==
/// Resume point for cursor pagination, keyed by ordering key rather than
/// array position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Last ordering key of the previous page
    #[serde(rename = "afterId")]
    pub after_id: u64,
}

// == Encode ==
/// Encodes a cursor as a URL-safe token.
pub fn encode_cursor(cursor: &Cursor) -> Result<String> {
    let raw = serde_json::to_vec(cursor)
        .map_err(|e| ApiError::Internal(format!("cursor encoding failed: {}", e)))?;
    Ok(URL_SAFE.encode(raw))
}

// == Decode ==
/// Decodes a client-supplied token.
///
/// Any malformed or tampered token is a validation error naming the
/// `cursor` parameter, distinguishable from "no cursor supplied" (which
/// the caller maps to start-of-collection). Decoding never falls back to
/// a default resume point.
pub fn decode_cursor(token: &str) -> Result<Cursor> {
    let raw = URL_SAFE
        .decode(token)
        .map_err(|_| ApiError::Validation("cursor is malformed".to_string()))?;
    serde_json::from_slice(&raw)
        .map_err(|_| ApiError::Validation("cursor is malformed".to_string()))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = Cursor { after_id: 42 };
        let token = encode_cursor(&cursor).unwrap();
        assert_eq!(decode_cursor(&token).unwrap(), cursor);
    }

    #[test]
    fn test_cursor_token_is_url_safe() {
        let token = encode_cursor(&Cursor { after_id: u64::MAX }).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_cursor("not base64!!");
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_decode_rejects_tampered_payload() {
        // Valid base64, wrong shape
        let token = URL_SAFE.encode(br#"{"afterId": "three"}"#);
        assert!(matches!(
            decode_cursor(&token),
            Err(ApiError::Validation(_))
        ));

        let token = URL_SAFE.encode(br#"{"somethingElse": 3}"#);
        assert!(matches!(
            decode_cursor(&token),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_cursor_wire_shape() {
        let token = encode_cursor(&Cursor { after_id: 7 }).unwrap();
        let raw = URL_SAFE.decode(token).unwrap();
        assert_eq!(raw, br#"{"afterId":7}"#);
    }
}
