//! Idempotency Record Module
//!
//! The stored response replayed verbatim for a retried write.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Response, StatusCode},
};
use serde::Serialize;

use crate::error::{ApiError, Result};

// == Idempotency Record ==
/// Full response captured on the first successful processing of a keyed
/// write: status, headers, body bytes. Immutable once stored; a replay
/// reconstructs the response byte-for-byte from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyRecord {
    /// HTTP status code
    pub status: u16,
    /// Response headers in emission order
    pub headers: Vec<(String, String)>,
    /// Opaque body bytes
    pub body: Vec<u8>,
}

impl IdempotencyRecord {
    // == Constructor ==
    /// Creates a record from raw parts.
    pub fn new(status: StatusCode, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status: status.as_u16(),
            headers,
            body,
        }
    }

    // == JSON Constructor ==
    /// Creates a record holding a JSON body plus extra headers.
    ///
    /// The payload is serialized exactly once here, so the first response
    /// and every replay share the same bytes.
    pub fn json<T: Serialize>(
        status: StatusCode,
        mut headers: Vec<(String, String)>,
        payload: &T,
    ) -> Result<Self> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| ApiError::Internal(format!("response serialization failed: {}", e)))?;
        headers.push((
            header::CONTENT_TYPE.to_string(),
            "application/json".to_string(),
        ));
        Ok(Self::new(status, headers, body))
    }

    // == To Response ==
    /// Rebuilds the HTTP response from the stored parts.
    pub fn to_response(&self) -> Result<Response<Body>> {
        let status = StatusCode::from_u16(self.status)
            .map_err(|e| ApiError::Internal(format!("stored status invalid: {}", e)))?;

        let mut builder = Response::builder().status(status);
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Internal(format!("stored header invalid: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::Internal(format!("stored header invalid: {}", e)))?;
            builder = builder.header(name, value);
        }

        builder
            .body(Body::from(self.body.clone()))
            .map_err(|e| ApiError::Internal(format!("response rebuild failed: {}", e)))
    }
}
