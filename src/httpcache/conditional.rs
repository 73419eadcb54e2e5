//! Conditional Cache Evaluator
//!
//! Decides between a full 200 response and a 304 Not Modified given the
//! current content fingerprint and the client's `If-None-Match` validator.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::httpcache::{fingerprint, HttpCacheStats};

// == Cache Decision ==
/// Outcome of evaluating a conditional request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDecision {
    /// Client validator matches: respond 304 with no body
    NotModified,
    /// Validator absent or stale: deliver the full body
    Deliver,
}

// == Evaluate ==
/// Compares the current fingerprint against the client-supplied validator.
///
/// An absent validator always means Deliver. Matching is exact string
/// equality on the quoted ETag.
pub fn evaluate(current: &str, client_validator: Option<&str>) -> CacheDecision {
    match client_validator {
        Some(validator) if validator == current => CacheDecision::NotModified,
        _ => CacheDecision::Deliver,
    }
}

// == Cache Policy ==
/// Freshness windows per resource class.
///
/// Collections and single books tolerate longer staleness than loans,
/// which flip state on every borrow/return. The windows are policy inputs
/// from configuration, not constants baked into the evaluator.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// max-age for collection listings
    pub collection_max_age: u64,
    /// max-age for single books
    pub book_max_age: u64,
    /// max-age for loans
    pub loan_max_age: u64,
}

impl CachePolicy {
    /// Builds the policy from server configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            collection_max_age: config.collection_max_age,
            book_max_age: config.book_max_age,
            loan_max_age: config.loan_max_age,
        }
    }
}

// == Conditional JSON Response ==
/// Fingerprints `payload`, evaluates the client validator, and builds the
/// response: either 304 with an empty body or 200 with the JSON body.
/// Both carry the `ETag` and a `Cache-Control: public, max-age=N` header,
/// so a 304 refreshes the client's freshness window.
pub fn conditional_json<T: Serialize>(
    payload: &T,
    max_age: u64,
    client_validator: Option<&str>,
    stats: &HttpCacheStats,
) -> Result<Response> {
    let etag = fingerprint(payload)?;
    let cache_control = format!("public, max-age={}", max_age);
    let headers = [
        (header::ETAG, etag.clone()),
        (header::CACHE_CONTROL, cache_control),
    ];

    match evaluate(&etag, client_validator) {
        CacheDecision::NotModified => {
            stats.record_not_modified();
            Ok((StatusCode::NOT_MODIFIED, headers).into_response())
        }
        CacheDecision::Deliver => {
            stats.record_delivered();
            Ok((StatusCode::OK, headers, Json(payload)).into_response())
        }
    }
}
