//! Response DTOs for the library API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::httpcache::HttpCacheStatsSnapshot;
use crate::idempotency::LedgerStatsSnapshot;

// == Resource Envelope ==
/// Hypermedia links attached to a single resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceLinks {
    /// Canonical href of this resource
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Envelope for a single resource: `{"data": ..., "links": {"self": ...}}`
#[derive(Debug, Clone, Serialize)]
pub struct Resource<T> {
    pub data: T,
    pub links: ResourceLinks,
}

impl<T> Resource<T> {
    /// Wraps `data` with its self link.
    pub fn new(data: T, self_href: impl Into<String>) -> Self {
        Self {
            data,
            links: ResourceLinks {
                self_link: self_href.into(),
            },
        }
    }
}

// == Health Response ==
/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g. "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with the current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// == Stats Response ==
/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Idempotency ledger counters
    pub ledger: LedgerStatsSnapshot,
    /// Conditional cache counters
    pub cache: HttpCacheStatsSnapshot,
}
