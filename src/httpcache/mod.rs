//! HTTP Cache Module
//!
//! Content fingerprinting (strong ETags) and conditional-request
//! evaluation for cacheable reads.

mod conditional;
mod fingerprint;
mod stats;

// Re-export public types
pub use conditional::{conditional_json, evaluate, CacheDecision, CachePolicy};
pub use fingerprint::fingerprint;
pub use stats::{HttpCacheStats, HttpCacheStatsSnapshot};
