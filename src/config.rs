//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Bearer token required on all routes except /health and /stats
    pub api_token: String,
    /// Cache-Control max-age in seconds for collection listings
    pub collection_max_age: u64,
    /// Cache-Control max-age in seconds for single books
    pub book_max_age: u64,
    /// Cache-Control max-age in seconds for loans (volatile, short window)
    pub loan_max_age: u64,
    /// Maximum number of idempotency records kept before LRU eviction
    pub ledger_max_entries: usize,
    /// Idempotency record TTL in seconds
    pub ledger_ttl: u64,
    /// Ledger sweep task interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `API_TOKEN` - Bearer token for the auth gate (default: "demo-token")
    /// - `COLLECTION_MAX_AGE` - Collection cache window in seconds (default: 30)
    /// - `BOOK_MAX_AGE` - Single-book cache window in seconds (default: 60)
    /// - `LOAN_MAX_AGE` - Loan cache window in seconds (default: 5)
    /// - `LEDGER_MAX_ENTRIES` - Idempotency ledger capacity (default: 1000)
    /// - `LEDGER_TTL` - Idempotency record TTL in seconds (default: 86400)
    /// - `SWEEP_INTERVAL` - Ledger sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            api_token: env::var("API_TOKEN").unwrap_or_else(|_| "demo-token".to_string()),
            collection_max_age: env::var("COLLECTION_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            book_max_age: env::var("BOOK_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            loan_max_age: env::var("LOAN_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            ledger_max_entries: env::var("LEDGER_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            ledger_ttl: env::var("LEDGER_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            api_token: "demo-token".to_string(),
            collection_max_age: 30,
            book_max_age: 60,
            loan_max_age: 5,
            ledger_max_entries: 1000,
            ledger_ttl: 86_400,
            sweep_interval: 60,
        }
    }
}
