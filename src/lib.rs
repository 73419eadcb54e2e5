//! Library API - A library lending REST API
//!
//! Demonstrates conditional caching (ETag / If-None-Match), idempotent
//! writes (Idempotency-Key replay), and three pagination strategies
//! (offset/limit, page/size, opaque cursor) over an in-memory store.

pub mod api;
pub mod config;
pub mod error;
pub mod httpcache;
pub mod idempotency;
pub mod models;
pub mod pagination;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_ledger_sweep;
