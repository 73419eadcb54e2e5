//! Idempotency Module
//!
//! Replay cache making non-idempotent writes safe to retry: the first
//! response for a client-supplied `Idempotency-Key` is stored and
//! replayed byte-for-byte on every retry, so the underlying mutation
//! runs at most once per key.

mod ledger;
mod record;
mod stats;

// Re-export public types
pub use ledger::IdempotencyLedger;
pub use record::IdempotencyRecord;
pub use stats::{LedgerStats, LedgerStatsSnapshot};
