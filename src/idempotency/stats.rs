//! Ledger Statistics Module
//!
//! Counters for idempotent replay activity.

use serde::Serialize;

// == Ledger Stats ==
/// Counters owned by the ledger, updated under its interior lock.
#[derive(Debug, Clone, Default)]
pub struct LedgerStats {
    /// Keyed writes answered from a stored record
    pub replays: u64,
    /// Keyed writes that ran the underlying mutation
    pub executions: u64,
    /// Records dropped by LRU capacity pressure
    pub evictions: u64,
    /// Records dropped by TTL expiry
    pub expired_pruned: u64,
}

/// Point-in-time copy of the counters for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerStatsSnapshot {
    /// Keyed writes answered from a stored record
    pub replays: u64,
    /// Keyed writes that ran the underlying mutation
    pub executions: u64,
    /// Records dropped by LRU capacity pressure
    pub evictions: u64,
    /// Records dropped by TTL expiry
    pub expired_pruned: u64,
    /// Slots currently resident (completed and in-flight)
    pub total_entries: usize,
}

impl LedgerStats {
    // == Snapshot ==
    /// Copies the counters alongside the current resident count.
    pub fn snapshot(&self, total_entries: usize) -> LedgerStatsSnapshot {
        LedgerStatsSnapshot {
            replays: self.replays,
            executions: self.executions,
            evictions: self.evictions,
            expired_pruned: self.expired_pruned,
            total_entries,
        }
    }
}
