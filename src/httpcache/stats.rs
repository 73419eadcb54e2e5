//! Conditional Cache Statistics
//!
//! Counts 304 and 200 outcomes of conditional reads.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Http Cache Stats ==
/// Atomic counters shared by all conditional read handlers.
#[derive(Debug, Default)]
pub struct HttpCacheStats {
    /// Conditional reads answered with 304
    not_modified: AtomicU64,
    /// Conditional reads answered with a full body
    delivered: AtomicU64,
}

/// Point-in-time copy of the counters for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HttpCacheStatsSnapshot {
    /// Conditional reads answered with 304
    pub not_modified: u64,
    /// Conditional reads answered with a full body
    pub delivered: u64,
}

impl HttpCacheStats {
    // == Constructor ==
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Not Modified ==
    /// Increments the 304 counter.
    pub fn record_not_modified(&self) {
        self.not_modified.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Delivered ==
    /// Increments the full-body counter.
    pub fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Returns a copy of the current counters.
    pub fn snapshot(&self) -> HttpCacheStatsSnapshot {
        HttpCacheStatsSnapshot {
            not_modified: self.not_modified.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = HttpCacheStats::new();
        let snap = stats.snapshot();
        assert_eq!(snap.not_modified, 0);
        assert_eq!(snap.delivered, 0);
    }

    #[test]
    fn test_stats_record() {
        let stats = HttpCacheStats::new();
        stats.record_not_modified();
        stats.record_delivered();
        stats.record_delivered();

        let snap = stats.snapshot();
        assert_eq!(snap.not_modified, 1);
        assert_eq!(snap.delivered, 2);
    }
}
