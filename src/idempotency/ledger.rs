//! Idempotency Ledger Module
//!
//! Stores the first response produced for a client-supplied idempotency
//! key and replays it on retry. Slots are keyed by the raw header value
//! and hold a `tokio::sync::OnceCell`, which gives the ledger its core
//! concurrency guarantee: of two same-key requests racing, exactly one
//! runs the underlying mutation and the other blocks briefly and reuses
//! the winner's stored response.
//!
//! The ledger is bounded two ways: an LRU cap on resident records and a
//! TTL after which a completed record is treated as absent (see the
//! background sweep in `tasks`). In-flight slots are never evicted.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::{OnceCell, SetError};
use tracing::warn;

use crate::error::Result;
use crate::idempotency::{IdempotencyRecord, LedgerStats, LedgerStatsSnapshot};

// == Slot ==
/// One per idempotency key. The cell is empty while the first request is
/// still executing and holds the stored response forever after.
#[derive(Debug)]
struct Slot {
    cell: OnceCell<IdempotencyRecord>,
    created_at: Instant,
}

impl Slot {
    fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            created_at: Instant::now(),
        }
    }

    /// A slot expires only once completed; an in-flight slot is pinned.
    fn is_expired(&self, ttl: Duration) -> bool {
        self.cell.initialized() && self.created_at.elapsed() >= ttl
    }
}

// == Ledger Interior ==
#[derive(Debug, Default)]
struct LedgerInner {
    /// Slots by idempotency key
    slots: HashMap<String, Arc<Slot>>,
    /// Access order: front = most recently used, back = eviction candidate
    order: VecDeque<String>,
    /// Counters
    stats: LedgerStats,
}

impl LedgerInner {
    /// Marks a key as recently used.
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push_front(key.to_string());
    }

    /// Drops a key from both maps.
    fn forget(&mut self, key: &str) {
        self.slots.remove(key);
        self.order.retain(|k| k != key);
    }

    /// Evicts the least recently used completed slot, if any.
    fn evict_one(&mut self) {
        let victim = self
            .order
            .iter()
            .rev()
            .find(|k| {
                self.slots
                    .get(*k)
                    .map(|s| s.cell.initialized())
                    .unwrap_or(true)
            })
            .cloned();

        if let Some(key) = victim {
            self.forget(&key);
            self.stats.evictions += 1;
        }
    }
}

// == Idempotency Ledger ==
/// Concurrent-safe replay cache for keyed write operations.
#[derive(Debug)]
pub struct IdempotencyLedger {
    inner: Mutex<LedgerInner>,
    /// Maximum resident records before LRU eviction
    max_entries: usize,
    /// Record lifetime
    ttl: Duration,
}

impl IdempotencyLedger {
    // == Constructor ==
    /// Creates an empty ledger with the given capacity and record TTL.
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            inner: Mutex::new(LedgerInner::default()),
            max_entries,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// The interior mutex is held only for map bookkeeping, never across
    /// an await, so a poisoned lock carries no broken invariants.
    fn lock_inner(&self) -> std::sync::MutexGuard<'_, LedgerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Slot For ==
    /// Returns the slot for `key`, creating it if absent. An expired
    /// completed slot is treated as absent and replaced. Inserting above
    /// capacity first evicts the oldest completed slot.
    fn slot_for(&self, key: &str) -> Arc<Slot> {
        let mut inner = self.lock_inner();

        let expired = inner
            .slots
            .get(key)
            .map(|s| s.is_expired(self.ttl))
            .unwrap_or(false);
        if expired {
            inner.forget(key);
            inner.stats.expired_pruned += 1;
        }

        if let Some(slot) = inner.slots.get(key).cloned() {
            inner.touch(key);
            return slot;
        }

        if inner.slots.len() >= self.max_entries {
            inner.evict_one();
        }

        let slot = Arc::new(Slot::new());
        inner.slots.insert(key.to_string(), slot.clone());
        inner.order.push_front(key.to_string());
        slot
    }

    // == Lookup ==
    /// Returns the stored record for `key`, if one has completed and has
    /// not expired.
    pub fn lookup(&self, key: &str) -> Option<IdempotencyRecord> {
        let mut inner = self.lock_inner();

        let expired = inner
            .slots
            .get(key)
            .map(|s| s.is_expired(self.ttl))
            .unwrap_or(false);
        if expired {
            inner.forget(key);
            inner.stats.expired_pruned += 1;
            return None;
        }

        let record = inner.slots.get(key).and_then(|s| s.cell.get().cloned());
        if record.is_some() {
            inner.touch(key);
        }
        record
    }

    // == Record ==
    /// Stores a record for `key` exactly once; first write wins.
    ///
    /// A second call with a differing response is a logic fault in the
    /// caller (one key covering two semantically different operations).
    /// It is surfaced as a warning and otherwise ignored; the original
    /// record remains definitive.
    pub fn record(&self, key: &str, record: IdempotencyRecord) {
        let slot = self.slot_for(key);
        match slot.cell.set(record) {
            Ok(()) => {}
            Err(SetError::AlreadyInitializedError(rejected)) => {
                if slot.cell.get() != Some(&rejected) {
                    warn!(
                        key,
                        "idempotency key recorded twice with differing responses; keeping the first"
                    );
                }
            }
            Err(SetError::InitializingError(_)) => {
                warn!(key, "record raced an in-flight execution; dropped");
            }
        }
    }

    // == Replay Or Execute ==
    /// The handler-facing entry point: replays the stored response for
    /// `key` if present, otherwise runs `op` and stores its response.
    ///
    /// Concurrent duplicates are serialized on the slot's cell, so `op`
    /// runs at most once per key even when a retry races the original
    /// request. A failed `op` leaves the slot unrecorded and propagates
    /// its error; only successful responses are ledgered.
    ///
    /// Returns `(replayed, record)`.
    pub async fn replay_or_execute<F, Fut>(
        &self,
        key: &str,
        op: F,
    ) -> Result<(bool, IdempotencyRecord)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<IdempotencyRecord>>,
    {
        let slot = self.slot_for(key);

        let mut executed = false;
        let record = slot
            .cell
            .get_or_try_init(|| {
                executed = true;
                op()
            })
            .await?
            .clone();

        let mut inner = self.lock_inner();
        if executed {
            inner.stats.executions += 1;
        } else {
            inner.stats.replays += 1;
        }
        Ok((!executed, record))
    }

    // == Sweep Expired ==
    /// Removes all expired records. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let mut inner = self.lock_inner();

        let expired: Vec<String> = inner
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_expired(self.ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.forget(key);
        }
        inner.stats.expired_pruned += expired.len() as u64;
        expired.len()
    }

    // == Stats ==
    /// Returns a snapshot of the ledger counters.
    pub fn stats(&self) -> LedgerStatsSnapshot {
        let inner = self.lock_inner();
        inner.stats.snapshot(inner.slots.len())
    }

    // == Length ==
    /// Returns the number of resident slots (completed and in-flight).
    pub fn len(&self) -> usize {
        self.lock_inner().slots.len()
    }

    /// Returns true if no slots are resident.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn sample_record(id: &str) -> IdempotencyRecord {
        IdempotencyRecord::json(StatusCode::CREATED, vec![], &json!({ "id": id })).unwrap()
    }

    #[test]
    fn test_lookup_miss() {
        let ledger = IdempotencyLedger::new(100, 3600);
        assert!(ledger.lookup("k1").is_none());
    }

    #[test]
    fn test_record_and_lookup() {
        let ledger = IdempotencyLedger::new(100, 3600);
        ledger.record("k1", sample_record("l1"));

        let found = ledger.lookup("k1").unwrap();
        assert_eq!(found, sample_record("l1"));
    }

    #[test]
    fn test_record_first_write_wins() {
        let ledger = IdempotencyLedger::new(100, 3600);
        ledger.record("k1", sample_record("l1"));
        ledger.record("k1", sample_record("l2"));

        // Original record stays definitive
        assert_eq!(ledger.lookup("k1").unwrap(), sample_record("l1"));
    }

    #[tokio::test]
    async fn test_replay_or_execute_runs_once() {
        let ledger = IdempotencyLedger::new(100, 3600);
        let calls = AtomicU64::new(0);

        let (replayed, first) = ledger
            .replay_or_execute("k1", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(sample_record("l1"))
            })
            .await
            .unwrap();
        assert!(!replayed);

        let (replayed, second) = ledger
            .replay_or_execute("k1", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(sample_record("l2"))
            })
            .await
            .unwrap();

        assert!(replayed);
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_replay_or_execute_concurrent_duplicates() {
        let ledger = Arc::new(IdempotencyLedger::new(100, 3600));
        let calls = Arc::new(AtomicU64::new(0));

        let make = |ledger: Arc<IdempotencyLedger>, calls: Arc<AtomicU64>| async move {
            ledger
                .replay_or_execute("k1", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    // Stay in flight long enough for the retry to race us
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(sample_record("l1"))
                })
                .await
                .unwrap()
        };

        let a = tokio::spawn(make(ledger.clone(), calls.clone()));
        let b = tokio::spawn(make(ledger.clone(), calls.clone()));
        let (ra, rb) = (a.await.unwrap(), b.await.unwrap());

        // Exactly one execution; both callers see the same record
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(ra.1, rb.1);
        let stats = ledger.stats();
        assert_eq!(stats.executions, 1);
        assert_eq!(stats.replays, 1);
    }

    #[tokio::test]
    async fn test_failed_execution_not_recorded() {
        let ledger = IdempotencyLedger::new(100, 3600);

        let result = ledger
            .replay_or_execute("k1", || async {
                Err(crate::error::ApiError::Conflict("book is out".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert!(ledger.lookup("k1").is_none());

        // A later retry may execute and succeed
        let (replayed, _) = ledger
            .replay_or_execute("k1", || async { Ok(sample_record("l1")) })
            .await
            .unwrap();
        assert!(!replayed);
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let ledger = IdempotencyLedger::new(3, 3600);
        ledger.record("k1", sample_record("l1"));
        ledger.record("k2", sample_record("l2"));
        ledger.record("k3", sample_record("l3"));

        // Touch k1 so k2 becomes the eviction candidate
        assert!(ledger.lookup("k1").is_some());

        ledger.record("k4", sample_record("l4"));
        assert_eq!(ledger.len(), 3);
        assert!(ledger.lookup("k2").is_none());
        assert!(ledger.lookup("k1").is_some());
        assert_eq!(ledger.stats().evictions, 1);
    }

    #[test]
    fn test_ttl_expiry_on_lookup() {
        let ledger = IdempotencyLedger::new(100, 1);
        ledger.record("k1", sample_record("l1"));

        std::thread::sleep(Duration::from_millis(1100));
        assert!(ledger.lookup("k1").is_none());
        assert_eq!(ledger.stats().expired_pruned, 1);
    }

    #[test]
    fn test_sweep_expired() {
        let ledger = IdempotencyLedger::new(100, 1);
        ledger.record("k1", sample_record("l1"));
        ledger.record("k2", sample_record("l2"));

        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(ledger.sweep_expired(), 2);
        assert!(ledger.is_empty());
    }
}
