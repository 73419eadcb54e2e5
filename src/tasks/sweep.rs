//! Ledger Sweep Task
//!
//! Background task that periodically prunes expired idempotency records.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::idempotency::IdempotencyLedger;

/// Spawns a background task that periodically sweeps expired records out
/// of the idempotency ledger.
///
/// Expired records are also dropped lazily on lookup; the sweep keeps
/// memory bounded for keys that are never retried again.
///
/// # Arguments
/// * `ledger` - Shared ledger reference
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_ledger_sweep(
    ledger: Arc<IdempotencyLedger>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting ledger sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = ledger.sweep_expired();
            if removed > 0 {
                info!("Ledger sweep: removed {} expired records", removed);
            } else {
                debug!("Ledger sweep: no expired records found");
            }
        }
    })
}
