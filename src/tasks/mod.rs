//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Ledger sweep: prunes expired idempotency records at configured intervals

mod sweep;

pub use sweep::spawn_ledger_sweep;
