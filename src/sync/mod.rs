//! Sync module - pushes locally changed records to a remote side.
//!
//! Every record carries an `is_synced` flag. A sync pass collects the
//! unsynced records, hands them to a [`SyncTransport`] and flips the flag for
//! each id the transport acknowledges.

mod manager;
#[cfg(test)]
mod manager_test;
mod outbox;
mod transport;

pub use manager::{EntityCounts, SyncError, SyncManager, SyncStatus, SyncSummary, status};
pub use outbox::{OutboxTransport, append_jsonl};
#[cfg(test)]
pub use transport::MockSyncTransport;
pub use transport::{SyncAck, SyncBatch, SyncTransport, TransportError};
