//! Sync manager - pushes unsynced records and marks what the remote accepted.

use std::collections::HashMap;
use std::sync::Arc;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::transport::{SyncBatch, SyncTransport, TransportError};
use crate::db::{
    Database, EpochMillis, NoteRepository, NotificationRepository, TaskRepository,
};

/// Errors that can occur during sync operations.
#[derive(Error, Diagnostic, Debug)]
pub enum SyncError {
    #[error("Database error: {0}")]
    #[diagnostic(code(solowork::sync::database))]
    Database(#[from] crate::db::DbError),

    #[error("Transport error: {0}")]
    #[diagnostic(code(solowork::sync::transport))]
    Transport(#[from] TransportError),

    #[error("Transport task failed: {0}")]
    #[diagnostic(code(solowork::sync::task))]
    Task(#[from] tokio::task::JoinError),
}

/// Per-type record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub notes: usize,
    pub tasks: usize,
    pub notifications: usize,
}

impl EntityCounts {
    pub fn total(&self) -> usize {
        self.notes + self.tasks + self.notifications
    }
}

/// Outcome of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Records whose sync flag was set.
    pub synced: EntityCounts,
    /// Records still unsynced after the pass.
    pub pending: EntityCounts,
}

/// Records waiting for the next pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub pending: EntityCounts,
}

impl SyncStatus {
    pub fn is_clean(&self) -> bool {
        self.pending.total() == 0
    }
}

/// Sync manager handles all sync operations.
pub struct SyncManager<T: SyncTransport> {
    transport: Arc<T>,
}

impl<T: SyncTransport + Send + Sync + 'static> SyncManager<T> {
    /// Create a new sync manager pushing through `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Run one sync pass.
    ///
    /// The transport runs on the blocking pool. An acknowledged record is
    /// marked synced only while it still carries the version that was
    /// pushed, so edits made during the push stay pending for the next pass.
    /// Ids the remote confirms that were not in the batch are ignored.
    #[instrument(skip_all)]
    pub async fn run<D: Database>(&self, db: &D) -> Result<SyncSummary, SyncError> {
        let batch = collect(db).await?;
        if batch.is_empty() {
            info!("nothing to sync");
            return Ok(SyncSummary::default());
        }

        let transport = Arc::clone(&self.transport);
        let (batch, ack) = tokio::task::spawn_blocking(move || {
            let ack = transport.push(&batch);
            (batch, ack)
        })
        .await?;
        let ack = ack?;

        let mut synced = EntityCounts::default();
        let mut changed = 0;

        let notes = pushed_versions(batch.notes.iter().map(|n| (n.id.as_str(), n.last_modified)));
        for id in &ack.notes {
            if let Some(&version) = notes.get(id.as_str()) {
                if db.notes().mark_synced_if(id, version).await? {
                    synced.notes += 1;
                } else {
                    changed += 1;
                }
            }
        }

        let tasks = pushed_versions(batch.tasks.iter().map(|t| (t.id.as_str(), t.last_modified)));
        for id in &ack.tasks {
            if let Some(&version) = tasks.get(id.as_str()) {
                if db.tasks().mark_synced_if(id, version).await? {
                    synced.tasks += 1;
                } else {
                    changed += 1;
                }
            }
        }

        let notifications = pushed_versions(
            batch
                .notifications
                .iter()
                .map(|n| (n.id.as_str(), n.last_modified)),
        );
        for id in &ack.notifications {
            if let Some(&version) = notifications.get(id.as_str()) {
                if db.notifications().mark_synced_if(id, version).await? {
                    synced.notifications += 1;
                } else {
                    changed += 1;
                }
            }
        }

        if changed > 0 {
            debug!(changed, "records modified during push left pending");
        }
        let pending = self.status(db).await?.pending;
        if pending.total() > 0 {
            warn!(pending = pending.total(), "records remain unsynced");
        }
        info!(synced = synced.total(), "sync pass complete");

        Ok(SyncSummary { synced, pending })
    }

    /// Count unsynced records without pushing.
    pub async fn status<D: Database>(&self, db: &D) -> Result<SyncStatus, SyncError> {
        status(db).await
    }
}

/// Count unsynced records in `db`.
pub async fn status<D: Database>(db: &D) -> Result<SyncStatus, SyncError> {
    let batch = collect(db).await?;
    Ok(SyncStatus {
        pending: EntityCounts {
            notes: batch.notes.len(),
            tasks: batch.tasks.len(),
            notifications: batch.notifications.len(),
        },
    })
}

async fn collect<D: Database>(db: &D) -> Result<SyncBatch, SyncError> {
    Ok(SyncBatch {
        notes: db.notes().unsynced().await?,
        tasks: db.tasks().unsynced().await?,
        notifications: db.notifications().unsynced().await?,
    })
}

fn pushed_versions<'b>(
    records: impl Iterator<Item = (&'b str, EpochMillis)>,
) -> HashMap<&'b str, EpochMillis> {
    records.collect()
}
