//! Transport abstraction for the sync pass.
//!
//! A transport receives every unsynced record in one [`SyncBatch`] and answers
//! with the ids the remote side accepted. Kept as a trait so tests can mock it.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::db::{Id, Note, Notification, Task};

/// Errors raised by a transport. The sync pass changes no flags on failure.
#[derive(Error, Diagnostic, Debug)]
pub enum TransportError {
    #[error("Remote unavailable: {0}")]
    #[diagnostic(code(solowork::sync::transport::unavailable))]
    Unavailable(String),

    #[error("Remote rejected batch: {0}")]
    #[diagnostic(code(solowork::sync::transport::rejected))]
    Rejected(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(solowork::sync::transport::io))]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    #[diagnostic(code(solowork::sync::transport::serialize))]
    Serialize(#[from] serde_json::Error),
}

/// Records awaiting sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncBatch {
    pub notes: Vec<Note>,
    pub tasks: Vec<Task>,
    pub notifications: Vec<Notification>,
}

impl SyncBatch {
    pub fn len(&self) -> usize {
        self.notes.len() + self.tasks.len() + self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ids the remote confirmed, per record type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAck {
    pub notes: Vec<Id>,
    pub tasks: Vec<Id>,
    pub notifications: Vec<Id>,
}

impl SyncAck {
    /// Acknowledge every record in `batch`.
    pub fn all(batch: &SyncBatch) -> Self {
        Self {
            notes: batch.notes.iter().map(|n| n.id.clone()).collect(),
            tasks: batch.tasks.iter().map(|t| t.id.clone()).collect(),
            notifications: batch.notifications.iter().map(|n| n.id.clone()).collect(),
        }
    }
}

/// Pushes a batch to the remote side.
///
/// `push` is called from the blocking thread pool, so implementations may do
/// synchronous IO.
#[cfg_attr(test, automock)]
pub trait SyncTransport {
    fn push(&self, batch: &SyncBatch) -> Result<SyncAck, TransportError>;
}
