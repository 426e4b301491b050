//! File outbox transport.
//!
//! Appends every pushed record as one JSON line to `notes.jsonl`,
//! `tasks.jsonl` or `notifications.jsonl` under the outbox directory, for an
//! external uploader to pick up. Everything written is acknowledged.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::transport::{SyncAck, SyncBatch, SyncTransport, TransportError};

/// Append entities to a JSONL file, one object per line.
pub fn append_jsonl<T: Serialize>(path: &Path, entities: &[T]) -> Result<(), TransportError> {
    if entities.is_empty() {
        return Ok(());
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);

    for entity in entities {
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
    }

    writer.flush()?;
    Ok(())
}

/// Transport writing batches into a local directory.
#[derive(Debug, Clone)]
pub struct OutboxTransport {
    dir: PathBuf,
}

impl OutboxTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SyncTransport for OutboxTransport {
    fn push(&self, batch: &SyncBatch) -> Result<SyncAck, TransportError> {
        fs::create_dir_all(&self.dir)?;

        append_jsonl(&self.dir.join("notes.jsonl"), &batch.notes)?;
        append_jsonl(&self.dir.join("tasks.jsonl"), &batch.tasks)?;
        append_jsonl(&self.dir.join("notifications.jsonl"), &batch.notifications)?;

        debug!(dir = %self.dir.display(), records = batch.len(), "wrote batch to outbox");
        Ok(SyncAck::all(batch))
    }
}
