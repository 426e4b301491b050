//! SQLite implementation of the database traits.
//!
//! This module provides a SQLite-backed implementation of the repository
//! traits defined in the parent module, plus the change tracker that drives
//! live queries.

mod connection;
mod helpers;
mod note;
mod notification;
mod schema;
mod task;
mod tracker;
mod transaction;

#[cfg(test)]
mod note_test;

pub use connection::{DEFAULT_NOTIFICATION_RETENTION_DAYS, SqliteConfig, SqliteDatabase};
pub use note::SqliteNoteRepository;
pub use notification::SqliteNotificationRepository;
pub use task::SqliteTaskRepository;
