//! Offline-first local store for notes, tasks and notifications.
//!
//! [`db`] holds the SQLite-backed repositories and live queries, [`sync`]
//! pushes unsynced records to a remote side, and [`cli`] is the command-line
//! front end.

#[cfg(feature = "cli")]
pub mod cli;
pub mod db;
pub mod paths;
pub mod sync;
