//! Database abstraction layer.
//!
//! This module provides trait-based abstractions for data access,
//! allowing the storage backend to be swapped without changing callers.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (Note, Task, Notification)
//! - `repository`: Trait definitions for data access
//! - `live`: Handle for subscribed queries
//! - `sqlite`: SQLite implementation with change tracking

mod error;
mod live;
mod models;
mod repository;
pub mod sqlite;
pub mod utils;


pub use error::{DbError, DbResult};
pub use live::{LiveQuery, LiveResult};
pub use models::*;
pub use repository::*;
pub use sqlite::{SqliteConfig, SqliteDatabase};
