//! SQLite database connection, configuration and schema management.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tokio::sync::Mutex;
use tracing::info;

use super::helpers::db_error;
use super::schema;
use super::tracker::ChangeTracker;
use super::transaction::WriteTx;
use super::{SqliteNoteRepository, SqliteNotificationRepository, SqliteTaskRepository};
use crate::db::utils::days_before;
use crate::db::{Database, DbError, DbResult, EpochMillis, LiveQuery, LiveResult, Table};

/// Default number of days notifications are kept.
pub const DEFAULT_NOTIFICATION_RETENTION_DAYS: u32 = 90;

/// Connection settings for a file-backed database.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file, created if missing.
    pub path: PathBuf,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Prepared statements cached per connection, keyed by SQL text.
    pub statement_cache_capacity: usize,
    /// Notifications older than this many days are purged by
    /// [`SqliteDatabase::purge_expired_notifications`]. `None` keeps them.
    pub notification_retention_days: Option<u32>,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: crate::paths::get_db_path(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            statement_cache_capacity: 100,
            notification_retention_days: Some(DEFAULT_NOTIFICATION_RETENTION_DAYS),
        }
    }
}

impl SqliteConfig {
    /// Default settings for the database at `path`.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    fn validate(&self) -> DbResult<()> {
        if self.max_connections == 0 {
            return Err(DbError::InvalidData {
                message: "max_connections must be at least 1".to_string(),
                help: "Use the default of 5 unless the host is constrained".to_string(),
            });
        }
        Ok(())
    }
}

/// SQLite database implementation.
///
/// Provides access to repositories via associated types, avoiding dynamic dispatch.
pub struct SqliteDatabase {
    pub(crate) pool: SqlitePool,
    pub(crate) tracker: ChangeTracker,
    pub(crate) write_gate: Mutex<()>,
    retention_days: Option<u32>,
}

impl SqliteDatabase {
    /// Open a database at the given path with default settings.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::open_with_config(SqliteConfig::with_path(path)).await
    }

    /// Open a database using explicit settings.
    pub async fn open_with_config(config: SqliteConfig) -> DbResult<Self> {
        config.validate()?;

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.busy_timeout)
            .statement_cache_capacity(config.statement_cache_capacity);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        info!(path = %config.path.display(), "opened database");
        Ok(Self::from_pool(pool, config.notification_retention_days))
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// The pool holds a single connection that is never recycled, since every
    /// new in-memory connection would start with an empty database.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            DbError::Connection {
                message: e.to_string(),
            }
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self::from_pool(pool, None))
    }

    fn from_pool(pool: SqlitePool, retention_days: Option<u32>) -> Self {
        Self {
            tracker: ChangeTracker::start(pool.clone()),
            pool,
            write_gate: Mutex::new(()),
            retention_days,
        }
    }

    /// Get a reference to the underlying pool (for tests and tooling).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Configured notification retention.
    pub fn notification_retention_days(&self) -> Option<u32> {
        self.retention_days
    }

    /// Apply the configured retention relative to `now`.
    ///
    /// Returns the number of notifications removed, 0 when retention is off.
    pub async fn purge_expired_notifications(&self, now: EpochMillis) -> DbResult<u64> {
        match self.retention_days {
            Some(days) => self.purge_notifications_before(days_before(now, days)).await,
            None => Ok(0),
        }
    }

    /// Number of live queries currently registered.
    pub fn live_query_count(&self) -> usize {
        self.tracker.len()
    }

    pub(crate) fn watch<T, F, Fut>(&self, tables: &[Table], fetch: F) -> LiveQuery<T>
    where
        T: Send + 'static,
        F: Fn(SqlitePool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = LiveResult<T>> + Send + 'static,
    {
        self.tracker.watch(tables, fetch)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Database for SqliteDatabase {
    type Notes<'a>
        = SqliteNoteRepository<'a>
    where
        Self: 'a;
    type Tasks<'a>
        = SqliteTaskRepository<'a>
    where
        Self: 'a;
    type Notifications<'a>
        = SqliteNotificationRepository<'a>
    where
        Self: 'a;

    async fn create_schema(&self) -> DbResult<()> {
        schema::create_schema(&self.pool).await
    }

    async fn clear_all(&self) -> DbResult<()> {
        let mut tx = WriteTx::begin(self, &Table::ALL).await?;
        for table in Table::ALL {
            let sql = format!("DELETE FROM `{}`", table.name());
            tx.execute(sqlx::query(&sql)).await?;
        }
        tx.commit().await?;

        sqlx::query("VACUUM")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        info!("cleared all tables");
        Ok(())
    }

    async fn purge_notifications_before(&self, cutoff: EpochMillis) -> DbResult<u64> {
        let removed = self
            .write(
                &[Table::Notifications],
                sqlx::query("DELETE FROM notifications WHERE timestamp < ?").bind(cutoff),
            )
            .await?;
        if removed > 0 {
            info!(removed, cutoff, "purged expired notifications");
        }
        Ok(removed)
    }

    fn notes(&self) -> Self::Notes<'_> {
        SqliteNoteRepository { db: self }
    }

    fn tasks(&self) -> Self::Tasks<'_> {
        SqliteTaskRepository { db: self }
    }

    fn notifications(&self) -> Self::Notifications<'_> {
        SqliteNotificationRepository { db: self }
    }
}
