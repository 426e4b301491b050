//! Scoped write transactions.
//!
//! A [`WriteTx`] holds the database write gate from `BEGIN` until it is
//! committed or dropped, so at most one write transaction is in flight.
//! Dropping it without calling [`WriteTx::commit`] rolls back. A successful
//! commit tells the change tracker which tables were touched.

use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, Transaction};
use tokio::sync::MutexGuard;

use super::SqliteDatabase;
use super::helpers::db_error;
use super::tracker::ChangeTracker;
use crate::db::{DbResult, Table};

pub(crate) struct WriteTx<'a> {
    tx: Transaction<'static, Sqlite>,
    touched: &'static [Table],
    tracker: &'a ChangeTracker,
    _gate: MutexGuard<'a, ()>,
}

impl<'a> WriteTx<'a> {
    /// Wait for the write gate and open a transaction.
    pub(crate) async fn begin(db: &'a SqliteDatabase, touched: &'static [Table]) -> DbResult<Self> {
        let gate = db.write_gate.lock().await;
        let tx = db.pool.begin().await.map_err(db_error)?;
        Ok(Self {
            tx,
            touched,
            tracker: &db.tracker,
            _gate: gate,
        })
    }

    /// Execute one statement inside the transaction. Returns rows affected.
    pub(crate) async fn execute<'q>(
        &mut self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> DbResult<u64> {
        let result = query.execute(&mut *self.tx).await.map_err(db_error)?;
        Ok(result.rows_affected())
    }

    /// Commit, then notify live queries reading the touched tables.
    pub(crate) async fn commit(self) -> DbResult<()> {
        let WriteTx {
            tx,
            touched,
            tracker,
            _gate,
        } = self;
        tx.commit().await.map_err(db_error)?;
        tracker.notify(touched);
        Ok(())
    }
}

impl SqliteDatabase {
    /// Run a single write statement in its own transaction.
    pub(crate) async fn write<'q>(
        &self,
        touched: &'static [Table],
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> DbResult<u64> {
        let mut tx = WriteTx::begin(self, touched).await?;
        let rows = tx.execute(query).await?;
        tx.commit().await?;
        Ok(rows)
    }
}
