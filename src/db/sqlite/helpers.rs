//! Shared helper functions for SQLite repositories.
//!
//! Row mapping goes through [`Record`]: each record type names its table and
//! reads its declared columns from a [`RowReader`], so every query returning
//! that type shares one mapping routine.

use sqlx::error::ErrorKind;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Decode, Row, Sqlite, SqlitePool, Type};

use crate::db::{DbError, DbResult, Table};

/// Map a sqlx error onto the storage-agnostic error type.
///
/// The message is the driver's own text.
pub(crate) fn db_error(e: sqlx::Error) -> DbError {
    match &e {
        sqlx::Error::Database(db_err)
            if matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
                    | ErrorKind::ForeignKeyViolation
            ) =>
        {
            DbError::Constraint {
                message: e.to_string(),
            }
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => DbError::DataIntegrity {
            message: e.to_string(),
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DbError::Connection {
                message: e.to_string(),
            }
        }
        _ => DbError::Database {
            message: e.to_string(),
        },
    }
}

/// Typed column access that reports undecodable values as integrity errors.
pub(crate) struct RowReader<'r> {
    row: &'r SqliteRow,
    table: Table,
}

impl<'r> RowReader<'r> {
    pub(crate) fn new(row: &'r SqliteRow, table: Table) -> Self {
        Self { row, table }
    }

    pub(crate) fn get<T>(&self, column: &str) -> DbResult<T>
    where
        T: Decode<'r, Sqlite> + Type<Sqlite>,
    {
        self.row
            .try_get(column)
            .map_err(|e| DbError::DataIntegrity {
                message: format!("{}.{}: {}", self.table, column, e),
            })
    }
}

/// A record type stored in one table.
pub(crate) trait Record: Sized {
    const TABLE: Table;

    fn from_row(row: &RowReader<'_>) -> DbResult<Self>;
}

/// Run a SELECT and map every row.
pub(crate) async fn fetch_all<'q, R: Record>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    pool: &SqlitePool,
) -> DbResult<Vec<R>> {
    let rows = query.fetch_all(pool).await.map_err(db_error)?;
    rows.iter()
        .map(|row| R::from_row(&RowReader::new(row, R::TABLE)))
        .collect()
}

/// Run a SELECT expected to match at most one row.
pub(crate) async fn fetch_optional<'q, R: Record>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    pool: &SqlitePool,
) -> DbResult<Option<R>> {
    let row = query.fetch_optional(pool).await.map_err(db_error)?;
    row.map(|row| R::from_row(&RowReader::new(&row, R::TABLE)))
        .transpose()
}

/// Run a `SELECT COUNT(*)` query.
pub(crate) async fn fetch_count<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    pool: &SqlitePool,
) -> DbResult<i64> {
    let row = query.fetch_one(pool).await.map_err(db_error)?;
    row.try_get::<i64, _>(0).map_err(db_error)
}
