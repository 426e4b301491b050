//! Table definitions, creation and startup verification.
//!
//! The expected shape of every table is declared once in [`TABLES`]. DDL is
//! generated from it and existing tables are compared against it column by
//! column (name, declared type, NOT NULL, primary key).

use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::helpers::db_error;
use crate::db::{DbError, DbResult, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnSpec {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub not_null: bool,
    pub primary_key: bool,
}

const fn pk(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        sql_type: "TEXT",
        not_null: true,
        primary_key: true,
    }
}

const fn text(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        sql_type: "TEXT",
        not_null: true,
        primary_key: false,
    }
}

const fn int(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        sql_type: "INTEGER",
        not_null: true,
        primary_key: false,
    }
}

const fn nullable(column: ColumnSpec) -> ColumnSpec {
    ColumnSpec {
        not_null: false,
        ..column
    }
}

pub(crate) struct TableSpec {
    pub table: Table,
    pub columns: &'static [ColumnSpec],
}

pub(crate) static TABLES: [TableSpec; 3] = [
    TableSpec {
        table: Table::Notes,
        columns: &[
            pk("id"),
            text("title"),
            text("content"),
            text("category"),
            text("userId"),
            int("createdAt"),
            int("updatedAt"),
            int("isSynced"),
            int("lastModified"),
        ],
    },
    TableSpec {
        table: Table::Tasks,
        columns: &[
            pk("id"),
            text("title"),
            text("description"),
            text("priority"),
            nullable(int("dueDate")),
            int("isCompleted"),
            text("userId"),
            int("createdAt"),
            int("isSynced"),
            int("lastModified"),
            nullable(text("recurringType")),
            nullable(int("recurringInterval")),
            nullable(text("parentTaskId")),
        ],
    },
    TableSpec {
        table: Table::Notifications,
        columns: &[
            pk("id"),
            text("title"),
            text("message"),
            text("type"),
            int("timestamp"),
            int("read"),
            nullable(text("additionalData")),
            text("userId"),
            int("isSynced"),
            int("lastModified"),
        ],
    },
];

const INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS index_notifications_userId ON notifications (userId)",
    "CREATE INDEX IF NOT EXISTS index_notifications_timestamp ON notifications (timestamp)",
    "CREATE INDEX IF NOT EXISTS index_notifications_read ON notifications (read)",
];

/// Render `CREATE TABLE IF NOT EXISTS` for a table spec.
pub(crate) fn create_table_sql(spec: &TableSpec) -> String {
    let mut defs: Vec<String> = spec
        .columns
        .iter()
        .map(|c| {
            if c.not_null {
                format!("`{}` {} NOT NULL", c.name, c.sql_type)
            } else {
                format!("`{}` {}", c.name, c.sql_type)
            }
        })
        .collect();

    let keys: Vec<String> = spec
        .columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| format!("`{}`", c.name))
        .collect();
    if !keys.is_empty() {
        defs.push(format!("PRIMARY KEY({})", keys.join(", ")));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS `{}` ({})",
        spec.table.name(),
        defs.join(", ")
    )
}

/// Create missing tables and indexes, then verify every table.
pub(crate) async fn create_schema(pool: &SqlitePool) -> DbResult<()> {
    for spec in &TABLES {
        sqlx::query(&create_table_sql(spec))
            .execute(pool)
            .await
            .map_err(db_error)?;
    }
    for index in INDEXES {
        sqlx::query(index).execute(pool).await.map_err(db_error)?;
    }

    for spec in &TABLES {
        verify_table(pool, spec).await?;
        debug!(table = %spec.table, "schema verified");
    }

    info!("database schema ready");
    Ok(())
}

/// Compare the on-disk columns of a table with its spec.
async fn verify_table(pool: &SqlitePool, spec: &TableSpec) -> DbResult<()> {
    let rows = sqlx::query(
        r#"SELECT name, type, "notnull", pk FROM pragma_table_info(?) ORDER BY cid"#,
    )
    .bind(spec.table.name())
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    let mut found = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.try_get("name").map_err(db_error)?;
        let sql_type: String = row.try_get("type").map_err(db_error)?;
        let not_null: i64 = row.try_get("notnull").map_err(db_error)?;
        let pk: i64 = row.try_get("pk").map_err(db_error)?;
        found.push((name, sql_type, not_null != 0, pk != 0));
    }

    check_columns(spec, &found)
}

/// Pure comparison step of [`verify_table`].
pub(crate) fn check_columns(
    spec: &TableSpec,
    found: &[(String, String, bool, bool)],
) -> DbResult<()> {
    let mismatch = |message: String| DbError::SchemaMismatch {
        table: spec.table.name().to_string(),
        message,
    };

    if found.is_empty() {
        return Err(mismatch("table does not exist".to_string()));
    }

    for expected in spec.columns {
        let Some((_, sql_type, not_null, primary_key)) =
            found.iter().find(|(name, ..)| name == expected.name)
        else {
            return Err(mismatch(format!("missing column '{}'", expected.name)));
        };

        if !sql_type.eq_ignore_ascii_case(expected.sql_type)
            || *not_null != expected.not_null
            || *primary_key != expected.primary_key
        {
            return Err(mismatch(format!(
                "column '{}' expected {}{}{}, found {}{}{}",
                expected.name,
                expected.sql_type,
                if expected.not_null { " NOT NULL" } else { "" },
                if expected.primary_key { " PRIMARY KEY" } else { "" },
                sql_type,
                if *not_null { " NOT NULL" } else { "" },
                if *primary_key { " PRIMARY KEY" } else { "" },
            )));
        }
    }

    if let Some((name, ..)) = found
        .iter()
        .find(|(name, ..)| !spec.columns.iter().any(|c| c.name == name))
    {
        return Err(mismatch(format!("unexpected column '{}'", name)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes_spec() -> &'static TableSpec {
        &TABLES[0]
    }

    fn as_found(spec: &TableSpec) -> Vec<(String, String, bool, bool)> {
        spec.columns
            .iter()
            .map(|c| {
                (
                    c.name.to_string(),
                    c.sql_type.to_string(),
                    c.not_null,
                    c.primary_key,
                )
            })
            .collect()
    }

    #[test]
    fn create_table_sql_renders_primary_key_and_nullability() {
        let sql = create_table_sql(&TABLES[1]);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS `tasks` ("));
        assert!(sql.contains("`id` TEXT NOT NULL"));
        assert!(sql.contains("`dueDate` INTEGER,"));
        assert!(sql.ends_with("PRIMARY KEY(`id`))"));
    }

    #[test]
    fn check_columns_accepts_exact_shape() {
        let spec = notes_spec();
        assert!(check_columns(spec, &as_found(spec)).is_ok());
    }

    #[test]
    fn check_columns_accepts_lowercase_types() {
        let spec = notes_spec();
        let found: Vec<_> = as_found(spec)
            .into_iter()
            .map(|(n, t, nn, pk)| (n, t.to_lowercase(), nn, pk))
            .collect();
        assert!(check_columns(spec, &found).is_ok());
    }

    #[test]
    fn check_columns_rejects_missing_column() {
        let spec = notes_spec();
        let found: Vec<_> = as_found(spec)
            .into_iter()
            .filter(|(n, ..)| n != "category")
            .collect();
        let err = check_columns(spec, &found).unwrap_err();
        assert!(err.to_string().contains("missing column 'category'"));
    }

    #[test]
    fn check_columns_rejects_nullability_change() {
        let spec = notes_spec();
        let mut found = as_found(spec);
        found[5].2 = false; // createdAt
        let err = check_columns(spec, &found).unwrap_err();
        assert!(matches!(err, DbError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("createdAt"));
    }

    #[test]
    fn check_columns_rejects_extra_column() {
        let spec = notes_spec();
        let mut found = as_found(spec);
        found.push(("tags".to_string(), "TEXT".to_string(), false, false));
        let err = check_columns(spec, &found).unwrap_err();
        assert!(err.to_string().contains("unexpected column 'tags'"));
    }

    #[test]
    fn check_columns_rejects_missing_table() {
        let err = check_columns(notes_spec(), &[]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
