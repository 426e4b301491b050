//! SQLite NoteRepository implementation.

use super::SqliteDatabase;
use super::helpers::{Record, RowReader, fetch_all, fetch_optional};
use super::transaction::WriteTx;
use crate::db::{DbError, DbResult, EpochMillis, LiveQuery, Note, NoteRepository, Table};

macro_rules! note_columns {
    () => {
        "id, title, content, category, userId, createdAt, updatedAt, isSynced, lastModified"
    };
}

const TOUCHED: &[Table] = &[Table::Notes];

impl Record for Note {
    const TABLE: Table = Table::Notes;

    fn from_row(row: &RowReader<'_>) -> DbResult<Self> {
        Ok(Note {
            id: row.get("id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            category: row.get("category")?,
            user_id: row.get("userId")?,
            created_at: row.get("createdAt")?,
            updated_at: row.get("updatedAt")?,
            is_synced: row.get("isSynced")?,
            last_modified: row.get("lastModified")?,
        })
    }
}

/// SQLx-backed note repository.
pub struct SqliteNoteRepository<'a> {
    pub(crate) db: &'a SqliteDatabase,
}

impl<'a> NoteRepository for SqliteNoteRepository<'a> {
    async fn insert(&self, note: &Note) -> DbResult<()> {
        self.db
            .write(
                TOUCHED,
                sqlx::query(concat!(
                    "INSERT OR REPLACE INTO notes (",
                    note_columns!(),
                    ") VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ))
                .bind(&note.id)
                .bind(&note.title)
                .bind(&note.content)
                .bind(&note.category)
                .bind(&note.user_id)
                .bind(note.created_at)
                .bind(note.updated_at)
                .bind(note.is_synced)
                .bind(note.last_modified),
            )
            .await?;
        Ok(())
    }

    async fn update(&self, note: &Note) -> DbResult<()> {
        let mut tx = WriteTx::begin(self.db, TOUCHED).await?;
        let rows = tx
            .execute(
                sqlx::query(
                    r#"
                    UPDATE notes
                    SET title = ?, content = ?, category = ?, userId = ?, createdAt = ?,
                        updatedAt = ?, isSynced = ?, lastModified = MAX(?, lastModified + 1)
                    WHERE id = ?
                    "#,
                )
                .bind(&note.title)
                .bind(&note.content)
                .bind(&note.category)
                .bind(&note.user_id)
                .bind(note.created_at)
                .bind(note.updated_at)
                .bind(note.is_synced)
                .bind(note.last_modified)
                .bind(&note.id),
            )
            .await?;

        if rows == 0 {
            return Err(DbError::not_found("Note", &note.id));
        }
        tx.commit().await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = WriteTx::begin(self.db, TOUCHED).await?;
        let rows = tx
            .execute(sqlx::query("DELETE FROM notes WHERE id = ?").bind(id))
            .await?;

        if rows == 0 {
            return Err(DbError::not_found("Note", id));
        }
        tx.commit().await
    }

    async fn get(&self, id: &str) -> DbResult<Option<Note>> {
        fetch_optional(
            sqlx::query(concat!("SELECT ", note_columns!(), " FROM notes WHERE id = ?")).bind(id),
            &self.db.pool,
        )
        .await
    }

    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Note>> {
        fetch_all(
            sqlx::query(concat!(
                "SELECT ",
                note_columns!(),
                " FROM notes WHERE userId = ? ORDER BY updatedAt DESC"
            ))
            .bind(user_id),
            &self.db.pool,
        )
        .await
    }

    fn watch_by_user(&self, user_id: &str) -> LiveQuery<Note> {
        let user_id = user_id.to_string();
        self.db.watch(TOUCHED, move |pool| {
            let user_id = user_id.clone();
            async move {
                fetch_all(
                    sqlx::query(concat!(
                        "SELECT ",
                        note_columns!(),
                        " FROM notes WHERE userId = ? ORDER BY updatedAt DESC"
                    ))
                    .bind(user_id),
                    &pool,
                )
                .await
            }
        })
    }

    async fn unsynced(&self) -> DbResult<Vec<Note>> {
        fetch_all(
            sqlx::query(concat!(
                "SELECT ",
                note_columns!(),
                " FROM notes WHERE isSynced = 0"
            )),
            &self.db.pool,
        )
        .await
    }

    async fn mark_synced(&self, id: &str) -> DbResult<bool> {
        let rows = self
            .db
            .write(
                TOUCHED,
                sqlx::query("UPDATE notes SET isSynced = 1 WHERE id = ?").bind(id),
            )
            .await?;
        Ok(rows > 0)
    }

    async fn mark_synced_if(&self, id: &str, last_modified: EpochMillis) -> DbResult<bool> {
        let rows = self
            .db
            .write(
                TOUCHED,
                sqlx::query("UPDATE notes SET isSynced = 1 WHERE id = ? AND lastModified = ?")
                    .bind(id)
                    .bind(last_modified),
            )
            .await?;
        Ok(rows > 0)
    }
}
