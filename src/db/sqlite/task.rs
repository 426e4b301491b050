//! SQLite TaskRepository implementation.

use sqlx::SqlitePool;

use super::SqliteDatabase;
use super::helpers::{Record, RowReader, fetch_all, fetch_count, fetch_optional};
use super::transaction::WriteTx;
use crate::db::{
    DbError, DbResult, EpochMillis, LiveQuery, LiveResult, Priority, Table, Task, TaskRepository,
};

macro_rules! task_columns {
    () => {
        "id, title, description, priority, dueDate, isCompleted, userId, createdAt, isSynced, \
         lastModified, recurringType, recurringInterval, parentTaskId"
    };
}

const TOUCHED: &[Table] = &[Table::Tasks];

impl Record for Task {
    const TABLE: Table = Table::Tasks;

    fn from_row(row: &RowReader<'_>) -> DbResult<Self> {
        let priority: String = row.get("priority")?;
        Ok(Task {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            priority: Priority::from(priority),
            due_date: row.get("dueDate")?,
            is_completed: row.get("isCompleted")?,
            user_id: row.get("userId")?,
            created_at: row.get("createdAt")?,
            is_synced: row.get("isSynced")?,
            last_modified: row.get("lastModified")?,
            recurring_type: row.get("recurringType")?,
            recurring_interval: row.get("recurringInterval")?,
            parent_task_id: row.get("parentTaskId")?,
        })
    }
}

// Owned-argument queries shared by the one-shot and live variants.

async fn by_user(pool: &SqlitePool, user_id: String) -> LiveResult<Task> {
    fetch_all(
        sqlx::query(concat!(
            "SELECT ",
            task_columns!(),
            " FROM tasks WHERE userId = ? ORDER BY createdAt DESC"
        ))
        .bind(user_id),
        pool,
    )
    .await
}

async fn upcoming(pool: &SqlitePool, user_id: String, now: EpochMillis) -> LiveResult<Task> {
    fetch_all(
        sqlx::query(concat!(
            "SELECT ",
            task_columns!(),
            " FROM tasks WHERE userId = ? AND isCompleted = 0 AND dueDate IS NOT NULL",
            " AND dueDate > ? ORDER BY dueDate ASC"
        ))
        .bind(user_id)
        .bind(now),
        pool,
    )
    .await
}

async fn by_priority(pool: &SqlitePool, user_id: String) -> LiveResult<Task> {
    fetch_all(
        sqlx::query(concat!(
            "SELECT ",
            task_columns!(),
            " FROM tasks WHERE userId = ? AND isCompleted = 0 ORDER BY",
            " CASE priority WHEN 'High' THEN 1 WHEN 'Medium' THEN 2 WHEN 'Low' THEN 3 ELSE 4 END,",
            " dueDate ASC"
        ))
        .bind(user_id),
        pool,
    )
    .await
}

/// SQLx-backed task repository.
pub struct SqliteTaskRepository<'a> {
    pub(crate) db: &'a SqliteDatabase,
}

impl<'a> TaskRepository for SqliteTaskRepository<'a> {
    async fn insert(&self, task: &Task) -> DbResult<()> {
        self.db
            .write(
                TOUCHED,
                sqlx::query(concat!(
                    "INSERT OR REPLACE INTO tasks (",
                    task_columns!(),
                    ") VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ))
                .bind(&task.id)
                .bind(&task.title)
                .bind(&task.description)
                .bind(task.priority.as_str())
                .bind(task.due_date)
                .bind(task.is_completed)
                .bind(&task.user_id)
                .bind(task.created_at)
                .bind(task.is_synced)
                .bind(task.last_modified)
                .bind(&task.recurring_type)
                .bind(task.recurring_interval)
                .bind(&task.parent_task_id),
            )
            .await?;
        Ok(())
    }

    async fn update(&self, task: &Task) -> DbResult<()> {
        let mut tx = WriteTx::begin(self.db, TOUCHED).await?;
        let rows = tx
            .execute(
                sqlx::query(
                    r#"
                    UPDATE tasks
                    SET title = ?, description = ?, priority = ?, dueDate = ?, isCompleted = ?,
                        userId = ?, createdAt = ?, isSynced = ?,
                        lastModified = MAX(?, lastModified + 1),
                        recurringType = ?, recurringInterval = ?, parentTaskId = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&task.title)
                .bind(&task.description)
                .bind(task.priority.as_str())
                .bind(task.due_date)
                .bind(task.is_completed)
                .bind(&task.user_id)
                .bind(task.created_at)
                .bind(task.is_synced)
                .bind(task.last_modified)
                .bind(&task.recurring_type)
                .bind(task.recurring_interval)
                .bind(&task.parent_task_id)
                .bind(&task.id),
            )
            .await?;

        if rows == 0 {
            return Err(DbError::not_found("Task", &task.id));
        }
        tx.commit().await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = WriteTx::begin(self.db, TOUCHED).await?;
        let rows = tx
            .execute(sqlx::query("DELETE FROM tasks WHERE id = ?").bind(id))
            .await?;

        if rows == 0 {
            return Err(DbError::not_found("Task", id));
        }
        tx.commit().await
    }

    async fn get(&self, id: &str) -> DbResult<Option<Task>> {
        fetch_optional(
            sqlx::query(concat!("SELECT ", task_columns!(), " FROM tasks WHERE id = ?")).bind(id),
            &self.db.pool,
        )
        .await
    }

    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Task>> {
        by_user(&self.db.pool, user_id.to_string()).await
    }

    fn watch_by_user(&self, user_id: &str) -> LiveQuery<Task> {
        let user_id = user_id.to_string();
        self.db.watch(TOUCHED, move |pool| {
            let user_id = user_id.clone();
            async move { by_user(&pool, user_id).await }
        })
    }

    async fn list_upcoming(&self, user_id: &str, now: EpochMillis) -> DbResult<Vec<Task>> {
        upcoming(&self.db.pool, user_id.to_string(), now).await
    }

    fn watch_upcoming(&self, user_id: &str, now: EpochMillis) -> LiveQuery<Task> {
        let user_id = user_id.to_string();
        self.db.watch(TOUCHED, move |pool| {
            let user_id = user_id.clone();
            async move { upcoming(&pool, user_id, now).await }
        })
    }

    async fn list_by_priority(&self, user_id: &str) -> DbResult<Vec<Task>> {
        by_priority(&self.db.pool, user_id.to_string()).await
    }

    fn watch_by_priority(&self, user_id: &str) -> LiveQuery<Task> {
        let user_id = user_id.to_string();
        self.db.watch(TOUCHED, move |pool| {
            let user_id = user_id.clone();
            async move { by_priority(&pool, user_id).await }
        })
    }

    async fn list_subtasks(&self, parent_id: &str) -> DbResult<Vec<Task>> {
        fetch_all(
            sqlx::query(concat!(
                "SELECT ",
                task_columns!(),
                " FROM tasks WHERE parentTaskId = ? ORDER BY createdAt ASC"
            ))
            .bind(parent_id),
            &self.db.pool,
        )
        .await
    }

    async fn pending_count(&self, user_id: &str) -> DbResult<i64> {
        fetch_count(
            sqlx::query("SELECT COUNT(*) FROM tasks WHERE userId = ? AND isCompleted = 0")
                .bind(user_id),
            &self.db.pool,
        )
        .await
    }

    async fn completed_count_since(&self, user_id: &str, since: EpochMillis) -> DbResult<i64> {
        fetch_count(
            sqlx::query(
                "SELECT COUNT(*) FROM tasks WHERE userId = ? AND isCompleted = 1 AND createdAt >= ?",
            )
            .bind(user_id)
            .bind(since),
            &self.db.pool,
        )
        .await
    }

    async fn unsynced(&self) -> DbResult<Vec<Task>> {
        fetch_all(
            sqlx::query(concat!(
                "SELECT ",
                task_columns!(),
                " FROM tasks WHERE isSynced = 0"
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
                sqlx::query("UPDATE tasks SET isSynced = 1 WHERE id = ?").bind(id),
            )
            .await?;
        Ok(rows > 0)
    }

    async fn mark_synced_if(&self, id: &str, last_modified: EpochMillis) -> DbResult<bool> {
        let rows = self
            .db
            .write(
                TOUCHED,
                sqlx::query("UPDATE tasks SET isSynced = 1 WHERE id = ? AND lastModified = ?")
                    .bind(id)
                    .bind(last_modified),
            )
            .await?;
        Ok(rows > 0)
    }
}
