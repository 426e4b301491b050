//! SQLite NotificationRepository implementation.

use sqlx::SqlitePool;

use super::SqliteDatabase;
use super::helpers::{Record, RowReader, fetch_all, fetch_count, fetch_optional};
use super::transaction::WriteTx;
use crate::db::{
    DbError, DbResult, EpochMillis, LiveQuery, LiveResult, Notification, NotificationRepository,
    Table,
};

macro_rules! notification_columns {
    () => {
        "id, title, message, type, timestamp, read, additionalData, userId, isSynced, lastModified"
    };
}

const TOUCHED: &[Table] = &[Table::Notifications];

impl Record for Notification {
    const TABLE: Table = Table::Notifications;

    fn from_row(row: &RowReader<'_>) -> DbResult<Self> {
        Ok(Notification {
            id: row.get("id")?,
            title: row.get("title")?,
            message: row.get("message")?,
            kind: row.get("type")?,
            timestamp: row.get("timestamp")?,
            read: row.get("read")?,
            additional_data: row.get("additionalData")?,
            user_id: row.get("userId")?,
            is_synced: row.get("isSynced")?,
            last_modified: row.get("lastModified")?,
        })
    }
}

async fn by_user(pool: &SqlitePool, user_id: String) -> LiveResult<Notification> {
    fetch_all(
        sqlx::query(concat!(
            "SELECT ",
            notification_columns!(),
            " FROM notifications WHERE userId = ? ORDER BY timestamp DESC"
        ))
        .bind(user_id),
        pool,
    )
    .await
}

async fn unread(pool: &SqlitePool, user_id: String) -> LiveResult<Notification> {
    fetch_all(
        sqlx::query(concat!(
            "SELECT ",
            notification_columns!(),
            " FROM notifications WHERE userId = ? AND read = 0 ORDER BY timestamp DESC"
        ))
        .bind(user_id),
        pool,
    )
    .await
}

async fn by_type(pool: &SqlitePool, user_id: String, kind: String) -> LiveResult<Notification> {
    fetch_all(
        sqlx::query(concat!(
            "SELECT ",
            notification_columns!(),
            " FROM notifications WHERE userId = ? AND type = ? ORDER BY timestamp DESC"
        ))
        .bind(user_id)
        .bind(kind),
        pool,
    )
    .await
}

/// SQLx-backed notification repository.
pub struct SqliteNotificationRepository<'a> {
    pub(crate) db: &'a SqliteDatabase,
}

impl<'a> NotificationRepository for SqliteNotificationRepository<'a> {
    async fn insert(&self, notification: &Notification) -> DbResult<()> {
        self.db
            .write(
                TOUCHED,
                sqlx::query(concat!(
                    "INSERT OR REPLACE INTO notifications (",
                    notification_columns!(),
                    ") VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ))
                .bind(&notification.id)
                .bind(&notification.title)
                .bind(&notification.message)
                .bind(&notification.kind)
                .bind(notification.timestamp)
                .bind(notification.read)
                .bind(&notification.additional_data)
                .bind(&notification.user_id)
                .bind(notification.is_synced)
                .bind(notification.last_modified),
            )
            .await?;
        Ok(())
    }

    async fn update(&self, notification: &Notification) -> DbResult<()> {
        let mut tx = WriteTx::begin(self.db, TOUCHED).await?;
        let rows = tx
            .execute(
                sqlx::query(
                    r#"
                    UPDATE notifications
                    SET title = ?, message = ?, type = ?, timestamp = ?, read = ?,
                        additionalData = ?, userId = ?, isSynced = ?,
                        lastModified = MAX(?, lastModified + 1)
                    WHERE id = ?
                    "#,
                )
                .bind(&notification.title)
                .bind(&notification.message)
                .bind(&notification.kind)
                .bind(notification.timestamp)
                .bind(notification.read)
                .bind(&notification.additional_data)
                .bind(&notification.user_id)
                .bind(notification.is_synced)
                .bind(notification.last_modified)
                .bind(&notification.id),
            )
            .await?;

        if rows == 0 {
            return Err(DbError::not_found("Notification", &notification.id));
        }
        tx.commit().await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = WriteTx::begin(self.db, TOUCHED).await?;
        let rows = tx
            .execute(sqlx::query("DELETE FROM notifications WHERE id = ?").bind(id))
            .await?;

        if rows == 0 {
            return Err(DbError::not_found("Notification", id));
        }
        tx.commit().await
    }

    async fn delete_all_for_user(&self, user_id: &str) -> DbResult<u64> {
        self.db
            .write(
                TOUCHED,
                sqlx::query("DELETE FROM notifications WHERE userId = ?").bind(user_id),
            )
            .await
    }

    async fn delete_older_than(&self, cutoff: EpochMillis, user_id: &str) -> DbResult<u64> {
        self.db
            .write(
                TOUCHED,
                sqlx::query("DELETE FROM notifications WHERE timestamp < ? AND userId = ?")
                    .bind(cutoff)
                    .bind(user_id),
            )
            .await
    }

    async fn get(&self, id: &str) -> DbResult<Option<Notification>> {
        fetch_optional(
            sqlx::query(concat!(
                "SELECT ",
                notification_columns!(),
                " FROM notifications WHERE id = ?"
            ))
            .bind(id),
            &self.db.pool,
        )
        .await
    }

    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Notification>> {
        by_user(&self.db.pool, user_id.to_string()).await
    }

    fn watch_by_user(&self, user_id: &str) -> LiveQuery<Notification> {
        let user_id = user_id.to_string();
        self.db.watch(TOUCHED, move |pool| {
            let user_id = user_id.clone();
            async move { by_user(&pool, user_id).await }
        })
    }

    async fn list_unread(&self, user_id: &str) -> DbResult<Vec<Notification>> {
        unread(&self.db.pool, user_id.to_string()).await
    }

    fn watch_unread(&self, user_id: &str) -> LiveQuery<Notification> {
        let user_id = user_id.to_string();
        self.db.watch(TOUCHED, move |pool| {
            let user_id = user_id.clone();
            async move { unread(&pool, user_id).await }
        })
    }

    async fn list_by_type(&self, user_id: &str, kind: &str) -> DbResult<Vec<Notification>> {
        by_type(&self.db.pool, user_id.to_string(), kind.to_string()).await
    }

    fn watch_by_type(&self, user_id: &str, kind: &str) -> LiveQuery<Notification> {
        let user_id = user_id.to_string();
        let kind = kind.to_string();
        self.db.watch(TOUCHED, move |pool| {
            let user_id = user_id.clone();
            let kind = kind.clone();
            async move { by_type(&pool, user_id, kind).await }
        })
    }

    async fn unread_count(&self, user_id: &str) -> DbResult<i64> {
        fetch_count(
            sqlx::query("SELECT COUNT(*) FROM notifications WHERE userId = ? AND read = 0")
                .bind(user_id),
            &self.db.pool,
        )
        .await
    }

    async fn mark_read(&self, id: &str) -> DbResult<bool> {
        let rows = self
            .db
            .write(
                TOUCHED,
                sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?").bind(id),
            )
            .await?;
        Ok(rows > 0)
    }

    async fn mark_all_read(&self, user_id: &str) -> DbResult<u64> {
        self.db
            .write(
                TOUCHED,
                sqlx::query("UPDATE notifications SET read = 1 WHERE userId = ? AND read = 0")
                    .bind(user_id),
            )
            .await
    }

    async fn unsynced(&self) -> DbResult<Vec<Notification>> {
        fetch_all(
            sqlx::query(concat!(
                "SELECT ",
                notification_columns!(),
                " FROM notifications WHERE isSynced = 0"
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
                sqlx::query("UPDATE notifications SET isSynced = 1 WHERE id = ?").bind(id),
            )
            .await?;
        Ok(rows > 0)
    }

    async fn mark_synced_if(&self, id: &str, last_modified: EpochMillis) -> DbResult<bool> {
        let rows = self
            .db
            .write(
                TOUCHED,
                sqlx::query("UPDATE notifications SET isSynced = 1 WHERE id = ? AND lastModified = ?")
                    .bind(id)
                    .bind(last_modified),
            )
            .await?;
        Ok(rows > 0)
    }
}
