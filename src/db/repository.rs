//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//!
//! Writes are atomic: each runs in its own transaction that either commits
//! completely or rolls back and returns the error. Reads are plain queries.
//! `watch_*` methods return a [`LiveQuery`] that redelivers its result after
//! every committed write to the underlying table.

use crate::db::{DbResult, EpochMillis, LiveQuery, Note, Notification, Task};

/// Repository for Note operations.
pub trait NoteRepository {
    /// Insert a note, replacing any stored note with the same id.
    async fn insert(&self, note: &Note) -> DbResult<()>;

    /// Replace an existing note. Errors with `NotFound` if the id is unknown.
    async fn update(&self, note: &Note) -> DbResult<()>;

    /// Delete a note by ID. Errors with `NotFound` if the id is unknown.
    async fn delete(&self, id: &str) -> DbResult<()>;

    /// Get a note by ID.
    async fn get(&self, id: &str) -> DbResult<Option<Note>>;

    /// Notes of a user, most recently updated first.
    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Note>>;

    /// Live version of [`NoteRepository::list_by_user`].
    fn watch_by_user(&self, user_id: &str) -> LiveQuery<Note>;

    /// Notes not yet reflected remotely.
    async fn unsynced(&self) -> DbResult<Vec<Note>>;

    /// Set the sync flag. Returns whether the note exists.
    async fn mark_synced(&self, id: &str) -> DbResult<bool>;

    /// Set the sync flag only while the stored note still carries
    /// `last_modified`. Returns whether a row matched.
    async fn mark_synced_if(&self, id: &str, last_modified: EpochMillis) -> DbResult<bool>;
}

/// Repository for Task operations.
pub trait TaskRepository {
    /// Insert a task, replacing any stored task with the same id.
    async fn insert(&self, task: &Task) -> DbResult<()>;

    /// Replace an existing task. Errors with `NotFound` if the id is unknown.
    async fn update(&self, task: &Task) -> DbResult<()>;

    /// Delete a task by ID. Errors with `NotFound` if the id is unknown.
    async fn delete(&self, id: &str) -> DbResult<()>;

    /// Get a task by ID.
    async fn get(&self, id: &str) -> DbResult<Option<Task>>;

    /// Tasks of a user, newest first.
    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Task>>;

    /// Live version of [`TaskRepository::list_by_user`].
    fn watch_by_user(&self, user_id: &str) -> LiveQuery<Task>;

    /// Open tasks due strictly after `now`, soonest first.
    async fn list_upcoming(&self, user_id: &str, now: EpochMillis) -> DbResult<Vec<Task>>;

    /// Live version of [`TaskRepository::list_upcoming`]. `now` is fixed at
    /// subscription time.
    fn watch_upcoming(&self, user_id: &str, now: EpochMillis) -> LiveQuery<Task>;

    /// Open tasks ordered High, Medium, Low, other, then by due date.
    async fn list_by_priority(&self, user_id: &str) -> DbResult<Vec<Task>>;

    /// Live version of [`TaskRepository::list_by_priority`].
    fn watch_by_priority(&self, user_id: &str) -> LiveQuery<Task>;

    /// Tasks whose `parent_task_id` is `parent_id`, oldest first.
    async fn list_subtasks(&self, parent_id: &str) -> DbResult<Vec<Task>>;

    /// Number of open tasks of a user.
    async fn pending_count(&self, user_id: &str) -> DbResult<i64>;

    /// Number of completed tasks of a user created at or after `since`.
    async fn completed_count_since(&self, user_id: &str, since: EpochMillis) -> DbResult<i64>;

    /// Tasks not yet reflected remotely.
    async fn unsynced(&self) -> DbResult<Vec<Task>>;

    /// Set the sync flag. Returns whether the task exists.
    async fn mark_synced(&self, id: &str) -> DbResult<bool>;

    /// Set the sync flag only while the stored task still carries
    /// `last_modified`. Returns whether a row matched.
    async fn mark_synced_if(&self, id: &str, last_modified: EpochMillis) -> DbResult<bool>;
}

/// Repository for Notification operations.
pub trait NotificationRepository {
    /// Insert a notification, replacing any stored one with the same id.
    async fn insert(&self, notification: &Notification) -> DbResult<()>;

    /// Replace an existing notification. Errors with `NotFound` if unknown.
    async fn update(&self, notification: &Notification) -> DbResult<()>;

    /// Delete a notification by ID. Errors with `NotFound` if unknown.
    async fn delete(&self, id: &str) -> DbResult<()>;

    /// Delete every notification of a user. Returns the number removed.
    async fn delete_all_for_user(&self, user_id: &str) -> DbResult<u64>;

    /// Delete a user's notifications with `timestamp < cutoff`.
    async fn delete_older_than(&self, cutoff: EpochMillis, user_id: &str) -> DbResult<u64>;

    /// Get a notification by ID.
    async fn get(&self, id: &str) -> DbResult<Option<Notification>>;

    /// Notifications of a user, newest first.
    async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Notification>>;

    /// Live version of [`NotificationRepository::list_by_user`].
    fn watch_by_user(&self, user_id: &str) -> LiveQuery<Notification>;

    /// Unread notifications of a user, newest first.
    async fn list_unread(&self, user_id: &str) -> DbResult<Vec<Notification>>;

    /// Live version of [`NotificationRepository::list_unread`].
    fn watch_unread(&self, user_id: &str) -> LiveQuery<Notification>;

    /// Notifications of a user with the given type, newest first.
    async fn list_by_type(&self, user_id: &str, kind: &str) -> DbResult<Vec<Notification>>;

    /// Live version of [`NotificationRepository::list_by_type`].
    fn watch_by_type(&self, user_id: &str, kind: &str) -> LiveQuery<Notification>;

    /// Number of unread notifications of a user.
    async fn unread_count(&self, user_id: &str) -> DbResult<i64>;

    /// Set the read flag. Returns whether the notification exists.
    async fn mark_read(&self, id: &str) -> DbResult<bool>;

    /// Set the read flag on all of a user's notifications. Returns the number
    /// of rows touched.
    async fn mark_all_read(&self, user_id: &str) -> DbResult<u64>;

    /// Notifications not yet reflected remotely.
    async fn unsynced(&self) -> DbResult<Vec<Notification>>;

    /// Set the sync flag. Returns whether the notification exists.
    async fn mark_synced(&self, id: &str) -> DbResult<bool>;

    /// Set the sync flag only while the stored notification still carries
    /// `last_modified`. Returns whether a row matched.
    async fn mark_synced_if(&self, id: &str, last_modified: EpochMillis) -> DbResult<bool>;
}

/// Combined database interface.
///
/// Uses associated types to avoid dynamic dispatch on the repositories.
pub trait Database: Send + Sync {
    type Notes<'a>: NoteRepository
    where
        Self: 'a;
    type Tasks<'a>: TaskRepository
    where
        Self: 'a;
    type Notifications<'a>: NotificationRepository
    where
        Self: 'a;

    /// Create missing tables and verify the shape of existing ones.
    async fn create_schema(&self) -> DbResult<()>;

    /// Delete every row from every table, then reclaim space.
    ///
    /// Must not be called while another transaction is in flight.
    async fn clear_all(&self) -> DbResult<()>;

    /// Delete notifications of every user older than `cutoff`.
    async fn purge_notifications_before(&self, cutoff: EpochMillis) -> DbResult<u64>;

    /// Get the note repository.
    fn notes(&self) -> Self::Notes<'_>;

    /// Get the task repository.
    fn tasks(&self) -> Self::Tasks<'_>;

    /// Get the notification repository.
    fn notifications(&self) -> Self::Notifications<'_>;
}
