//! Domain models for the local store.
//!
//! These models are storage-agnostic. Timestamps are epoch milliseconds and
//! every record carries the bookkeeping pair used by the sync pass:
//! `is_synced` and `last_modified`.

use serde::{Deserialize, Serialize};

/// Caller-generated identifier shared by all record types.
pub type Id = String;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Tables owned by the store. Live queries declare which of these they read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Notes,
    Tasks,
    Notifications,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Notes, Table::Tasks, Table::Notifications];

    /// SQL table name.
    pub fn name(self) -> &'static str {
        match self {
            Table::Notes => "notes",
            Table::Tasks => "tasks",
            Table::Notifications => "notifications",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Notes
// =============================================================================

/// A free-form note owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub category: String,
    pub user_id: String,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
    pub is_synced: bool,
    pub last_modified: EpochMillis,
}

impl Note {
    pub const CATEGORY_GENERAL: &'static str = "General";
    pub const CATEGORY_WORK: &'static str = "Work";
    pub const CATEGORY_PERSONAL: &'static str = "Personal";
    pub const CATEGORY_STUDY: &'static str = "Study";
    pub const CATEGORY_IDEAS: &'static str = "Ideas";

    /// Build an unsynced note in the default category, stamped at `now`.
    pub fn new(
        id: impl Into<Id>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        now: EpochMillis,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            category: Self::CATEGORY_GENERAL.to_string(),
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
            is_synced: false,
            last_modified: now,
        }
    }
}

// =============================================================================
// Tasks
// =============================================================================

/// Task priority. Unknown stored values are kept verbatim and rank last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Display rank: High 1, Medium 2, Low 3, anything else 4.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Other(_) => 4,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(s) => s,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Other(s),
        }
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        Priority::from(s.to_string())
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// A to-do item, optionally due at a point in time and optionally recurring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<EpochMillis>,
    pub is_completed: bool,
    pub user_id: String,
    pub created_at: EpochMillis,
    pub is_synced: bool,
    pub last_modified: EpochMillis,
    /// One of the `RECURRING_*` values, or free text.
    pub recurring_type: Option<String>,
    /// Interval in days for `custom` recurrence.
    pub recurring_interval: Option<i32>,
    /// Previous task in a recurring chain. Not enforced by the store.
    pub parent_task_id: Option<Id>,
}

impl Task {
    pub const RECURRING_DAILY: &'static str = "daily";
    pub const RECURRING_WEEKLY: &'static str = "weekly";
    pub const RECURRING_MONTHLY: &'static str = "monthly";
    pub const RECURRING_CUSTOM: &'static str = "custom";

    /// Build an open, unsynced, non-recurring task stamped at `now`.
    pub fn new(
        id: impl Into<Id>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        now: EpochMillis,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            is_completed: false,
            user_id: user_id.into(),
            created_at: now,
            is_synced: false,
            last_modified: now,
            recurring_type: None,
            recurring_interval: None,
            parent_task_id: None,
        }
    }
}

// =============================================================================
// Notifications
// =============================================================================

/// An in-app notification delivered to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Id,
    pub title: String,
    pub message: String,
    /// One of the `TYPE_*` values, or free text.
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: EpochMillis,
    pub read: bool,
    /// Opaque payload, typically a serialized key-value blob.
    pub additional_data: Option<String>,
    pub user_id: String,
    pub is_synced: bool,
    pub last_modified: EpochMillis,
}

impl Notification {
    pub const TYPE_GENERAL: &'static str = "general";
    pub const TYPE_TASK_REMINDER: &'static str = "task_reminder";
    pub const TYPE_EVENT_REMINDER: &'static str = "event_reminder";
    pub const TYPE_SYNC: &'static str = "sync";
    pub const TYPE_FOCUS_COMPLETE: &'static str = "focus_complete";

    /// Build an unread, unsynced `general` notification stamped at `now`.
    pub fn new(
        id: impl Into<Id>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        now: EpochMillis,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message: message.into(),
            kind: Self::TYPE_GENERAL.to_string(),
            timestamp: now,
            read: false,
            additional_data: None,
            user_id: user_id.into(),
            is_synced: false,
            last_modified: now,
        }
    }
}
