use tabled::Tabled;

use crate::cli::error::CliResult;
use crate::cli::utils::{check, render, truncate_with_ellipsis};
use crate::db::utils::{days_before, format_millis};
use crate::db::{Database, EpochMillis, Notification, NotificationRepository};

#[derive(Tabled)]
pub(crate) struct NotificationDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Type")]
    pub(crate) kind: String,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[tabled(rename = "Message")]
    pub(crate) message: String,
    #[tabled(rename = "When")]
    pub(crate) when: String,
    #[tabled(rename = "Read")]
    pub(crate) read: String,
}

impl From<&Notification> for NotificationDisplay {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.clone(),
            kind: n.kind.clone(),
            title: truncate_with_ellipsis(&n.title, 40),
            message: truncate_with_ellipsis(&n.message, 60),
            when: format_millis(n.timestamp),
            read: check(n.read),
        }
    }
}

/// Filter parameters for listing notifications
#[derive(Debug, Default)]
pub struct ListNotificationsFilter<'a> {
    pub unread_only: bool,
    pub kind: Option<&'a str>,
}

/// List a user's notifications, newest first
pub async fn list_notifications<D: Database>(
    db: &D,
    user_id: &str,
    filter: ListNotificationsFilter<'_>,
    format: &str,
) -> CliResult<String> {
    let repo = db.notifications();
    let mut items = match filter.kind {
        Some(kind) => repo.list_by_type(user_id, kind).await?,
        None if filter.unread_only => repo.list_unread(user_id).await?,
        None => repo.list_by_user(user_id).await?,
    };
    if filter.unread_only {
        items.retain(|n| !n.read);
    }

    render::<Notification, NotificationDisplay>(&items, format, "No notifications found.")
}

/// Mark one notification as read
pub async fn mark_read<D: Database>(db: &D, id: &str) -> CliResult<String> {
    if db.notifications().mark_read(id).await? {
        Ok(format!("✓ Notification {} marked as read", id))
    } else {
        Ok(format!("Notification {} not found", id))
    }
}

/// Mark all of a user's notifications as read
pub async fn mark_all_read<D: Database>(db: &D, user_id: &str) -> CliResult<String> {
    let count = db.notifications().mark_all_read(user_id).await?;
    Ok(format!("✓ Marked {} notification(s) as read", count))
}

/// Delete a user's notifications older than `days` days before `now`
pub async fn prune<D: Database>(
    db: &D,
    user_id: &str,
    days: u32,
    now: EpochMillis,
) -> CliResult<String> {
    let removed = db
        .notifications()
        .delete_older_than(days_before(now, days), user_id)
        .await?;
    Ok(format!(
        "✓ Removed {} notification(s) older than {} days",
        removed, days
    ))
}
