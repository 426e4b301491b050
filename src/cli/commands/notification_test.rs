use crate::cli::commands::notification::*;
use crate::db::{Database, Notification, NotificationRepository, SqliteDatabase};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.create_schema().await.unwrap();
    db
}

async fn seed(db: &SqliteDatabase) {
    let notifications = db.notifications();
    let mut reminder = Notification::new("r1", "u1", "Stand up", "Time to move", 3_000);
    reminder.kind = Notification::TYPE_TASK_REMINDER.to_string();
    notifications.insert(&reminder).await.unwrap();

    let mut read_reminder = Notification::new("r2", "u1", "Drink", "Water", 2_000);
    read_reminder.kind = Notification::TYPE_TASK_REMINDER.to_string();
    read_reminder.read = true;
    notifications.insert(&read_reminder).await.unwrap();

    notifications
        .insert(&Notification::new("g1", "u1", "Welcome", "Hello", 1_000))
        .await
        .unwrap();
}

fn ids(json: &str) -> Vec<String> {
    let parsed: Vec<serde_json::Value> = serde_json::from_str(json).unwrap();
    parsed
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_notifications_filters() {
    let db = setup_db().await;
    seed(&db).await;

    let all = list_notifications(&db, "u1", ListNotificationsFilter::default(), "json")
        .await
        .unwrap();
    assert_eq!(ids(&all), vec!["r1", "r2", "g1"]);

    let unread = ListNotificationsFilter {
        unread_only: true,
        kind: None,
    };
    let output = list_notifications(&db, "u1", unread, "json").await.unwrap();
    assert_eq!(ids(&output), vec!["r1", "g1"]);

    let unread_reminders = ListNotificationsFilter {
        unread_only: true,
        kind: Some(Notification::TYPE_TASK_REMINDER),
    };
    let output = list_notifications(&db, "u1", unread_reminders, "json")
        .await
        .unwrap();
    assert_eq!(ids(&output), vec!["r1"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_notification_json_uses_type_key() {
    let db = setup_db().await;
    seed(&db).await;

    let output = list_notifications(&db, "u1", ListNotificationsFilter::default(), "json")
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["type"], "task_reminder");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mark_read_and_read_all() {
    let db = setup_db().await;
    seed(&db).await;

    let output = mark_read(&db, "r1").await.unwrap();
    assert!(output.contains("marked as read"));
    let output = mark_read(&db, "missing").await.unwrap();
    assert!(output.contains("not found"));

    let output = mark_all_read(&db, "u1").await.unwrap();
    assert!(output.contains("Marked 1 notification(s)"));
    assert_eq!(db.notifications().unread_count("u1").await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_prune_removes_only_old_rows() {
    let db = setup_db().await;
    let day = 24 * 60 * 60 * 1000;
    let now = 30 * day;
    db.notifications()
        .insert(&Notification::new("old", "u1", "t", "m", now - 10 * day))
        .await
        .unwrap();
    db.notifications()
        .insert(&Notification::new("new", "u1", "t", "m", now - day))
        .await
        .unwrap();

    let output = prune(&db, "u1", 7, now).await.unwrap();
    assert!(output.contains("Removed 1 notification(s)"));
    assert!(db.notifications().get("old").await.unwrap().is_none());
    assert!(db.notifications().get("new").await.unwrap().is_some());
}
