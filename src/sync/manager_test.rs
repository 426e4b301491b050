use std::sync::Arc;

use tokio::runtime::Handle;

use crate::db::{
    Database, Note, NoteRepository, Notification, NotificationRepository, SqliteDatabase, Task,
    TaskRepository,
};
use crate::sync::manager::*;
use crate::sync::transport::{MockSyncTransport, SyncAck, TransportError};

async fn setup_test_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.create_schema().await.unwrap();
    db
}

async fn seed(db: &SqliteDatabase) {
    db.notes()
        .insert(&Note::new("n1", "u1", "t", "c", 1))
        .await
        .unwrap();
    db.tasks().insert(&Task::new("t1", "u1", "t", 1)).await.unwrap();
    db.tasks().insert(&Task::new("t2", "u1", "t", 2)).await.unwrap();
    db.notifications()
        .insert(&Notification::new("x1", "u1", "t", "m", 1))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_with_nothing_pending_skips_transport() {
    let db = setup_test_db().await;

    let mut transport = MockSyncTransport::new();
    transport.expect_push().times(0);

    let manager = SyncManager::new(transport);
    let summary = manager.run(&db).await.unwrap();
    assert_eq!(summary, SyncSummary::default());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_marks_everything_acknowledged() {
    let db = setup_test_db().await;
    seed(&db).await;

    let mut transport = MockSyncTransport::new();
    transport
        .expect_push()
        .withf(|batch| batch.notes.len() == 1 && batch.tasks.len() == 2 && batch.notifications.len() == 1)
        .times(1)
        .returning(|batch| Ok(SyncAck::all(batch)));

    let manager = SyncManager::new(transport);
    let summary = manager.run(&db).await.unwrap();

    assert_eq!(summary.synced.total(), 4);
    assert_eq!(summary.pending.total(), 0);
    assert!(db.tasks().get("t2").await.unwrap().unwrap().is_synced);
    assert!(manager.status(&db).await.unwrap().is_clean());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_marks_only_acknowledged_ids() {
    let db = setup_test_db().await;
    seed(&db).await;

    let mut transport = MockSyncTransport::new();
    transport.expect_push().times(1).returning(|_| {
        Ok(SyncAck {
            notes: vec![],
            tasks: vec!["t1".to_string(), "gone".to_string()],
            notifications: vec!["x1".to_string()],
        })
    });

    let manager = SyncManager::new(transport);
    let summary = manager.run(&db).await.unwrap();

    assert_eq!(summary.synced.tasks, 1);
    assert_eq!(summary.synced.notifications, 1);
    assert_eq!(summary.synced.notes, 0);
    assert_eq!(summary.pending.notes, 1);
    assert_eq!(summary.pending.tasks, 1);

    assert!(db.tasks().get("t1").await.unwrap().unwrap().is_synced);
    assert!(!db.tasks().get("t2").await.unwrap().unwrap().is_synced);
    assert!(!db.notes().get("n1").await.unwrap().unwrap().is_synced);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_keeps_records_edited_during_push_pending() {
    let db = Arc::new(setup_test_db().await);
    db.notes()
        .insert(&Note::new("n1", "u1", "t", "c", 1))
        .await
        .unwrap();
    db.tasks().insert(&Task::new("t1", "u1", "t", 1)).await.unwrap();

    let writer = Arc::clone(&db);
    let mut transport = MockSyncTransport::new();
    transport.expect_push().times(1).returning(move |batch| {
        let mut edited = batch.notes[0].clone();
        edited.content = "edited during push".to_string();
        edited.last_modified = 10;
        Handle::current()
            .block_on(writer.notes().update(&edited))
            .unwrap();
        Ok(SyncAck::all(batch))
    });

    let manager = SyncManager::new(transport);
    let summary = manager.run(&*db).await.unwrap();

    assert_eq!(summary.synced.notes, 0);
    assert_eq!(summary.synced.tasks, 1);
    assert_eq!(summary.pending.notes, 1);

    let stored = db.notes().get("n1").await.unwrap().unwrap();
    assert_eq!(stored.content, "edited during push");
    assert!(!stored.is_synced);

    // The next pass uploads the edit.
    let mut transport = MockSyncTransport::new();
    transport
        .expect_push()
        .withf(|batch| batch.notes.len() == 1 && batch.notes[0].content == "edited during push")
        .times(1)
        .returning(|batch| Ok(SyncAck::all(batch)));

    let summary = SyncManager::new(transport).run(&*db).await.unwrap();
    assert_eq!(summary.synced.notes, 1);
    assert!(db.notes().get("n1").await.unwrap().unwrap().is_synced);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_transport_failure_leaves_flags_untouched() {
    let db = setup_test_db().await;
    seed(&db).await;

    let mut transport = MockSyncTransport::new();
    transport
        .expect_push()
        .times(1)
        .returning(|_| Err(TransportError::Unavailable("offline".to_string())));

    let manager = SyncManager::new(transport);
    let result = manager.run(&db).await;
    assert!(matches!(result, Err(SyncError::Transport(_))));

    let status = manager.status(&db).await.unwrap();
    assert_eq!(
        status.pending,
        EntityCounts {
            notes: 1,
            tasks: 2,
            notifications: 1
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_counts_unsynced_per_type() {
    let db = setup_test_db().await;
    seed(&db).await;
    db.tasks().mark_synced("t1").await.unwrap();

    let manager = SyncManager::new(MockSyncTransport::new());
    let status = manager.status(&db).await.unwrap();

    assert_eq!(status.pending.tasks, 1);
    assert_eq!(status.pending.total(), 3);
    assert!(!status.is_clean());
}
