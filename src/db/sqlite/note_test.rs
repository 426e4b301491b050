//! Tests for SqliteNoteRepository.

use crate::db::{Database, DbError, Note, NoteRepository, SqliteDatabase};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.create_schema().await.expect("Schema should be created");
    db
}

fn make_note(id: &str, user_id: &str, updated_at: i64) -> Note {
    let mut note = Note::new(id, user_id, format!("Title {id}"), "body", 1_000);
    note.updated_at = updated_at;
    note
}

#[tokio::test(flavor = "multi_thread")]
async fn note_insert_and_get() {
    let db = setup_db().await;
    let notes = db.notes();

    let mut note = make_note("n1", "u1", 2_000);
    note.category = Note::CATEGORY_WORK.to_string();
    note.content = "Line one\n\nLine two".to_string();

    notes.insert(&note).await.expect("Insert should succeed");

    let retrieved = notes
        .get("n1")
        .await
        .expect("Get should succeed")
        .expect("Note should exist");
    assert_eq!(retrieved, note);
}

#[tokio::test(flavor = "multi_thread")]
async fn note_get_missing_returns_none() {
    let db = setup_db().await;
    assert!(db.notes().get("nope").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn note_insert_replaces_existing_id() {
    let db = setup_db().await;
    let notes = db.notes();

    notes.insert(&make_note("n1", "u1", 1_000)).await.unwrap();
    let mut replacement = make_note("n1", "u1", 5_000);
    replacement.title = "Rewritten".to_string();
    notes.insert(&replacement).await.unwrap();

    let all = notes.list_by_user("u1").await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Rewritten");
}

#[tokio::test(flavor = "multi_thread")]
async fn note_list_by_user_orders_by_updated_desc() {
    let db = setup_db().await;
    let notes = db.notes();

    notes.insert(&make_note("old", "u1", 1_000)).await.unwrap();
    notes.insert(&make_note("new", "u1", 3_000)).await.unwrap();
    notes.insert(&make_note("mid", "u1", 2_000)).await.unwrap();
    notes.insert(&make_note("other", "u2", 9_000)).await.unwrap();

    let ids: Vec<String> = notes
        .list_by_user("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn note_update_changes_only_target_row() {
    let db = setup_db().await;
    let notes = db.notes();

    let first = make_note("n1", "u1", 1_000);
    let second = make_note("n2", "u1", 1_000);
    notes.insert(&first).await.unwrap();
    notes.insert(&second).await.unwrap();

    let mut edited = first.clone();
    edited.content = "edited".to_string();
    edited.last_modified = 7_000;
    notes.update(&edited).await.expect("Update should succeed");

    let n1 = notes.get("n1").await.unwrap().unwrap();
    assert_eq!(n1.content, "edited");
    assert_eq!(n1.last_modified, 7_000);

    let n2 = notes.get("n2").await.unwrap().unwrap();
    assert_eq!(n2, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn note_update_advances_stale_last_modified() {
    let db = setup_db().await;
    let notes = db.notes();

    let mut note = make_note("n1", "u1", 1_000);
    note.last_modified = 5_000;
    notes.insert(&note).await.unwrap();

    note.last_modified = 10;
    notes.update(&note).await.unwrap();

    let stored = notes.get("n1").await.unwrap().unwrap();
    assert_eq!(stored.last_modified, 5_001);
}

#[tokio::test(flavor = "multi_thread")]
async fn note_update_missing_returns_not_found() {
    let db = setup_db().await;

    let err = db
        .notes()
        .update(&make_note("ghost", "u1", 1_000))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
    assert!(db.notes().get("ghost").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn note_delete() {
    let db = setup_db().await;
    let notes = db.notes();

    notes.insert(&make_note("n1", "u1", 1_000)).await.unwrap();
    notes.delete("n1").await.expect("Delete should succeed");
    assert!(notes.get("n1").await.unwrap().is_none());

    let err = notes.delete("n1").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn note_mark_synced_if_requires_matching_version() {
    let db = setup_db().await;
    let notes = db.notes();

    let mut note = make_note("n1", "u1", 1_000);
    note.last_modified = 5;
    notes.insert(&note).await.unwrap();

    assert!(!notes.mark_synced_if("n1", 4).await.unwrap());
    assert!(!notes.get("n1").await.unwrap().unwrap().is_synced);

    assert!(notes.mark_synced_if("n1", 5).await.unwrap());
    assert!(notes.get("n1").await.unwrap().unwrap().is_synced);
    assert!(!notes.mark_synced_if("missing", 5).await.unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn note_mark_synced_flips_only_flag() {
    let db = setup_db().await;
    let notes = db.notes();

    let note = make_note("n1", "u1", 1_000);
    notes.insert(&note).await.unwrap();
    notes.insert(&make_note("n2", "u1", 1_000)).await.unwrap();

    assert!(notes.mark_synced("n1").await.unwrap());
    assert!(notes.mark_synced("n1").await.unwrap());
    assert!(!notes.mark_synced("missing").await.unwrap());

    let stored = notes.get("n1").await.unwrap().unwrap();
    assert!(stored.is_synced);
    assert_eq!(
        stored,
        Note {
            is_synced: true,
            ..note
        }
    );

    let pending: Vec<String> = notes
        .unsynced()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(pending, vec!["n2"]);
}
