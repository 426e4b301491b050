use crate::cli::commands::note::*;
use crate::db::{Database, Note, NoteRepository, SqliteDatabase};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.create_schema().await.unwrap();
    db
}

#[test]
fn test_note_display_truncates_title() {
    let note = Note::new("n1", "u1", "x".repeat(80), "body", 0);
    let display = NoteDisplay::from(&note);
    assert_eq!(display.title.chars().count(), 50);
    assert!(display.title.ends_with("..."));
    assert_eq!(display.category, "General");
    assert_eq!(display.updated, "1970-01-01 00:00");
    assert_eq!(display.synced, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_notes_empty() {
    let db = setup_db().await;
    let output = list_notes(&db, "u1", "table").await.unwrap();
    assert_eq!(output, "No notes found.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_notes_table() {
    let db = setup_db().await;
    db.notes()
        .insert(&Note::new("n1", "u1", "Groceries", "milk", 0))
        .await
        .unwrap();

    let output = list_notes(&db, "u1", "table").await.unwrap();
    assert!(output.contains("Groceries"));
    assert!(output.contains("Category"));
    assert!(output.contains('╭'));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_notes_json() {
    let db = setup_db().await;
    db.notes()
        .insert(&Note::new("n1", "u1", "Groceries", "milk", 0))
        .await
        .unwrap();

    let output = list_notes(&db, "u1", "json").await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["id"], "n1");
    assert_eq!(parsed[0]["is_synced"], false);
}
