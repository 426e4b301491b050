use tabled::Tabled;

use crate::cli::error::CliResult;
use crate::cli::utils::{check, render, truncate_with_ellipsis};
use crate::db::utils::format_millis;
use crate::db::{Database, Note, NoteRepository};

#[derive(Tabled)]
pub(crate) struct NoteDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[tabled(rename = "Category")]
    pub(crate) category: String,
    #[tabled(rename = "Updated")]
    pub(crate) updated: String,
    #[tabled(rename = "Synced")]
    pub(crate) synced: String,
}

impl From<&Note> for NoteDisplay {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: truncate_with_ellipsis(&note.title, 50),
            category: note.category.clone(),
            updated: format_millis(note.updated_at),
            synced: check(note.is_synced),
        }
    }
}

/// List a user's notes, most recently updated first
pub async fn list_notes<D: Database>(db: &D, user_id: &str, format: &str) -> CliResult<String> {
    let notes = db.notes().list_by_user(user_id).await?;
    render::<Note, NoteDisplay>(&notes, format, "No notes found.")
}
