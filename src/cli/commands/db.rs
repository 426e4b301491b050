use crate::cli::error::CliResult;
use crate::db::Database;

/// Delete every stored record
pub async fn clear<D: Database>(db: &D) -> CliResult<String> {
    db.clear_all().await?;
    Ok("✓ All notes, tasks and notifications deleted".to_string())
}
