use std::path::Path;

use tabled::builder::Builder;

use crate::cli::error::CliResult;
use crate::cli::utils::apply_table_style;
use crate::db::Database;
use crate::sync::{EntityCounts, OutboxTransport, SyncManager};

fn counts_table(header: &str, counts: &EntityCounts) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Type", header]);
    builder.push_record(["Notes", &counts.notes.to_string()]);
    builder.push_record(["Tasks", &counts.tasks.to_string()]);
    builder.push_record(["Notifications", &counts.notifications.to_string()]);
    builder.push_record(["Total", &counts.total().to_string()]);

    let mut table = builder.build();
    apply_table_style(&mut table);
    table.to_string()
}

/// Show how many records are waiting to be synced
pub async fn status<D: Database>(db: &D, format: &str) -> CliResult<String> {
    let status = crate::sync::status(db).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&status)?),
        _ if status.is_clean() => Ok("✓ Everything is synced".to_string()),
        _ => Ok(counts_table("Pending", &status.pending)),
    }
}

/// Push unsynced records into a local outbox directory
pub async fn push<D: Database>(db: &D, outbox: &Path, format: &str) -> CliResult<String> {
    let manager = SyncManager::new(OutboxTransport::new(outbox));
    let summary = manager.run(db).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&summary)?),
        _ if summary.synced.total() == 0 && summary.pending.total() == 0 => {
            Ok("✓ Nothing to sync".to_string())
        }
        _ => Ok(format!(
            "✓ Wrote {} record(s) to {}\n{}",
            summary.synced.total(),
            outbox.display(),
            counts_table("Synced", &summary.synced)
        )),
    }
}
