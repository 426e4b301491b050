use serde::Serialize;
use tabled::Tabled;
use tabled::builder::Builder;

use crate::cli::error::CliResult;
use crate::cli::utils::{
    apply_table_style, check, format_optional_millis, render, truncate_with_ellipsis,
};
use crate::db::utils::format_millis;
use crate::db::{Database, EpochMillis, Task, TaskRepository};

#[derive(Tabled)]
pub(crate) struct TaskDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[tabled(rename = "Priority")]
    pub(crate) priority: String,
    #[tabled(rename = "Due")]
    pub(crate) due: String,
    #[tabled(rename = "Done")]
    pub(crate) done: String,
    #[tabled(rename = "Repeats")]
    pub(crate) repeats: String,
}

impl From<&Task> for TaskDisplay {
    fn from(task: &Task) -> Self {
        let repeats = match (&task.recurring_type, task.recurring_interval) {
            (Some(kind), Some(days)) if kind == Task::RECURRING_CUSTOM => {
                format!("every {} days", days)
            }
            (Some(kind), _) => kind.clone(),
            (None, _) => "-".to_string(),
        };

        Self {
            id: task.id.clone(),
            title: truncate_with_ellipsis(&task.title, 50),
            priority: task.priority.to_string(),
            due: format_optional_millis(task.due_date),
            done: check(task.is_completed),
            repeats,
        }
    }
}

/// Which task listing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskView {
    /// All tasks, newest first.
    All,
    /// Open tasks due after `now`, soonest first.
    Upcoming { now: EpochMillis },
    /// Open tasks by priority, then due date.
    Priority,
}

/// List a user's tasks
pub async fn list_tasks<D: Database>(
    db: &D,
    user_id: &str,
    view: TaskView,
    format: &str,
) -> CliResult<String> {
    let tasks = match view {
        TaskView::All => db.tasks().list_by_user(user_id).await?,
        TaskView::Upcoming { now } => db.tasks().list_upcoming(user_id, now).await?,
        TaskView::Priority => db.tasks().list_by_priority(user_id).await?,
    };
    render::<Task, TaskDisplay>(&tasks, format, "No tasks found.")
}

#[derive(Debug, Serialize)]
pub(crate) struct TaskStats {
    pub(crate) user_id: String,
    pub(crate) pending: i64,
    pub(crate) completed: i64,
    pub(crate) since: EpochMillis,
}

/// Pending and completed task counts
pub async fn task_stats<D: Database>(
    db: &D,
    user_id: &str,
    since: EpochMillis,
    format: &str,
) -> CliResult<String> {
    let stats = TaskStats {
        user_id: user_id.to_string(),
        pending: db.tasks().pending_count(user_id).await?,
        completed: db.tasks().completed_count_since(user_id, since).await?,
        since,
    };

    match format {
        "json" => Ok(serde_json::to_string_pretty(&stats)?),
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            builder.push_record(["User", &stats.user_id]);
            builder.push_record(["Pending", &stats.pending.to_string()]);
            builder.push_record([
                format!("Completed since {}", format_millis(since)),
                stats.completed.to_string(),
            ]);

            let mut table = builder.build();
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}
