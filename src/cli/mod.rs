mod commands;
pub mod error;
pub mod utils;

#[cfg(test)]
mod utils_test;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::utils::now_millis;
use crate::db::{Database, SqliteConfig, SqliteDatabase};
use crate::paths::{DB_ENV_VAR, get_data_dir};
use commands::notification::ListNotificationsFilter;
use commands::task::TaskView;
use error::CliResult;

#[derive(Parser)]
#[command(name = "solowork")]
#[command(author, version, about = "Offline-first notes, tasks and notifications", long_about = None)]
pub struct Cli {
    /// Database file (default: SOLOWORK_DB env or the XDG data directory)
    #[arg(long, global = true, env = DB_ENV_VAR)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Note commands
    Notes {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Task commands
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Notification commands
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },
    /// Sync commands
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum NoteCommands {
    /// List a user's notes
    List {
        #[arg(long)]
        user: String,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List a user's tasks, newest first
    List {
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Open tasks with a future due date, soonest first
    Upcoming {
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Open tasks by priority
    Priority {
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Pending and completed counts
    Stats {
        #[arg(long)]
        user: String,
        /// Count completed tasks created at or after this epoch-millis timestamp
        #[arg(long, default_value_t = 0)]
        since: i64,
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum NotificationCommands {
    /// List a user's notifications
    List {
        #[arg(long)]
        user: String,
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
        /// Only notifications of this type (e.g. task_reminder)
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Mark a notification as read
    Read {
        /// Notification ID
        id: String,
    },
    /// Mark all of a user's notifications as read
    ReadAll {
        #[arg(long)]
        user: String,
    },
    /// Delete a user's old notifications
    Prune {
        #[arg(long)]
        user: String,
        #[arg(long)]
        older_than_days: u32,
    },
}

#[derive(Subcommand)]
enum SyncCommands {
    /// Show records waiting to be synced
    Status {
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Write unsynced records to an outbox directory and mark them synced
    Push {
        /// Outbox directory (default: <data dir>/outbox)
        #[arg(long)]
        outbox: Option<PathBuf>,
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Delete every note, task and notification
    Clear,
}

/// Initialize tracing subscriber with env filter, logging to stderr
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solowork=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn open_store(path: Option<PathBuf>) -> CliResult<SqliteDatabase> {
    let config = match path {
        Some(path) => SqliteConfig::with_path(path),
        None => SqliteConfig::default(),
    };
    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open_with_config(config).await?;
    db.create_schema().await?;
    db.purge_expired_notifications(now_millis()).await?;
    Ok(db)
}

pub async fn run() -> miette::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // Show help when no command provided
        let _ = Cli::parse_from(["solowork", "--help"]);
        return Ok(());
    };

    let db = open_store(cli.db).await?;
    let output = execute(&db, command).await;
    db.close().await;

    println!("{}", output?);
    Ok(())
}

async fn execute(db: &SqliteDatabase, command: Commands) -> CliResult<String> {
    match command {
        Commands::Notes { command } => match command {
            NoteCommands::List { user, format } => {
                commands::note::list_notes(db, &user, &format).await
            }
        },
        Commands::Tasks { command } => match command {
            TaskCommands::List { user, format } => {
                commands::task::list_tasks(db, &user, TaskView::All, &format).await
            }
            TaskCommands::Upcoming { user, format } => {
                let view = TaskView::Upcoming { now: now_millis() };
                commands::task::list_tasks(db, &user, view, &format).await
            }
            TaskCommands::Priority { user, format } => {
                commands::task::list_tasks(db, &user, TaskView::Priority, &format).await
            }
            TaskCommands::Stats {
                user,
                since,
                format,
            } => commands::task::task_stats(db, &user, since, &format).await,
        },
        Commands::Notifications { command } => match command {
            NotificationCommands::List {
                user,
                unread,
                kind,
                format,
            } => {
                let filter = ListNotificationsFilter {
                    unread_only: unread,
                    kind: kind.as_deref(),
                };
                commands::notification::list_notifications(db, &user, filter, &format).await
            }
            NotificationCommands::Read { id } => commands::notification::mark_read(db, &id).await,
            NotificationCommands::ReadAll { user } => {
                commands::notification::mark_all_read(db, &user).await
            }
            NotificationCommands::Prune {
                user,
                older_than_days,
            } => commands::notification::prune(db, &user, older_than_days, now_millis()).await,
        },
        Commands::Sync { command } => match command {
            SyncCommands::Status { format } => commands::sync::status(db, &format).await,
            SyncCommands::Push { outbox, format } => {
                let outbox = outbox.unwrap_or_else(|| get_data_dir().join("outbox"));
                commands::sync::push(db, &outbox, &format).await
            }
        },
        Commands::Db { command } => match command {
            DbCommands::Clear => commands::db::clear(db).await,
        },
    }
}
