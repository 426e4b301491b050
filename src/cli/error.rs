use miette::Diagnostic;
use thiserror::Error;

use crate::db::DbError;
use crate::sync::SyncError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sync(#[from] SyncError),

    #[error("IO error: {0}")]
    #[diagnostic(
        code(solowork::cli::io),
        help("Check that the database directory exists and is writable, or pass --db")
    )]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(solowork::cli::serialization))]
    Serialization(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
