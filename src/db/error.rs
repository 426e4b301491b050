//! Database error types.
//!
//! This module provides abstracted error types for database operations.
//! It uses miette for fancy diagnostic output and thiserror for derive macros.
//! The error types are storage-backend agnostic.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(solowork::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Invalid data: {message} (hint: {help})")]
    #[diagnostic(code(solowork::db::invalid_data))]
    InvalidData { message: String, help: String },

    #[error("Schema mismatch in table '{table}': {message}")]
    #[diagnostic(
        code(solowork::db::schema_mismatch),
        help("The database file was created by an incompatible version. Move it aside or clear it.")
    )]
    SchemaMismatch { table: String, message: String },

    #[error("Data integrity error: {message}")]
    #[diagnostic(code(solowork::db::data_integrity))]
    DataIntegrity { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(solowork::db::database_error))]
    Database { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(solowork::db::connection_error))]
    Connection { message: String },

    #[error("Constraint violation: {message}")]
    #[diagnostic(code(solowork::db::constraint))]
    Constraint { message: String },
}

impl DbError {
    pub(crate) fn not_found(entity_type: &str, id: &str) -> Self {
        DbError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
