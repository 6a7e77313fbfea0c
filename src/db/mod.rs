pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    /// A uniqueness or business rule rejected the write. The message is
    /// user-facing.
    #[error("{0}")]
    ConstraintViolation(String),
}

impl DatabaseError {
    pub(crate) fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn constraint(message: &str) -> Self {
        Self::ConstraintViolation(message.to_string())
    }
}
