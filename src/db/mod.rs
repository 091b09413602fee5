pub mod repository;
pub mod snapshot;
pub mod sqlite;

pub use repository::*;
pub use snapshot::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    /// A stored row cannot be turned into a typed record. Raised while
    /// loading, never by the query engine.
    #[error("Invalid {table} row {row_id}: {reason}")]
    Validation {
        table: &'static str,
        row_id: i64,
        reason: String,
    },
}
