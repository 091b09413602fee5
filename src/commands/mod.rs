//! CLI command handlers.
//!
//! Each handler takes plain arguments, does the work through the library
//! modules and returns a serialisable result for `main` to print.

pub mod seed;
pub mod serve;
pub mod setup;
pub mod view;

use crate::core_state::CoreError;
use crate::db::DatabaseError;

/// Errors surfaced to the command line.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Server error: {0}")]
    Server(String),
}

/// Health check: verifies the library is linked and reports its version.
pub fn health_check() -> String {
    tracing::debug!("Health check called");
    format!("{} {}", crate::config::APP_NAME, crate::config::APP_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_reports_version() {
        assert!(health_check().ends_with(crate::config::APP_VERSION));
    }

    #[test]
    fn core_error_display_passes_through() {
        let err: CommandError = CoreError::LockPoisoned.into();
        assert_eq!(err.to_string(), "Internal lock error");
    }
}
