//! `setup`: create the database file and apply migrations.

use std::path::Path;

use serde::Serialize;

use super::CommandError;
use crate::db;

#[derive(Debug, Serialize)]
pub struct SetupReport {
    pub db_path: String,
    pub tables: i64,
    pub patients: i64,
}

/// Create parent directories, open (or create) the database and migrate it.
/// Safe to run against an existing file.
pub fn setup(db_path: &Path) -> Result<SetupReport, CommandError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = db::open_database(db_path)?;
    let tables = db::count_tables(&conn)?;
    let patients = db::count_patients(&conn)?;

    tracing::info!(path = %db_path.display(), tables, "Database ready");

    Ok(SetupReport {
        db_path: db_path.display().to_string(),
        tables,
        patients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_creates_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clinic.db");

        let report = setup(&path).unwrap();
        assert!(path.exists());
        assert_eq!(report.tables, 4);
        assert_eq!(report.patients, 0);
    }

    #[test]
    fn setup_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");
        setup(&path).unwrap();
        let again = setup(&path).unwrap();
        assert_eq!(again.tables, 4);
    }
}
