//! `seed`: populate the database with demo data.

use std::path::Path;

use chrono::NaiveDate;

use super::setup::setup;
use super::CommandError;
use crate::db;
use crate::seed::{self, SeedConfig, SeedReport};

/// Ensure the schema exists, then insert generated rows relative to `today`.
pub fn seed(db_path: &Path, config: &SeedConfig, today: NaiveDate) -> Result<SeedReport, CommandError> {
    setup(db_path)?;
    let conn = db::open_database(db_path)?;
    Ok(seed::populate(&conn, config, today)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_twice_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");
        let config = SeedConfig {
            patients: 5,
            appointments: 8,
            history: 6,
            seed: Some(1),
            ..SeedConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        seed(&path, &config, today).unwrap();
        let report = seed(&path, &config, today).unwrap();
        assert_eq!(report.patients, 5);

        let conn = db::open_database(&path).unwrap();
        assert_eq!(db::count_patients(&conn).unwrap(), 10);
    }
}
