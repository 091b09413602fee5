use std::path::Path;

use rusqlite::Connection;

use super::DatabaseError;

/// Optional columns added by later dashboard revisions: (table, column, type).
const OPTIONAL_COLUMNS: &[(&str, &str, &str)] = &[
    ("Appointments", "reason", "TEXT"),
    ("MedicalHistory", "treatment", "TEXT"),
];

enum Migration {
    Sql(&'static str),
    /// Adds each column unless a legacy file already has it.
    AddColumns(&'static [(&'static str, &'static str, &'static str)]),
}

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;"
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, Migration)> = vec![
        (1, Migration::Sql(include_str!("../../resources/migrations/001_initial.sql"))),
        (2, Migration::AddColumns(OPTIONAL_COLUMNS)),
    ];

    for (version, migration) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            apply_migration(conn, version, &migration).map_err(|e| {
                DatabaseError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                }
            })?;
        }
    }

    Ok(())
}

fn apply_migration(
    conn: &Connection,
    version: i64,
    migration: &Migration,
) -> Result<(), rusqlite::Error> {
    match migration {
        Migration::Sql(sql) => conn.execute_batch(sql),
        Migration::AddColumns(columns) => {
            for (table, column, sql_type) in columns.iter() {
                if !has_column(conn, table, column)? {
                    conn.execute_batch(&format!(
                        "ALTER TABLE {table} ADD COLUMN {column} {sql_type};"
                    ))?;
                }
            }
            conn.execute(
                "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
                [version],
            )?;
            Ok(())
        }
    }
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>("name"))?;
    for name in names {
        if name?.eq_ignore_ascii_case(column) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get::<_, Option<i64>>(0),
    )
    .ok()
    .flatten()
    .unwrap_or(0)
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}
