use rusqlite::Connection;

use super::repository::{list_appointments, list_history, list_patients};
use super::DatabaseError;
use crate::models::Snapshot;

/// Load all three tables into an immutable snapshot.
///
/// Fails on the first invalid row; a partially loaded snapshot is never
/// returned.
pub fn load_snapshot(conn: &Connection) -> Result<Snapshot, DatabaseError> {
    let patients = list_patients(conn)?;
    let appointments = list_appointments(conn)?;
    let history = list_history(conn)?;

    tracing::info!(
        patients = patients.len(),
        appointments = appointments.len(),
        history = history.len(),
        "Snapshot loaded"
    );

    Ok(Snapshot::new(patients, appointments, history))
}
