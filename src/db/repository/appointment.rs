use rusqlite::{params, Connection};

use super::{optional_text, required_text};
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentTime, NewAppointment};

const TABLE: &str = "Appointments";

pub fn insert_appointment(
    conn: &Connection,
    appointment: &NewAppointment,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO Appointments (patient_id, appointment_date, doctor, reason)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            appointment.patient_id,
            appointment.time.to_storage_string(),
            appointment.doctor,
            appointment.reason,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All appointments ordered by id, validated. Orphaned `patient_id`s are
/// kept; the query engine decides what to do with them.
pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, appointment_date, doctor, reason
         FROM Appointments ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    })?;

    let mut appointments = Vec::new();
    for row in rows {
        let (id, patient_id, raw_time, doctor, reason) = row?;
        let raw_time = required_text(TABLE, id, "appointment_date", raw_time)?;
        let time = AppointmentTime::parse(&raw_time).ok_or_else(|| DatabaseError::Validation {
            table: TABLE,
            row_id: id,
            reason: format!("'appointment_date' is not a date or timestamp: {raw_time}"),
        })?;
        appointments.push(Appointment {
            id,
            patient_id,
            time,
            doctor: required_text(TABLE, id, "doctor", doctor)?,
            reason: optional_text(reason),
        });
    }
    Ok(appointments)
}
