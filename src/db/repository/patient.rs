use rusqlite::{params, Connection};

use super::{integer_field, optional_text, required_text};
use crate::db::DatabaseError;
use crate::models::{NewPatient, Patient};

const TABLE: &str = "Patients";

pub fn insert_patient(conn: &Connection, patient: &NewPatient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO Patients (name, age, gender, email, phone) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient.name,
            patient.age,
            patient.gender,
            patient.email,
            patient.phone,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All patients ordered by id, validated.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, gender, email, phone FROM Patients ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, rusqlite::types::Value>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut patients = Vec::new();
    for row in rows {
        let (id, name, age, gender, email, phone) = row?;
        let age = integer_field(TABLE, id, "age", age)?;
        let age = u32::try_from(age).map_err(|_| DatabaseError::Validation {
            table: TABLE,
            row_id: id,
            reason: format!("age must be a non-negative integer, got {age}"),
        })?;
        patients.push(Patient {
            id,
            name: required_text(TABLE, id, "name", name)?,
            age,
            gender: required_text(TABLE, id, "gender", gender)?,
            email: optional_text(email),
            phone: optional_text(phone),
        });
    }
    Ok(patients)
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM Patients", [], |row| row.get(0))?)
}
