use rusqlite::{params, Connection};

use super::{calendar_date, optional_text, required_text};
use crate::db::DatabaseError;
use crate::models::{MedicalHistoryEntry, NewHistoryEntry};

const TABLE: &str = "MedicalHistory";

pub fn insert_history_entry(
    conn: &Connection,
    entry: &NewHistoryEntry,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO MedicalHistory (patient_id, condition, diagnosis_date, treatment)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.patient_id,
            entry.condition,
            entry.diagnosis_date.format("%Y-%m-%d").to_string(),
            entry.treatment,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All history entries ordered by id, validated.
pub fn list_history(conn: &Connection) -> Result<Vec<MedicalHistoryEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, condition, diagnosis_date, treatment
         FROM MedicalHistory ORDER BY id",
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

    let mut entries = Vec::new();
    for row in rows {
        let (id, patient_id, condition, diagnosis_date, treatment) = row?;
        entries.push(MedicalHistoryEntry {
            id,
            patient_id,
            condition: required_text(TABLE, id, "condition", condition)?,
            diagnosis_date: calendar_date(TABLE, id, "diagnosis_date", diagnosis_date)?,
            treatment: optional_text(treatment),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_patient;
    use crate::db::sqlite::open_memory_database;
    use crate::models::NewPatient;
    use chrono::NaiveDate;

    #[test]
    fn insert_and_list_with_treatment() {
        let conn = open_memory_database().unwrap();
        let pid = insert_patient(
            &conn,
            &NewPatient {
                name: "Alice".into(),
                age: 30,
                gender: "Female".into(),
                email: None,
                phone: None,
            },
        )
        .unwrap();
        insert_history_entry(
            &conn,
            &NewHistoryEntry {
                patient_id: pid,
                condition: "Asthma".into(),
                diagnosis_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                treatment: Some("Inhaler".into()),
            },
        )
        .unwrap();

        let history = list_history(&conn).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].condition, "Asthma");
        assert_eq!(history[0].treatment.as_deref(), Some("Inhaler"));
        assert_eq!(
            history[0].diagnosis_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn bad_diagnosis_date_is_rejected() {
        let conn = open_memory_database().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys=OFF;
             INSERT INTO MedicalHistory (patient_id, condition, diagnosis_date)
             VALUES (1, 'Asthma', 'last spring');",
        )
        .unwrap();
        assert!(matches!(
            list_history(&conn),
            Err(DatabaseError::Validation { table: "MedicalHistory", .. })
        ));
    }
}
