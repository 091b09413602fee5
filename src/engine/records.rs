//! Record listings, free-text search and the headline summary.

use crate::models::{Patient, Snapshot};

use super::join::PatientIndex;
use super::types::{AppointmentRecord, HistoryRecord, Summary};

/// All patients, ordered by id.
pub fn patient_records(snapshot: &Snapshot) -> Vec<Patient> {
    let mut patients = snapshot.patients.clone();
    patients.sort_by_key(|p| p.id);
    patients
}

/// Appointments with their patient's name, ordered by id. Appointments for
/// unknown patients are left out.
pub fn appointment_records(snapshot: &Snapshot) -> Vec<AppointmentRecord> {
    let index = PatientIndex::new(&snapshot.patients);
    let mut records: Vec<AppointmentRecord> = index
        .join_appointments(&snapshot.appointments)
        .rows
        .into_iter()
        .map(|(appt, patient)| AppointmentRecord {
            id: appt.id,
            time: appt.time,
            doctor: appt.doctor.clone(),
            reason: appt.reason.clone(),
            patient_id: patient.id,
            patient_name: patient.name.clone(),
        })
        .collect();
    records.sort_by_key(|r| r.id);
    records
}

/// History entries with their patient's name, ordered by id.
pub fn history_records(snapshot: &Snapshot) -> Vec<HistoryRecord> {
    let index = PatientIndex::new(&snapshot.patients);
    let mut records: Vec<HistoryRecord> = index
        .join_history(&snapshot.history)
        .rows
        .into_iter()
        .map(|(entry, patient)| HistoryRecord {
            id: entry.id,
            patient_id: patient.id,
            patient_name: patient.name.clone(),
            condition: entry.condition.clone(),
            diagnosis_date: entry.diagnosis_date,
            treatment: entry.treatment.clone(),
        })
        .collect();
    records.sort_by_key(|r| r.id);
    records
}

/// Appointments whose patient name or doctor contains `term`, ignoring case.
///
/// A blank term applies no filter and returns every joined appointment,
/// the same as an empty search box.
pub fn search_appointments(snapshot: &Snapshot, term: &str) -> Vec<AppointmentRecord> {
    let records = appointment_records(snapshot);
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| {
            r.patient_name.to_lowercase().contains(&needle)
                || r.doctor.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Table totals, plus how many child rows point at missing patients.
pub fn summary(snapshot: &Snapshot) -> Summary {
    let index = PatientIndex::new(&snapshot.patients);
    let orphaned_appointments = snapshot
        .appointments
        .iter()
        .filter(|a| !index.contains(a.patient_id))
        .count();
    let orphaned_history_entries = snapshot
        .history
        .iter()
        .filter(|h| !index.contains(h.patient_id))
        .count();

    if orphaned_appointments + orphaned_history_entries > 0 {
        tracing::warn!(
            orphaned_appointments,
            orphaned_history_entries,
            "Rows reference patients that do not exist"
        );
    }

    Summary {
        patients: count(snapshot.patients.len()),
        appointments: count(snapshot.appointments.len()),
        history_entries: count(snapshot.history.len()),
        orphaned_appointments: count(orphaned_appointments),
        orphaned_history_entries: count(orphaned_history_entries),
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
