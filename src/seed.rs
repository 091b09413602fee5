//! Synthetic demo data.
//!
//! Generates patients, appointments in the next few days and a few years of
//! medical history, then inserts them in one transaction. With a fixed seed
//! the output is reproducible.

use chrono::{Days, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{self, DatabaseError};
use crate::models::{AppointmentTime, NewAppointment, NewHistoryEntry, NewPatient};

const FIRST_NAMES: &[&str] = &[
    "Alice", "Brian", "Carmen", "David", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas",
    "Kemi", "Liam", "Maya", "Nikolai", "Olivia", "Pedro", "Quinn", "Rosa", "Samir", "Tara",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Costa", "Dubois", "Evans", "Fischer", "Garcia", "Hughes", "Ivanova",
    "Jensen", "Kim", "Lopez", "Moreau", "Nakamura", "Okafor", "Patel", "Rossi", "Schmidt",
];

const GENDERS: &[&str] = &["Male", "Female", "Other"];

const DOCTORS: &[&str] = &[
    "Dr. Adams", "Dr. Brown", "Dr. Chen", "Dr. Diaz", "Dr. Eriksen", "Dr. Farah", "Dr. Gupta",
    "Dr. Lee",
];

const CONDITIONS: &[&str] = &[
    "Healthy",
    "Minor Illness",
    "Chronic Condition",
    "Critical Condition",
    "Under Observation",
];

const REASONS: &[&str] = &["Checkup", "Follow-up", "Consultation", "Lab results", "Vaccination"];

const TREATMENTS: &[&str] = &["Rest", "Medication", "Physiotherapy", "Monitoring"];

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 90;
const FIRST_HOUR: u32 = 8;
const LAST_HOUR: u32 = 17;

/// How much to generate.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub patients: usize,
    pub appointments: usize,
    pub history: usize,
    /// Appointments fall in `[today, today + days_ahead]`.
    pub days_ahead: u32,
    /// Diagnoses fall in `[today - years_back, today]`.
    pub years_back: u32,
    /// Store a time of day on appointments instead of a bare date.
    pub with_times: bool,
    /// RNG seed; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            patients: 50,
            appointments: 100,
            history: 100,
            days_ahead: 10,
            years_back: 5,
            with_times: false,
            seed: None,
        }
    }
}

/// Row counts actually inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub patients: usize,
    pub appointments: usize,
    pub history: usize,
}

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

fn plus_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(date)
}

fn minus_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(date)
}

pub fn generate_patients<R: Rng>(rng: &mut R, count: usize) -> Vec<NewPatient> {
    (0..count)
        .map(|_| {
            let first = pick(rng, FIRST_NAMES);
            let last = pick(rng, LAST_NAMES);
            let initial = first.chars().next().unwrap_or('x').to_ascii_lowercase();
            NewPatient {
                name: format!("{first} {last}"),
                age: rng.gen_range(MIN_AGE..=MAX_AGE),
                gender: pick(rng, GENDERS).to_string(),
                email: Some(format!("{initial}{}@example.com", last.to_lowercase())),
                phone: Some(format!(
                    "555-{:03}-{:04}",
                    rng.gen_range(100..1000),
                    rng.gen_range(0..10000)
                )),
            }
        })
        .collect()
}

/// Appointments for random existing patients. Empty when `patient_ids` is.
pub fn generate_appointments<R: Rng>(
    rng: &mut R,
    patient_ids: &[i64],
    count: usize,
    today: NaiveDate,
    days_ahead: u32,
    with_times: bool,
) -> Vec<NewAppointment> {
    if patient_ids.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            let patient_id = patient_ids[rng.gen_range(0..patient_ids.len())];
            let date = plus_days(today, rng.gen_range(0..=days_ahead));
            let time = if with_times {
                let hour = rng.gen_range(FIRST_HOUR..=LAST_HOUR);
                let minute = 15 * rng.gen_range(0..4);
                match NaiveTime::from_hms_opt(hour, minute, 0) {
                    Some(t) => AppointmentTime::DateTime(date.and_time(t)),
                    None => AppointmentTime::Date(date),
                }
            } else {
                AppointmentTime::Date(date)
            };
            NewAppointment {
                patient_id,
                time,
                doctor: pick(rng, DOCTORS).to_string(),
                reason: Some(pick(rng, REASONS).to_string()),
            }
        })
        .collect()
}

/// History entries for random existing patients. Empty when `patient_ids` is.
pub fn generate_history<R: Rng>(
    rng: &mut R,
    patient_ids: &[i64],
    count: usize,
    today: NaiveDate,
    years_back: u32,
) -> Vec<NewHistoryEntry> {
    if patient_ids.is_empty() {
        return Vec::new();
    }
    let span_days = years_back.saturating_mul(365);
    (0..count)
        .map(|_| {
            let condition = pick(rng, CONDITIONS);
            let treatment = (condition != "Healthy").then(|| pick(rng, TREATMENTS).to_string());
            NewHistoryEntry {
                patient_id: patient_ids[rng.gen_range(0..patient_ids.len())],
                condition: condition.to_string(),
                diagnosis_date: minus_days(today, rng.gen_range(0..=span_days)),
                treatment,
            }
        })
        .collect()
}

/// Generate and insert demo data in a single transaction.
///
/// Appointments and history only reference patients inserted by this call.
pub fn populate(
    conn: &Connection,
    config: &SeedConfig,
    today: NaiveDate,
) -> Result<SeedReport, DatabaseError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let tx = conn.unchecked_transaction()?;

    let mut patient_ids = Vec::with_capacity(config.patients);
    for patient in generate_patients(&mut rng, config.patients) {
        patient_ids.push(db::insert_patient(&tx, &patient)?);
    }

    let appointments = generate_appointments(
        &mut rng,
        &patient_ids,
        config.appointments,
        today,
        config.days_ahead,
        config.with_times,
    );
    for appointment in &appointments {
        db::insert_appointment(&tx, appointment)?;
    }

    let history = generate_history(
        &mut rng,
        &patient_ids,
        config.history,
        today,
        config.years_back,
    );
    for entry in &history {
        db::insert_history_entry(&tx, entry)?;
    }

    tx.commit()?;

    let report = SeedReport {
        patients: patient_ids.len(),
        appointments: appointments.len(),
        history: history.len(),
    };
    tracing::info!(
        patients = report.patients,
        appointments = report.appointments,
        history = report.history,
        "Database populated with demo data"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{load_snapshot, open_memory_database};
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn seeded(seed: u64) -> SeedConfig {
        SeedConfig {
            seed: Some(seed),
            ..SeedConfig::default()
        }
    }

    #[test]
    fn default_counts_match_demo_dataset() {
        let conn = open_memory_database().unwrap();
        let report = populate(&conn, &seeded(7), today()).unwrap();
        assert_eq!(
            report,
            SeedReport {
                patients: 50,
                appointments: 100,
                history: 100
            }
        );
        let snapshot = load_snapshot(&conn).unwrap();
        assert_eq!(snapshot.patients.len(), 50);
        assert_eq!(snapshot.appointments.len(), 100);
        assert_eq!(snapshot.history.len(), 100);
    }

    #[test]
    fn same_seed_same_data() {
        let a = open_memory_database().unwrap();
        let b = open_memory_database().unwrap();
        populate(&a, &seeded(42), today()).unwrap();
        populate(&b, &seeded(42), today()).unwrap();

        let sa = load_snapshot(&a).unwrap();
        let sb = load_snapshot(&b).unwrap();
        assert_eq!(sa.patients, sb.patients);
        assert_eq!(sa.appointments, sb.appointments);
        assert_eq!(sa.history, sb.history);
    }

    #[test]
    fn every_row_references_a_seeded_patient() {
        let conn = open_memory_database().unwrap();
        populate(&conn, &seeded(3), today()).unwrap();
        let snapshot = load_snapshot(&conn).unwrap();

        let ids: HashSet<i64> = snapshot.patients.iter().map(|p| p.id).collect();
        assert!(snapshot.appointments.iter().all(|a| ids.contains(&a.patient_id)));
        assert!(snapshot.history.iter().all(|h| ids.contains(&h.patient_id)));
    }

    #[test]
    fn values_fall_in_expected_ranges() {
        let conn = open_memory_database().unwrap();
        populate(&conn, &seeded(11), today()).unwrap();
        let snapshot = load_snapshot(&conn).unwrap();

        let horizon = plus_days(today(), 10);
        let earliest = minus_days(today(), 5 * 365);
        assert!(snapshot
            .patients
            .iter()
            .all(|p| (MIN_AGE..=MAX_AGE).contains(&p.age) && GENDERS.contains(&p.gender.as_str())));
        assert!(snapshot
            .appointments
            .iter()
            .all(|a| a.date() >= today() && a.date() <= horizon && !a.time.has_time()));
        assert!(snapshot
            .history
            .iter()
            .all(|h| h.diagnosis_date >= earliest && h.diagnosis_date <= today()));
    }

    #[test]
    fn email_is_initial_plus_last_name() {
        let mut rng = StdRng::seed_from_u64(1);
        for patient in generate_patients(&mut rng, 20) {
            let mut parts = patient.name.split_whitespace();
            let first = parts.next().unwrap();
            let last = parts.last().unwrap();
            let expected = format!(
                "{}{}@example.com",
                first[..1].to_lowercase(),
                last.to_lowercase()
            );
            assert_eq!(patient.email.as_deref(), Some(expected.as_str()));
        }
    }

    #[test]
    fn with_times_uses_office_hours() {
        let mut rng = StdRng::seed_from_u64(5);
        let appointments = generate_appointments(&mut rng, &[1, 2], 50, today(), 10, true);
        assert_eq!(appointments.len(), 50);
        for appt in &appointments {
            let hour = appt.time.hour().unwrap();
            assert!((FIRST_HOUR..=LAST_HOUR).contains(&hour));
        }
    }

    #[test]
    fn no_patients_means_no_children() {
        let mut rng = StdRng::seed_from_u64(9);
        assert!(generate_appointments(&mut rng, &[], 10, today(), 10, false).is_empty());
        assert!(generate_history(&mut rng, &[], 10, today(), 5).is_empty());

        let conn = open_memory_database().unwrap();
        let report = populate(
            &conn,
            &SeedConfig {
                patients: 0,
                ..seeded(1)
            },
            today(),
        )
        .unwrap();
        assert_eq!(report.appointments, 0);
        assert_eq!(report.history, 0);
    }

    #[test]
    fn healthy_entries_have_no_treatment() {
        let mut rng = StdRng::seed_from_u64(21);
        for entry in generate_history(&mut rng, &[1], 200, today(), 5) {
            assert_eq!(entry.condition == "Healthy", entry.treatment.is_none());
        }
    }
}
