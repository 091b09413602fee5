//! Explicit foreign-key resolution between child rows and patients.

use std::collections::HashMap;

use crate::models::{Appointment, MedicalHistoryEntry, Patient};

/// What a joined view does with a row whose `patient_id` does not resolve.
///
/// Only one policy exists: the row is left out of the view. It is named so
/// that each joined view states the behaviour instead of inheriting it from
/// an implicit SQL inner join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPolicy {
    ExcludeUnmatched,
}

/// Rows that survived a join, plus how many were dropped.
#[derive(Debug)]
pub struct Joined<'a, T> {
    pub rows: Vec<(&'a T, &'a Patient)>,
    pub unmatched: usize,
}

/// Lookup of patients by id.
pub struct PatientIndex<'a> {
    by_id: HashMap<i64, &'a Patient>,
}

impl<'a> PatientIndex<'a> {
    pub fn new(patients: &'a [Patient]) -> Self {
        Self {
            by_id: patients.iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&'a Patient> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Join `rows` to their patients under `policy`.
    pub fn join<T, F>(&self, rows: &'a [T], patient_id: F, policy: JoinPolicy) -> Joined<'a, T>
    where
        F: Fn(&T) -> i64,
    {
        let mut joined = Vec::with_capacity(rows.len());
        let mut unmatched = 0;
        for row in rows {
            match (self.get(patient_id(row)), policy) {
                (Some(patient), _) => joined.push((row, patient)),
                (None, JoinPolicy::ExcludeUnmatched) => unmatched += 1,
            }
        }
        if unmatched > 0 {
            tracing::debug!(unmatched, "Excluded rows with unresolved patient_id");
        }
        Joined {
            rows: joined,
            unmatched,
        }
    }

    pub fn join_appointments(&self, appointments: &'a [Appointment]) -> Joined<'a, Appointment> {
        self.join(appointments, |a| a.patient_id, JoinPolicy::ExcludeUnmatched)
    }

    pub fn join_history(
        &self,
        history: &'a [MedicalHistoryEntry],
    ) -> Joined<'a, MedicalHistoryEntry> {
        self.join(history, |h| h.patient_id, JoinPolicy::ExcludeUnmatched)
    }
}

/// Most recent history entry per patient: latest diagnosis date, then highest id.
pub fn latest_history_by_patient(
    history: &[MedicalHistoryEntry],
) -> HashMap<i64, &MedicalHistoryEntry> {
    let mut latest: HashMap<i64, &MedicalHistoryEntry> = HashMap::new();
    for entry in history {
        latest
            .entry(entry.patient_id)
            .and_modify(|current| {
                if (entry.diagnosis_date, entry.id) > (current.diagnosis_date, current.id) {
                    *current = entry;
                }
            })
            .or_insert(entry);
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn patient(id: i64) -> Patient {
        Patient {
            id,
            name: format!("P{id}"),
            age: 40,
            gender: "Female".into(),
            email: None,
            phone: None,
        }
    }

    fn entry(id: i64, patient_id: i64, date: &str) -> MedicalHistoryEntry {
        MedicalHistoryEntry {
            id,
            patient_id,
            condition: format!("C{id}"),
            diagnosis_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            treatment: None,
        }
    }

    #[test]
    fn join_drops_and_counts_unmatched() {
        let patients = vec![patient(1)];
        let history = vec![entry(1, 1, "2024-01-01"), entry(2, 42, "2024-01-01")];
        let index = PatientIndex::new(&patients);
        let joined = index.join_history(&history);
        assert_eq!(joined.rows.len(), 1);
        assert_eq!(joined.rows[0].0.id, 1);
        assert_eq!(joined.unmatched, 1);
    }

    #[test]
    fn latest_history_prefers_date_then_id() {
        let history = vec![
            entry(1, 1, "2023-05-01"),
            entry(2, 1, "2024-02-01"),
            entry(3, 1, "2024-02-01"),
            entry(4, 1, "2022-01-01"),
            entry(5, 2, "2020-01-01"),
        ];
        let latest = latest_history_by_patient(&history);
        assert_eq!(latest[&1].id, 3);
        assert_eq!(latest[&2].id, 5);
    }
}
