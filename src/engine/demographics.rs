//! Patient demographic views: exact-age histogram and the condition cross-tabs.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::enums::CrossTabAxis;
use crate::models::{Patient, Snapshot};

use super::join::PatientIndex;
use super::types::{AgeCount, CrossTab};

/// Closed, non-overlapping age bands used by the age-group cross-tab.
/// Ages above the last band land in `Over100`; ages are unsigned so there
/// is no underflow band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeBand {
    Age0To18,
    Age19To35,
    Age36To50,
    Age51To65,
    Age66To100,
    Over100,
}

impl AgeBand {
    /// The five fixed bands, in order. `Over100` is not part of this list.
    pub const FIXED: [AgeBand; 5] = [
        AgeBand::Age0To18,
        AgeBand::Age19To35,
        AgeBand::Age36To50,
        AgeBand::Age51To65,
        AgeBand::Age66To100,
    ];

    pub fn for_age(age: u32) -> Self {
        match age {
            0..=18 => Self::Age0To18,
            19..=35 => Self::Age19To35,
            36..=50 => Self::Age36To50,
            51..=65 => Self::Age51To65,
            66..=100 => Self::Age66To100,
            _ => Self::Over100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Age0To18 => "0-18",
            Self::Age19To35 => "19-35",
            Self::Age36To50 => "36-50",
            Self::Age51To65 => "51-65",
            Self::Age66To100 => "66-100",
            Self::Over100 => "over-100",
        }
    }
}

/// Patients per exact age, ascending by age.
pub fn age_histogram(snapshot: &Snapshot) -> Vec<AgeCount> {
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    for patient in &snapshot.patients {
        *counts.entry(patient.age).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(age, count)| AgeCount { age, count })
        .collect()
}

/// Condition counts broken down by age band or gender.
///
/// Only history rows whose patient exists are counted. Columns are the
/// conditions present, ascending. Rows are the five fixed bands (plus
/// `over-100` when populated) or the genders present, ascending.
pub fn demographic_crosstab(snapshot: &Snapshot, axis: CrossTabAxis) -> CrossTab {
    let index = PatientIndex::new(&snapshot.patients);
    let joined = index.join_history(&snapshot.history);

    let row_label = |patient: &Patient| -> String {
        match axis {
            CrossTabAxis::AgeGroup => AgeBand::for_age(patient.age).label().to_string(),
            CrossTabAxis::Gender => patient.gender.clone(),
        }
    };

    let mut cells: BTreeMap<(String, &str), u32> = BTreeMap::new();
    let mut columns: BTreeSet<&str> = BTreeSet::new();
    let mut present_rows: BTreeSet<String> = BTreeSet::new();

    for &(entry, patient) in &joined.rows {
        let row = row_label(patient);
        columns.insert(entry.condition.as_str());
        present_rows.insert(row.clone());
        *cells.entry((row, entry.condition.as_str())).or_default() += 1;
    }

    let rows: Vec<String> = match axis {
        CrossTabAxis::AgeGroup => {
            let mut rows: Vec<String> = AgeBand::FIXED
                .iter()
                .map(|band| band.label().to_string())
                .collect();
            if present_rows.contains(AgeBand::Over100.label()) {
                rows.push(AgeBand::Over100.label().to_string());
            }
            rows
        }
        CrossTabAxis::Gender => present_rows.into_iter().collect(),
    };
    let columns: Vec<String> = columns.into_iter().map(str::to_string).collect();

    let counts = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    cells
                        .get(&(row.clone(), column.as_str()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    CrossTab {
        axis,
        rows,
        columns,
        counts,
    }
}
