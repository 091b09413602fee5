use chrono::NaiveDate;
use serde::Serialize;

use crate::models::enums::{CrossTabAxis, ViewName};
use crate::models::{AppointmentTime, Patient};

// ── Requests ───────────────────────────────────────────────────────────────

/// A view plus its arguments. Doubles as the cache key, so arguments are
/// normalised on construction (see [`ViewRequest::search`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewRequest {
    Summary,
    Patients,
    Appointments,
    History,
    AgeHistogram,
    Upcoming { as_of: NaiveDate, window_days: u32 },
    DailyLoad { as_of: NaiveDate, window_days: u32 },
    Conditions,
    #[serde(rename = "crosstab")]
    CrossTab { axis: CrossTabAxis },
    TopDoctors,
    WeeklyTrend,
    Heatmap,
    Search { term: String },
}

impl ViewRequest {
    /// Search request with the term trimmed and lower-cased, so that
    /// "Dr. Brown" and " dr. brown" share one cache entry.
    pub fn search(term: &str) -> Self {
        Self::Search {
            term: term.trim().to_lowercase(),
        }
    }

    pub fn name(&self) -> ViewName {
        match self {
            Self::Summary => ViewName::Summary,
            Self::Patients => ViewName::Patients,
            Self::Appointments => ViewName::Appointments,
            Self::History => ViewName::History,
            Self::AgeHistogram => ViewName::AgeHistogram,
            Self::Upcoming { .. } => ViewName::Upcoming,
            Self::DailyLoad { .. } => ViewName::DailyLoad,
            Self::Conditions => ViewName::Conditions,
            Self::CrossTab { .. } => ViewName::CrossTab,
            Self::TopDoctors => ViewName::TopDoctors,
            Self::WeeklyTrend => ViewName::WeeklyTrend,
            Self::Heatmap => ViewName::Heatmap,
            Self::Search { .. } => ViewName::Search,
        }
    }
}

// ── Results ────────────────────────────────────────────────────────────────

/// Output of any view. Serialises as the inner value only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewResult {
    Summary(Summary),
    Patients(Vec<Patient>),
    Appointments(Vec<AppointmentRecord>),
    History(Vec<HistoryRecord>),
    AgeHistogram(Vec<AgeCount>),
    Upcoming(Vec<UpcomingAppointment>),
    DailyLoad(DailyLoad),
    Conditions(Vec<LabelCount>),
    CrossTab(CrossTab),
    TopDoctors(Vec<LabelCount>),
    WeeklyTrend(Vec<WeekCount>),
    Heatmap(Heatmap),
    Search(Vec<AppointmentRecord>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub patients: u32,
    /// Raw count, independent of whether the patient exists.
    pub appointments: u32,
    pub history_entries: u32,
    pub orphaned_appointments: u32,
    pub orphaned_history_entries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeCount {
    pub age: u32,
    pub count: u32,
}

/// Generic label/count pair used by frequency views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u32,
}

/// Appointment joined with its patient's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentRecord {
    pub id: i64,
    pub time: AppointmentTime,
    pub doctor: String,
    pub reason: Option<String>,
    pub patient_id: i64,
    pub patient_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub condition: String,
    pub diagnosis_date: NaiveDate,
    pub treatment: Option<String>,
}

/// Appointment detail row: appointment, patient and latest history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingAppointment {
    pub appointment_id: i64,
    pub time: AppointmentTime,
    pub doctor: String,
    pub reason: Option<String>,
    pub patient_id: i64,
    pub patient_name: String,
    pub age: u32,
    pub gender: String,
    pub condition: String,
    pub treatment: Option<String>,
    pub diagnosis_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// Daily appointment counts, or an explicit signal that nothing fell in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum DailyLoad {
    Empty,
    Counts(Vec<DayCount>),
}

impl DailyLoad {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn total(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Counts(days) => days.iter().map(|d| d.count).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekCount {
    /// ISO week label, e.g. `2024-W01`.
    pub week: String,
    /// Monday of that ISO week.
    pub week_start: NaiveDate,
    pub count: u32,
}

/// Two-dimensional count table: `counts[row][column]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub axis: CrossTabAxis,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<u32>>,
}

impl CrossTab {
    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<u32> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<u32> {
        (0..self.columns.len())
            .map(|c| self.counts.iter().map(|row| row[c]).sum())
            .collect()
    }

    /// Count for a (row label, column label) pair; 0 when either is absent.
    pub fn get(&self, row: &str, column: &str) -> u32 {
        let r = self.rows.iter().position(|l| l == row);
        let c = self.columns.iter().position(|l| l == column);
        match (r, c) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }
}

/// Day-of-week × hour-of-day counts. Rows run Monday..Sunday, columns 0..23.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub days: Vec<&'static str>,
    pub hours: Vec<u32>,
    pub counts: Vec<Vec<u32>>,
    /// Appointments stored without a time of day; not placed on the grid.
    pub untimed_excluded: u32,
}

impl Heatmap {
    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }
}
