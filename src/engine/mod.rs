//! Clinical query engine: read-only views over a loaded [`Snapshot`].
//!
//! Every view is a pure function of the snapshot and its arguments. Views
//! that need patient data join through [`join::PatientIndex`] with
//! [`join::JoinPolicy::ExcludeUnmatched`]; views that only look at
//! appointments (doctor ranking, weekly trend, heatmap, summary totals)
//! count every row. Empty inputs give empty outputs, never errors.

mod conditions;
mod demographics;
pub mod join;
mod records;
mod schedule;
mod types;

pub use conditions::*;
pub use demographics::*;
pub use records::*;
pub use schedule::*;
pub use types::*;

use crate::models::Snapshot;

/// Compute the view named by `request`.
pub fn evaluate(snapshot: &Snapshot, request: &ViewRequest) -> ViewResult {
    tracing::debug!(view = %request.name(), "Evaluating view");
    match request {
        ViewRequest::Summary => ViewResult::Summary(summary(snapshot)),
        ViewRequest::Patients => ViewResult::Patients(patient_records(snapshot)),
        ViewRequest::Appointments => ViewResult::Appointments(appointment_records(snapshot)),
        ViewRequest::History => ViewResult::History(history_records(snapshot)),
        ViewRequest::AgeHistogram => ViewResult::AgeHistogram(age_histogram(snapshot)),
        ViewRequest::Upcoming { as_of, window_days } => {
            ViewResult::Upcoming(upcoming_appointments(snapshot, *as_of, *window_days))
        }
        ViewRequest::DailyLoad { as_of, window_days } => {
            ViewResult::DailyLoad(appointment_load_by_day(snapshot, *window_days, *as_of))
        }
        ViewRequest::Conditions => ViewResult::Conditions(condition_frequency(snapshot)),
        ViewRequest::CrossTab { axis } => {
            ViewResult::CrossTab(demographic_crosstab(snapshot, *axis))
        }
        ViewRequest::TopDoctors => ViewResult::TopDoctors(top_doctors(snapshot)),
        ViewRequest::WeeklyTrend => ViewResult::WeeklyTrend(weekly_trend(snapshot)),
        ViewRequest::Heatmap => ViewResult::Heatmap(appointment_heatmap(snapshot)),
        ViewRequest::Search { term } => ViewResult::Search(search_appointments(snapshot, term)),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
