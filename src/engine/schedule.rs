//! Appointment-centred views: upcoming list, daily load, doctor ranking,
//! weekly trend and the day/hour heatmap.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::models::Snapshot;

use super::join::{latest_history_by_patient, PatientIndex};
use super::types::{DailyLoad, DayCount, Heatmap, LabelCount, UpcomingAppointment, WeekCount};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const HOURS_PER_DAY: usize = 24;

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// `date + days`, saturating at the calendar maximum.
fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// `date - days`, saturating at the calendar minimum.
fn sub_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Appointments dated within `[as_of, as_of + window_days]`, each with its
/// patient and that patient's most recent history entry.
///
/// An appointment is left out when its patient does not exist or when the
/// patient has no history at all.
pub fn upcoming_appointments(
    snapshot: &Snapshot,
    as_of: NaiveDate,
    window_days: u32,
) -> Vec<UpcomingAppointment> {
    let until = add_days(as_of, window_days);
    let index = PatientIndex::new(&snapshot.patients);
    let latest = latest_history_by_patient(&snapshot.history);

    let mut joined = index.join_appointments(&snapshot.appointments).rows;
    joined.retain(|(appt, _)| (as_of..=until).contains(&appt.date()));
    joined.sort_by_key(|(appt, _)| (appt.time.sort_key(), appt.id));

    joined
        .into_iter()
        .filter_map(|(appt, patient)| {
            let entry = latest.get(&patient.id)?;
            Some(UpcomingAppointment {
                appointment_id: appt.id,
                time: appt.time,
                doctor: appt.doctor.clone(),
                reason: appt.reason.clone(),
                patient_id: patient.id,
                patient_name: patient.name.clone(),
                age: patient.age,
                gender: patient.gender.clone(),
                condition: entry.condition.clone(),
                treatment: entry.treatment.clone(),
                diagnosis_date: entry.diagnosis_date,
            })
        })
        .collect()
}

/// Appointments per day over `[as_of - window_days, as_of]`, for patients
/// that exist. Returns [`DailyLoad::Empty`] when nothing falls in range.
pub fn appointment_load_by_day(
    snapshot: &Snapshot,
    window_days: u32,
    as_of: NaiveDate,
) -> DailyLoad {
    let from = sub_days(as_of, window_days);
    let index = PatientIndex::new(&snapshot.patients);

    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for (appt, _) in index.join_appointments(&snapshot.appointments).rows {
        let date = appt.date();
        if (from..=as_of).contains(&date) {
            *per_day.entry(date).or_default() += 1;
        }
    }

    if per_day.is_empty() {
        return DailyLoad::Empty;
    }
    DailyLoad::Counts(
        per_day
            .into_iter()
            .map(|(date, count)| DayCount { date, count })
            .collect(),
    )
}

/// Appointment count per doctor across every appointment, highest first;
/// equal counts are ordered by doctor name.
pub fn top_doctors(snapshot: &Snapshot) -> Vec<LabelCount> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for appt in &snapshot.appointments {
        *counts.entry(appt.doctor.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<LabelCount> = counts
        .into_iter()
        .map(|(doctor, count)| LabelCount {
            label: doctor.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked
}

/// Appointment count per ISO week, oldest week first.
pub fn weekly_trend(snapshot: &Snapshot) -> Vec<WeekCount> {
    let mut per_week: BTreeMap<(i32, u32), (NaiveDate, u32)> = BTreeMap::new();
    for appt in &snapshot.appointments {
        let date = appt.date();
        let iso = date.iso_week();
        let monday = sub_days(date, date.weekday().num_days_from_monday());
        per_week
            .entry((iso.year(), iso.week()))
            .or_insert((monday, 0))
            .1 += 1;
    }

    per_week
        .into_iter()
        .map(|((year, week), (week_start, count))| WeekCount {
            week: format!("{year:04}-W{week:02}"),
            week_start,
            count,
        })
        .collect()
}

/// Day-of-week × hour-of-day counts. Appointments without a stored time of
/// day are not placed in any hour; they are counted in `untimed_excluded`.
pub fn appointment_heatmap(snapshot: &Snapshot) -> Heatmap {
    let mut counts = vec![vec![0u32; HOURS_PER_DAY]; WEEKDAYS.len()];
    let mut untimed_excluded = 0;

    for appt in &snapshot.appointments {
        match appt.time.hour() {
            Some(hour) => {
                let day = appt.date().weekday().num_days_from_monday() as usize;
                counts[day][hour as usize] += 1;
            }
            None => untimed_excluded += 1,
        }
    }

    if untimed_excluded > 0 {
        tracing::debug!(untimed_excluded, "Heatmap skipped appointments without time of day");
    }

    Heatmap {
        days: WEEKDAYS.iter().map(|d| weekday_label(*d)).collect(),
        hours: (0..HOURS_PER_DAY as u32).collect(),
        counts,
        untimed_excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_days_saturates() {
        assert_eq!(add_days(NaiveDate::MAX, 5), NaiveDate::MAX);
        assert_eq!(sub_days(NaiveDate::MIN, 5), NaiveDate::MIN);
        let d = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(add_days(d, 1), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn weekday_labels_start_monday() {
        let labels: Vec<_> = WEEKDAYS.iter().map(|d| weekday_label(*d)).collect();
        assert_eq!(labels.first(), Some(&"Monday"));
        assert_eq!(labels.last(), Some(&"Sunday"));
    }
}
