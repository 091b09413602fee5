use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Accepted storage layouts for timestamped appointments, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// When an appointment takes place. Granularity is explicit: a date-only
/// appointment has no hour, it is not midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "granularity", content = "value")]
pub enum AppointmentTime {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl AppointmentTime {
    /// Parse a stored `appointment_date` value. Returns `None` for anything
    /// that is neither a calendar date nor a date with time of day.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            return Some(Self::Date(date));
        }
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(Self::DateTime)
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(d) => *d,
            Self::DateTime(dt) => dt.date(),
        }
    }

    /// Hour of day, only when the source carried a time component.
    pub fn hour(&self) -> Option<u32> {
        match self {
            Self::Date(_) => None,
            Self::DateTime(dt) => Some(dt.hour()),
        }
    }

    pub fn has_time(&self) -> bool {
        matches!(self, Self::DateTime(_))
    }

    /// Chronological ordering key; date-only sorts before any timed slot that day.
    pub fn sort_key(&self) -> (NaiveDate, Option<NaiveTime>) {
        match self {
            Self::Date(d) => (*d, None),
            Self::DateTime(dt) => (dt.date(), Some(dt.time())),
        }
    }

    pub fn to_storage_string(&self) -> String {
        match self {
            Self::Date(d) => d.format(DATE_FORMAT).to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl std::fmt::Display for AppointmentTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_storage_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub time: AppointmentTime,
    pub doctor: String,
    pub reason: Option<String>,
}

impl Appointment {
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub time: AppointmentTime,
    pub doctor: String,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_only() {
        let t = AppointmentTime::parse("2024-01-05").unwrap();
        assert_eq!(t, AppointmentTime::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()));
        assert_eq!(t.hour(), None);
        assert!(!t.has_time());
    }

    #[test]
    fn parse_timestamp_variants() {
        for raw in [
            "2024-01-05 14:30:00",
            "2024-01-05T14:30:00",
            "2024-01-05 14:30",
            "2024-01-05 14:30:00.000000",
        ] {
            let t = AppointmentTime::parse(raw).unwrap_or_else(|| panic!("failed on {raw}"));
            assert_eq!(t.hour(), Some(14), "{raw}");
            assert_eq!(t.date(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        }
    }

    #[test]
    fn midnight_timestamp_keeps_hour_zero() {
        let t = AppointmentTime::parse("2024-01-05 00:00:00").unwrap();
        assert_eq!(t.hour(), Some(0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(AppointmentTime::parse("").is_none());
        assert!(AppointmentTime::parse("next tuesday").is_none());
        assert!(AppointmentTime::parse("2024-13-40").is_none());
    }

    #[test]
    fn date_only_sorts_before_timed_same_day() {
        let d = AppointmentTime::parse("2024-01-05").unwrap();
        let t = AppointmentTime::parse("2024-01-05 00:00").unwrap();
        assert!(d.sort_key() < t.sort_key());
    }

    #[test]
    fn storage_string_round_trip() {
        for raw in ["2024-01-05", "2024-01-05 09:15:00"] {
            let t = AppointmentTime::parse(raw).unwrap();
            assert_eq!(t.to_storage_string(), raw);
        }
    }
}
