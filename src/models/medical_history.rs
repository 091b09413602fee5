use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalHistoryEntry {
    pub id: i64,
    pub patient_id: i64,
    pub condition: String,
    pub diagnosis_date: NaiveDate,
    pub treatment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHistoryEntry {
    pub patient_id: i64,
    pub condition: String,
    pub diagnosis_date: NaiveDate,
    pub treatment: Option<String>,
}
