use serde::{Deserialize, Serialize};

use super::{Appointment, MedicalHistoryEntry, Patient};

/// Immutable in-memory copy of the three clinic tables.
///
/// Rows are already validated by the store. Foreign keys are not: an
/// appointment or history entry may name a patient that does not exist,
/// and joined views drop such rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub history: Vec<MedicalHistoryEntry>,
}

impl Snapshot {
    pub fn new(
        patients: Vec<Patient>,
        appointments: Vec<Appointment>,
        history: Vec<MedicalHistoryEntry>,
    ) -> Self {
        Self {
            patients,
            appointments,
            history,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty() && self.appointments.is_empty() && self.history.is_empty()
    }
}
