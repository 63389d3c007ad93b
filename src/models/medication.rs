use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Frequency, MedicationStatus};
use super::time_of_day::TimeOfDay;

/// One medication entry with its daily scheduled time and today's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub id: Uuid,
    pub name: String,
    pub dosage: String,
    pub time: TimeOfDay,
    pub frequency: Frequency,
    pub instructions: Option<String>,
    pub status: MedicationStatus,
}

/// Fields accepted when creating a record. Status and id are assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub time: TimeOfDay,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Partial edit. `None` leaves the field untouched; an empty
/// `instructions` string clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicationUpdate {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub time: Option<TimeOfDay>,
    pub frequency: Option<Frequency>,
    pub instructions: Option<String>,
}

impl MedicationUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.dosage.is_none()
            && self.time.is_none()
            && self.frequency.is_none()
            && self.instructions.is_none()
    }
}
