//! Medication list: the store object handed to every consumer, plus
//! the dashboard's daily counters.
//!
//! `MedicationStore` borrows a connection for the duration of one unit of
//! work. Reads go through `list`/`get`/`search`; every mutation goes
//! through a commit accessor that validates before touching the database.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::*;

#[derive(Debug, thiserror::Error)]
pub enum MedicationError {
    #[error("Invalid medication: {0}")]
    Validation(String),
    #[error("Medication not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Database(DatabaseError),
}

impl From<TimeOfDayError> for MedicationError {
    fn from(err: TimeOfDayError) -> Self {
        MedicationError::Validation(err.to_string())
    }
}

impl From<DatabaseError> for MedicationError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { id, .. } => match Uuid::parse_str(&id) {
                Ok(uuid) => MedicationError::NotFound(uuid),
                Err(_) => MedicationError::Database(DatabaseError::NotFound {
                    entity_type: "medication".into(),
                    id,
                }),
            },
            other => MedicationError::Database(other),
        }
    }
}

/// Today's adherence counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub total: u32,
    pub taken: u32,
    pub skipped: u32,
    pub pending: u32,
    /// Percentage of all medications taken, rounded to the nearest integer.
    pub compliance_rate: u32,
}

impl DayStats {
    pub fn from_records(records: &[MedicationRecord]) -> Self {
        let mut stats = DayStats {
            total: records.len() as u32,
            ..Default::default()
        };
        for med in records {
            match med.status {
                MedicationStatus::Taken => stats.taken += 1,
                MedicationStatus::Skipped => stats.skipped += 1,
                MedicationStatus::Pending => stats.pending += 1,
            }
        }
        if stats.total > 0 {
            stats.compliance_rate =
                (f64::from(stats.taken) / f64::from(stats.total) * 100.0).round() as u32;
        }
        stats
    }
}

/// Store handle over the medication table.
pub struct MedicationStore<'a> {
    conn: &'a Connection,
}

impl<'a> MedicationStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // ── Reads ───────────────────────────────────────────

    pub fn list(&self) -> Result<Vec<MedicationRecord>, MedicationError> {
        Ok(db::get_all_medications(self.conn)?)
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<MedicationRecord>, MedicationError> {
        Ok(db::get_medication(self.conn, id)?)
    }

    /// Case-insensitive match on name, dosage or frequency label, sorted by
    /// time of day. A blank query returns every record.
    pub fn search(&self, query: &str) -> Result<Vec<MedicationRecord>, MedicationError> {
        let needle = query.trim().to_lowercase();
        let mut results: Vec<MedicationRecord> = self
            .list()?
            .into_iter()
            .filter(|med| {
                needle.is_empty()
                    || med.name.to_lowercase().contains(&needle)
                    || med.dosage.to_lowercase().contains(&needle)
                    || med.frequency.as_str().to_lowercase().contains(&needle)
            })
            .collect();
        results.sort_by_key(|med| med.time);
        Ok(results)
    }

    pub fn day_stats(&self) -> Result<DayStats, MedicationError> {
        Ok(DayStats::from_records(&self.list()?))
    }

    // ── Commits ─────────────────────────────────────────

    pub fn add(&self, new: NewMedication) -> Result<MedicationRecord, MedicationError> {
        let record = MedicationRecord {
            id: Uuid::new_v4(),
            name: required("name", &new.name)?,
            dosage: required("dosage", &new.dosage)?,
            time: new.time,
            frequency: new.frequency,
            instructions: normalize_optional(new.instructions),
            status: MedicationStatus::Pending,
        };
        db::insert_medication(self.conn, &record)?;
        tracing::info!(id = %record.id, time = %record.time, "Medication added");
        Ok(record)
    }

    pub fn update(
        &self,
        id: &Uuid,
        update: MedicationUpdate,
    ) -> Result<MedicationRecord, MedicationError> {
        let mut record = self.get(id)?.ok_or(MedicationError::NotFound(*id))?;
        if update.is_empty() {
            return Ok(record);
        }

        if let Some(name) = update.name {
            record.name = required("name", &name)?;
        }
        if let Some(dosage) = update.dosage {
            record.dosage = required("dosage", &dosage)?;
        }
        if let Some(time) = update.time {
            record.time = time;
        }
        if let Some(frequency) = update.frequency {
            record.frequency = frequency;
        }
        if update.instructions.is_some() {
            record.instructions = normalize_optional(update.instructions);
        }

        db::update_medication(self.conn, &record)?;
        tracing::info!(id = %record.id, "Medication updated");
        Ok(record)
    }

    /// Overwrite the status in place. No history is kept.
    pub fn set_status(
        &self,
        id: &Uuid,
        status: MedicationStatus,
    ) -> Result<MedicationRecord, MedicationError> {
        db::update_medication_status(self.conn, id, status)?;
        tracing::info!(id = %id, status = status.as_str(), "Medication status changed");
        self.get(id)?.ok_or(MedicationError::NotFound(*id))
    }

    pub fn delete(&self, id: &Uuid) -> Result<(), MedicationError> {
        db::delete_medication(self.conn, id)?;
        tracing::info!(id = %id, "Medication deleted");
        Ok(())
    }

    /// Insert the starter list on first launch. Returns how many were added.
    pub fn seed_demo_if_empty(&self) -> Result<usize, MedicationError> {
        if db::count_medications(self.conn)? > 0 {
            return Ok(0);
        }
        let demo = demo_medications()?;
        let count = demo.len();
        for new in demo {
            self.add(new)?;
        }
        tracing::info!(count, "Seeded demo medications");
        Ok(count)
    }
}

fn required(field: &str, value: &str) -> Result<String, MedicationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MedicationError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn demo_medications() -> Result<Vec<NewMedication>, TimeOfDayError> {
    let entry = |name: &str,
                 dosage: &str,
                 time: &str,
                 frequency: Frequency,
                 instructions: Option<&str>|
     -> Result<NewMedication, TimeOfDayError> {
        Ok(NewMedication {
            name: name.into(),
            dosage: dosage.into(),
            time: time.parse()?,
            frequency,
            instructions: instructions.map(String::from),
        })
    };
    vec![
        entry("Amoxicillin", "500mg", "08:00", Frequency::ThreeTimesDaily, Some("Take with food")),
        entry("Ibuprofen", "400mg", "12:00", Frequency::TwiceDaily, Some("Take after meal")),
        entry("Lisinopril", "10mg", "20:00", Frequency::OnceDaily, None),
    ]
    .into_iter()
    .collect()
}
