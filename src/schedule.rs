//! Today's schedule: split medications into upcoming and past doses.
//!
//! Pure function of the record list and a clock reading. Only hour and
//! minute of `now` matter; records carry no date, so everything is
//! relative to the current day.

use std::collections::BTreeSet;

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{MedicationRecord, MedicationStatus, TimeOfDay};

/// Result of partitioning a medication list against a clock reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePartition {
    /// Scheduled strictly later today, earliest first.
    pub upcoming: Vec<MedicationRecord>,
    /// Scheduled at or before now, most recently due first.
    pub past: Vec<MedicationRecord>,
    /// Ids of `past` records still pending.
    pub missed: BTreeSet<Uuid>,
}

impl SchedulePartition {
    /// The earliest upcoming dose, if any.
    pub fn next_dose(&self) -> Option<&MedicationRecord> {
        self.upcoming.first()
    }

    /// Missed records in `past` order.
    pub fn missed_records(&self) -> impl Iterator<Item = &MedicationRecord> {
        self.past.iter().filter(|m| self.missed.contains(&m.id))
    }
}

/// Partition `records` into upcoming and past doses relative to `now`.
///
/// A dose due exactly at the current minute counts as past. Both sorts are
/// stable, so records sharing a time keep their input order.
pub fn partition<T: Timelike>(records: &[MedicationRecord], now: &T) -> SchedulePartition {
    let now_minutes = TimeOfDay::from_clock(now).minutes();

    let (mut upcoming, mut past): (Vec<_>, Vec<_>) = records
        .iter()
        .cloned()
        .partition(|med| med.time.minutes() > now_minutes);

    upcoming.sort_by_key(|med| med.time.minutes());
    past.sort_by(|a, b| b.time.minutes().cmp(&a.time.minutes()));

    let missed = past
        .iter()
        .filter(|med| med.status == MedicationStatus::Pending)
        .map(|med| med.id)
        .collect();

    SchedulePartition {
        upcoming,
        past,
        missed,
    }
}
