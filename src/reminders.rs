//! Missed-dose alerts.
//!
//! The partitioner recomputes `missed` on every tick; this module makes
//! sure each dose alerts once. A dose is keyed by (medication, day,
//! scheduled time) and the key is persisted, so restarts and repeated
//! ticks stay quiet while an edited time counts as a new dose.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::{MedicationRecord, NotificationSettings, TimeOfDay};
use crate::schedule::SchedulePartition;

/// Maximum alerts kept in memory for the API.
const ALERT_FEED_CAPACITY: usize = 50;

/// One dose that passed its time while still pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedDose {
    pub medication_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub scheduled_time: TimeOfDay,
    pub day: NaiveDate,
}

impl MissedDose {
    fn from_record(med: &MedicationRecord, day: NaiveDate) -> Self {
        Self {
            medication_id: med.id,
            name: med.name.clone(),
            dosage: med.dosage.clone(),
            scheduled_time: med.time,
            day,
        }
    }

    pub fn message(&self) -> String {
        format!("You missed taking {} at {}", self.name, self.scheduled_time)
    }
}

/// Destination for missed-dose alerts.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, dose: &MissedDose);
}

/// Bounded newest-first buffer of recent alerts. Every alert is also
/// logged at WARN.
pub struct AlertFeed {
    alerts: Mutex<VecDeque<MissedDose>>,
    capacity: usize,
}

impl AlertFeed {
    pub fn new() -> Self {
        Self::with_capacity(ALERT_FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            alerts: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Snapshot, newest first.
    pub fn recent(&self) -> Vec<MissedDose> {
        match self.alerts.lock() {
            Ok(alerts) => alerts.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for AlertFeed {
    fn notify(&self, dose: &MissedDose) {
        tracing::warn!(
            medication_id = %dose.medication_id,
            time = %dose.scheduled_time,
            day = %dose.day,
            "Missed medication: {}",
            dose.message()
        );
        let mut alerts = match self.alerts.lock() {
            Ok(alerts) => alerts,
            Err(poisoned) => poisoned.into_inner(),
        };
        alerts.push_front(dose.clone());
        alerts.truncate(self.capacity);
    }
}

/// Raise an alert for every missed dose in `partition` that has not
/// alerted before on `today`. Returns the doses that were newly marked.
///
/// With push notifications off, doses are still marked so that turning
/// push back on does not replay the whole day.
pub fn notify_missed_doses(
    conn: &Connection,
    partition: &SchedulePartition,
    today: NaiveDate,
    settings: &NotificationSettings,
    sink: &dyn NotificationSink,
) -> Result<Vec<MissedDose>, DatabaseError> {
    let pruned = db::prune_notified_before(conn, today)?;
    if pruned > 0 {
        tracing::debug!(pruned, "Pruned stale missed-dose marks");
    }

    let mut fresh = Vec::new();
    for med in partition.missed_records() {
        if !db::mark_dose_notified(conn, &med.id, today, med.time)? {
            continue;
        }
        let dose = MissedDose::from_record(med, today);
        if settings.push {
            sink.notify(&dose);
        }
        fresh.push(dose);
    }
    Ok(fresh)
}
