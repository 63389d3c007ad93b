//! Persisted marks for doses that already raised a missed-dose alert.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::TimeOfDay;

/// Record that a dose was notified. Returns `true` if the mark is new,
/// `false` if this dose had already been marked.
pub fn mark_dose_notified(
    conn: &Connection,
    medication_id: &Uuid,
    day: NaiveDate,
    time: TimeOfDay,
) -> Result<bool, DatabaseError> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO missed_dose_notifications (medication_id, dose_date, scheduled_time)
         VALUES (?1, ?2, ?3)",
        params![medication_id.to_string(), day.to_string(), time.to_string()],
    )?;
    Ok(inserted > 0)
}

/// Drop marks from days before `today`. Returns the number removed.
pub fn prune_notified_before(conn: &Connection, today: NaiveDate) -> Result<usize, DatabaseError> {
    let removed = conn.execute(
        "DELETE FROM missed_dose_notifications WHERE dose_date < ?1",
        params![today.to_string()],
    )?;
    Ok(removed)
}
