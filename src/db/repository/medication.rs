use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

const MEDICATION_COLUMNS: &str =
    "id, name, dosage, scheduled_time, frequency, instructions, status";

pub fn insert_medication(conn: &Connection, med: &MedicationRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, name, dosage, scheduled_time, frequency, instructions, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            med.id.to_string(),
            med.name,
            med.dosage,
            med.time.to_string(),
            med.frequency.as_str(),
            med.instructions,
            med.status.as_str(),
        ],
    )?;
    Ok(())
}

/// All medications in insertion order.
pub fn get_all_medications(conn: &Connection) -> Result<Vec<MedicationRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEDICATION_COLUMNS} FROM medications ORDER BY rowid"
    ))?;

    let rows = stmt.query_map([], medication_row_from_rusqlite)?;

    let mut meds = Vec::new();
    for row in rows {
        meds.push(medication_from_row(row?)?);
    }
    Ok(meds)
}

pub fn get_medication(conn: &Connection, id: &Uuid) -> Result<Option<MedicationRecord>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {MEDICATION_COLUMNS} FROM medications WHERE id = ?1"),
            params![id.to_string()],
            medication_row_from_rusqlite,
        )
        .optional()?;

    row.map(medication_from_row).transpose()
}

/// Overwrite every mutable column of an existing record.
pub fn update_medication(conn: &Connection, med: &MedicationRecord) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE medications SET name = ?2, dosage = ?3, scheduled_time = ?4, frequency = ?5,
         instructions = ?6, status = ?7
         WHERE id = ?1",
        params![
            med.id.to_string(),
            med.name,
            med.dosage,
            med.time.to_string(),
            med.frequency.as_str(),
            med.instructions,
            med.status.as_str(),
        ],
    )?;
    if changed == 0 {
        return Err(not_found(&med.id));
    }
    Ok(())
}

pub fn update_medication_status(
    conn: &Connection,
    id: &Uuid,
    status: MedicationStatus,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE medications SET status = ?2 WHERE id = ?1",
        params![id.to_string(), status.as_str()],
    )?;
    if changed == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub fn delete_medication(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM medications WHERE id = ?1", params![id.to_string()])?;
    if changed == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub fn count_medications(conn: &Connection) -> Result<u32, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM medications", [], |row| row.get(0))?;
    Ok(count)
}

fn not_found(id: &Uuid) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: "medication".into(),
        id: id.to_string(),
    }
}

// Internal row type for MedicationRecord mapping
struct MedicationRow {
    id: String,
    name: String,
    dosage: String,
    scheduled_time: String,
    frequency: String,
    instructions: Option<String>,
    status: String,
}

fn medication_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<MedicationRow, rusqlite::Error> {
    Ok(MedicationRow {
        id: row.get(0)?,
        name: row.get(1)?,
        dosage: row.get(2)?,
        scheduled_time: row.get(3)?,
        frequency: row.get(4)?,
        instructions: row.get(5)?,
        status: row.get(6)?,
    })
}

fn medication_from_row(row: MedicationRow) -> Result<MedicationRecord, DatabaseError> {
    Ok(MedicationRecord {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name: row.name,
        dosage: row.dosage,
        time: TimeOfDay::from_str(&row.scheduled_time)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        frequency: Frequency::from_str(&row.frequency)?,
        instructions: row.instructions,
        status: MedicationStatus::from_str(&row.status)?,
    })
}
