use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{EmergencyContact, UserProfile};

/// Get the user profile (singleton row, id=1).
pub fn get_user_profile(conn: &Connection) -> Result<UserProfile, DatabaseError> {
    conn.query_row(
        "SELECT name, age, phone, emergency_name, emergency_phone, emergency_relation
         FROM user_profile WHERE id = 1",
        [],
        |row| {
            let emergency_name: Option<String> = row.get(3)?;
            let emergency_contact = match emergency_name {
                Some(name) => Some(EmergencyContact {
                    name,
                    phone: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    relation: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                }),
                None => None,
            };
            Ok(UserProfile {
                name: row.get(0)?,
                age: row.get(1)?,
                phone: row.get(2)?,
                emergency_contact,
            })
        },
    )
    .map_err(DatabaseError::from)
}

/// Replace the stored profile. A `None` emergency contact clears it.
pub fn save_user_profile(conn: &Connection, profile: &UserProfile) -> Result<(), DatabaseError> {
    let contact = profile.emergency_contact.as_ref();
    conn.execute(
        "UPDATE user_profile SET
         name = ?1,
         age = ?2,
         phone = ?3,
         emergency_name = ?4,
         emergency_phone = ?5,
         emergency_relation = ?6,
         updated_at = datetime('now')
         WHERE id = 1",
        params![
            profile.name,
            profile.age,
            profile.phone,
            contact.map(|c| c.name.as_str()),
            contact.map(|c| c.phone.as_str()),
            contact.map(|c| c.relation.as_str()),
        ],
    )?;
    Ok(())
}
