use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::NotificationSettings;

/// Get the notification settings (singleton row, id=1).
pub fn get_notification_settings(conn: &Connection) -> Result<NotificationSettings, DatabaseError> {
    conn.query_row(
        "SELECT push, email, sms, advance_reminders, repeat_reminders
         FROM notification_settings WHERE id = 1",
        [],
        |row| {
            Ok(NotificationSettings {
                push: row.get::<_, i32>(0)? != 0,
                email: row.get::<_, i32>(1)? != 0,
                sms: row.get::<_, i32>(2)? != 0,
                advance_reminders: row.get::<_, i32>(3)? != 0,
                repeat_reminders: row.get::<_, i32>(4)? != 0,
            })
        },
    )
    .map_err(DatabaseError::from)
}

pub fn set_notification_settings(
    conn: &Connection,
    settings: &NotificationSettings,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE notification_settings SET
         push = ?1,
         email = ?2,
         sms = ?3,
         advance_reminders = ?4,
         repeat_reminders = ?5
         WHERE id = 1",
        params![
            settings.push as i32,
            settings.email as i32,
            settings.sms as i32,
            settings.advance_reminders as i32,
            settings.repeat_reminders as i32,
        ],
    )?;
    Ok(())
}
