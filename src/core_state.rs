//! Shared application state for the API and the reminder ticker.
//!
//! Holds the database location, the clock and the alert feed. Each unit
//! of work opens its own SQLite connection via `open_db()`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::db::{self, DatabaseError};
use crate::medications::MedicationError;
use crate::reminders::AlertFeed;
use crate::ticker::{Clock, SystemClock};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Medication(#[from] MedicationError),
}

pub struct CoreState {
    db_path: PathBuf,
    clock: Arc<dyn Clock>,
    alerts: AlertFeed,
}

impl CoreState {
    pub fn new(db_path: PathBuf) -> Self {
        Self::with_clock(db_path, Arc::new(SystemClock))
    }

    pub fn with_clock(db_path: PathBuf, clock: Arc<dyn Clock>) -> Self {
        Self {
            db_path,
            clock,
            alerts: AlertFeed::new(),
        }
    }

    /// Open a database connection (runs pending migrations).
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        Ok(db::open_database(&self.db_path)?)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn alerts(&self) -> &AlertFeed {
        &self.alerts
    }
}
