//! Scheduled tick: drives the reminder pass on a fixed cadence.
//!
//! The partitioner stays a pure function; this module owns the clock and
//! the timer. Pattern: spawn a tokio task, return a handle with a
//! shutdown channel, stop on `shutdown()` or drop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core_state::{CoreError, CoreState};
use crate::db;
use crate::medications::MedicationStore;
use crate::reminders::{self, MissedDose};
use crate::schedule;

// ═══════════════════════════════════════════════════════════
// Clock
// ═══════════════════════════════════════════════════════════

/// Wall-clock source. Local time, because medication times are local.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Settable clock for tests and demos.
pub struct FixedClock(Mutex<NaiveDateTime>);

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(Mutex::new(at))
    }

    pub fn set(&self, at: NaiveDateTime) {
        match self.0.lock() {
            Ok(mut now) => *now = at,
            Err(poisoned) => *poisoned.into_inner() = at,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.0.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Ticker
// ═══════════════════════════════════════════════════════════

/// Handle to a running ticker task.
pub struct ScheduleTicker {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ScheduleTicker {
    /// Invoke `on_tick` every `period`, first tick immediately.
    ///
    /// The callback runs on the blocking pool, so it may touch SQLite.
    /// A slow tick delays the next one rather than bursting.
    pub fn start<F>(period: Duration, on_tick: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let on_tick = Arc::new(on_tick);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(period_secs = period.as_secs_f64(), "Schedule ticker started");

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = interval.tick() => {
                        let tick = Arc::clone(&on_tick);
                        if let Err(e) = tokio::task::spawn_blocking(move || tick()).await {
                            tracing::error!("Schedule tick panicked: {e}");
                        }
                    }
                }
            }

            tracing::info!("Schedule ticker stopped");
        });

        Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Signal the task to stop. Returns immediately.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Signal and wait for the task to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ScheduleTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One reminder pass: partition today's list and alert on new misses.
pub fn run_reminder_pass(core: &CoreState) -> Result<Vec<MissedDose>, CoreError> {
    let conn = core.open_db()?;
    let now = core.now();

    let records = MedicationStore::new(&conn).list()?;
    let partition = schedule::partition(&records, &now);
    let settings = db::get_notification_settings(&conn)?;

    let fresh =
        reminders::notify_missed_doses(&conn, &partition, now.date(), &settings, core.alerts())?;

    tracing::debug!(
        upcoming = partition.upcoming.len(),
        past = partition.past.len(),
        missed = partition.missed.len(),
        alerted = fresh.len(),
        "Reminder pass complete"
    );
    Ok(fresh)
}

/// Start the reminder ticker for `core`. Errors are logged, never fatal.
pub fn start_reminder_ticker(core: Arc<CoreState>, period: Duration) -> ScheduleTicker {
    ScheduleTicker::start(period, move || {
        if let Err(e) = run_reminder_pass(&core) {
            tracing::warn!(error = %e, "Reminder pass failed");
        }
    })
}
