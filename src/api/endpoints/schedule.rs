//! Schedule endpoints: today's partition, dashboard summary, alerts.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::medications::{DayStats, MedicationStore};
use crate::models::TimeOfDay;
use crate::reminders::MissedDose;
use crate::schedule::{self, SchedulePartition};

#[derive(Deserialize)]
pub struct ScheduleQuery {
    /// Evaluate at this time of day instead of the clock.
    pub at: Option<String>,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub evaluated_at: TimeOfDay,
    #[serde(flatten)]
    pub partition: SchedulePartition,
}

/// `GET /api/schedule`: upcoming and past doses for today.
pub async fn today(
    State(ctx): State<ApiContext>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let Query(query) = query?;
    let evaluated_at = match query.at.as_deref() {
        Some(raw) => raw
            .parse::<TimeOfDay>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => TimeOfDay::from_clock(&ctx.core.now()),
    };

    let conn = ctx.open_db()?;
    let records = MedicationStore::new(&conn).list()?;
    let partition = schedule::partition(&records, &evaluated_at.to_naive_time());

    Ok(Json(ScheduleResponse {
        evaluated_at,
        partition,
    }))
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub date: String,
    pub stats: DayStats,
    pub next_dose: Option<crate::models::MedicationRecord>,
    #[serde(flatten)]
    pub partition: SchedulePartition,
}

/// `GET /api/dashboard`: counters plus the schedule at the current time.
pub async fn dashboard(
    State(ctx): State<ApiContext>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let now = ctx.core.now();
    let conn = ctx.open_db()?;
    let records = MedicationStore::new(&conn).list()?;

    let stats = DayStats::from_records(&records);
    let partition = schedule::partition(&records, &now);

    Ok(Json(DashboardResponse {
        date: now.format("%A, %B %-d, %Y").to_string(),
        stats,
        next_dose: partition.next_dose().cloned(),
        partition,
    }))
}

#[derive(Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<AlertView>,
}

#[derive(Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub dose: MissedDose,
    pub message: String,
}

/// `GET /api/alerts`: recent missed-dose alerts, newest first.
pub async fn alerts(State(ctx): State<ApiContext>) -> Json<AlertsResponse> {
    let alerts = ctx
        .core
        .alerts()
        .recent()
        .into_iter()
        .map(|dose| AlertView {
            message: dose.message(),
            dose,
        })
        .collect();
    Json(AlertsResponse { alerts })
}
