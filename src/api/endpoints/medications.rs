//! Medication endpoints.
//!
//! - `GET /api/medications`: list, optionally filtered by `search`
//! - `POST /api/medications`: add
//! - `GET /api/medications/:id`: single record
//! - `PATCH /api/medications/:id`: edit fields
//! - `PUT /api/medications/:id/status`: mark taken/skipped/pending
//! - `DELETE /api/medications/:id`: remove

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::medications::MedicationStore;
use crate::models::{MedicationRecord, MedicationStatus, MedicationUpdate, NewMedication};

#[derive(Deserialize)]
pub struct MedListQuery {
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct MedicationsResponse {
    pub medications: Vec<MedicationRecord>,
    pub total: usize,
}

/// `GET /api/medications`: insertion order, or time order when searching.
pub async fn list(
    State(ctx): State<ApiContext>,
    query: Result<Query<MedListQuery>, QueryRejection>,
) -> Result<Json<MedicationsResponse>, ApiError> {
    let Query(query) = query?;
    let conn = ctx.open_db()?;
    let store = MedicationStore::new(&conn);

    let medications = match query.search.as_deref() {
        Some(q) => store.search(q)?,
        None => store.list()?,
    };

    Ok(Json(MedicationsResponse {
        total: medications.len(),
        medications,
    }))
}

/// `POST /api/medications`: create a pending medication.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewMedication>, JsonRejection>,
) -> Result<(StatusCode, Json<MedicationRecord>), ApiError> {
    let Json(new) = payload?;
    let conn = ctx.open_db()?;
    let record = MedicationStore::new(&conn).add(new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/medications/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(medication_id): Path<String>,
) -> Result<Json<MedicationRecord>, ApiError> {
    let id = parse_id(&medication_id)?;
    let conn = ctx.open_db()?;
    let record = MedicationStore::new(&conn)
        .get(&id)?
        .ok_or_else(|| ApiError::NotFound("Medication not found".into()))?;
    Ok(Json(record))
}

/// `PATCH /api/medications/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(medication_id): Path<String>,
    payload: Result<Json<MedicationUpdate>, JsonRejection>,
) -> Result<Json<MedicationRecord>, ApiError> {
    let id = parse_id(&medication_id)?;
    let Json(update) = payload?;
    let conn = ctx.open_db()?;
    let record = MedicationStore::new(&conn).update(&id, update)?;
    Ok(Json(record))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: MedicationStatus,
}

/// `PUT /api/medications/:id/status`
pub async fn set_status(
    State(ctx): State<ApiContext>,
    Path(medication_id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<MedicationRecord>, ApiError> {
    let id = parse_id(&medication_id)?;
    let Json(req) = payload?;
    let conn = ctx.open_db()?;
    let record = MedicationStore::new(&conn).set_status(&id, req.status)?;
    Ok(Json(record))
}

/// `DELETE /api/medications/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(medication_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&medication_id)?;
    let conn = ctx.open_db()?;
    MedicationStore::new(&conn).delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
