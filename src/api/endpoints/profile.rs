//! Profile and notification settings endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{NotificationSettings, UserProfile};

/// `GET /api/profile`
pub async fn get_profile(State(ctx): State<ApiContext>) -> Result<Json<UserProfile>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(db::get_user_profile(&conn)?))
}

/// `PUT /api/profile`: replace the profile, including the emergency contact.
pub async fn put_profile(
    State(ctx): State<ApiContext>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(profile) = payload?;
    if let Some(contact) = &profile.emergency_contact {
        if contact.name.trim().is_empty() || contact.phone.trim().is_empty() {
            return Err(ApiError::Validation(
                "Emergency contact needs a name and a phone number".into(),
            ));
        }
    }

    let conn = ctx.open_db()?;
    db::save_user_profile(&conn, &profile)?;
    tracing::info!(has_emergency_contact = profile.emergency_contact.is_some(), "Profile updated");
    Ok(Json(profile))
}

/// `GET /api/settings/notifications`
pub async fn get_notifications(
    State(ctx): State<ApiContext>,
) -> Result<Json<NotificationSettings>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(db::get_notification_settings(&conn)?))
}

/// `PUT /api/settings/notifications`
pub async fn put_notifications(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NotificationSettings>, JsonRejection>,
) -> Result<Json<NotificationSettings>, ApiError> {
    let Json(settings) = payload?;
    let conn = ctx.open_db()?;
    db::set_notification_settings(&conn, &settings)?;
    Ok(Json(settings))
}
