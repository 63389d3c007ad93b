//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/medications",
            get(endpoints::medications::list).post(endpoints::medications::create),
        )
        .route(
            "/medications/:id",
            get(endpoints::medications::detail)
                .patch(endpoints::medications::update)
                .delete(endpoints::medications::delete),
        )
        .route(
            "/medications/:id/status",
            put(endpoints::medications::set_status),
        )
        .route("/schedule", get(endpoints::schedule::today))
        .route("/dashboard", get(endpoints::schedule::dashboard))
        .route("/alerts", get(endpoints::schedule::alerts))
        .route(
            "/profile",
            get(endpoints::profile::get_profile).put(endpoints::profile::put_profile),
        )
        .route(
            "/settings/notifications",
            get(endpoints::profile::get_notifications)
                .put(endpoints::profile::put_notifications),
        )
        .with_state(ctx);

    // The dashboard client is served from a different local origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    Router::new().nest("/api", api).layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::ticker::FixedClock;

    fn datetime(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    /// Core backed by a temp database with a fixed clock at `h:m`.
    /// The tempdir guard must be kept alive for the duration of the test.
    fn test_core(h: u32, m: u32) -> (Arc<CoreState>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let core = CoreState::with_clock(
            tmp.path().join("api.db"),
            Arc::new(FixedClock::new(datetime(h, m))),
        );
        (Arc::new(core), tmp)
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(core: &Arc<CoreState>, req: Request<Body>) -> (StatusCode, Value) {
        let response = api_router(core.clone()).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(core: &Arc<CoreState>, name: &str, time: &str) -> Value {
        let (status, json) = send(
            core,
            request(
                "POST",
                "/api/medications",
                Some(json!({ "name": name, "dosage": "10mg", "time": time })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        json
    }

    #[tokio::test]
    async fn health_ok() {
        let (core, _tmp) = test_core(9, 0);
        let (status, json) = send(&core, request("GET", "/api/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["app"], "Dosewise");
    }

    #[tokio::test]
    async fn create_defaults_and_detail() {
        let (core, _tmp) = test_core(9, 0);
        let created = create(&core, "Aspirin", "08:30").await;
        assert_eq!(created["status"], "pending");
        assert_eq!(created["frequency"], "Once daily");
        assert_eq!(created["time"], "08:30");

        let id = created["id"].as_str().unwrap();
        let (status, json) =
            send(&core, request("GET", &format!("/api/medications/{id}"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Aspirin");
    }

    #[tokio::test]
    async fn create_rejects_malformed_time() {
        let (core, _tmp) = test_core(9, 0);
        let (status, json) = send(
            &core,
            request(
                "POST",
                "/api/medications",
                Some(json!({ "name": "Aspirin", "dosage": "10mg", "time": "25:00" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let (core, _tmp) = test_core(9, 0);
        let (status, json) = send(
            &core,
            request(
                "POST",
                "/api/medications",
                Some(json!({ "name": " ", "dosage": "10mg", "time": "08:00" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn invalid_id_is_bad_request_and_unknown_is_404() {
        let (core, _tmp) = test_core(9, 0);
        let (status, _) = send(&core, request("GET", "/api/medications/not-a-uuid", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = uuid::Uuid::new_v4();
        let (status, _) =
            send(&core, request("GET", &format!("/api/medications/{missing}"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send(&core, request("DELETE", &format!("/api/medications/{missing}"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_update_patch_and_delete() {
        let (core, _tmp) = test_core(9, 0);
        let created = create(&core, "Aspirin", "08:30").await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, json) = send(
            &core,
            request(
                "PUT",
                &format!("/api/medications/{id}/status"),
                Some(json!({ "status": "taken" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "taken");

        let (status, json) = send(
            &core,
            request(
                "PATCH",
                &format!("/api/medications/{id}"),
                Some(json!({ "dosage": "20mg", "frequency": "Twice daily" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["dosage"], "20mg");
        assert_eq!(json["frequency"], "Twice daily");
        assert_eq!(json["status"], "taken");

        let (status, _) =
            send(&core, request("DELETE", &format!("/api/medications/{id}"), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, json) = send(&core, request("GET", "/api/medications", None)).await;
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn patch_rejects_blank_fields_and_keeps_record() {
        let (core, _tmp) = test_core(9, 0);
        let created = create(&core, "Aspirin", "08:30").await;
        let id = created["id"].as_str().unwrap();

        for body in [json!({ "name": "  " }), json!({ "dosage": "", "time": "10:00" })] {
            let (status, json) = send(
                &core,
                request("PATCH", &format!("/api/medications/{id}"), Some(body)),
            )
            .await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        }

        let (status, json) = send(&core, request("GET", &format!("/api/medications/{id}"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, created);
    }

    #[tokio::test]
    async fn unknown_status_is_rejected() {
        let (core, _tmp) = test_core(9, 0);
        let created = create(&core, "Aspirin", "08:30").await;
        let id = created["id"].as_str().unwrap();
        let (status, _) = send(
            &core,
            request(
                "PUT",
                &format!("/api/medications/{id}/status"),
                Some(json!({ "status": "forgotten" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_sorts_by_time() {
        let (core, _tmp) = test_core(9, 0);
        create(&core, "Evening Pill", "20:00").await;
        create(&core, "Morning Pill", "07:00").await;
        create(&core, "Vitamin", "12:00").await;

        let (status, json) =
            send(&core, request("GET", "/api/medications?search=pill", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 2);
        assert_eq!(json["medications"][0]["name"], "Morning Pill");
        assert_eq!(json["medications"][1]["name"], "Evening Pill");
    }

    #[tokio::test]
    async fn schedule_uses_clock_and_override() {
        let (core, _tmp) = test_core(14, 0);
        let a = create(&core, "Amoxicillin", "08:00").await;
        let b = create(&core, "Ibuprofen", "12:00").await;
        create(&core, "Lisinopril", "20:00").await;

        let (status, json) = send(&core, request("GET", "/api/schedule", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["evaluated_at"], "14:00");
        assert_eq!(json["upcoming"].as_array().unwrap().len(), 1);
        assert_eq!(json["upcoming"][0]["name"], "Lisinopril");
        assert_eq!(json["past"][0]["name"], "Ibuprofen");
        assert_eq!(json["past"][1]["name"], "Amoxicillin");
        let missed = json["missed"].as_array().unwrap();
        assert_eq!(missed.len(), 2);
        assert!(missed.contains(&a["id"]));
        assert!(missed.contains(&b["id"]));

        let (_, json) = send(&core, request("GET", "/api/schedule?at=07:00", None)).await;
        assert_eq!(json["upcoming"].as_array().unwrap().len(), 3);
        assert!(json["past"].as_array().unwrap().is_empty());
        assert!(json["missed"].as_array().unwrap().is_empty());

        let (status, _) = send(&core, request("GET", "/api/schedule?at=7am", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_summary() {
        let (core, _tmp) = test_core(14, 0);
        let a = create(&core, "Amoxicillin", "08:00").await;
        create(&core, "Lisinopril", "20:00").await;
        let id = a["id"].as_str().unwrap();
        send(
            &core,
            request(
                "PUT",
                &format!("/api/medications/{id}/status"),
                Some(json!({ "status": "taken" })),
            ),
        )
        .await;

        let (status, json) = send(&core, request("GET", "/api/dashboard", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["date"], "Monday, October 19, 2026");
        assert_eq!(json["stats"]["total"], 2);
        assert_eq!(json["stats"]["taken"], 1);
        assert_eq!(json["stats"]["compliance_rate"], 50);
        assert_eq!(json["next_dose"]["name"], "Lisinopril");
        assert!(json["missed"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn alerts_reflect_reminder_pass() {
        let (core, _tmp) = test_core(9, 0);
        create(&core, "Amoxicillin", "08:00").await;
        crate::ticker::run_reminder_pass(&core).unwrap();

        let (status, json) = send(&core, request("GET", "/api/alerts", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["alerts"][0]["name"], "Amoxicillin");
        assert_eq!(
            json["alerts"][0]["message"],
            "You missed taking Amoxicillin at 08:00"
        );
    }

    #[tokio::test]
    async fn profile_round_trip_and_validation() {
        let (core, _tmp) = test_core(9, 0);
        let profile = json!({
            "name": "Sam Rivera",
            "age": "67",
            "phone": "555-0100",
            "emergency_contact": { "name": "Alex", "phone": "555-0199", "relation": "Child" }
        });
        let (status, _) = send(&core, request("PUT", "/api/profile", Some(profile.clone()))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(&core, request("GET", "/api/profile", None)).await;
        assert_eq!(json, profile);

        let (status, _) = send(
            &core,
            request(
                "PUT",
                "/api/profile",
                Some(json!({ "name": "Sam", "emergency_contact": { "name": "", "phone": "", "relation": "" } })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn notification_settings_round_trip() {
        let (core, _tmp) = test_core(9, 0);
        let (_, json) = send(&core, request("GET", "/api/settings/notifications", None)).await;
        assert_eq!(json["push"], true);
        assert_eq!(json["email"], false);

        let updated = json!({
            "push": false, "email": true, "sms": false,
            "advance_reminders": true, "repeat_reminders": false
        });
        let (status, _) = send(
            &core,
            request("PUT", "/api/settings/notifications", Some(updated.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(&core, request("GET", "/api/settings/notifications", None)).await;
        assert_eq!(json, updated);
    }
}
