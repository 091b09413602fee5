//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Layers (outermost → innermost):
//! 1. CORS → 2. Extension(ApiContext) → 3. Audit logger

use std::sync::Arc;

use axum::extract::OriginalUri;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected outside the audit
/// layer). Endpoint handlers use `State<ApiContext>` (via `with_state`).
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    let views = Router::new()
        .route("/age-histogram", get(endpoints::views::age_histogram))
        .route("/upcoming", get(endpoints::views::upcoming))
        .route("/daily-load", get(endpoints::views::daily_load))
        .route("/conditions", get(endpoints::views::conditions))
        .route("/crosstab", get(endpoints::views::crosstab))
        .route("/top-doctors", get(endpoints::views::top_doctors))
        .route("/weekly-trend", get(endpoints::views::weekly_trend))
        .route("/heatmap", get(endpoints::views::heatmap))
        .route("/search", get(endpoints::views::search));

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/summary", get(endpoints::records::summary))
        .route("/patients", get(endpoints::records::patients))
        .route("/appointments", get(endpoints::records::appointments))
        .route("/history", get(endpoints::records::history))
        .route("/reload", post(endpoints::admin::reload))
        .route("/audit", get(endpoints::admin::audit))
        .nest("/views", views)
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        // Extension must sit outside the audit layer so it can extract ApiContext
        .layer(axum::Extension(ctx));

    // Read-only browser dashboards on other origins may call the API.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(cors)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::path::PathBuf;
    use tower::ServiceExt;

    use crate::core_state::AccessSource;
    use crate::db;
    use crate::models::{Appointment, AppointmentTime, MedicalHistoryEntry, Patient, Snapshot};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Alice, her appointment with Dr. Lee and her asthma diagnosis, plus
    /// one appointment for a patient that does not exist.
    fn test_snapshot() -> Snapshot {
        Snapshot::new(
            vec![Patient {
                id: 1,
                name: "Alice".into(),
                age: 30,
                gender: "Female".into(),
                email: Some("alice@example.com".into()),
                phone: None,
            }],
            vec![
                Appointment {
                    id: 1,
                    patient_id: 1,
                    time: AppointmentTime::Date(date("2024-01-05")),
                    doctor: "Dr. Lee".into(),
                    reason: None,
                },
                Appointment {
                    id: 2,
                    patient_id: 99,
                    time: AppointmentTime::parse("2024-01-06 10:30:00").unwrap(),
                    doctor: "Dr. Lee".into(),
                    reason: None,
                },
            ],
            vec![MedicalHistoryEntry {
                id: 1,
                patient_id: 1,
                condition: "Asthma".into(),
                diagnosis_date: date("2024-01-01"),
                treatment: None,
            }],
        )
    }

    fn test_core_state() -> Arc<CoreState> {
        Arc::new(CoreState::with_snapshot(
            PathBuf::from("/nonexistent/clinic.db"),
            test_snapshot(),
        ))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, json) = send(api_router(test_core_state()), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store_version"], 1);
    }

    #[tokio::test]
    async fn upcoming_returns_joined_rows() {
        let (status, json) = send(
            api_router(test_core_state()),
            get("/api/views/upcoming?as_of=2024-01-01&window_days=30"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["view"], "upcoming");
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["patient_name"], "Alice");
        assert_eq!(rows[0]["condition"], "Asthma");
        assert_eq!(rows[0]["doctor"], "Dr. Lee");
    }

    #[tokio::test]
    async fn invalid_as_of_is_bad_request() {
        let (status, json) = send(
            api_router(test_core_state()),
            get("/api/views/upcoming?as_of=yesterday"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn daily_load_empty_signal() {
        let (status, json) = send(
            api_router(test_core_state()),
            get("/api/views/daily-load?as_of=2020-01-01"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "empty");
    }

    #[tokio::test]
    async fn top_doctors_counts_orphans() {
        let (_, json) = send(api_router(test_core_state()), get("/api/views/top-doctors")).await;
        assert_eq!(json["data"][0]["label"], "Dr. Lee");
        assert_eq!(json["data"][0]["count"], 2);
    }

    #[tokio::test]
    async fn appointments_exclude_orphans() {
        let (_, json) = send(api_router(test_core_state()), get("/api/appointments")).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn summary_reports_orphans() {
        let (_, json) = send(api_router(test_core_state()), get("/api/summary")).await;
        assert_eq!(json["data"]["appointments"], 2);
        assert_eq!(json["data"]["orphaned_appointments"], 1);
    }

    #[tokio::test]
    async fn crosstab_requires_valid_axis() {
        let core = test_core_state();

        let (status, _) = send(api_router(core.clone()), get("/api/views/crosstab")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            send(api_router(core.clone()), get("/api/views/crosstab?axis=income")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) =
            send(api_router(core), get("/api/views/crosstab?axis=age_group")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["axis"], "age_group");
        assert_eq!(json["data"]["rows"][1], "19-35");
    }

    #[tokio::test]
    async fn search_blank_and_case_insensitive() {
        let core = test_core_state();

        let (_, all) = send(api_router(core.clone()), get("/api/views/search")).await;
        assert_eq!(all["data"].as_array().unwrap().len(), 1);

        let (_, hit) = send(api_router(core.clone()), get("/api/views/search?term=ALICE")).await;
        assert_eq!(hit["data"].as_array().unwrap().len(), 1);

        let (_, miss) = send(api_router(core), get("/api/views/search?term=bob")).await;
        assert!(miss["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn heatmap_reports_untimed() {
        let (_, json) = send(api_router(test_core_state()), get("/api/views/heatmap")).await;
        assert_eq!(json["data"]["days"][0], "Monday");
        assert_eq!(json["data"]["untimed_excluded"], 1);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (status, json) = send(api_router(test_core_state()), get("/api/views/pie")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "No route for /api/views/pie");
    }

    #[tokio::test]
    async fn requests_are_audited() {
        let core = test_core_state();
        send(api_router(core.clone()), get("/api/views/conditions")).await;

        let entries = core.audit_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "GET /api/views/conditions");
        assert_eq!(entries[0].entity, "status:200");
        assert_eq!(entries[0].source, AccessSource::Api { peer: None });
    }

    #[tokio::test]
    async fn audit_endpoint_lists_earlier_requests() {
        let core = test_core_state();
        send(api_router(core.clone()), get("/api/summary")).await;
        send(api_router(core.clone()), get("/api/views/crosstab")).await;

        let (status, json) = send(api_router(core.clone()), get("/api/audit")).await;
        assert_eq!(status, StatusCode::OK);
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["action"], "GET /api/summary");
        assert_eq!(entries[0]["source"], "api");
        assert_eq!(entries[1]["entity"], "status:400");

        // the audit read itself is recorded afterwards
        assert_eq!(core.audit_entries().len(), 3);
    }

    #[tokio::test]
    async fn reload_picks_up_new_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");
        let conn = db::open_database(&path).unwrap();
        conn.execute_batch(
            "INSERT INTO Patients (name, age, gender) VALUES ('Alice', 30, 'Female');",
        )
        .unwrap();

        let core = Arc::new(CoreState::new(path));
        let (_, before) = send(api_router(core.clone()), get("/api/summary")).await;
        assert_eq!(before["data"]["patients"], 1);
        assert_eq!(before["store_version"], 1);

        conn.execute_batch(
            "INSERT INTO Patients (name, age, gender) VALUES ('Brian', 45, 'Male');",
        )
        .unwrap();

        let req = Request::builder()
            .method("POST")
            .uri("/api/reload")
            .body(Body::empty())
            .unwrap();
        let (status, reloaded) = send(api_router(core.clone()), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reloaded["store_version"], 2);
        assert_eq!(reloaded["patients"], 2);

        let (_, after) = send(api_router(core), get("/api/summary")).await;
        assert_eq!(after["data"]["patients"], 2);
        assert_eq!(after["store_version"], 2);
    }

    #[tokio::test]
    async fn reload_failure_is_internal_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/reload")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(api_router(test_core_state()), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }
}
