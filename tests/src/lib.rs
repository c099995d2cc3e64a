//! Harness for driving the assembled API router against a mock store,
//! replacing ad-hoc curl runs with structured endpoint tests.

use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use booking_cell::router::booking_routes;
use provider_cell::router::{admin_provider_routes, provider_routes};
use rating_cell::router::rating_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::TestConfig;

/// Same assembly as the API binary, minus the tracing and CORS layers.
pub fn test_app(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Medbook API is running!" }))
        .nest("/providers", provider_routes(state.clone()))
        .nest(
            "/bookings",
            booking_routes(state.clone()).merge(rating_routes(state.clone())),
        )
        .nest("/admin/providers", admin_provider_routes(state))
}

pub fn test_state(store_url: &str) -> Arc<AppConfig> {
    TestConfig::for_store(store_url).to_arc()
}

pub fn provider_json(id: &Uuid, facility_id: &Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Dr. Carol Jones",
        "speciality": "Neurology",
        "facility_id": facility_id,
        "email": "carol@hospital.test",
        "phone": "555-2000",
        "approval_status": status,
        "approved_at": null,
        "approved_by": null,
        "rejection_reason": null,
        "created_at": Utc::now().to_rfc3339()
    })
}

pub fn window_json(provider_id: &Uuid, day: &str, start: &str, end: &str) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "provider_id": provider_id,
        "day": day,
        "start_time": start,
        "end_time": end
    })
}

pub fn facility_json(id: &Uuid, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "address": "789 Lake Rd",
        "phone": null,
        "email": null
    })
}

pub fn appointment_json(
    id: &Uuid,
    patient_id: &Uuid,
    provider_id: &Uuid,
    date: &str,
    status: &str,
) -> serde_json::Value {
    json!({
        "id": id,
        "patient_id": patient_id,
        "provider_id": provider_id,
        "date": date,
        "time": "09:00:00",
        "status": status,
        "reason": "Unstated",
        "created_at": Utc::now().to_rfc3339()
    })
}
