// libs/booking-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/{appointment_id}/cancel", put(handlers::cancel_appointment))
        .route("/patients/{patient_id}", get(handlers::get_patient_appointments))
        .with_state(state)
}
