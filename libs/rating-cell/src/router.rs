// libs/rating-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

/// Mounted under `/bookings` next to the booking routes; ratings hang off an
/// appointment, not off a provider.
pub fn rating_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{appointment_id}/rating", post(handlers::rate_appointment))
        .with_state(state)
}
