use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::booking_routes;
use provider_cell::router::{admin_provider_routes, provider_routes};
use rating_cell::router::rating_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Medbook API is running!" }))
        .nest("/providers", provider_routes(state.clone()))
        .nest(
            "/bookings",
            booking_routes(state.clone()).merge(rating_routes(state.clone())),
        )
        .nest("/admin/providers", admin_provider_routes(state))
}
