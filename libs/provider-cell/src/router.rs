// libs/provider-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::admin::admin_middleware;

use crate::handlers;

/// Public read path. Everything here is filtered to approved providers.
pub fn provider_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_providers))
        .route("/{provider_id}", get(handlers::get_provider))
        .route("/{provider_id}/slots", get(handlers::get_provider_slots))
        .with_state(state)
}

/// Approval lifecycle, reachable only with the out-of-band admin credential.
pub fn admin_provider_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{provider_id}/approve", post(handlers::approve_provider))
        .route("/{provider_id}/reject", post(handlers::reject_provider))
        .route("/{provider_id}/suspend", post(handlers::suspend_provider))
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .with_state(state)
}
