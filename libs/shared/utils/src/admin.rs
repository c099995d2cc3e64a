use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use ring::constant_time::verify_slices_are_equal;

use shared_config::AppConfig;
use shared_models::error::ApiError;

/// Shared-secret gate for admin routes. The credential arrives out-of-band in
/// the `x-admin-key` header and is compared in constant time. An unconfigured
/// credential rejects every request rather than letting any through.
pub async fn admin_middleware(
    State(config): State<Arc<AppConfig>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if !config.has_admin_credential() {
        return Err(ApiError::Auth("Admin credential is not configured".to_string()));
    }

    let presented = request
        .headers()
        .get("x-admin-key")
        .ok_or_else(|| ApiError::Auth("Missing x-admin-key header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Auth("Invalid x-admin-key header".to_string()))?;

    verify_slices_are_equal(presented.as_bytes(), config.admin_api_key.as_bytes())
        .map_err(|_| ApiError::Auth("Invalid admin credential".to_string()))?;

    Ok(next.run(request).await)
}
