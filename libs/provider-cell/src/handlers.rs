// libs/provider-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::postgrest::StoreError;
use shared_models::error::ApiError;

use crate::models::{ProviderError, RejectProviderRequest};
use crate::services::{
    approval::ApprovalService, availability::AvailabilityService, directory::DirectoryService,
};

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

fn map_provider_error(e: ProviderError) -> ApiError {
    match e {
        ProviderError::NotFound => ApiError::NotFound(e.to_string()),
        ProviderError::InvalidTransition { .. } => ApiError::PreconditionFailed(e.to_string()),
        ProviderError::Store(StoreError::Unavailable(msg)) => {
            ApiError::Unavailable(format!("Store did not answer in time, retry later: {}", msg))
        }
        ProviderError::Store(e) => ApiError::Internal(e.to_string()),
    }
}

// ==============================================================================
// PUBLIC HANDLERS (READ PATH)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_providers(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, ApiError> {
    let directory = DirectoryService::new(&state);

    let providers = directory.list_approved().await.map_err(map_provider_error)?;
    let total = providers.len();

    Ok(Json(json!({
        "providers": providers,
        "total": total
    })))
}

#[axum::debug_handler]
pub async fn get_provider(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let directory = DirectoryService::new(&state);

    let provider = directory
        .get_approved(provider_id)
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!(provider)))
}

#[axum::debug_handler]
pub async fn get_provider_slots(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let availability = AvailabilityService::new(&state);

    let slots = availability
        .bookable_slots(provider_id, query.date)
        .await
        .map_err(map_provider_error)?;

    Ok(Json(
        slots
            .into_iter()
            .map(|slot| slot.format("%H:%M").to_string())
            .collect(),
    ))
}

// ==============================================================================
// ADMIN HANDLERS (APPROVAL LIFECYCLE)
// ==============================================================================

#[axum::debug_handler]
pub async fn approve_provider(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let approved_by = payload
        .get("approved_by")
        .and_then(|value| value.as_str())
        .map(str::to_string);

    let approval = ApprovalService::new(&state);
    let provider = approval
        .approve(provider_id, approved_by)
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!(provider)))
}

#[axum::debug_handler]
pub async fn reject_provider(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<RejectProviderRequest>,
) -> Result<Json<Value>, ApiError> {
    let approval = ApprovalService::new(&state);

    let provider = approval
        .reject(provider_id, request.reason)
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!(provider)))
}

#[axum::debug_handler]
pub async fn suspend_provider(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let approval = ApprovalService::new(&state);

    let provider = approval
        .suspend(provider_id)
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!(provider)))
}
