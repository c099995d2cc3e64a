// libs/rating-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::postgrest::StoreError;
use shared_models::error::ApiError;

use crate::models::{RateAppointmentRequest, Rating, RatingError};
use crate::services::rating::RatingService;

fn map_rating_error(e: RatingError) -> ApiError {
    match e {
        RatingError::AppointmentNotFound => ApiError::NotFound(e.to_string()),
        RatingError::AppointmentCancelled | RatingError::VisitNotCompleted => {
            ApiError::PreconditionFailed(e.to_string())
        }
        RatingError::ScoreOutOfRange(_) => ApiError::Invalid(e.to_string()),
        RatingError::Store(StoreError::Unavailable(msg)) => ApiError::Unavailable(format!(
            "Store did not answer in time; confirm whether the rating was stored before retrying: {}",
            msg
        )),
        RatingError::Store(e) => ApiError::Internal(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn rate_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<RateAppointmentRequest>,
) -> Result<Json<Rating>, ApiError> {
    let rating_service = RatingService::new(&state);

    let rating = rating_service
        .rate(appointment_id, request)
        .await
        .map_err(map_rating_error)?;

    Ok(Json(rating))
}
