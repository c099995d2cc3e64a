// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::postgrest::StoreError;
use shared_models::error::ApiError;

use crate::models::{Appointment, AppointmentView, BookAppointmentRequest, BookingError};
use crate::services::booking::BookingService;

fn map_booking_error(e: BookingError) -> ApiError {
    match e {
        BookingError::PatientNotFound
        | BookingError::ProviderNotBookable
        | BookingError::InvalidDate
        | BookingError::InvalidTime => ApiError::Invalid(e.to_string()),
        BookingError::NotFound => ApiError::NotFound(e.to_string()),
        BookingError::AlreadyCancelled => ApiError::AlreadyCancelled(e.to_string()),
        BookingError::SlotTaken { .. } => ApiError::Conflict(e.to_string()),
        BookingError::Store(StoreError::Unavailable(msg)) => ApiError::Unavailable(format!(
            "Store did not answer in time; confirm whether the booking committed before retrying: {}",
            msg
        )),
        BookingError::Store(e) => ApiError::Internal(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentView>), ApiError> {
    let booking_service = BookingService::new(&state);

    let view = booking_service
        .book(request)
        .await
        .map_err(map_booking_error)?;

    Ok((StatusCode::CREATED, Json(view)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, ApiError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .cancel(appointment_id)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let booking_service = BookingService::new(&state);

    let appointments = booking_service
        .patient_appointments(patient_id)
        .await
        .map_err(|e| match e {
            // On the listing path a missing patient is the resource itself.
            BookingError::PatientNotFound => ApiError::NotFound("Patient not found".to_string()),
            other => map_booking_error(other),
        })?;
    let total = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "total": total
    })))
}
