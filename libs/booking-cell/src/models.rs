// libs/booking-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use provider_cell::models::Provider;
use shared_database::postgrest::StoreError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle is a one-way soft cancel; there is no way back to `scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Wire shape of a booking intent. `date` and `time` arrive as strings and
/// are validated against the canonical formats before anything touches the
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub date: String,
    pub time: String,
    pub reason: Option<String>,
}

/// Denormalised appointment view for display: the committed row plus the
/// provider and host-facility names, joined after the write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub reason: String,
    pub provider_name: String,
    pub speciality: String,
    pub facility: Option<String>,
}

impl AppointmentView {
    pub fn compose(appointment: Appointment, provider: &Provider, facility: Option<String>) -> Self {
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            provider_id: appointment.provider_id,
            date: appointment.date,
            time: appointment.time.format("%H:%M").to_string(),
            status: appointment.status,
            reason: appointment.reason,
            provider_name: provider.name.clone(),
            speciality: provider.speciality.clone(),
            facility,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid patient")]
    PatientNotFound,

    #[error("Invalid provider")]
    ProviderNotBookable,

    #[error("Invalid date format, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("Invalid time format, expected HH:MM")]
    InvalidTime,

    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment is already cancelled")]
    AlreadyCancelled,

    #[error("Provider already has a scheduled appointment on {date} at {time}")]
    SlotTaken { date: String, time: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
