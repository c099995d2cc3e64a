// libs/rating-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::postgrest::StoreError;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

// ==============================================================================
// CORE RATING MODELS
// ==============================================================================

/// One rating per appointment, never more. The store enforces the uniqueness
/// of `appointment_id`; writes go through an upsert keyed on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub provider_id: Uuid,
    pub patient_id: Uuid,
    pub score: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateAppointmentRequest {
    pub score: f64,
    pub comment: Option<String>,
}

/// Per-provider aggregate. Providers with no ratings are simply absent from
/// the stats map; callers default to count 0 and a null average.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReviewStats {
    pub count: i64,
    pub average: f64,
}

/// Rating row as the aggregator reads it back for statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingScoreRow {
    pub provider_id: Uuid,
    pub score: f64,
}

/// The slice of an appointment row the rating rules need, read with this
/// cell's own lens so it stays independent of the booking cell.
#[derive(Debug, Clone, Deserialize)]
pub struct RatableAppointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub status: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Cancelled appointments cannot be rated")]
    AppointmentCancelled,

    #[error("Appointments can only be rated after the visit date has passed")]
    VisitNotCompleted,

    #[error("Score {0} is outside the 1.0 - 5.0 range")]
    ScoreOutOfRange(f64),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
