// libs/provider-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::postgrest::StoreError;

// ==============================================================================
// CORE PROVIDER MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    pub speciality: String,
    pub facility_id: Uuid,
    pub email: String,
    pub phone: String,
    pub approval_status: ApprovalStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle gate for public visibility. Only `approved` providers are
/// listed, resolvable, or bookable; the other three states are invisible to
/// the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
            ApprovalStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// Host facility; supplies the display name in read views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// One recurring weekly availability window. `day` is a short weekday name
/// ("Mon".."Sun"); a row carrying anything else is kept but sorts last in
/// summaries and never matches a slot query. Invariant: start precedes end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

// ==============================================================================
// READ-PATH VIEW MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    pub day: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderView {
    pub id: Uuid,
    pub name: String,
    pub speciality: String,
    pub facility: Option<String>,
    pub availability_summary: Option<String>,
    pub availability_blocks: Vec<AvailabilityBlock>,
    pub review_count: i64,
    pub avg_rating: Option<f64>,
}

// ==============================================================================
// ADMIN REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectProviderRequest {
    pub reason: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider not found")]
    NotFound,

    #[error("Provider cannot move from {from} to {to}")]
    InvalidTransition {
        from: ApprovalStatus,
        to: ApprovalStatus,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
