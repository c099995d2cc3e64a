// libs/rating-cell/src/services/rating.rs
use std::collections::HashMap;

use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::postgrest::{PostgrestClient, StoreError};

use crate::models::{
    RatableAppointment, RateAppointmentRequest, Rating, RatingError, RatingScoreRow,
    ReviewStats, MAX_SCORE, MIN_SCORE,
};

/// Reject out-of-range scores outright, then snap accepted values to the
/// half-star grid. 4.3 becomes 4.5; 0.2 is an error, not 1.0.
pub fn normalize_score(score: f64) -> Result<f64, RatingError> {
    if !score.is_finite() || score < MIN_SCORE || score > MAX_SCORE {
        return Err(RatingError::ScoreOutOfRange(score));
    }
    let half_steps = (score * 2.0).round() / 2.0;
    Ok(half_steps.clamp(MIN_SCORE, MAX_SCORE))
}

/// One pass over the score rows: count and mean per provider.
fn fold_stats(rows: Vec<RatingScoreRow>) -> HashMap<Uuid, ReviewStats> {
    let mut sums: HashMap<Uuid, (i64, f64)> = HashMap::new();
    for row in rows {
        let entry = sums.entry(row.provider_id).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += row.score;
    }

    sums.into_iter()
        .map(|(provider_id, (count, total))| {
            (
                provider_id,
                ReviewStats {
                    count,
                    average: total / count as f64,
                },
            )
        })
        .collect()
}

pub struct RatingService {
    store: PostgrestClient,
}

impl RatingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestClient::new(config),
        }
    }

    /// Record a patient's rating for a past visit.
    ///
    /// The score is validated before anything touches the store. The write is
    /// an upsert keyed on `appointment_id`: the store merges into the existing
    /// row instead of ever creating a second rating for the same visit.
    pub async fn rate(
        &self,
        appointment_id: Uuid,
        request: RateAppointmentRequest,
    ) -> Result<Rating, RatingError> {
        let score = normalize_score(request.score)?;

        let appointment = self.ratable_appointment(appointment_id).await?;

        if appointment.status == "cancelled" {
            return Err(RatingError::AppointmentCancelled);
        }
        if appointment.date >= Utc::now().date_naive() {
            return Err(RatingError::VisitNotCompleted);
        }

        let now = Utc::now().to_rfc3339();
        let rating_data = json!({
            "appointment_id": appointment.id,
            "provider_id": appointment.provider_id,
            "patient_id": appointment.patient_id,
            "score": score,
            "comment": request.comment,
            "created_at": now,
            "updated_at": now
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static(
                "resolution=merge-duplicates,return=representation",
            ),
        );

        let result: Vec<Rating> = self
            .store
            .request_with_headers(
                Method::POST,
                "/rest/v1/ratings?on_conflict=appointment_id",
                Some(rating_data),
                Some(headers),
            )
            .await?;

        let rating = result
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("upsert returned no representation".to_string()))?;

        info!("Rating {} stored for appointment {}", rating.id, appointment_id);
        Ok(rating)
    }

    /// Count and mean per provider, computed in one pass. Providers without
    /// ratings do not appear in the result.
    pub async fn review_stats(
        &self,
        provider_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, ReviewStats>, StoreError> {
        if provider_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids = provider_ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let path = format!(
            "/rest/v1/ratings?provider_id=in.({})&select=provider_id,score",
            ids
        );
        let rows: Vec<RatingScoreRow> = self.store.request(Method::GET, &path, None).await?;

        debug!("Aggregated {} rating rows for {} providers", rows.len(), provider_ids.len());
        Ok(fold_stats(rows))
    }

    async fn ratable_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<RatableAppointment, RatingError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&select=id,patient_id,provider_id,date,status",
            appointment_id
        );
        let result: Vec<RatableAppointment> = self.store.request(Method::GET, &path, None).await?;

        result.into_iter().next().ok_or(RatingError::AppointmentNotFound)
    }
}
