// libs/provider-cell/src/services/availability.rs
use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::postgrest::PostgrestClient;

use crate::models::{ApprovalStatus, AvailabilityWindow, Provider, ProviderError};

/// Fixed discretisation step for turning a window into bookable start times.
pub const SLOT_MINUTES: i64 = 30;

/// Start times of the slots inside a single window: `start, start + 30m, ...`
/// for as long as the slot START precedes `end`. A slot beginning just before
/// `end` is still emitted even though it extends past the window; patients
/// have always been offered that trailing slot and clipping it here would
/// change what they can book.
pub fn slot_starts(start: NaiveTime, end: NaiveTime) -> impl Iterator<Item = NaiveTime> {
    std::iter::successors(Some(start), |prev| {
        let (next, rollover) = prev.overflowing_add_signed(Duration::minutes(SLOT_MINUTES));
        (rollover == 0).then_some(next)
    })
    .take_while(move |slot| *slot < end)
}

/// Merge the slots of every window matching `day` into one ordered,
/// deduplicated sequence.
pub fn slots_for_day(windows: &[AvailabilityWindow], day: &str) -> Vec<NaiveTime> {
    let mut starts = BTreeSet::new();
    for window in windows.iter().filter(|w| w.day == day) {
        starts.extend(slot_starts(window.start_time, window.end_time));
    }
    starts.into_iter().collect()
}

/// Short weekday name matching the stored `day` column.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

pub struct AvailabilityService {
    store: PostgrestClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestClient::new(config),
        }
    }

    /// Recurring windows for one provider, ordered for stable rendering.
    pub async fn windows_for_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<AvailabilityWindow>, ProviderError> {
        let path = format!(
            "/rest/v1/availability_windows?provider_id=eq.{}&order=day.asc,start_time.asc",
            provider_id
        );
        Ok(self.store.request(Method::GET, &path, None).await?)
    }

    /// One round trip for a whole listing page; grouping happens in memory.
    pub async fn windows_for_providers(
        &self,
        provider_ids: &[Uuid],
    ) -> Result<Vec<AvailabilityWindow>, ProviderError> {
        if provider_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = provider_ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let path = format!("/rest/v1/availability_windows?provider_id=in.({})", ids);
        Ok(self.store.request(Method::GET, &path, None).await?)
    }

    /// Bookable slot starts for one provider on one calendar date.
    ///
    /// An unapproved provider and a weekday without a window both yield an
    /// empty list; neither is an error. Slots are computed fresh on every
    /// call and never persisted.
    pub async fn bookable_slots(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, ProviderError> {
        let path = format!("/rest/v1/providers?id=eq.{}", provider_id);
        let providers: Vec<Provider> = self.store.request(Method::GET, &path, None).await?;
        let provider = providers.into_iter().next().ok_or(ProviderError::NotFound)?;

        if provider.approval_status != ApprovalStatus::Approved {
            debug!("Provider {} is not approved, no slots computed", provider_id);
            return Ok(Vec::new());
        }

        let windows = self.windows_for_provider(provider_id).await?;
        Ok(slots_for_day(&windows, weekday_name(date)))
    }
}
