// libs/provider-cell/src/services/directory.rs
use std::collections::HashMap;

use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use rating_cell::models::ReviewStats;
use rating_cell::services::rating::RatingService;
use shared_config::AppConfig;
use shared_database::postgrest::PostgrestClient;

use crate::models::{AvailabilityWindow, Facility, Provider, ProviderError, ProviderView};
use crate::services::availability::AvailabilityService;
use crate::services::summary::{availability_blocks, availability_summary};

/// Read path over the provider catalogue.
///
/// Only `approved` providers are ever returned; the filter is part of the
/// store query, not applied after the fact, so nothing about a pending or
/// rejected provider is even fetched.
pub struct DirectoryService {
    store: PostgrestClient,
    availability: AvailabilityService,
    ratings: RatingService,
}

impl DirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestClient::new(config),
            availability: AvailabilityService::new(config),
            ratings: RatingService::new(config),
        }
    }

    pub async fn list_approved(&self) -> Result<Vec<ProviderView>, ProviderError> {
        let providers: Vec<Provider> = self
            .store
            .request(
                Method::GET,
                "/rest/v1/providers?approval_status=eq.approved&order=name.asc",
                None,
            )
            .await?;

        if providers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = providers.iter().map(|p| p.id).collect();

        // Preload windows, facilities and stats in one round trip each
        // instead of querying per provider.
        let windows = self.availability.windows_for_providers(&ids).await?;
        let facilities = self.facility_names(&providers).await?;
        let stats = self.ratings.review_stats(&ids).await?;

        let mut windows_by_provider: HashMap<Uuid, Vec<AvailabilityWindow>> = HashMap::new();
        for window in windows {
            windows_by_provider
                .entry(window.provider_id)
                .or_default()
                .push(window);
        }

        debug!("Listing {} approved providers", providers.len());
        Ok(providers
            .into_iter()
            .map(|provider| {
                let provider_windows = windows_by_provider
                    .remove(&provider.id)
                    .unwrap_or_default();
                compose_view(provider, &provider_windows, &facilities, &stats)
            })
            .collect())
    }

    /// Single-provider view; a provider that exists but is not approved is
    /// indistinguishable from a missing one.
    pub async fn get_approved(&self, provider_id: Uuid) -> Result<ProviderView, ProviderError> {
        let path = format!(
            "/rest/v1/providers?id=eq.{}&approval_status=eq.approved",
            provider_id
        );
        let providers: Vec<Provider> = self.store.request(Method::GET, &path, None).await?;
        let provider = providers.into_iter().next().ok_or(ProviderError::NotFound)?;

        let windows = self.availability.windows_for_provider(provider.id).await?;
        let facilities = self.facility_names(std::slice::from_ref(&provider)).await?;
        let stats = self.ratings.review_stats(&[provider.id]).await?;

        Ok(compose_view(provider, &windows, &facilities, &stats))
    }

    async fn facility_names(
        &self,
        providers: &[Provider],
    ) -> Result<HashMap<Uuid, String>, ProviderError> {
        let mut ids: Vec<Uuid> = providers.iter().map(|p| p.facility_id).collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let list = ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(",");
        let path = format!("/rest/v1/facilities?id=in.({})", list);
        let facilities: Vec<Facility> = self.store.request(Method::GET, &path, None).await?;

        Ok(facilities.into_iter().map(|f| (f.id, f.name)).collect())
    }
}

fn compose_view(
    provider: Provider,
    windows: &[AvailabilityWindow],
    facilities: &HashMap<Uuid, String>,
    stats: &HashMap<Uuid, ReviewStats>,
) -> ProviderView {
    let provider_stats = stats.get(&provider.id);

    ProviderView {
        id: provider.id,
        facility: facilities.get(&provider.facility_id).cloned(),
        availability_summary: availability_summary(windows),
        availability_blocks: availability_blocks(windows),
        review_count: provider_stats.map(|s| s.count).unwrap_or(0),
        avg_rating: provider_stats.map(|s| s.average),
        name: provider.name,
        speciality: provider.speciality,
    }
}
