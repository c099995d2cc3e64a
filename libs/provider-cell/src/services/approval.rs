// libs/provider-cell/src/services/approval.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::postgrest::{prefer_return_representation, PostgrestClient};

use crate::models::{ApprovalStatus, Provider, ProviderError};

/// The only legal lifecycle moves. Everything else is rejected before the
/// store is touched.
pub fn validate_transition(
    from: ApprovalStatus,
    to: ApprovalStatus,
) -> Result<(), ProviderError> {
    use ApprovalStatus::*;

    match (from, to) {
        (Pending, Approved) | (Pending, Rejected) | (Approved, Suspended) => Ok(()),
        _ => Err(ProviderError::InvalidTransition { from, to }),
    }
}

/// Admin-triggered lifecycle transitions. Each transition is a total
/// overwrite of the approval fields and carries its own side effects: an
/// approval stamps the timestamp and approver, a rejection stores the reason.
pub struct ApprovalService {
    store: PostgrestClient,
}

impl ApprovalService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestClient::new(config),
        }
    }

    pub async fn approve(
        &self,
        provider_id: Uuid,
        approved_by: Option<String>,
    ) -> Result<Provider, ProviderError> {
        debug!("Approving provider {}", provider_id);

        let current = self.get_provider(provider_id).await?;
        validate_transition(current.approval_status, ApprovalStatus::Approved)?;

        let update = json!({
            "approval_status": ApprovalStatus::Approved.to_string(),
            "approved_at": Utc::now().to_rfc3339(),
            "approved_by": approved_by
        });

        let provider = self.apply(provider_id, update).await?;
        info!("Provider {} approved", provider_id);
        Ok(provider)
    }

    pub async fn reject(
        &self,
        provider_id: Uuid,
        reason: String,
    ) -> Result<Provider, ProviderError> {
        debug!("Rejecting provider {}", provider_id);

        let current = self.get_provider(provider_id).await?;
        validate_transition(current.approval_status, ApprovalStatus::Rejected)?;

        let update = json!({
            "approval_status": ApprovalStatus::Rejected.to_string(),
            "rejection_reason": reason
        });

        let provider = self.apply(provider_id, update).await?;
        info!("Provider {} rejected", provider_id);
        Ok(provider)
    }

    pub async fn suspend(&self, provider_id: Uuid) -> Result<Provider, ProviderError> {
        debug!("Suspending provider {}", provider_id);

        let current = self.get_provider(provider_id).await?;
        validate_transition(current.approval_status, ApprovalStatus::Suspended)?;

        let update = json!({
            "approval_status": ApprovalStatus::Suspended.to_string()
        });

        let provider = self.apply(provider_id, update).await?;
        info!("Provider {} suspended", provider_id);
        Ok(provider)
    }

    async fn get_provider(&self, provider_id: Uuid) -> Result<Provider, ProviderError> {
        let path = format!("/rest/v1/providers?id=eq.{}", provider_id);
        let result: Vec<Provider> = self.store.request(Method::GET, &path, None).await?;

        result.into_iter().next().ok_or(ProviderError::NotFound)
    }

    async fn apply(&self, provider_id: Uuid, update: Value) -> Result<Provider, ProviderError> {
        let path = format!("/rest/v1/providers?id=eq.{}", provider_id);
        let result: Vec<Provider> = self
            .store
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(update),
                Some(prefer_return_representation()),
            )
            .await?;

        result.into_iter().next().ok_or(ProviderError::NotFound)
    }
}
