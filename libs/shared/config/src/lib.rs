use std::env;
use tracing::warn;

/// Process-wide configuration, resolved once at startup and handed to the
/// components that need it. Nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub postgrest_url: String,
    pub postgrest_api_key: String,
    pub admin_api_key: String,
    pub store_timeout_secs: u64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            postgrest_url: env::var("POSTGREST_URL")
                .unwrap_or_else(|_| {
                    warn!("POSTGREST_URL not set, using empty value");
                    String::new()
                }),
            postgrest_api_key: env::var("POSTGREST_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("POSTGREST_API_KEY not set, using empty value");
                    String::new()
                }),
            admin_api_key: env::var("ADMIN_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_API_KEY not set, admin endpoints will reject all requests");
                    String::new()
                }),
            store_timeout_secs: env::var("STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(10),
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.postgrest_url.is_empty() && !self.postgrest_api_key.is_empty()
    }

    pub fn has_admin_credential(&self) -> bool {
        !self.admin_api_key.is_empty()
    }
}
