use std::sync::Arc;

use shared_config::AppConfig;

pub const TEST_ADMIN_KEY: &str = "test-admin-key";

pub struct TestConfig {
    pub postgrest_url: String,
    pub postgrest_api_key: String,
    pub admin_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            postgrest_url: "http://localhost:54321".to_string(),
            postgrest_api_key: "test-anon-key".to_string(),
            admin_api_key: TEST_ADMIN_KEY.to_string(),
        }
    }
}

impl TestConfig {
    /// Points the store client at a mock server (wiremock URI in tests).
    pub fn for_store(store_url: &str) -> Self {
        Self {
            postgrest_url: store_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            postgrest_url: self.postgrest_url.clone(),
            postgrest_api_key: self.postgrest_api_key.clone(),
            admin_api_key: self.admin_api_key.clone(),
            store_timeout_secs: 5,
            port: 0,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}
