use serde::{Deserialize, Serialize};

/// Client settings persisted as JSON by the settings engine.
///
/// Every field has a default so a partial settings file still loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderSettings {
    /// Backend origin, without the `/api` suffix.
    pub api_base_url: String,
    pub history_capacity: usize,
    pub page_size: usize,
    pub home_limit: usize,
    pub trending_limit: usize,
    pub request_timeout_secs: u64,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            history_capacity: 50,
            page_size: 12,
            home_limit: 24,
            trending_limit: 10,
            request_timeout_secs: 15,
        }
    }
}
