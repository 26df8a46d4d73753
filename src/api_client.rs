// Inventory API client: the single outbound HTTP dependency of the search layer
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_HEADER: &str = "X-Api-Key";

pub const ENV_BASE_URL: &str = "TOUR_API_BASE_URL";
pub const ENV_API_KEY: &str = "TOUR_API_KEY";
pub const ENV_TIMEOUT_MS: &str = "TOUR_API_TIMEOUT_MS";

// Errors from calls to the inventory API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status_code} - {message}")]
    Status { status_code: u16, message: String },

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Missing response field: {0}")]
    MissingField(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: None,
            timeout_ms: 10_000,
            user_agent: concat!("tour_search/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    // Reads `TOUR_API_BASE_URL`, `TOUR_API_KEY` and `TOUR_API_TIMEOUT_MS`,
    // keeping defaults for anything unset.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        config.api_key = lookup(ENV_API_KEY).filter(|v| !v.is_empty());
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = raw.trim().parse().map_err(|_| {
                ApiError::Config(format!(
                    "{} must be milliseconds, got {:?}",
                    ENV_TIMEOUT_MS, raw
                ))
            })?;
        }

        Ok(config)
    }
}

// Read-only access to the inventory API.
// `path_and_query` is relative to the configured base URL, e.g.
// `/module/params/338?entity=from_city`.
#[async_trait]
pub trait InventoryApi: Send + Sync + 'static {
    async fn get_json(&self, path_and_query: &str) -> Result<Value, ApiError>;
}

pub struct HttpInventoryClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpInventoryClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ApiError::Config(format!("invalid API key: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url_for(&self, path_and_query: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path_and_query.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    async fn get_json(&self, path_and_query: &str) -> Result<Value, ApiError> {
        let url = self.url_for(path_and_query);
        tracing::debug!(%url, "inventory request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "inventory request failed");
            return Err(ApiError::Status {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// In-process stand-in for the inventory API
#[cfg(test)]
pub mod mock_api {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MockInventoryApi {
        responses: Mutex<HashMap<String, Value>>,
        requests: Mutex<Vec<String>>,
        fail_with: Mutex<Option<u16>>,
    }

    impl MockInventoryApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, path_and_query: &str, body: Value) {
            self.responses
                .lock()
                .insert(path_and_query.to_string(), body);
        }

        pub fn fail_with_status(&self, status_code: u16) {
            *self.fail_with.lock() = Some(status_code);
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl InventoryApi for MockInventoryApi {
        async fn get_json(&self, path_and_query: &str) -> Result<Value, ApiError> {
            self.requests.lock().push(path_and_query.to_string());

            if let Some(status_code) = *self.fail_with.lock() {
                return Err(ApiError::Status {
                    status_code,
                    message: "Internal Server Error".to_string(),
                });
            }

            self.responses
                .lock()
                .get(path_and_query)
                .cloned()
                .ok_or_else(|| ApiError::Status {
                    status_code: 404,
                    message: format!("no canned response for {}", path_and_query),
                })
        }
    }
}
