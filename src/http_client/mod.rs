//! HTTP Client Module
//!
//! A shared synchronous HTTP client with connection pooling, used by the
//! sensor simulator to post readings at the ingestion endpoint.

use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{Result, StressError};

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            user_agent: format!("stresswatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Global synchronous HTTP client with connection pooling.
static SYNC_CLIENT: OnceLock<ureq::Agent> = OnceLock::new();

/// Get the shared synchronous HTTP client. The first call initializes it
/// with default settings.
pub fn get_sync_client() -> &'static ureq::Agent {
    SYNC_CLIENT.get_or_init(|| create_sync_client(&HttpClientConfig::default()))
}

/// Create a synchronous HTTP client with custom configuration.
pub fn create_sync_client(config: &HttpClientConfig) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(&config.user_agent)
        .build()
}

/// POST a JSON value and return the parsed JSON response.
pub fn post_json(url: &str, payload: &serde_json::Value) -> Result<serde_json::Value> {
    let response = get_sync_client()
        .post(url)
        .send_json(payload)
        .map_err(|e| StressError::network(e.to_string()).with_context("url", url))?;
    response
        .into_json()
        .map_err(|e| StressError::network(format!("invalid response body: {e}")))
}
