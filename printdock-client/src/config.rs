//! Client configuration

use std::time::Duration;

/// Dashboard client configuration for one shop
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Shop whose printers this client manages
    pub shop_id: String,

    /// Bearer token forwarded to the service
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Background refresh interval
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, shop_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            shop_id: shop_id.into(),
            token: None,
            timeout: 30,
            poll_interval: Duration::from_secs(5),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the background refresh interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
