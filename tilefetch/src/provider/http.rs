//! HTTP client abstraction for testability

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, trace};

use super::types::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body of a `200 OK` response, [`ProviderError::HttpStatus`]
    /// for any other status, or [`ProviderError::Transport`] when no
    /// response could be read.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
///
/// Every request carries the configured `User-Agent` header. Public tile
/// servers such as OpenStreetMap reject anonymous clients.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default 30 second timeout.
    pub fn new(user_agent: &str) -> Result<Self, ProviderError> {
        Self::with_timeout(user_agent, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(user_agent: &str, timeout: Duration) -> Result<Self, ProviderError> {
        Self::from_builder(reqwest::blocking::Client::builder(), user_agent, timeout)
    }

    fn from_builder(
        builder: reqwest::blocking::ClientBuilder,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = builder
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ClientBuild(e.to_string()))?;

        debug!(user_agent, timeout_secs = timeout.as_secs(), "HTTP client created");

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        trace!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::HttpStatus(status.as_u16()));
        }

        // Read response body
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::Transport(format!("Failed to read response: {}", e)))
    }
}
