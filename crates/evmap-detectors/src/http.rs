//! Shared HTTP client for all detectors
//!
//! One `HttpClient` is built at start-up and cloned into every detector.
//! Clones share reqwest's connection pool and cookie store, both of which
//! are safe for concurrent use.

use std::time::Duration;

use evmap_core::{DetectorError, DetectorResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::HttpConfig;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build the client from configuration
    pub fn new(config: &HttpConfig) -> DetectorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(transport)?;

        Ok(Self { client })
    }

    /// GET `url` and return the whole body as text.
    ///
    /// A non-success status is reported as a transport failure carrying
    /// the status line.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn get_text(&self, url: Url) -> DetectorResult<String> {
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        debug!(%status, "Received response");

        if !status.is_success() {
            return Err(DetectorError::Transport(format!("HTTP {}", status)));
        }

        response.text().await.map_err(transport)
    }

    /// GET `url` and decode the body as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> DetectorResult<T> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body)
            .map_err(|e| DetectorError::Protocol(format!("Failed to parse response: {}", e)))
    }
}

/// Append path segments to a base URL given without trailing slash
pub(crate) fn endpoint(base_url: &str, path: &str) -> DetectorResult<Url> {
    let full = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Url::parse(&full).map_err(|e| DetectorError::InvalidUrl(format!("{}: {}", full, e)))
}

fn transport(e: reqwest::Error) -> DetectorError {
    DetectorError::Transport(e.to_string())
}
