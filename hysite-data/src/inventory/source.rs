//! Blocking HTTP client for the asset inventory.

use std::time::Duration;

use hysite_core::{Asset, AssetSource, AssetSourceError};
use reqwest::Client;

use super::wire::decode_listing;
use crate::runtime::{BlockingRuntime, ClientBuildError, http_client};

/// Default inventory listing endpoint.
pub const DEFAULT_ASSETS_URL: &str = "http://localhost:8000/api/assets/list/";

/// Default user agent for inventory requests.
pub const DEFAULT_USER_AGENT: &str = "hysite-inventory/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpAssetSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpAssetSourceConfig {
    /// Full URL of the listing endpoint.
    pub url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent sent with each request.
    pub user_agent: String,
}

impl Default for HttpAssetSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ASSETS_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpAssetSourceConfig {
    /// Create a configuration for `url` with default timeout and user agent.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// [`AssetSource`] backed by the inventory's HTTP listing endpoint.
///
/// Each call issues one `GET` with no retry. Transport failures, non-success
/// statuses and timeouts map onto the matching [`AssetSourceError`] variant;
/// undecodable bodies become [`AssetSourceError::Malformed`].
#[derive(Debug)]
pub struct HttpAssetSource {
    client: Client,
    config: HttpAssetSourceConfig,
    runtime: BlockingRuntime,
}

impl HttpAssetSource {
    /// Create a source for `url` with default settings.
    ///
    /// # Errors
    /// Returns [`ClientBuildError`] when the HTTP client or runtime cannot be
    /// built.
    pub fn new(url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpAssetSourceConfig::new(url))
    }

    /// Create a source from explicit configuration.
    ///
    /// # Errors
    /// Returns [`ClientBuildError`] when the HTTP client or runtime cannot be
    /// built.
    pub fn with_config(config: HttpAssetSourceConfig) -> Result<Self, ClientBuildError> {
        let client = http_client(&config.user_agent, config.timeout)?;
        let runtime = BlockingRuntime::new()?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Borrow the active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpAssetSourceConfig {
        &self.config
    }

    async fn fetch_async(&self) -> Result<Vec<Asset>, AssetSourceError> {
        let url = self.config.url.as_str();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        decode_listing(&body)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> AssetSourceError {
        if error.is_timeout() {
            return AssetSourceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return AssetSourceError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        AssetSourceError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl AssetSource for HttpAssetSource {
    fn fetch_assets(&self) -> Result<Vec<Asset>, AssetSourceError> {
        let assets = self.runtime.block_on(self.fetch_async())?;
        log::debug!(
            "fetched {} assets from {}",
            assets.len(),
            self.config.url
        );
        Ok(assets)
    }
}
