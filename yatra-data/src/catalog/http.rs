//! HTTP client for the temple catalog service.

use std::time::Duration;

use reqwest::Client;
use url::Url;
use yatra_core::RawWaypointRecord;

use super::{CatalogError, CatalogFilter};

/// Catalog service address used when none is configured.
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:5000";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpCatalogClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCatalogClientConfig {
    /// Base URL of the catalog service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpCatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: crate::routing::DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpCatalogClientConfig {
    /// Create a configuration for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Fetches raw catalog records from `GET {base}/getTemples`.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base: Url,
}

impl HttpCatalogClient {
    /// Create a client for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] when the URL does not parse and
    /// [`CatalogError::HttpClient`] when the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        Self::with_config(HttpCatalogClientConfig::new(base_url))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// As for [`Self::new`].
    pub fn with_config(config: HttpCatalogClientConfig) -> Result<Self, CatalogError> {
        let base = Url::parse(&config.base_url).map_err(|source| CatalogError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(CatalogError::CannotBeABase {
                url: config.base_url,
            });
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(CatalogError::HttpClient)?;
        Ok(Self { client, base })
    }

    /// The query URL for `filter`.
    ///
    /// Unconstrained fields are sent as `All`, as the service expects.
    #[must_use]
    pub fn request_url(&self, filter: &CatalogFilter) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("getTemples");
        }
        url.query_pairs_mut().extend_pairs(filter.query_pairs());
        url
    }

    /// Fetch the records matching `filter`, in the service's order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Request`] for transport failures or non-success
    /// statuses and [`CatalogError::Decode`] when the body is not a JSON
    /// array of records.
    pub async fn fetch(&self, filter: &CatalogFilter) -> Result<Vec<RawWaypointRecord>, CatalogError> {
        let url = self.request_url(filter);
        log::debug!("fetching catalog from {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| CatalogError::Request {
                url: url.to_string(),
                source,
            })?;
        let records: Vec<RawWaypointRecord> =
            response.json().await.map_err(|err| CatalogError::Decode {
                origin: url.to_string(),
                message: err.to_string(),
            })?;
        log::debug!("catalog returned {} records", records.len());
        Ok(records)
    }
}
