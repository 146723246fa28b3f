//! `RoutingProvider` backed by OSRM's Route API.
//!
//! [`OsrmRouteProvider`] sends the ordered coordinates of a tour to an OSRM
//! `route` endpoint and converts the first returned route into a
//! [`ProviderRoute`]. Each call is represented to the controller by an
//! [`OsrmRouteOverlay`] that reports itself in flight until the HTTP
//! exchange finishes.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use yatra_core::RoutingProvider;
//! use yatra_data::routing::OsrmRouteProvider;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OsrmRouteProvider::new("http://localhost:5000")?;
//! let call = provider.compute_route(&[
//!     Coord { x: 83.2185, y: 17.7665 },
//!     Coord { x: 83.3012, y: 17.7231 },
//! ]);
//! let route = call.response.await?;
//! println!("{} m", route.distance_meters);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use geo::Coord;
use reqwest::Client;
use url::Url;
use yatra_core::{
    OverlayStatus, ProviderCall, ProviderError, ProviderRoute, RouteOverlay, RoutingProvider,
};

use super::osrm::{self, RouteResponse};

/// Error type for [`OsrmRouteProvider`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// The configured base URL does not parse.
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl { url, source } => {
                write!(f, "invalid routing base URL {url:?}: {source}")
            }
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBaseUrl { source, .. } => Some(source),
            Self::HttpClient(err) => Some(err),
        }
    }
}

/// Public OSRM demo server.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Routing profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "driving";

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "yatra-routing/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`OsrmRouteProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsrmRouteProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile segment, e.g. `driving` or `foot`.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OsrmRouteProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OsrmRouteProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
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

/// Routing provider using the OSRM Route API.
///
/// Requests are issued on whichever Tokio runtime polls the response
/// future. Calls cannot be cancelled once started; dropping the future
/// abandons the response.
#[derive(Clone)]
pub struct OsrmRouteProvider {
    client: Client,
    config: OsrmRouteProviderConfig,
}

impl std::fmt::Debug for OsrmRouteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsrmRouteProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OsrmRouteProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OsrmRouteProviderConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the HTTP client fails to
    /// build.
    pub fn with_config(config: OsrmRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        Url::parse(&config.base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &OsrmRouteProviderConfig {
        &self.config
    }

    /// Build the OSRM Route API URL for the given coordinates.
    ///
    /// The URL format is
    /// `{base_url}/route/v1/{profile}/{coordinates}?overview=full&geometries=geojson&steps=true`
    /// where coordinates are semicolon-separated `lon,lat` pairs.
    #[must_use]
    pub fn route_url(&self, waypoints: &[Coord<f64>]) -> String {
        let coords = waypoints
            .iter()
            .map(|c| format!("{},{}", c.x, c.y))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson&steps=true",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl RoutingProvider for OsrmRouteProvider {
    type Overlay = OsrmRouteOverlay;

    fn compute_route(&self, waypoints: &[Coord<f64>]) -> ProviderCall<OsrmRouteOverlay> {
        let url = self.route_url(waypoints);
        if waypoints.len() < 2 {
            let count = waypoints.len();
            return ProviderCall {
                overlay: OsrmRouteOverlay::settled(url),
                response: Box::pin(async move {
                    Err(ProviderError::InsufficientWaypoints { count })
                }),
            };
        }

        log::debug!("requesting route for {} waypoints", waypoints.len());
        let overlay = OsrmRouteOverlay::in_flight(url.clone());
        let guard = overlay.settle_guard();
        let client = self.client.clone();
        let timeout_secs = self.config.timeout.as_secs();
        let response = Box::pin(async move {
            let _settled_on_exit = guard;
            fetch_route(&client, &url, timeout_secs).await
        });
        ProviderCall { overlay, response }
    }
}

async fn fetch_route(
    client: &Client,
    url: &str,
    timeout_secs: u64,
) -> Result<ProviderRoute, ProviderError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| convert_reqwest_error(&err, url, timeout_secs))?;

    // OSRM reports NoRoute, InvalidQuery and friends as 4xx with a JSON body.
    let status = response.status();
    if status.is_client_error() {
        let body = response
            .bytes()
            .await
            .map_err(|err| convert_reqwest_error(&err, url, timeout_secs))?;
        return match serde_json::from_slice::<RouteResponse>(&body) {
            Ok(service) if !service.is_ok() => convert_response(service),
            _ => Err(ProviderError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: status.to_string(),
            }),
        };
    }

    let response = response
        .error_for_status()
        .map_err(|err| convert_reqwest_error(&err, url, timeout_secs))?;

    let route_response: RouteResponse =
        response
            .json()
            .await
            .map_err(|err| ProviderError::ParseError {
                message: err.to_string(),
            })?;

    convert_response(route_response)
}

/// Convert a reqwest error to a `ProviderError`.
fn convert_reqwest_error(error: &reqwest::Error, url: &str, timeout_secs: u64) -> ProviderError {
    if error.is_timeout() {
        return ProviderError::Timeout {
            url: url.to_owned(),
            timeout_secs,
        };
    }

    if let Some(status) = error.status() {
        return ProviderError::HttpError {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    ProviderError::NetworkError {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Convert an OSRM response to a `ProviderRoute`, taking the first route.
fn convert_response(response: RouteResponse) -> Result<ProviderRoute, ProviderError> {
    if !response.is_ok() {
        return Err(ProviderError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ParseError {
            message: "OSRM response contained no routes".to_owned(),
        })?;

    Ok(ProviderRoute {
        geometry: route.geometry.into_line_string(),
        distance_meters: route.distance,
        duration_seconds: route.duration,
        instructions: osrm::instructions(route.legs),
    })
}

/// Display resource for one OSRM request.
///
/// Reports [`OverlayStatus::InFlight`] until the response future finishes or
/// is dropped.
#[derive(Debug, Clone)]
pub struct OsrmRouteOverlay {
    url: String,
    in_flight: Arc<AtomicBool>,
}

impl OsrmRouteOverlay {
    fn in_flight(url: String) -> Self {
        Self {
            url,
            in_flight: Arc::new(AtomicBool::new(true)),
        }
    }

    fn settled(url: String) -> Self {
        Self {
            url,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    fn settle_guard(&self) -> SettleGuard {
        SettleGuard(Arc::clone(&self.in_flight))
    }

    /// The request URL this overlay belongs to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RouteOverlay for OsrmRouteOverlay {
    fn status(&self) -> OverlayStatus {
        if self.in_flight.load(Ordering::Acquire) {
            OverlayStatus::InFlight
        } else {
            OverlayStatus::Settled
        }
    }

    fn release(self) {
        log::debug!("released route overlay for {}", self.url);
    }
}

/// Marks the overlay settled when the response future completes or drops.
struct SettleGuard(Arc<AtomicBool>);

impl Drop for SettleGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
