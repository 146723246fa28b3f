//! HTTP routing providers.
//!
//! This module provides [`OsrmRouteProvider`], an implementation of
//! [`yatra_core::RoutingProvider`] that asks an OSRM routing service for the
//! road route through an ordered list of coordinates.
//!
//! # Architecture
//!
//! The provider makes one HTTP request to the OSRM Route API per call and
//! returns immediately with a [`yatra_core::ProviderCall`]; the request runs
//! when the caller awaits the response future. The accompanying
//! [`OsrmRouteOverlay`] tracks whether that exchange is still running so the
//! controller knows whether it may release it.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use yatra_data::routing::{OsrmRouteProvider, OsrmRouteProviderConfig};
//!
//! let config = OsrmRouteProviderConfig::new("http://localhost:5000")
//!     .with_profile("foot")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("my-app/1.0");
//! let provider = OsrmRouteProvider::with_config(config)?;
//! # Ok::<(), yatra_data::routing::ProviderBuildError>(())
//! ```

mod osrm;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_USER_AGENT, OsrmRouteOverlay, OsrmRouteProvider,
    OsrmRouteProviderConfig, ProviderBuildError,
};
