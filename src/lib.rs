//! Facade crate for the Yatra route planner.
//!
//! This crate re-exports the core domain types and exposes the OSRM routing
//! provider and catalog clients behind the `provider-osrm` feature.

#![forbid(unsafe_code)]

pub use yatra_core::{
    ActiveRoute, CompletionOutcome, NearestNeighbourSolver, PlanningSession, ProviderError,
    ProviderRoute, RawWaypointRecord, RequestId, RouteCompletion, RouteController,
    RouteInstruction, RouteOverlay, RouteRequestError, RouteState, RouteTicket, RoutingProvider,
    Selection, SelectionError, SessionError, Tour, TourError, TourSolver, Waypoint, WaypointSet,
};

#[cfg(feature = "provider-osrm")]
pub use yatra_data::catalog::{CatalogError, CatalogFilter, HttpCatalogClient, read_catalog};

#[cfg(feature = "provider-osrm")]
pub use yatra_data::routing::{OsrmRouteProvider, OsrmRouteProviderConfig, ProviderBuildError};
