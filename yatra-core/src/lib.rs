//! Core domain types and algorithms for the Yatra route planner.
//!
//! Catalog rows become validated [`Waypoint`]s in a [`WaypointSet`]. The
//! user's [`Selection`] is ordered by a [`TourSolver`] and handed to a
//! [`RoutingProvider`] by the [`RouteController`], which publishes a single
//! fenced [`RouteState`]. [`PlanningSession`] ties the three together.
//!
//! Nothing here performs I/O; provider adapters live in `yatra-data`.

#![forbid(unsafe_code)]

mod controller;
mod routing;
mod selection;
mod session;
pub mod tour;
mod waypoint;
mod waypoint_set;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;

pub use controller::{
    ActiveRoute, CompletionOutcome, RequestId, RouteCompletion, RouteController,
    RouteRequestError, RouteState, RouteTicket, Teardown,
};
pub use routing::{
    BoxFuture, OverlayStatus, ProviderCall, ProviderError, ProviderRoute, RouteFuture,
    RouteInstruction, RouteOverlay, RoutingProvider,
};
pub use selection::{AnchorRole, ResolvedSelection, Selection, SelectionError};
pub use session::{PlanningSession, SessionError};
pub use tour::{NearestNeighbourSolver, Tour, TourError, TourSolver};
pub use waypoint::{Axis, RawCoordinate, RawWaypointRecord, Waypoint, WaypointError};
pub use waypoint_set::WaypointSet;
