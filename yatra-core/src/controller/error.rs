use thiserror::Error;

use crate::TourError;

/// Synchronous refusals from [`crate::RouteController::request_route`].
///
/// A refused request never changes the route state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteRequestError {
    /// Fewer than two waypoints were selected.
    #[error("select at least two waypoints to plan a route (selected {selected})")]
    InsufficientSelection {
        /// Number of waypoints supplied.
        selected: usize,
    },
    /// The tour solver rejected the selection.
    #[error(transparent)]
    Tour(#[from] TourError),
}
