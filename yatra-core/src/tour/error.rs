use thiserror::Error;

use crate::AnchorRole;

/// Errors from [`crate::TourSolver::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TourError {
    /// No waypoints were supplied.
    ///
    /// A tour needs at least one stop. Callers should check the selection
    /// size before solving.
    #[error("at least one waypoint is required to build a tour")]
    EmptySelection,
    /// The same waypoint appeared twice in the selection.
    #[error("waypoint {id} appears more than once in the selection")]
    DuplicateWaypoint {
        /// The repeated id.
        id: u64,
    },
    /// An anchor is not a member of the selection.
    #[error("{role} anchor {id} is not part of the selection")]
    AnchorNotSelected {
        /// Anchor that failed.
        role: AnchorRole,
        /// Id named by the anchor.
        id: u64,
    },
    /// Start and end anchors name the same waypoint in a multi-stop tour.
    #[error("waypoint {id} cannot be both the start and the end of the tour")]
    ConflictingAnchors {
        /// The doubly anchored id.
        id: u64,
    },
}
