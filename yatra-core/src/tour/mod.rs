//! Visiting orders over a selection of waypoints.
//!
//! [`TourSolver`] abstracts the ordering heuristic; [`NearestNeighbourSolver`]
//! is the default greedy implementation. Solvers are synchronous and never
//! suspend.

mod error;
mod solver;

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Waypoint;

pub use error::TourError;
pub use solver::{EARTH_RADIUS_METERS, NearestNeighbourSolver, TourSolver, haversine_distance};

/// An ordered, duplicate-free sequence of at least one waypoint.
///
/// # Examples
/// ```
/// use yatra_core::{NearestNeighbourSolver, TourSolver, Waypoint};
///
/// let a = Waypoint::new(1, "A", 0.0, 0.0)?;
/// let b = Waypoint::new(2, "B", 0.0, 1.0)?;
/// let tour = NearestNeighbourSolver.solve(&[a, b], None, None)?;
/// assert_eq!(tour.ids(), vec![1, 2]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tour {
    waypoints: Vec<Waypoint>,
}

impl Tour {
    /// Wrap an already ordered, non-empty list of waypoints.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::EmptySelection`] for an empty list and
    /// [`TourError::DuplicateWaypoint`] when an id repeats.
    pub fn from_ordered(waypoints: Vec<Waypoint>) -> Result<Self, TourError> {
        if waypoints.is_empty() {
            return Err(TourError::EmptySelection);
        }
        if let Some(id) = solver::first_duplicate(&waypoints) {
            return Err(TourError::DuplicateWaypoint { id });
        }
        Ok(Self { waypoints })
    }

    /// Waypoints in visiting order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoint ids in visiting order.
    #[must_use]
    pub fn ids(&self) -> Vec<u64> {
        self.waypoints.iter().map(Waypoint::id).collect()
    }

    /// Coordinates in visiting order, ready for a routing provider.
    #[must_use]
    pub fn coordinates(&self) -> Vec<Coord<f64>> {
        self.waypoints.iter().map(Waypoint::location).collect()
    }

    /// Number of stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`: [`Self::from_ordered`] refuses an empty list, so a
    /// tour has at least one stop.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// First stop.
    #[must_use]
    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    /// Last stop.
    #[must_use]
    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// Straight-line length of the tour in metres.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "summing great-circle legs is floating-point by nature"
    )]
    pub fn great_circle_meters(&self) -> f64 {
        self.waypoints
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some(haversine_distance(from.location(), to.location())),
                _ => None,
            })
            .sum()
    }
}
