//! The working set of selectable waypoints.

use std::collections::HashMap;

use geo::{Coord, Rect};
use log::debug;

use crate::{RawWaypointRecord, Waypoint};

/// Ordered, validated waypoints derived from the most recent catalog data.
///
/// The set is rebuilt wholesale on every refresh; there is no incremental
/// update. Records whose coordinates do not parse are dropped silently, so
/// malformed catalog rows never reach tour computation.
///
/// # Examples
/// ```
/// use yatra_core::{RawCoordinate, RawWaypointRecord, WaypointSet};
///
/// let mut broken = RawWaypointRecord::at(2, 0.0, 0.0);
/// broken.latitude = Some(RawCoordinate::Text("abc".into()));
/// let records = vec![RawWaypointRecord::at(1, 17.7, 83.3), broken];
///
/// let set = WaypointSet::build(&records);
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.rejected(), 1);
/// assert!(set.get(2).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointSet {
    waypoints: Vec<Waypoint>,
    positions: HashMap<u64, usize>,
    rejected: usize,
}

impl WaypointSet {
    /// Validate `records` and keep the usable ones in input order.
    #[must_use]
    pub fn build(records: &[RawWaypointRecord]) -> Self {
        let mut waypoints = Vec::with_capacity(records.len());
        let mut rejected = 0_usize;
        for record in records {
            match Waypoint::try_from(record) {
                Ok(waypoint) => waypoints.push(waypoint),
                Err(err) => {
                    debug!("dropping catalog record: {err}");
                    rejected += 1;
                }
            }
        }
        Self::from_validated(waypoints, rejected)
    }

    /// Wrap waypoints that were validated elsewhere.
    #[must_use]
    pub fn from_waypoints(waypoints: Vec<Waypoint>) -> Self {
        Self::from_validated(waypoints, 0)
    }

    fn from_validated(waypoints: Vec<Waypoint>, rejected: usize) -> Self {
        let mut positions = HashMap::with_capacity(waypoints.len());
        for (position, waypoint) in waypoints.iter().enumerate() {
            // First occurrence wins for lookups.
            positions.entry(waypoint.id()).or_insert(position);
        }
        Self {
            waypoints,
            positions,
            rejected,
        }
    }

    /// Look up a waypoint by catalog id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Waypoint> {
        self.positions
            .get(&id)
            .and_then(|&position| self.waypoints.get(position))
    }

    /// Whether a waypoint with `id` is present.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.positions.contains_key(&id)
    }

    /// Iterate waypoints in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.waypoints.iter()
    }

    /// Waypoints in catalog order.
    #[must_use]
    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of valid waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether no valid waypoints are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of records dropped during the last build.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.rejected
    }

    /// Smallest rectangle containing every waypoint, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let mut iter = self.waypoints.iter().map(Waypoint::location);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), loc| {
            (
                Coord {
                    x: min.x.min(loc.x),
                    y: min.y.min(loc.y),
                },
                Coord {
                    x: max.x.max(loc.x),
                    y: max.y.max(loc.y),
                },
            )
        });
        Some(Rect::new(min, max))
    }
}

impl<'a> IntoIterator for &'a WaypointSet {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
