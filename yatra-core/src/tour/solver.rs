//! Greedy nearest-neighbour ordering with optional anchors.

use std::collections::HashSet;

use geo::Coord;

use super::{Tour, TourError};
use crate::{AnchorRole, Waypoint};

/// Mean Earth radius in metres used by [`haversine_distance`].
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two WGS84 coordinates in metres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use yatra_core::tour::haversine_distance;
///
/// let d = haversine_distance(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 1.0 });
/// assert!((d - 111_194.9).abs() < 1.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is floating-point trigonometry"
)]
pub fn haversine_distance(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat_from = from.y.to_radians();
    let lat_to = to.y.to_radians();
    let half_dlat = (to.y - from.y).to_radians() / 2.0;
    let half_dlon = (to.x - from.x).to_radians() / 2.0;
    let h = half_dlat.sin().powi(2) + lat_from.cos() * lat_to.cos() * half_dlon.sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Compute a visiting order over a selection of waypoints.
///
/// Implementations must be deterministic: identical inputs, including input
/// order, produce identical tours.
pub trait TourSolver {
    /// Order `selection`, honouring the optional anchors.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::EmptySelection`] for an empty selection, and
    /// other [`TourError`] variants when the inputs break the tour contract.
    fn solve(
        &self,
        selection: &[Waypoint],
        start: Option<&Waypoint>,
        end: Option<&Waypoint>,
    ) -> Result<Tour, TourError>;
}

impl<T: TourSolver + ?Sized> TourSolver for &T {
    fn solve(
        &self,
        selection: &[Waypoint],
        start: Option<&Waypoint>,
        end: Option<&Waypoint>,
    ) -> Result<Tour, TourError> {
        (**self).solve(selection, start, end)
    }
}

/// Nearest-neighbour heuristic with fixed start/end anchors.
///
/// From the current position the solver repeatedly moves to the closest
/// unvisited waypoint by [`haversine_distance`], breaking ties by selection
/// order. Without a start anchor the walk begins at the first selected
/// waypoint's position. The end anchor is held back until every other stop
/// has been placed. Runs in `O(n²)`.
///
/// # Examples
/// ```
/// use yatra_core::{NearestNeighbourSolver, TourSolver, Waypoint};
///
/// let a = Waypoint::new(1, "A", 0.0, 0.0)?;
/// let b = Waypoint::new(2, "B", 0.0, 1.0)?;
/// let c = Waypoint::new(3, "C", 0.0, 3.0)?;
/// let d = Waypoint::new(4, "D", 0.0, 2.0)?;
/// let selection = [a.clone(), b, c.clone(), d];
///
/// let tour = NearestNeighbourSolver.solve(&selection, Some(&a), Some(&c))?;
/// assert_eq!(tour.ids(), vec![1, 2, 4, 3]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NearestNeighbourSolver;

impl TourSolver for NearestNeighbourSolver {
    fn solve(
        &self,
        selection: &[Waypoint],
        start: Option<&Waypoint>,
        end: Option<&Waypoint>,
    ) -> Result<Tour, TourError> {
        let Some(origin) = selection.first() else {
            return Err(TourError::EmptySelection);
        };
        if let Some(id) = first_duplicate(selection) {
            return Err(TourError::DuplicateWaypoint { id });
        }
        if selection.len() == 1 {
            return Ok(Tour {
                waypoints: vec![origin.clone()],
            });
        }

        let start_index = start
            .map(|anchor| anchor_index(selection, anchor, AnchorRole::Start))
            .transpose()?;
        let end_index = end
            .map(|anchor| anchor_index(selection, anchor, AnchorRole::End))
            .transpose()?;
        if let (Some(s), Some(e)) = (start_index, end_index)
            && s == e
        {
            return Err(TourError::ConflictingAnchors {
                id: id_at(selection, s),
            });
        }

        let order = walk(selection, start_index, end_index);
        let waypoints = order
            .into_iter()
            .filter_map(|index| selection.get(index).cloned())
            .collect();
        Ok(Tour { waypoints })
    }
}

fn id_at(selection: &[Waypoint], index: usize) -> u64 {
    selection.get(index).map_or(0, Waypoint::id)
}

/// Visit order as indices into `selection`.
fn walk(selection: &[Waypoint], start: Option<usize>, end: Option<usize>) -> Vec<usize> {
    let mut placed = vec![false; selection.len()];
    let mut order = Vec::with_capacity(selection.len());

    let mut position = match start.and_then(|index| selection.get(index).map(|wp| (index, wp))) {
        Some((index, waypoint)) => {
            mark(&mut placed, index);
            order.push(index);
            waypoint.location()
        }
        None => selection
            .first()
            .map_or(Coord { x: 0.0, y: 0.0 }, Waypoint::location),
    };

    while let Some(next) = nearest_unplaced(selection, &placed, end, position) {
        mark(&mut placed, next);
        order.push(next);
        if let Some(waypoint) = selection.get(next) {
            position = waypoint.location();
        }
    }

    if let Some(index) = end {
        order.push(index);
    }
    order
}

fn mark(placed: &mut [bool], index: usize) {
    if let Some(flag) = placed.get_mut(index) {
        *flag = true;
    }
}

/// Closest unplaced waypoint to `from`, skipping the reserved end anchor.
///
/// Ties keep the earliest candidate in selection order.
fn nearest_unplaced(
    selection: &[Waypoint],
    placed: &[bool],
    reserved: Option<usize>,
    from: Coord<f64>,
) -> Option<usize> {
    selection
        .iter()
        .zip(placed)
        .enumerate()
        .filter(|&(index, (_, &done))| !done && reserved != Some(index))
        .map(|(index, (waypoint, _))| (index, haversine_distance(from, waypoint.location())))
        .fold(None, |best: Option<(usize, f64)>, (index, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((index, distance)),
        })
        .map(|(index, _)| index)
}

fn anchor_index(
    selection: &[Waypoint],
    anchor: &Waypoint,
    role: AnchorRole,
) -> Result<usize, TourError> {
    selection
        .iter()
        .position(|wp| wp.id() == anchor.id())
        .ok_or(TourError::AnchorNotSelected {
            role,
            id: anchor.id(),
        })
}

pub(super) fn first_duplicate(waypoints: &[Waypoint]) -> Option<u64> {
    let mut seen = HashSet::with_capacity(waypoints.len());
    waypoints
        .iter()
        .map(Waypoint::id)
        .find(|&id| !seen.insert(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn wp(id: u64, lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(id, format!("wp{id}"), lat, lon).expect("valid waypoint")
    }

    /// A(0,0), B(0,1), C(0,3), D(0,2).
    #[fixture]
    fn line() -> Vec<Waypoint> {
        vec![wp(1, 0.0, 0.0), wp(2, 0.0, 1.0), wp(3, 0.0, 3.0), wp(4, 0.0, 2.0)]
    }

    fn by_id(selection: &[Waypoint], id: u64) -> &Waypoint {
        selection
            .iter()
            .find(|wp| wp.id() == id)
            .expect("waypoint present")
    }

    #[rstest]
    fn start_anchor_walks_nearest_first(line: Vec<Waypoint>) {
        let start = by_id(&line, 1);
        let tour = NearestNeighbourSolver
            .solve(&line, Some(start), None)
            .expect("tour");
        assert_eq!(tour.ids(), vec![1, 2, 4, 3]);
    }

    #[rstest]
    fn end_anchor_is_withheld_until_last(line: Vec<Waypoint>) {
        let tour = NearestNeighbourSolver
            .solve(&line, Some(by_id(&line, 1)), Some(by_id(&line, 3)))
            .expect("tour");
        assert_eq!(tour.ids(), vec![1, 2, 4, 3]);
    }

    #[rstest]
    fn end_anchor_skipped_when_nearest(line: Vec<Waypoint>) {
        // From A the nearest is B, but B is reserved for the end.
        let tour = NearestNeighbourSolver
            .solve(&line, Some(by_id(&line, 1)), Some(by_id(&line, 2)))
            .expect("tour");
        assert_eq!(tour.ids(), vec![1, 4, 3, 2]);
    }

    #[rstest]
    fn implicit_start_is_first_selected(line: Vec<Waypoint>) {
        let tour = NearestNeighbourSolver.solve(&line, None, None).expect("tour");
        assert_eq!(tour.ids(), vec![1, 2, 4, 3]);
    }

    #[rstest]
    fn implicit_start_still_visits_first_selected() {
        // Walk begins at C's position; C itself is placed first (distance zero).
        let selection = vec![wp(3, 0.0, 3.0), wp(1, 0.0, 0.0), wp(2, 0.0, 1.0)];
        let tour = NearestNeighbourSolver
            .solve(&selection, None, None)
            .expect("tour");
        assert_eq!(tour.ids(), vec![3, 2, 1]);
    }

    #[rstest]
    fn implicit_start_on_reserved_end() {
        let selection = vec![wp(3, 0.0, 3.0), wp(1, 0.0, 0.0), wp(2, 0.0, 1.0)];
        let end = selection.first().cloned().expect("first");
        let tour = NearestNeighbourSolver
            .solve(&selection, None, Some(&end))
            .expect("tour");
        assert_eq!(tour.ids(), vec![2, 1, 3]);
    }

    #[rstest]
    fn ties_break_by_selection_order() {
        let selection = vec![wp(1, 0.0, 0.0), wp(2, 0.0, -1.0), wp(3, 0.0, 1.0)];
        let tour = NearestNeighbourSolver
            .solve(&selection, None, None)
            .expect("tour");
        assert_eq!(tour.ids(), vec![1, 2, 3]);
    }

    #[rstest]
    fn single_waypoint_ignores_anchors() {
        let only = wp(5, 10.0, 10.0);
        let other = wp(6, 11.0, 11.0);
        let tour = NearestNeighbourSolver
            .solve(std::slice::from_ref(&only), Some(&other), Some(&other))
            .expect("tour");
        assert_eq!(tour.ids(), vec![5]);
    }

    #[rstest]
    fn empty_selection_is_rejected() {
        let err = NearestNeighbourSolver
            .solve(&[], None, None)
            .expect_err("empty");
        assert_eq!(err, TourError::EmptySelection);
    }

    #[rstest]
    fn anchor_outside_selection_is_rejected(line: Vec<Waypoint>) {
        let stranger = wp(99, 5.0, 5.0);
        let err = NearestNeighbourSolver
            .solve(&line, None, Some(&stranger))
            .expect_err("foreign anchor");
        assert_eq!(
            err,
            TourError::AnchorNotSelected {
                role: AnchorRole::End,
                id: 99
            }
        );
    }

    #[rstest]
    fn same_start_and_end_is_rejected(line: Vec<Waypoint>) {
        let anchor = by_id(&line, 2);
        let err = NearestNeighbourSolver
            .solve(&line, Some(anchor), Some(anchor))
            .expect_err("conflict");
        assert_eq!(err, TourError::ConflictingAnchors { id: 2 });
    }

    #[rstest]
    fn duplicate_selection_is_rejected() {
        let selection = vec![wp(1, 0.0, 0.0), wp(1, 0.0, 0.0)];
        let err = NearestNeighbourSolver
            .solve(&selection, None, None)
            .expect_err("duplicate");
        assert_eq!(err, TourError::DuplicateWaypoint { id: 1 });
    }

    #[rstest]
    #[case(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 }, 0.0)]
    #[case(Coord { x: 0.0, y: 0.0 }, Coord { x: 180.0, y: 0.0 }, std::f64::consts::PI * EARTH_RADIUS_METERS)]
    fn haversine_reference_values(#[case] a: Coord<f64>, #[case] b: Coord<f64>, #[case] expected: f64) {
        assert!((haversine_distance(a, b) - expected).abs() < 1e-6);
    }

    #[rstest]
    fn haversine_is_symmetric() {
        let a = Coord { x: 83.25, y: 17.76 };
        let b = Coord { x: 80.62, y: 16.51 };
        assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
    }
}
