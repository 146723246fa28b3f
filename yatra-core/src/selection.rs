//! The user's choice of waypoints and optional start/end anchors.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Waypoint, WaypointSet};

/// Which end of a tour an anchor pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AnchorRole {
    /// First stop of the tour.
    Start,
    /// Last stop of the tour.
    End,
}

impl std::fmt::Display for AnchorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Errors returned by [`Selection`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// An anchor named a waypoint that is not selected.
    #[error("waypoint {id} must be selected before it can be the {role} anchor")]
    NotSelected {
        /// Requested anchor id.
        id: u64,
        /// Anchor being set.
        role: AnchorRole,
    },
    /// The same waypoint cannot be both start and end of a multi-stop tour.
    #[error("waypoint {id} is already the {other} anchor")]
    AnchorConflict {
        /// Requested anchor id.
        id: u64,
        /// Anchor that already holds the id.
        other: AnchorRole,
    },
    /// A selected id is not part of the current waypoint set.
    #[error("waypoint {id} is not in the current waypoint set")]
    UnknownWaypoint {
        /// The missing id.
        id: u64,
    },
}

/// Selected waypoint ids, in the order the user picked them, plus anchors.
///
/// Anchors always name selected ids: deselecting an anchored waypoint clears
/// the anchor.
///
/// # Examples
/// ```
/// use yatra_core::Selection;
///
/// let mut selection = Selection::new();
/// selection.select(1);
/// selection.select(2);
/// selection.set_start(2)?;
/// selection.deselect(2);
/// assert_eq!(selection.start(), None);
/// # Ok::<(), yatra_core::SelectionError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Selection {
    ids: Vec<u64>,
    start: Option<u64>,
    end: Option<u64>,
}

/// A selection resolved against a [`WaypointSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    /// Selected waypoints in selection order.
    pub waypoints: Vec<Waypoint>,
    /// Start anchor, if set.
    pub start: Option<Waypoint>,
    /// End anchor, if set.
    pub end: Option<Waypoint>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: Vec::new(),
            start: None,
            end: None,
        }
    }

    /// Build a selection from ids, ignoring repeats.
    #[must_use]
    pub fn from_ids<I: IntoIterator<Item = u64>>(ids: I) -> Self {
        let mut selection = Self::new();
        for id in ids {
            selection.select(id);
        }
        selection
    }

    /// Add `id` to the selection. Returns `false` if it was already selected.
    pub fn select(&mut self, id: u64) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`, clearing any anchor that referenced it.
    ///
    /// Returns `false` if `id` was not selected.
    pub fn deselect(&mut self, id: u64) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&selected| selected != id);
        if self.ids.len() == before {
            return false;
        }
        self.drop_dangling_anchors();
        true
    }

    /// Pin `id` as the first stop.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NotSelected`] when `id` is not selected and
    /// [`SelectionError::AnchorConflict`] when it is already the end anchor
    /// of a multi-stop selection.
    pub fn set_start(&mut self, id: u64) -> Result<(), SelectionError> {
        self.check_anchor(id, AnchorRole::Start, self.end)?;
        self.start = Some(id);
        Ok(())
    }

    /// Pin `id` as the last stop.
    ///
    /// # Errors
    ///
    /// Mirrors [`Selection::set_start`].
    pub fn set_end(&mut self, id: u64) -> Result<(), SelectionError> {
        self.check_anchor(id, AnchorRole::End, self.start)?;
        self.end = Some(id);
        Ok(())
    }

    fn check_anchor(
        &self,
        id: u64,
        role: AnchorRole,
        other: Option<u64>,
    ) -> Result<(), SelectionError> {
        if !self.contains(id) {
            return Err(SelectionError::NotSelected { id, role });
        }
        if other == Some(id) && self.ids.len() > 1 {
            let other_role = match role {
                AnchorRole::Start => AnchorRole::End,
                AnchorRole::End => AnchorRole::Start,
            };
            return Err(SelectionError::AnchorConflict {
                id,
                other: other_role,
            });
        }
        Ok(())
    }

    /// Remove the start anchor.
    pub const fn clear_start(&mut self) {
        self.start = None;
    }

    /// Remove the end anchor.
    pub const fn clear_end(&mut self) {
        self.end = None;
    }

    /// Deselect everything and drop both anchors.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.start = None;
        self.end = None;
    }

    /// Drop ids missing from `set`, clearing anchors that no longer apply.
    ///
    /// Returns the number of ids removed.
    pub fn retain_known(&mut self, set: &WaypointSet) -> usize {
        let before = self.ids.len();
        self.ids.retain(|&id| set.contains(id));
        self.drop_dangling_anchors();
        before - self.ids.len()
    }

    fn drop_dangling_anchors(&mut self) {
        if self.start.is_some_and(|id| !self.ids.contains(&id)) {
            self.start = None;
        }
        if self.end.is_some_and(|id| !self.ids.contains(&id)) {
            self.end = None;
        }
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Start anchor id.
    #[must_use]
    pub const fn start(&self) -> Option<u64> {
        self.start
    }

    /// End anchor id.
    #[must_use]
    pub const fn end(&self) -> Option<u64> {
        self.end
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Look up every selected id in `set`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownWaypoint`] for the first id that the
    /// set does not contain.
    pub fn resolve(&self, set: &WaypointSet) -> Result<ResolvedSelection, SelectionError> {
        let lookup = |id: u64| {
            set.get(id)
                .cloned()
                .ok_or(SelectionError::UnknownWaypoint { id })
        };
        let waypoints = self
            .ids
            .iter()
            .map(|&id| lookup(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResolvedSelection {
            waypoints,
            start: self.start.map(lookup).transpose()?,
            end: self.end.map(lookup).transpose()?,
        })
    }
}
