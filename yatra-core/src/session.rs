//! Glue tying catalog data, the user's selection and the route controller.

use thiserror::Error;
use tokio::sync::watch;

use crate::{
    CompletionOutcome, NearestNeighbourSolver, RawWaypointRecord, RouteCompletion,
    RouteController, RouteRequestError, RouteState, RouteTicket, RoutingProvider, Selection,
    SelectionError, Teardown, TourSolver, WaypointSet,
};

/// Errors raised while turning the current selection into a route request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The selection does not resolve against the waypoint set.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// The controller refused the request.
    #[error(transparent)]
    Route(#[from] RouteRequestError),
}

/// A planning session: the latest [`WaypointSet`], the user's
/// [`Selection`] and the [`RouteController`] they feed.
#[derive(Debug)]
pub struct PlanningSession<P, S = NearestNeighbourSolver>
where
    P: RoutingProvider,
{
    waypoints: WaypointSet,
    selection: Selection,
    controller: RouteController<P, S>,
}

impl<P: RoutingProvider> PlanningSession<P> {
    /// Start an empty session routed through `provider`.
    pub fn new(provider: P) -> Self {
        Self::with_controller(RouteController::new(provider))
    }
}

impl<P, S> PlanningSession<P, S>
where
    P: RoutingProvider,
    S: TourSolver,
{
    /// Start an empty session around an existing controller.
    pub fn with_controller(controller: RouteController<P, S>) -> Self {
        Self {
            waypoints: WaypointSet::default(),
            selection: Selection::new(),
            controller,
        }
    }

    /// Replace the waypoint set with freshly fetched records.
    ///
    /// Selected ids missing from the new set are dropped along with any
    /// anchors naming them. Returns the number of ids dropped.
    pub fn refresh(&mut self, records: &[RawWaypointRecord]) -> usize {
        self.waypoints = WaypointSet::build(records);
        let pruned = self.selection.retain_known(&self.waypoints);
        if pruned > 0 {
            log::debug!("refresh dropped {pruned} selected waypoint(s)");
        }
        pruned
    }

    /// The current waypoint set.
    #[must_use]
    pub const fn waypoints(&self) -> &WaypointSet {
        &self.waypoints
    }

    /// The current selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable access to the selection.
    pub const fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Resolve the selection and dispatch it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Selection`] when a selected id is unknown and
    /// [`SessionError::Route`] when the controller refuses the request.
    pub fn request_route(&mut self) -> Result<RouteTicket, SessionError> {
        let resolved = self.selection.resolve(&self.waypoints)?;
        let ticket = self.controller.request_route(
            &resolved.waypoints,
            resolved.start.as_ref(),
            resolved.end.as_ref(),
        )?;
        Ok(ticket)
    }

    /// Hand a settled completion to the controller.
    pub fn complete(&mut self, completion: RouteCompletion) -> CompletionOutcome {
        self.controller.complete(completion)
    }

    /// Request a route for the selection and wait for it to settle.
    ///
    /// # Errors
    ///
    /// Propagates the refusals of [`Self::request_route`]. Provider failures
    /// are not errors here; they surface as [`RouteState::Error`].
    pub async fn plan(&mut self) -> Result<RouteState, SessionError> {
        let ticket = self.request_route()?;
        let completion = ticket.settle().await;
        self.complete(completion);
        Ok(self.state())
    }

    /// Clear the displayed route.
    pub fn clear(&mut self) -> Option<Teardown> {
        self.controller.clear()
    }

    /// Snapshot of the route state.
    #[must_use]
    pub fn state(&self) -> RouteState {
        self.controller.state()
    }

    /// Follow route state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RouteState> {
        self.controller.subscribe()
    }

    /// The underlying controller.
    #[must_use]
    pub const fn controller(&self) -> &RouteController<P, S> {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubRoutingProvider, sample_route};
    use rstest::{fixture, rstest};

    fn records() -> Vec<RawWaypointRecord> {
        vec![
            RawWaypointRecord::at(1, 17.0, 83.0).with_name("Simhachalam"),
            RawWaypointRecord::at(2, 17.1, 83.0).with_name("Kanaka Durga"),
            RawWaypointRecord::at(3, 17.3, 83.0).with_name("Annavaram"),
        ]
    }

    #[fixture]
    fn session() -> PlanningSession<StubRoutingProvider> {
        let mut session = PlanningSession::new(StubRoutingProvider::new());
        session.refresh(&records());
        session
    }

    #[rstest]
    fn refresh_prunes_missing_selection(mut session: PlanningSession<StubRoutingProvider>) {
        session.selection_mut().select(1);
        session.selection_mut().select(3);
        session.selection_mut().set_end(3).expect("3 is selected");

        let mut fewer = records();
        fewer.truncate(2);
        let pruned = session.refresh(&fewer);

        assert_eq!(pruned, 1);
        assert_eq!(session.selection().ids(), &[1]);
        assert_eq!(session.selection().end(), None);
    }

    #[rstest]
    fn single_selection_is_refused(mut session: PlanningSession<StubRoutingProvider>) {
        session.selection_mut().select(2);
        let err = session.request_route().expect_err("one stop is not a route");
        assert_eq!(
            err,
            SessionError::Route(RouteRequestError::InsufficientSelection { selected: 1 })
        );
        assert_eq!(session.state(), RouteState::default());
    }

    #[rstest]
    fn unknown_ids_are_reported(mut session: PlanningSession<StubRoutingProvider>) {
        session.selection_mut().select(1);
        session.selection_mut().select(42);
        let err = session.request_route().expect_err("42 is unknown");
        assert_eq!(
            err,
            SessionError::Selection(SelectionError::UnknownWaypoint { id: 42 })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn plan_settles_to_active(mut session: PlanningSession<StubRoutingProvider>) {
        let provider = session.controller().provider().clone();
        session.selection_mut().select(3);
        session.selection_mut().select(1);
        session.selection_mut().set_start(1).expect("1 is selected");

        let responder = tokio::spawn(async move {
            loop {
                if let Some(call) = provider.last_call() {
                    assert!(call.succeed(sample_route(call.waypoints(), 33_000.0)));
                    break;
                }
                tokio::task::yield_now().await;
            }
        });
        let state = session.plan().await.expect("two stops plan");
        responder.await.expect("responder task");

        let route = state.active_route().expect("active");
        assert_eq!(route.tour.ids(), vec![1, 3]);
        assert_eq!(route.instructions.len(), 2);
    }
}
