//! Route lifecycle state machine.
//!
//! [`RouteController`] owns the single [`RouteState`] and the provider
//! resource of the most recent request. Requests are dispatched in two
//! phases so several may be outstanding at once:
//!
//! 1. [`RouteController::request_route`] validates and solves the selection,
//!    tears down the previous resource, mints a fresh [`RequestId`], enters
//!    `Pending` and dispatches the tour, returning a [`RouteTicket`].
//! 2. The caller awaits [`RouteTicket::settle`] and feeds the resulting
//!    [`RouteCompletion`] to [`RouteController::complete`], which applies it
//!    only when its id is still current.
//!
//! Transitions are therefore ordered by issuance rather than by which
//! provider call happens to finish first.

mod error;
mod state;
mod ticket;


use log::{debug, info, warn};
use tokio::sync::watch;

use crate::{
    NearestNeighbourSolver, OverlayStatus, ProviderCall, RouteOverlay, RoutingProvider, TourSolver,
    Waypoint,
};

pub use error::RouteRequestError;
pub use state::{ActiveRoute, RequestId, RouteState};
pub use ticket::{CompletionOutcome, RouteCompletion, RouteTicket, Teardown};

/// Drives tours through a [`RoutingProvider`] and publishes the outcome.
///
/// # Examples
///
/// ```
/// use yatra_core::{RouteController, RouteRequestError, RouteState};
/// # use yatra_core::{ProviderCall, ProviderError, OverlayStatus, RouteOverlay, RoutingProvider};
/// # use geo::Coord;
/// # struct Offline;
/// # struct Nothing;
/// # impl RouteOverlay for Nothing {
/// #     fn status(&self) -> OverlayStatus { OverlayStatus::Settled }
/// #     fn release(self) {}
/// # }
/// # impl RoutingProvider for Offline {
/// #     type Overlay = Nothing;
/// #     fn compute_route(&self, _: &[Coord<f64>]) -> ProviderCall<Nothing> {
/// #         ProviderCall { overlay: Nothing, response: Box::pin(async { Err(ProviderError::ParseError { message: "offline".into() }) }) }
/// #     }
/// # }
///
/// let mut controller = RouteController::new(Offline);
/// let refused = controller.request_route(&[], None, None);
/// assert!(matches!(
///     refused,
///     Err(RouteRequestError::InsufficientSelection { selected: 0 })
/// ));
/// assert_eq!(controller.state(), RouteState::default());
/// ```
pub struct RouteController<P, S = NearestNeighbourSolver>
where
    P: RoutingProvider,
{
    provider: P,
    solver: S,
    current: RequestId,
    overlay: Option<P::Overlay>,
    state: watch::Sender<RouteState>,
}

impl<P: RoutingProvider> RouteController<P> {
    /// Create an idle controller using the nearest-neighbour solver.
    pub fn new(provider: P) -> Self {
        Self::with_solver(provider, NearestNeighbourSolver)
    }
}

impl<P, S> RouteController<P, S>
where
    P: RoutingProvider,
    S: TourSolver,
{
    /// Create an idle controller with a custom tour solver.
    pub fn with_solver(provider: P, solver: S) -> Self {
        let (state, _) = watch::channel(RouteState::default());
        Self {
            provider,
            solver,
            current: RequestId::INITIAL,
            overlay: None,
            state,
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> RouteState {
        self.state.borrow().clone()
    }

    /// Most recently minted fencing token.
    #[must_use]
    pub const fn current_request(&self) -> RequestId {
        self.current
    }

    /// Receive every subsequent state transition.
    ///
    /// The receiver starts with the current snapshot marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RouteState> {
        self.state.subscribe()
    }

    /// Whether a provider resource is currently registered.
    #[must_use]
    pub const fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// The routing provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Solve `selection` and dispatch it to the provider.
    ///
    /// `start` and `end` must be members of `selection`. The selection is
    /// visited in nearest-neighbour order by default.
    ///
    /// # Errors
    ///
    /// Returns [`RouteRequestError::InsufficientSelection`] when fewer than
    /// two waypoints are given and [`RouteRequestError::Tour`] when the
    /// solver rejects the selection. Neither touches the route state, the
    /// registered resource or the request counter.
    pub fn request_route(
        &mut self,
        selection: &[Waypoint],
        start: Option<&Waypoint>,
        end: Option<&Waypoint>,
    ) -> Result<RouteTicket, RouteRequestError> {
        if selection.len() < 2 {
            debug!(
                "route request refused: {} waypoint(s) selected",
                selection.len()
            );
            return Err(RouteRequestError::InsufficientSelection {
                selected: selection.len(),
            });
        }
        let tour = self.solver.solve(selection, start, end)?;

        let teardown = self.teardown();
        self.current = self.current.next();
        let request_id = self.current;
        self.publish(RouteState::Pending { request_id });
        info!(
            "route request {request_id} dispatched for {} waypoint(s)",
            tour.len()
        );

        let ProviderCall { overlay, response } = self.provider.compute_route(&tour.coordinates());
        self.overlay = Some(overlay);
        Ok(RouteTicket::new(request_id, tour, response, teardown))
    }

    /// Apply a settled provider call if it answers the current request.
    ///
    /// Completions for superseded or cleared requests are discarded and
    /// reported as [`CompletionOutcome::Stale`].
    pub fn complete(&mut self, completion: RouteCompletion) -> CompletionOutcome {
        let (request_id, tour, outcome) = completion.into_parts();
        let (pending, current) = {
            let state = self.state.borrow();
            (state.is_pending(), state.request_id())
        };
        if !pending || request_id != current {
            debug!("discarding stale completion {request_id} (current {current})");
            return CompletionOutcome::Stale;
        }

        let next = match outcome {
            Ok(route) => {
                info!(
                    "route request {request_id} active: {} stop(s)",
                    tour.len()
                );
                RouteState::Active {
                    request_id,
                    route: ActiveRoute::new(tour, route),
                }
            }
            Err(err) => {
                warn!("route request {request_id} failed: {err}");
                RouteState::Error {
                    request_id,
                    message: err.to_string(),
                }
            }
        };
        self.publish(next);
        CompletionOutcome::Applied
    }

    /// Drop the displayed route and return to `Idle`.
    ///
    /// No new id is minted, so any outstanding completion is discarded when
    /// it arrives. Returns how the registered resource, if any, was torn
    /// down.
    pub fn clear(&mut self) -> Option<Teardown> {
        let teardown = self.teardown();
        let request_id = self.current;
        self.publish(RouteState::Idle { request_id });
        info!("routes cleared at {request_id}");
        teardown
    }

    fn teardown(&mut self) -> Option<Teardown> {
        let overlay = self.overlay.take()?;
        match overlay.status() {
            OverlayStatus::Settled => {
                overlay.release();
                debug!("released route resource of {}", self.current);
                Some(Teardown::Released)
            }
            OverlayStatus::InFlight => {
                drop(overlay);
                debug!(
                    "teardown deferred: route resource of {} still in flight, detached",
                    self.current
                );
                Some(Teardown::Detached)
            }
        }
    }

    fn publish(&self, next: RouteState) {
        self.state.send_replace(next);
    }
}

impl<P, S> std::fmt::Debug for RouteController<P, S>
where
    P: RoutingProvider,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteController")
            .field("current", &self.current)
            .field("state", &self.state.borrow().name())
            .field("has_overlay", &self.overlay.is_some())
            .finish_non_exhaustive()
    }
}
