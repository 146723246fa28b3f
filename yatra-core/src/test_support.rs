//! Test doubles for the routing boundary.
//!
//! [`StubRoutingProvider`] records every dispatched call and leaves it
//! pending until the test settles it through the matching [`StubCall`], so
//! tests decide the order in which provider calls finish.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use geo::{Coord, LineString};
use tokio::sync::oneshot;

use crate::{
    NearestNeighbourSolver, OverlayStatus, ProviderCall, ProviderError, ProviderRoute,
    RouteInstruction, RouteOverlay, RoutingProvider, Tour, TourError, TourSolver, Waypoint,
};

type Responder = oneshot::Sender<Result<ProviderRoute, ProviderError>>;

/// Address reported when a stub call is abandoned without a response.
pub const STUB_URL: &str = "stub://routing";

/// Routing provider whose calls are settled by hand.
///
/// Clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct StubRoutingProvider {
    calls: Arc<Mutex<Vec<StubCall>>>,
}

impl StubRoutingProvider {
    /// Create a provider with an empty call log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<StubCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every call dispatched so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<StubCall> {
        self.log().clone()
    }

    /// The call at `index`, in dispatch order.
    #[must_use]
    pub fn call(&self, index: usize) -> Option<StubCall> {
        self.log().get(index).cloned()
    }

    /// The most recently dispatched call.
    #[must_use]
    pub fn last_call(&self) -> Option<StubCall> {
        self.log().last().cloned()
    }

    /// Number of calls dispatched so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.log().len()
    }
}

impl RoutingProvider for StubRoutingProvider {
    type Overlay = StubOverlay;

    fn compute_route(&self, waypoints: &[Coord<f64>]) -> ProviderCall<StubOverlay> {
        let (tx, rx) = oneshot::channel();
        let overlay = StubOverlay::default();
        let call = StubCall {
            waypoints: waypoints.to_vec(),
            responder: Arc::new(Mutex::new(Some(tx))),
            overlay: overlay.clone(),
        };
        self.log().push(call);
        let response = Box::pin(async move {
            rx.await.unwrap_or_else(|_| {
                Err(ProviderError::NetworkError {
                    url: STUB_URL.to_owned(),
                    message: "stub call dropped without a response".to_owned(),
                })
            })
        });
        ProviderCall { overlay, response }
    }
}

/// Handle on one dispatched stub call.
#[derive(Debug, Clone)]
pub struct StubCall {
    waypoints: Vec<Coord<f64>>,
    responder: Arc<Mutex<Option<Responder>>>,
    overlay: StubOverlay,
}

impl StubCall {
    /// Coordinates the provider was asked to route, in order.
    #[must_use]
    pub fn waypoints(&self) -> &[Coord<f64>] {
        &self.waypoints
    }

    /// Settle the call with `route`. Returns `false` if already settled.
    #[must_use = "a false return means the call had already settled"]
    pub fn succeed(&self, route: ProviderRoute) -> bool {
        self.respond(Ok(route))
    }

    /// Settle the call with `error`. Returns `false` if already settled.
    #[must_use = "a false return means the call had already settled"]
    pub fn fail(&self, error: ProviderError) -> bool {
        self.respond(Err(error))
    }

    /// Drop the responder without answering, as a provider that vanishes
    /// would. Returns `false` if already settled.
    #[must_use = "a false return means the call had already settled"]
    pub fn abandon(&self) -> bool {
        let responder = self.take_responder();
        self.overlay.in_flight.store(false, Ordering::SeqCst);
        responder.is_some()
    }

    /// Whether the controller released this call's overlay.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.overlay.released.load(Ordering::SeqCst)
    }

    /// Whether the call is still waiting for a response.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.overlay.in_flight.load(Ordering::SeqCst)
    }

    fn take_responder(&self) -> Option<Responder> {
        self.responder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn respond(&self, outcome: Result<ProviderRoute, ProviderError>) -> bool {
        let Some(tx) = self.take_responder() else {
            return false;
        };
        self.overlay.in_flight.store(false, Ordering::SeqCst);
        if tx.send(outcome).is_err() {
            log::debug!("stub call settled after its ticket was dropped");
        }
        true
    }
}

/// Overlay whose status follows its [`StubCall`].
#[derive(Debug, Clone)]
pub struct StubOverlay {
    in_flight: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
}

impl Default for StubOverlay {
    fn default() -> Self {
        Self {
            in_flight: Arc::new(AtomicBool::new(true)),
            released: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl RouteOverlay for StubOverlay {
    fn status(&self) -> OverlayStatus {
        if self.in_flight.load(Ordering::SeqCst) {
            OverlayStatus::InFlight
        } else {
            OverlayStatus::Settled
        }
    }

    fn release(self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Tour solver that counts invocations before delegating to
/// [`NearestNeighbourSolver`].
#[derive(Debug, Clone, Default)]
pub struct CountingSolver {
    calls: Arc<AtomicUsize>,
}

impl CountingSolver {
    /// Number of `solve` calls observed across clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TourSolver for CountingSolver {
    fn solve(
        &self,
        selection: &[Waypoint],
        start: Option<&Waypoint>,
        end: Option<&Waypoint>,
    ) -> Result<Tour, TourError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        NearestNeighbourSolver.solve(selection, start, end)
    }
}

/// A fixed route through `waypoints` with one departure and one arrival
/// instruction.
#[must_use]
pub fn sample_route(waypoints: &[Coord<f64>], distance_meters: f64) -> ProviderRoute {
    ProviderRoute {
        geometry: LineString::from(waypoints.to_vec()),
        distance_meters,
        duration_seconds: 600.0,
        instructions: vec![
            RouteInstruction {
                step_index: 0,
                direction_text: "Head north".to_owned(),
                road_name: Some("Temple Road".to_owned()),
                distance_meters,
                duration_seconds: 600.0,
            },
            RouteInstruction {
                step_index: 1,
                direction_text: "You have arrived at your destination".to_owned(),
                road_name: None,
                distance_meters: 0.0,
                duration_seconds: 0.0,
            },
        ],
    }
}

/// Waypoints laid out along a meridian: id `n` sits at latitude `lat`,
/// longitude `0`.
///
/// # Panics
///
/// Panics if a latitude is not finite.
#[must_use]
#[expect(clippy::expect_used, reason = "test fixtures use literal coordinates")]
pub fn meridian_waypoints(points: &[(u64, f64)]) -> Vec<Waypoint> {
    points
        .iter()
        .map(|&(id, lat)| {
            Waypoint::new(id, format!("Temple {id}"), lat, 0.0).expect("valid fixture latitude")
        })
        .collect()
}
