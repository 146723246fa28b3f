//! Routing provider trait, its display resource, and the route payload.

use std::future::Future;
use std::pin::Pin;

use geo::{Coord, LineString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ProviderError;

/// Boxed future type for provider calls that outlive the call site.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Eventual outcome of a [`RoutingProvider::compute_route`] call.
pub type RouteFuture = BoxFuture<Result<ProviderRoute, ProviderError>>;

/// One turn-by-turn step of a computed route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteInstruction {
    /// Zero-based position of the step along the route.
    pub step_index: usize,
    /// Human-readable manoeuvre, e.g. "Turn left onto MG Road".
    pub direction_text: String,
    /// Road the step travels along, when named.
    pub road_name: Option<String>,
    /// Length of the step in metres.
    pub distance_meters: f64,
    /// Travel time of the step in seconds.
    pub duration_seconds: f64,
}

/// A route returned by a provider for an ordered list of waypoints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProviderRoute {
    /// Route polyline (`x = lon`, `y = lat`).
    pub geometry: LineString<f64>,
    /// Total length in metres.
    pub distance_meters: f64,
    /// Total travel time in seconds.
    pub duration_seconds: f64,
    /// Turn-by-turn directions in travel order.
    pub instructions: Vec<RouteInstruction>,
}

/// Whether a provider resource still has a call outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStatus {
    /// The provider call has not settled; releasing now is unsafe.
    InFlight,
    /// The provider call has settled (or never started).
    Settled,
}

/// Display resource a provider attaches for one route request.
///
/// Some providers cannot be torn down while their request is running. The
/// controller therefore asks [`RouteOverlay::status`] first and only calls
/// [`RouteOverlay::release`] once the resource reports
/// [`OverlayStatus::Settled`]. Otherwise it drops its reference, so
/// implementations must not cancel the underlying call on drop.
pub trait RouteOverlay {
    /// Report whether the associated provider call is still running.
    fn status(&self) -> OverlayStatus;

    /// Dispose of the resource. Only called when [`Self::status`] reports
    /// [`OverlayStatus::Settled`].
    fn release(self);
}

/// The two halves of a dispatched provider call.
pub struct ProviderCall<O> {
    /// Resource owned by the controller until torn down.
    pub overlay: O,
    /// Future the caller awaits for the route.
    pub response: RouteFuture,
}

impl<O: std::fmt::Debug> std::fmt::Debug for ProviderCall<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCall")
            .field("overlay", &self.overlay)
            .field("response", &"<future>")
            .finish()
    }
}

/// Turn an ordered list of coordinates into a routed path.
///
/// Implementations start the request and hand back a [`ProviderCall`]
/// immediately; the response future is the only suspension point in the
/// engine. Calls are not cancellable: callers that lose interest simply stop
/// awaiting and let fencing discard the result.
///
/// # Examples
///
/// ```
/// use geo::{Coord, LineString};
/// use yatra_core::{
///     OverlayStatus, ProviderCall, ProviderError, ProviderRoute, RouteOverlay, RoutingProvider,
/// };
///
/// struct StraightLine;
/// struct NoOverlay;
///
/// impl RouteOverlay for NoOverlay {
///     fn status(&self) -> OverlayStatus {
///         OverlayStatus::Settled
///     }
///     fn release(self) {}
/// }
///
/// impl RoutingProvider for StraightLine {
///     type Overlay = NoOverlay;
///
///     fn compute_route(&self, waypoints: &[Coord<f64>]) -> ProviderCall<NoOverlay> {
///         let geometry = LineString::from(waypoints.to_vec());
///         let outcome = if waypoints.len() < 2 {
///             Err(ProviderError::InsufficientWaypoints { count: waypoints.len() })
///         } else {
///             Ok(ProviderRoute {
///                 geometry,
///                 distance_meters: 0.0,
///                 duration_seconds: 0.0,
///                 instructions: Vec::new(),
///             })
///         };
///         ProviderCall {
///             overlay: NoOverlay,
///             response: Box::pin(async move { outcome }),
///         }
///     }
/// }
///
/// let call = StraightLine.compute_route(&[Coord { x: 0.0, y: 0.0 }]);
/// assert_eq!(call.overlay.status(), OverlayStatus::Settled);
/// ```
pub trait RoutingProvider {
    /// Display resource tied to each call.
    type Overlay: RouteOverlay;

    /// Start routing through `waypoints` in order.
    ///
    /// Implementations should settle with
    /// [`ProviderError::InsufficientWaypoints`] when given fewer than two
    /// coordinates.
    fn compute_route(&self, waypoints: &[Coord<f64>]) -> ProviderCall<Self::Overlay>;
}
