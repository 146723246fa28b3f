//! Route lifecycle states and fencing tokens.

use geo::LineString;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ProviderRoute, RouteInstruction, Tour};

/// Monotonic fencing token minted for every route request.
///
/// Only a completion carrying the controller's current id may change the
/// route state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RequestId(u64);

impl RequestId {
    /// Token held before any request has been issued.
    pub const INITIAL: Self = Self(0);

    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload of a successfully routed tour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActiveRoute {
    /// Stops in visiting order.
    pub tour: Tour,
    /// Route polyline from the provider.
    pub geometry: LineString<f64>,
    /// Total length in metres.
    pub distance_meters: f64,
    /// Total travel time in seconds.
    pub duration_seconds: f64,
    /// Turn-by-turn directions.
    pub instructions: Vec<RouteInstruction>,
}

impl ActiveRoute {
    pub(crate) fn new(tour: Tour, route: ProviderRoute) -> Self {
        Self {
            tour,
            geometry: route.geometry,
            distance_meters: route.distance_meters,
            duration_seconds: route.duration_seconds,
            instructions: route.instructions,
        }
    }
}

/// The single published state of the route lifecycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "lowercase"))]
pub enum RouteState {
    /// No route requested, or the last one was cleared.
    Idle {
        /// Most recently minted token.
        request_id: RequestId,
    },
    /// A request is awaiting its provider.
    Pending {
        /// Token of the outstanding request.
        request_id: RequestId,
    },
    /// The current request was routed successfully.
    Active {
        /// Token of the routed request.
        request_id: RequestId,
        /// Route payload.
        route: ActiveRoute,
    },
    /// The current request failed at the provider.
    Error {
        /// Token of the failed request.
        request_id: RequestId,
        /// Provider failure description.
        message: String,
    },
}

impl Default for RouteState {
    fn default() -> Self {
        Self::Idle {
            request_id: RequestId::INITIAL,
        }
    }
}

impl RouteState {
    /// Token carried by this state.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        match self {
            Self::Idle { request_id }
            | Self::Pending { request_id }
            | Self::Active { request_id, .. }
            | Self::Error { request_id, .. } => *request_id,
        }
    }

    /// Short lowercase name of the state.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "idle",
            Self::Pending { .. } => "pending",
            Self::Active { .. } => "active",
            Self::Error { .. } => "error",
        }
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// The routed payload, when active.
    #[must_use]
    pub const fn active_route(&self) -> Option<&ActiveRoute> {
        match self {
            Self::Active { route, .. } => Some(route),
            _ => None,
        }
    }

    /// The failure message, when in error.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}
