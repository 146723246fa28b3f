//! Dispatched requests and their completions.

use crate::{ProviderError, ProviderRoute, RouteFuture, Tour};

use super::state::RequestId;

/// What happened to the previously registered provider resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// The resource had settled and was released.
    Released,
    /// The resource was mid-flight; only the controller's reference was
    /// dropped.
    Detached,
}

/// Whether a completion moved the route state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The completion belonged to the current request and was applied.
    Applied,
    /// The completion was superseded or cleared and was discarded.
    Stale,
}

/// A dispatched route request.
///
/// Await [`RouteTicket::settle`] and hand the result back to
/// [`crate::RouteController::complete`]. Dropping a ticket abandons the
/// request; the state stays `Pending` until a newer request or `clear()`.
#[must_use = "a route ticket must be settled and completed to leave Pending"]
pub struct RouteTicket {
    request_id: RequestId,
    tour: Tour,
    response: RouteFuture,
    teardown: Option<Teardown>,
}

impl RouteTicket {
    pub(crate) fn new(
        request_id: RequestId,
        tour: Tour,
        response: RouteFuture,
        teardown: Option<Teardown>,
    ) -> Self {
        Self {
            request_id,
            tour,
            response,
            teardown,
        }
    }

    /// Fencing token minted for this request.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Tour handed to the provider.
    #[must_use]
    pub const fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Teardown applied to the previous resource, if one was registered.
    #[must_use]
    pub const fn teardown(&self) -> Option<Teardown> {
        self.teardown
    }

    /// Wait for the provider to settle.
    pub async fn settle(self) -> RouteCompletion {
        let outcome = self.response.await;
        RouteCompletion {
            request_id: self.request_id,
            tour: self.tour,
            outcome,
        }
    }
}

impl std::fmt::Debug for RouteTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTicket")
            .field("request_id", &self.request_id)
            .field("tour", &self.tour.ids())
            .field("teardown", &self.teardown)
            .finish_non_exhaustive()
    }
}

/// A settled provider call tagged with the request it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCompletion {
    request_id: RequestId,
    tour: Tour,
    outcome: Result<ProviderRoute, ProviderError>,
}

impl RouteCompletion {
    /// Build a completion directly, e.g. when the response was awaited by
    /// other means.
    #[must_use]
    pub const fn new(
        request_id: RequestId,
        tour: Tour,
        outcome: Result<ProviderRoute, ProviderError>,
    ) -> Self {
        Self {
            request_id,
            tour,
            outcome,
        }
    }

    /// Token of the request this completion answers.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Tour that was routed.
    #[must_use]
    pub const fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Provider result.
    #[must_use]
    pub const fn outcome(&self) -> &Result<ProviderRoute, ProviderError> {
        &self.outcome
    }

    pub(crate) fn into_parts(self) -> (RequestId, Tour, Result<ProviderRoute, ProviderError>) {
        (self.request_id, self.tour, self.outcome)
    }
}
