use thiserror::Error;

/// Errors a [`crate::RoutingProvider`] call can settle with.
///
/// The controller never retries; the message of the current request's error
/// becomes the `Error` route state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Fewer than two coordinates were supplied.
    #[error("a route needs at least two waypoints, got {count}")]
    InsufficientWaypoints {
        /// Number of coordinates received.
        count: usize,
    },
    /// The routing service could not be reached.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The routing service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The routing service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The routing service rejected the request.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `NoRoute`.
        code: String,
        /// Service message, possibly empty.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
}
