//! Temple catalog sources.
//!
//! Records come either from the catalog HTTP service
//! ([`HttpCatalogClient`]) or from a JSON export on disk
//! ([`read_catalog`]). Both yield raw [`yatra_core::RawWaypointRecord`]s;
//! validation happens when they are built into a
//! [`yatra_core::WaypointSet`].

mod file;
mod filter;
mod http;

use camino::Utf8PathBuf;
use thiserror::Error;

pub use file::read_catalog;
pub use filter::{ALL, CatalogFilter};
pub use http::{DEFAULT_CATALOG_URL, HttpCatalogClient, HttpCatalogClientConfig};

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog service URL does not parse.
    #[error("invalid catalog URL {url:?}")]
    InvalidUrl {
        /// The rejected value.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The catalog service URL cannot carry a path.
    #[error("catalog URL {url:?} cannot be used as a base")]
    CannotBeABase {
        /// The rejected value.
        url: String,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// The request failed or returned a non-success status.
    #[error("catalog request to {url} failed")]
    Request {
        /// Request URL.
        url: String,
        /// Transport or status error.
        #[source]
        source: reqwest::Error,
    },
    /// The catalog file could not be read.
    #[error("failed to read catalog file {path}")]
    Io {
        /// File path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The payload is not a JSON array of catalog records.
    #[error("failed to decode catalog from {origin}: {message}")]
    Decode {
        /// URL or path the payload came from.
        origin: String,
        /// Decoder error description.
        message: String,
    },
}
