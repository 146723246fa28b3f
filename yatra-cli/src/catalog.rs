//! Catalog loading and JSON output shared by the subcommands.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use yatra_core::RawWaypointRecord;
use yatra_data::catalog::{CatalogFilter, DEFAULT_CATALOG_URL, HttpCatalogClient, read_catalog};

use crate::{ARG_CATALOG, ARG_CATALOG_URL, CliError};

/// Where catalog records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CatalogSource {
    /// A JSON export on disk.
    File(Utf8PathBuf),
    /// The catalog HTTP service at this base URL.
    Http(String),
}

impl CatalogSource {
    /// Pick the source from the merged options; the HTTP service on
    /// localhost is the fallback.
    pub(crate) fn resolve(
        file: Option<Utf8PathBuf>,
        url: Option<String>,
    ) -> Result<Self, CliError> {
        match (file, url) {
            (Some(_), Some(_)) => Err(CliError::ConflictingArguments {
                first: ARG_CATALOG,
                second: ARG_CATALOG_URL,
            }),
            (Some(path), None) => Ok(Self::File(path)),
            (None, Some(url)) => Ok(Self::Http(url)),
            (None, None) => Ok(Self::Http(DEFAULT_CATALOG_URL.to_owned())),
        }
    }

    /// Check that a file source points at a regular file.
    pub(crate) fn validate(&self) -> Result<(), CliError> {
        match self {
            Self::File(path) => require_existing(path, ARG_CATALOG),
            Self::Http(_) => Ok(()),
        }
    }

    /// Load the records matching `filter`.
    ///
    /// The HTTP service filters server-side; file exports are filtered here.
    pub(crate) async fn load(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<RawWaypointRecord>, CliError> {
        let records = match self {
            Self::File(path) => filter.apply(read_catalog(path)?),
            Self::Http(url) => HttpCatalogClient::new(url.as_str())?.fetch(filter).await?,
        };
        log::info!("loaded {} catalog records", records.len());
        Ok(records)
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match yatra_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` as pretty JSON to `output`, or to `writer` when no output
/// file is configured.
pub(crate) fn write_json<T: Serialize>(
    value: &T,
    output: Option<&Utf8Path>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    payload.push('\n');
    match output {
        Some(path) => {
            yatra_fs::write_file(path, payload.as_bytes()).map_err(|source| {
                CliError::WriteOutputFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            log::info!("wrote {path}");
            Ok(())
        }
        None => writer
            .write_all(payload.as_bytes())
            .map_err(CliError::WriteOutput),
    }
}
