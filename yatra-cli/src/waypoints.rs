//! `waypoints` command: list the valid waypoints of a catalog.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use yatra_core::WaypointSet;
use yatra_data::catalog::CatalogFilter;

use crate::catalog::{CatalogSource, write_json};
use crate::{ARG_CATALOG, ARG_CATALOG_URL, ARG_DEITY, ARG_DISTRICT, ARG_OUTPUT, CliError};

/// CLI arguments for the `waypoints` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load the temple catalog from a JSON export or the catalog \
                 service, drop records without usable coordinates and print \
                 the remaining waypoints as JSON.",
    about = "List the valid waypoints of a catalog"
)]
#[ortho_config(prefix = "YATRA")]
pub(crate) struct WaypointsArgs {
    /// Path to a JSON catalog export.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Base URL of the catalog service (e.g. "http://localhost:5000").
    #[arg(long = ARG_CATALOG_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) catalog_url: Option<String>,
    /// Only include temples of this deity category ("All" for any).
    #[arg(long = ARG_DEITY, value_name = "category")]
    #[serde(default)]
    pub(crate) deity: Option<String>,
    /// Only include temples in this district ("All" for any).
    #[arg(long = ARG_DISTRICT, value_name = "name")]
    #[serde(default)]
    pub(crate) district: Option<String>,
    /// Write the JSON to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl WaypointsArgs {
    pub(crate) fn into_config(self) -> Result<WaypointsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        WaypointsConfig::try_from(merged)
    }
}

/// Resolved `waypoints` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WaypointsConfig {
    pub(crate) source: CatalogSource,
    pub(crate) filter: CatalogFilter,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<WaypointsArgs> for WaypointsConfig {
    type Error = CliError;

    fn try_from(args: WaypointsArgs) -> Result<Self, Self::Error> {
        let source = CatalogSource::resolve(args.catalog, args.catalog_url)?;
        Ok(Self {
            source,
            filter: CatalogFilter {
                deity: args.deity,
                district: args.district,
            },
            output: args.output,
        })
    }
}

pub(crate) async fn run_waypoints(
    args: WaypointsArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let set = load_waypoints(&config).await?;
    write_json(&set.as_slice(), config.output.as_deref(), writer)
}

pub(crate) async fn load_waypoints(config: &WaypointsConfig) -> Result<WaypointSet, CliError> {
    config.source.validate()?;
    let records = config.source.load(&config.filter).await?;
    let set = WaypointSet::build(&records);
    if set.rejected() > 0 {
        log::warn!(
            "skipped {} catalog records without usable coordinates",
            set.rejected()
        );
    }
    Ok(set)
}
