//! `plan` command: order a selection and route it through OSRM.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use yatra_core::{PlanningSession, RawWaypointRecord, RouteState, RoutingProvider};
use yatra_data::catalog::CatalogFilter;
use yatra_data::routing::{OsrmRouteProvider, OsrmRouteProviderConfig};

use crate::catalog::{CatalogSource, write_json};
use crate::{
    ARG_CATALOG, ARG_CATALOG_URL, ARG_DEITY, ARG_DISTRICT, ARG_OUTPUT, ARG_PLAN_END,
    ARG_PLAN_OSRM_BASE_URL, ARG_PLAN_PROFILE, ARG_PLAN_SELECT, ARG_PLAN_START, CliError,
    ENV_PLAN_SELECT,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load the temple catalog, order the selected temples with \
                 the nearest-neighbour heuristic (honouring optional start \
                 and end anchors) and ask an OSRM instance for the road \
                 route. The final route state is printed as JSON.",
    about = "Plan a route through selected temples"
)]
#[ortho_config(prefix = "YATRA")]
pub(crate) struct PlanArgs {
    /// Path to a JSON catalog export.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Base URL of the catalog service (e.g. "http://localhost:5000").
    #[arg(long = ARG_CATALOG_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) catalog_url: Option<String>,
    /// Only consider temples of this deity category ("All" for any).
    #[arg(long = ARG_DEITY, value_name = "category")]
    #[serde(default)]
    pub(crate) deity: Option<String>,
    /// Only consider temples in this district ("All" for any).
    #[arg(long = ARG_DISTRICT, value_name = "name")]
    #[serde(default)]
    pub(crate) district: Option<String>,
    /// Comma-separated catalog ids to visit.
    #[arg(long = ARG_PLAN_SELECT, value_name = "id,...", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) select: Option<Vec<u64>>,
    /// Selected id the tour must start at.
    #[arg(long = ARG_PLAN_START, value_name = "id")]
    #[serde(default)]
    pub(crate) start: Option<u64>,
    /// Selected id the tour must end at.
    #[arg(long = ARG_PLAN_END, value_name = "id")]
    #[serde(default)]
    pub(crate) end: Option<u64>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_PLAN_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM routing profile (e.g. "driving", "foot").
    #[arg(long = ARG_PLAN_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Write the JSON to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    pub(crate) source: CatalogSource,
    pub(crate) filter: CatalogFilter,
    pub(crate) select: Vec<u64>,
    pub(crate) start: Option<u64>,
    pub(crate) end: Option<u64>,
    pub(crate) provider: OsrmRouteProviderConfig,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let select = args
            .select
            .filter(|ids| !ids.is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_PLAN_SELECT,
                env: ENV_PLAN_SELECT,
            })?;
        let source = CatalogSource::resolve(args.catalog, args.catalog_url)?;

        let mut provider = OsrmRouteProviderConfig::default();
        if let Some(base_url) = args.osrm_base_url {
            provider.base_url = base_url;
        }
        if let Some(profile) = args.profile {
            provider.profile = profile;
        }

        Ok(Self {
            source,
            filter: CatalogFilter {
                deity: args.deity,
                district: args.district,
            },
            select,
            start: args.start,
            end: args.end,
            provider,
            output: args.output,
        })
    }
}

pub(crate) async fn run_plan(args: PlanArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.source.validate()?;
    let provider = OsrmRouteProvider::with_config(config.provider.clone()).map_err(|source| {
        CliError::BuildRouteProvider {
            base_url: config.provider.base_url.clone(),
            source,
        }
    })?;
    let records = config.source.load(&config.filter).await?;
    let state = plan_route(&config, &records, provider).await?;
    write_json(&state, config.output.as_deref(), writer)?;
    ensure_routed(&state)
}

/// Select the configured ids from `records` and plan a route through them.
///
/// Provider failures are not errors here; they come back as
/// [`RouteState::Error`].
pub(crate) async fn plan_route<P: RoutingProvider>(
    config: &PlanConfig,
    records: &[RawWaypointRecord],
    provider: P,
) -> Result<RouteState, CliError> {
    let mut session = PlanningSession::new(provider);
    session.refresh(records);
    let selection = session.selection_mut();
    for &id in &config.select {
        if !selection.select(id) {
            log::debug!("id {id} selected more than once");
        }
    }
    if let Some(start) = config.start {
        selection.set_start(start)?;
    }
    if let Some(end) = config.end {
        selection.set_end(end)?;
    }
    let state = session.plan().await?;
    log::info!("route request {} settled as {}", state.request_id(), state.name());
    Ok(state)
}

fn ensure_routed(state: &RouteState) -> Result<(), CliError> {
    match state.error_message() {
        Some(message) => Err(CliError::RouteFailed {
            message: message.to_owned(),
        }),
        None => Ok(()),
    }
}
