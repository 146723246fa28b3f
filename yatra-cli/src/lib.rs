//! Command-line interface for planning temple routes with Yatra.
#![forbid(unsafe_code)]

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use env_logger::{Builder, Target};
use log::LevelFilter;
use tokio::runtime::Runtime;

mod catalog;
mod error;
mod plan;
mod waypoints;

pub use error::CliError;

use plan::PlanArgs;
use waypoints::WaypointsArgs;

const ARG_CATALOG: &str = "catalog";
const ARG_CATALOG_URL: &str = "catalog-url";
const ARG_DEITY: &str = "deity";
const ARG_DISTRICT: &str = "district";
const ARG_OUTPUT: &str = "output";
const ARG_PLAN_SELECT: &str = "select";
const ARG_PLAN_START: &str = "start";
const ARG_PLAN_END: &str = "end";
const ARG_PLAN_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_PLAN_PROFILE: &str = "profile";
const ENV_PLAN_SELECT: &str = "YATRA_CMDS_PLAN_SELECT";

/// Run the Yatra CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns the first failure encountered; callers print it and exit with a
/// non-zero status.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.log_level)?;
    let mut stdout = io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    let runtime = build_runtime()?;
    match command {
        Command::Waypoints(args) => runtime.block_on(waypoints::run_waypoints(args, writer)),
        Command::Plan(args) => runtime.block_on(plan::run_plan(args, writer)),
    }
}

fn build_runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

fn init_logging(level: LevelFilter) -> Result<(), CliError> {
    Builder::new()
        .filter_level(level)
        .target(Target::Stderr)
        .parse_env("YATRA_LOG")
        .try_init()?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "yatra",
    about = "Plan multi-stop temple routes from a catalog",
    version
)]
struct Cli {
    /// Minimum level of log records written to stderr.
    #[arg(long, global = true, value_name = "level", default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the valid waypoints of a catalog.
    Waypoints(WaypointsArgs),
    /// Order a selection of waypoints and route it through OSRM.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
