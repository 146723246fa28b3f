//! Behaviour-driven step definitions driving the plan CLI scenarios.

use super::helpers::CatalogDir;
use super::*;
use crate::catalog::CatalogSource;
use crate::plan::{PlanArgs, PlanConfig};
use ortho_config::{MergeComposer, OrthoConfig};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use std::cell::RefCell;

/// Scenario state shared by every plan step.
#[derive(Debug)]
struct PlanWorld {
    catalog: CatalogDir,
    cli_args: RefCell<Vec<String>>,
    cli_result: RefCell<Option<Result<PlanConfig, CliError>>>,
    config_layer: RefCell<Option<Value>>,
    env_layer: RefCell<Option<Value>>,
}

impl PlanWorld {
    fn new() -> Self {
        Self {
            catalog: CatalogDir::new(),
            cli_args: RefCell::new(Vec::new()),
            cli_result: RefCell::new(None),
            config_layer: RefCell::new(None),
            env_layer: RefCell::new(None),
        }
    }

    fn config(&self) -> std::cell::Ref<'_, Result<PlanConfig, CliError>> {
        std::cell::Ref::map(self.cli_result.borrow(), |result| {
            result.as_ref().expect("result recorded")
        })
    }
}

#[fixture]
fn world() -> PlanWorld {
    PlanWorld::new()
}

/// CLI values as a merge layer; unset flags must not mask lower layers.
fn cli_layer(args: &PlanArgs) -> Value {
    let mut value = serde_json::to_value(args).expect("arguments serialise");
    if let Value::Object(map) = &mut value {
        map.retain(|_, field| !field.is_null());
    }
    value
}

#[given("a temple catalog exists on disk")]
fn catalog_exists(#[from(world)] world: &PlanWorld) {
    assert!(world.catalog.catalog().is_file(), "catalog fixture missing");
}

#[given("I pass the catalog path and a selection with CLI flags")]
fn cli_provides_selection(#[from(world)] world: &PlanWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_CATALOG}"),
        world.catalog.catalog().into_string(),
        format!("--{ARG_PLAN_SELECT}"),
        "3,1,2".to_owned(),
        format!("--{ARG_PLAN_START}"),
        "1".to_owned(),
    ]);
}

#[given("I pass only the catalog path")]
fn cli_only_catalog(#[from(world)] world: &PlanWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_CATALOG}"),
        world.catalog.catalog().into_string(),
    ]);
}

#[given("I also pass a catalog service URL")]
fn cli_adds_catalog_url(#[from(world)] world: &PlanWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_CATALOG_URL}"),
        "http://localhost:5000".to_owned(),
    ]);
}

#[given("the OSRM settings are provided via a config file")]
fn osrm_via_config(#[from(world)] world: &PlanWorld) {
    *world.config_layer.borrow_mut() = Some(json!({
        "osrm_base_url": "http://osrm.internal:5000",
        "profile": "foot",
        "select": [9],
    }));
}

#[given("the selection is provided via environment variables")]
fn selection_via_env(#[from(world)] world: &PlanWorld) {
    *world.env_layer.borrow_mut() = Some(json!({ "select": [2, 3] }));
}

#[when("I configure the plan command")]
fn configure_plan(#[from(world)] world: &PlanWorld) {
    let mut invocation = vec!["yatra".to_owned(), "plan".to_owned()];
    invocation.extend(world.cli_args.borrow().iter().cloned());
    let file_layer = world.config_layer.borrow().clone();
    let env_layer = world.env_layer.borrow().clone();
    let outcome = Cli::try_parse_from(invocation)
        .map_err(CliError::ArgumentParsing)
        .and_then(|cli| match cli.command {
            Command::Plan(args) if file_layer.is_none() && env_layer.is_none() => {
                PlanConfig::try_from(args)
            }
            Command::Plan(args) => {
                let mut composer = MergeComposer::new();
                if let Some(layer) = file_layer {
                    composer.push_file(layer, None);
                }
                if let Some(layer) = env_layer {
                    composer.push_environment(layer);
                }
                composer.push_cli(cli_layer(&args));
                let merged = PlanArgs::merge_from_layers(composer.layers())?;
                PlanConfig::try_from(merged)
            }
            Command::Waypoints(_) => panic!("expected plan subcommand"),
        });
    world.cli_result.replace(Some(outcome));
}

#[then("the plan uses the CLI-provided catalog and selection")]
fn plan_uses_cli_values(#[from(world)] world: &PlanWorld) {
    let result = world.config();
    let config = result.as_ref().expect("expected success");
    assert_eq!(config.source, CatalogSource::File(world.catalog.catalog()));
    assert_eq!(config.select, vec![3, 1, 2]);
    assert_eq!(config.start, Some(1));
    assert_eq!(config.end, None);
}

#[then("the CLI reports that the select flag is missing")]
fn reports_missing_select(#[from(world)] world: &PlanWorld) {
    let result = world.config();
    match result.as_ref().expect_err("expected error") {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_PLAN_SELECT);
            assert_eq!(*env, ENV_PLAN_SELECT);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("the CLI reports conflicting catalog sources")]
fn reports_conflicting_sources(#[from(world)] world: &PlanWorld) {
    let result = world.config();
    assert!(matches!(
        result.as_ref().expect_err("expected error"),
        CliError::ConflictingArguments {
            first: ARG_CATALOG,
            second: ARG_CATALOG_URL
        }
    ));
}

#[then("CLI and environment layers override configuration defaults")]
fn precedence_holds(#[from(world)] world: &PlanWorld) {
    let result = world.config();
    let config = result.as_ref().expect("expected success");
    assert_eq!(config.source, CatalogSource::File(world.catalog.catalog()));
    assert_eq!(config.select, vec![2, 3]);
    assert_eq!(config.provider.base_url, "http://osrm.internal:5000");
    assert_eq!(config.provider.profile, "foot");
}

macro_rules! register_plan_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/plan_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: PlanWorld) {
            let _ = world;
        }
    };
}

register_plan_scenario!(cli_flag_selection, "selecting temples via CLI flags");
register_plan_scenario!(rejecting_missing_selection, "rejecting a missing selection");
register_plan_scenario!(rejecting_two_sources, "rejecting two catalog sources");
register_plan_scenario!(
    layering_cli_config_env,
    "layering CLI, config file, and environment values"
);
