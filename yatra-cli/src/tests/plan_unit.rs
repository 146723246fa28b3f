//! Tests for planning a route and writing command output.

use super::helpers::{CatalogDir, answer_next_call};
use super::*;
use crate::catalog::{CatalogSource, write_json};
use crate::plan::{PlanConfig, plan_route};
use crate::waypoints::{WaypointsConfig, load_waypoints};
use rstest::rstest;
use yatra_core::test_support::StubRoutingProvider;
use yatra_core::{ProviderError, RouteState, SelectionError, SessionError, Waypoint};
use yatra_data::catalog::{CatalogFilter, read_catalog};
use yatra_data::routing::OsrmRouteProviderConfig;

fn plan_config(dir: &CatalogDir, select: Vec<u64>) -> PlanConfig {
    PlanConfig {
        source: CatalogSource::File(dir.catalog()),
        filter: CatalogFilter::new(),
        select,
        start: None,
        end: None,
        provider: OsrmRouteProviderConfig::default(),
        output: None,
    }
}

#[rstest]
#[tokio::test]
async fn plan_route_orders_selection_from_start() {
    let dir = CatalogDir::new();
    let config = PlanConfig {
        start: Some(2),
        ..plan_config(&dir, vec![3, 1, 2])
    };
    let records = read_catalog(&dir.catalog()).expect("catalog loads");
    let provider = StubRoutingProvider::new();
    let responder = answer_next_call(provider.clone());

    let state = plan_route(&config, &records, provider).await.expect("plans");
    responder.await.expect("responder task");

    let route = state.active_route().expect("route should be active");
    assert_eq!(route.tour.first().map(Waypoint::id), Some(2));
    assert_eq!(route.tour.len(), 3);
    assert_eq!(route.distance_meters, 21_500.0);
}

#[rstest]
#[tokio::test]
async fn filtered_out_ids_are_reported_as_unknown() {
    let dir = CatalogDir::new();
    let config = plan_config(&dir, vec![1, 2]);
    let filter = CatalogFilter::new().with_district("Visakhapatnam");
    let records = filter.apply(read_catalog(&dir.catalog()).expect("catalog loads"));

    let err = plan_route(&config, &records, StubRoutingProvider::new())
        .await
        .expect_err("id 2 is in Krishna");

    assert!(matches!(
        err,
        CliError::Plan(SessionError::Selection(SelectionError::UnknownWaypoint {
            id: 2
        }))
    ));
}

#[rstest]
#[tokio::test]
async fn records_without_coordinates_cannot_be_planned() {
    let dir = CatalogDir::new();
    let config = plan_config(&dir, vec![1, 4]);
    let records = read_catalog(&dir.catalog()).expect("catalog loads");

    let err = plan_route(&config, &records, StubRoutingProvider::new())
        .await
        .expect_err("id 4 has no latitude");

    assert!(matches!(
        err,
        CliError::Plan(SessionError::Selection(SelectionError::UnknownWaypoint {
            id: 4
        }))
    ));
}

#[rstest]
#[tokio::test]
async fn anchors_must_be_selected() {
    let dir = CatalogDir::new();
    let config = PlanConfig {
        end: Some(3),
        ..plan_config(&dir, vec![1, 2])
    };
    let records = read_catalog(&dir.catalog()).expect("catalog loads");

    let err = plan_route(&config, &records, StubRoutingProvider::new())
        .await
        .expect_err("3 is not selected");

    assert!(matches!(
        err,
        CliError::Selection(SelectionError::NotSelected { id: 3, .. })
    ));
}

#[rstest]
#[tokio::test]
async fn single_stop_is_refused() {
    let dir = CatalogDir::new();
    let records = read_catalog(&dir.catalog()).expect("catalog loads");
    let provider = StubRoutingProvider::new();

    let err = plan_route(&plan_config(&dir, vec![1]), &records, provider.clone())
        .await
        .expect_err("one stop is not a route");

    assert!(matches!(err, CliError::Plan(SessionError::Route(_))));
    assert_eq!(provider.call_count(), 0);
}

#[rstest]
#[tokio::test]
async fn provider_failure_becomes_error_state() {
    let dir = CatalogDir::new();
    let records = read_catalog(&dir.catalog()).expect("catalog loads");
    let provider = StubRoutingProvider::new();
    let failing = provider.clone();
    let responder = tokio::spawn(async move {
        loop {
            if let Some(call) = failing.last_call() {
                assert!(call.fail(ProviderError::ServiceError {
                    code: "NoRoute".to_owned(),
                    message: "Impossible route between points".to_owned(),
                }));
                break;
            }
            tokio::task::yield_now().await;
        }
    });

    let state = plan_route(&plan_config(&dir, vec![1, 3]), &records, provider)
        .await
        .expect("dispatch succeeds");
    responder.await.expect("responder task");

    assert_eq!(state.name(), "error");
    assert!(state.error_message().is_some_and(|m| m.contains("NoRoute")));
}

#[rstest]
#[tokio::test]
async fn waypoints_drop_unusable_records() {
    let dir = CatalogDir::new();
    let config = WaypointsConfig {
        source: CatalogSource::File(dir.catalog()),
        filter: CatalogFilter::new().with_district("Krishna"),
        output: None,
    };

    let set = load_waypoints(&config).await.expect("catalog loads");

    let ids: Vec<u64> = set.iter().map(Waypoint::id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(set.rejected(), 1);
}

#[rstest]
fn write_json_defaults_to_writer() {
    let mut buffer = Vec::new();

    write_json(&RouteState::default(), None, &mut buffer).expect("write");

    let text = String::from_utf8(buffer).expect("utf-8 output");
    assert!(text.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(value["state"], "idle");
}

#[rstest]
fn write_json_writes_output_file() {
    let dir = CatalogDir::new();
    let output = dir.root().join("out/route.json");
    let mut buffer = Vec::new();

    write_json(&RouteState::default(), Some(output.as_path()), &mut buffer).expect("write");

    assert!(buffer.is_empty());
    let text = yatra_fs::read_to_string(&output).expect("output written");
    let state: RouteState = serde_json::from_str(&text).expect("valid state");
    assert_eq!(state, RouteState::default());
}
