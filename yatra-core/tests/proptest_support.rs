//! Proptest strategies for catalog records and waypoint selections.

use proptest::prelude::*;
use proptest::sample::Index;
use yatra_core::{RawCoordinate, RawWaypointRecord, Waypoint};

/// A raw coordinate paired with whether it should survive validation.
pub type TaggedCoordinate = (Option<RawCoordinate>, bool);

/// Any finite value, plausible degrees or not.
fn finite_degrees() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => -180.0_f64..180.0,
        1 => proptest::num::f64::NORMAL | proptest::num::f64::ZERO | proptest::num::f64::SUBNORMAL,
    ]
}

fn coordinate() -> impl Strategy<Value = TaggedCoordinate> {
    prop_oneof![
        4 => finite_degrees().prop_map(|v| (Some(RawCoordinate::Number(v)), true)),
        2 => finite_degrees().prop_map(|v| (Some(RawCoordinate::Text(v.to_string())), true)),
        1 => "[a-z]{1,6}".prop_map(|s| (Some(RawCoordinate::Text(s)), false)),
        1 => Just((Some(RawCoordinate::Text(String::new())), false)),
        1 => Just((Some(RawCoordinate::Number(f64::NAN)), false)),
        1 => Just((Some(RawCoordinate::Number(f64::INFINITY)), false)),
        1 => Just((Some(RawCoordinate::Unsupported), false)),
        1 => Just((None, false)),
    ]
}

/// Records with unique ids plus the ids expected to survive, in order.
pub fn records_strategy() -> impl Strategy<Value = (Vec<RawWaypointRecord>, Vec<u64>)> {
    proptest::collection::vec((coordinate(), coordinate()), 0..24).prop_map(|rows| {
        let mut expected = Vec::new();
        let records = (1_u64..)
            .zip(rows)
            .map(|(id, ((latitude, lat_ok), (longitude, lon_ok)))| {
                if lat_ok && lon_ok {
                    expected.push(id);
                }
                RawWaypointRecord {
                    id,
                    latitude,
                    longitude,
                    ..RawWaypointRecord::default()
                }
            })
            .collect();
        (records, expected)
    })
}

/// A non-empty selection of distinct waypoints.
pub fn selection_strategy(max_len: usize) -> impl Strategy<Value = Vec<Waypoint>> {
    proptest::collection::vec((-60.0_f64..60.0, -170.0_f64..170.0), 1..=max_len).prop_map(
        |points| {
            (1_u64..)
                .zip(points)
                .filter_map(|(id, (lat, lon))| Waypoint::new(id, format!("wp{id}"), lat, lon).ok())
                .collect()
        },
    )
}

/// A selection with optional, distinct start and end anchors drawn from it.
pub fn anchored_selection_strategy(
    max_len: usize,
) -> impl Strategy<Value = (Vec<Waypoint>, Option<Waypoint>, Option<Waypoint>)> {
    (
        selection_strategy(max_len),
        proptest::option::of(any::<Index>()),
        proptest::option::of(any::<Index>()),
    )
        .prop_map(|(selection, start, end)| {
            let start_at = start.map(|index| index.index(selection.len()));
            let end_at = end
                .map(|index| index.index(selection.len()))
                .filter(|&at| selection.len() == 1 || Some(at) != start_at);
            let pick = |at: Option<usize>| at.and_then(|i| selection.get(i).cloned());
            let start_wp = pick(start_at);
            let end_wp = pick(end_at);
            (selection, start_wp, end_wp)
        })
}
