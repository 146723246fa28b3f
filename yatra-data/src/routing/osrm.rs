//! OSRM API response types for the Route service.
//!
//! Only the fields the engine consumes are modelled; everything else in the
//! response is ignored during deserialisation.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use geo::{Coord, LineString};
use serde::Deserialize;
use yatra_core::RouteInstruction;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"InvalidQuery"` - Malformed request
    /// - `"TooBig"` - Too many coordinates
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One candidate route.
#[derive(Debug, Deserialize)]
pub struct Route {
    /// Total distance in metres.
    pub distance: f64,
    /// Total duration in seconds.
    pub duration: f64,
    /// Full-resolution geometry (requested with `geometries=geojson`).
    pub geometry: GeoJsonLine,
    /// One leg per consecutive waypoint pair.
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Deserialize)]
pub struct GeoJsonLine {
    /// `[lon, lat]` positions.
    pub coordinates: Vec<[f64; 2]>,
}

impl GeoJsonLine {
    /// Convert into a `geo` line string (`x = lon`, `y = lat`).
    pub fn into_line_string(self) -> LineString<f64> {
        self.coordinates
            .into_iter()
            .map(|[lon, lat]| Coord { x: lon, y: lat })
            .collect()
    }
}

/// Route between two consecutive waypoints.
#[derive(Debug, Deserialize)]
pub struct Leg {
    /// Turn-by-turn steps (requested with `steps=true`).
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A single manoeuvre and the stretch of road that follows it.
#[derive(Debug, Deserialize)]
pub struct Step {
    /// Distance in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Road name, empty when unnamed.
    #[serde(default)]
    pub name: String,
    /// Manoeuvre at the start of the step.
    pub maneuver: Maneuver,
}

/// The action taken at the start of a step.
#[derive(Debug, Deserialize)]
pub struct Maneuver {
    /// Manoeuvre type, e.g. `"turn"`, `"depart"`, `"roundabout"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Direction change, e.g. `"left"`, `"slight right"`, `"uturn"`.
    pub modifier: Option<String>,
    /// Exit number for roundabouts and rotaries.
    pub exit: Option<u32>,
    /// Heading after the manoeuvre, in degrees clockwise from north.
    #[serde(default)]
    pub bearing_after: u16,
}

/// Flatten the steps of every leg into numbered instructions.
pub fn instructions(legs: Vec<Leg>) -> Vec<RouteInstruction> {
    let last_leg = legs.len().saturating_sub(1);
    legs.into_iter()
        .enumerate()
        .flat_map(|(leg_index, leg)| {
            let arrival = if leg_index == last_leg {
                Arrival::Destination
            } else {
                Arrival::Waypoint(leg_index.saturating_add(1))
            };
            leg.steps.into_iter().map(move |step| (arrival, step))
        })
        .enumerate()
        .map(|(step_index, (arrival, step))| RouteInstruction {
            step_index,
            direction_text: describe(&step, arrival),
            road_name: (!step.name.is_empty()).then(|| step.name.clone()),
            distance_meters: step.distance,
            duration_seconds: step.duration,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrival {
    Waypoint(usize),
    Destination,
}

/// Human-readable text for a step's manoeuvre.
fn describe(step: &Step, arrival: Arrival) -> String {
    let maneuver = &step.maneuver;
    let modifier = maneuver.modifier.as_deref();
    let road = (!step.name.is_empty()).then_some(step.name.as_str());

    let (text, joins_road) = match maneuver.kind.as_str() {
        "depart" => (format!("Head {}", compass(maneuver.bearing_after)), Join::On),
        "arrive" => {
            let text = match arrival {
                Arrival::Destination => "You have arrived at your destination".to_owned(),
                Arrival::Waypoint(n) => format!("You have arrived at waypoint {n}"),
            };
            (text, Join::None)
        }
        "turn" => (turn(modifier), Join::Onto),
        "new name" => (continue_text(modifier), Join::Onto),
        "continue" => (continue_text(modifier), Join::Onto),
        "merge" => (with_modifier("Merge", modifier), Join::Onto),
        "on ramp" => (side("Take the ramp", modifier), Join::Onto),
        "off ramp" => (side("Take the exit", modifier), Join::Onto),
        "fork" => (
            modifier.map_or_else(
                || "Keep at the fork".to_owned(),
                |m| format!("Keep {} at the fork", keep_direction(m)),
            ),
            Join::Onto,
        ),
        "end of road" => (
            format!("{} at the end of the road", turn(modifier)),
            Join::Onto,
        ),
        "roundabout" | "rotary" => (
            maneuver.exit.map_or_else(
                || "Enter the roundabout".to_owned(),
                |exit| format!("Enter the roundabout and take the {} exit", ordinal(exit)),
            ),
            Join::Onto,
        ),
        "roundabout turn" => (
            format!("At the roundabout, {}", turn(modifier).to_lowercase()),
            Join::Onto,
        ),
        "exit roundabout" | "exit rotary" => ("Exit the roundabout".to_owned(), Join::Onto),
        _ => (continue_text(modifier), Join::On),
    };

    match (joins_road, road) {
        (Join::On, Some(name)) => format!("{text} on {name}"),
        (Join::Onto, Some(name)) => format!("{text} onto {name}"),
        _ => text,
    }
}

#[derive(Debug, Clone, Copy)]
enum Join {
    None,
    On,
    Onto,
}

fn turn(modifier: Option<&str>) -> String {
    match modifier {
        Some("uturn") => "Make a U-turn".to_owned(),
        Some("straight") => "Go straight".to_owned(),
        Some(m) => format!("Turn {m}"),
        None => "Turn".to_owned(),
    }
}

fn continue_text(modifier: Option<&str>) -> String {
    match modifier {
        Some("uturn") => "Make a U-turn".to_owned(),
        None | Some("straight") => "Continue".to_owned(),
        Some(m) => format!("Continue {m}"),
    }
}

fn with_modifier(verb: &str, modifier: Option<&str>) -> String {
    modifier.map_or_else(|| verb.to_owned(), |m| format!("{verb} {m}"))
}

fn side(verb: &str, modifier: Option<&str>) -> String {
    match modifier.map(keep_direction) {
        Some(direction @ ("left" | "right")) => format!("{verb} on the {direction}"),
        _ => verb.to_owned(),
    }
}

fn keep_direction(modifier: &str) -> &str {
    match modifier {
        "slight left" | "sharp left" | "left" => "left",
        "slight right" | "sharp right" | "right" => "right",
        "straight" => "straight",
        other => other,
    }
}

fn compass(bearing: u16) -> &'static str {
    match bearing {
        23..=67 => "northeast",
        68..=112 => "east",
        113..=157 => "southeast",
        158..=202 => "south",
        203..=247 => "southwest",
        248..=292 => "west",
        293..=337 => "northwest",
        _ => "north",
    }
}

fn ordinal(n: u32) -> String {
    let digits = n.to_string();
    let suffix = if digits.ends_with("11") || digits.ends_with("12") || digits.ends_with("13") {
        "th"
    } else if digits.ends_with('1') {
        "st"
    } else if digits.ends_with('2') {
        "nd"
    } else if digits.ends_with('3') {
        "rd"
    } else {
        "th"
    };
    format!("{digits}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn step(kind: &str, modifier: Option<&str>, name: &str) -> Step {
        Step {
            distance: 100.0,
            duration: 10.0,
            name: name.to_owned(),
            maneuver: Maneuver {
                kind: kind.to_owned(),
                modifier: modifier.map(str::to_owned),
                exit: None,
                bearing_after: 0,
            },
        }
    }

    #[test]
    fn deserialise_route_response() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 1520.4,
                "duration": 180.2,
                "geometry": {"type": "LineString", "coordinates": [[83.25, 17.76], [83.26, 17.77]]},
                "legs": [{
                    "distance": 1520.4,
                    "duration": 180.2,
                    "steps": [
                        {"distance": 1520.4, "duration": 180.2, "name": "Beach Road",
                         "maneuver": {"type": "depart", "bearing_after": 90, "location": [83.25, 17.76]}},
                        {"distance": 0.0, "duration": 0.0, "name": "",
                         "maneuver": {"type": "arrive", "modifier": "left", "location": [83.26, 17.77]}}
                    ]
                }]
            }],
            "waypoints": []
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let route = response.routes.into_iter().next().expect("one route");
        assert_eq!(route.distance, 1520.4);
        let line = route.geometry.into_line_string();
        assert_eq!(line.0.first(), Some(&Coord { x: 83.25, y: 17.76 }));
        let steps = instructions(route.legs);
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps.first().map(|s| s.direction_text.as_str()),
            Some("Head east on Beach Road")
        );
        assert_eq!(steps.last().and_then(|s| s.road_name.clone()), None);
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert!(response.routes.is_empty());
        assert_eq!(
            response.message.as_deref(),
            Some("Impossible route between points")
        );
    }

    #[rstest]
    #[case("turn", Some("left"), "MG Road", "Turn left onto MG Road")]
    #[case("turn", Some("uturn"), "", "Make a U-turn")]
    #[case("new name", None, "NH 16", "Continue onto NH 16")]
    #[case("continue", Some("slight right"), "", "Continue slight right")]
    #[case("fork", Some("slight left"), "", "Keep left at the fork")]
    #[case("merge", Some("right"), "NH 65", "Merge right onto NH 65")]
    #[case("on ramp", Some("sharp right"), "", "Take the ramp on the right")]
    #[case("off ramp", None, "", "Take the exit")]
    #[case("end of road", Some("right"), "", "Turn right at the end of the road")]
    #[case("roundabout turn", Some("left"), "", "At the roundabout, turn left")]
    #[case("notification", None, "Ring Road", "Continue on Ring Road")]
    fn describes_maneuvers(
        #[case] kind: &str,
        #[case] modifier: Option<&str>,
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(
            describe(&step(kind, modifier, name), Arrival::Destination),
            expected
        );
    }

    #[rstest]
    #[case(1, "1st")]
    #[case(2, "2nd")]
    #[case(3, "3rd")]
    #[case(4, "4th")]
    #[case(11, "11th")]
    #[case(22, "22nd")]
    fn roundabout_exits_use_ordinals(#[case] exit: u32, #[case] label: &str) {
        let mut roundabout = step("roundabout", None, "");
        roundabout.maneuver.exit = Some(exit);
        assert_eq!(
            describe(&roundabout, Arrival::Destination),
            format!("Enter the roundabout and take the {label} exit")
        );
    }

    #[rstest]
    fn intermediate_arrivals_name_the_waypoint() {
        let legs = vec![
            Leg {
                steps: vec![step("depart", None, ""), step("arrive", None, "")],
            },
            Leg {
                steps: vec![step("depart", None, ""), step("arrive", None, "")],
            },
        ];
        let texts: Vec<String> = instructions(legs)
            .into_iter()
            .map(|s| s.direction_text)
            .collect();
        assert_eq!(
            texts,
            vec![
                "Head north",
                "You have arrived at waypoint 1",
                "Head north",
                "You have arrived at your destination",
            ]
        );
    }

    #[rstest]
    fn step_indices_run_across_legs() {
        let legs = vec![
            Leg {
                steps: vec![step("depart", None, "")],
            },
            Leg {
                steps: vec![step("turn", Some("left"), ""), step("arrive", None, "")],
            },
        ];
        let indices: Vec<usize> = instructions(legs).iter().map(|s| s.step_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
