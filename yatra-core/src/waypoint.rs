//! Waypoints and the raw catalog records they are built from.
//!
//! Catalog rows arrive loosely typed: coordinates may be JSON numbers,
//! numeric strings (database `numeric` columns), `null`, or absent entirely.
//! [`Waypoint::try_from`] is the single gate that turns a
//! [`RawWaypointRecord`] into a validated [`Waypoint`].

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which coordinate axis a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// North/south position in decimal degrees.
    Latitude,
    /// East/west position in decimal degrees.
    Longitude,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latitude => f.write_str("latitude"),
            Self::Longitude => f.write_str("longitude"),
        }
    }
}

/// Errors returned when a raw record cannot become a [`Waypoint`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaypointError {
    /// The coordinate field was absent or `null`.
    #[error("record {id} has no {axis}")]
    MissingCoordinate {
        /// Identifier of the offending record.
        id: u64,
        /// Axis that was missing.
        axis: Axis,
    },
    /// The coordinate did not parse as a finite number.
    #[error("record {id} has a non-numeric {axis}: {value:?}")]
    InvalidCoordinate {
        /// Identifier of the offending record.
        id: u64,
        /// Axis that failed to parse.
        axis: Axis,
        /// The raw value as received.
        value: String,
    },
}

/// A coordinate value exactly as it appeared in a catalog row.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCoordinate {
    /// A JSON number.
    Number(f64),
    /// A string that may contain a decimal number.
    Text(String),
    /// Any other JSON value (booleans, arrays, objects).
    Unsupported,
}

impl RawCoordinate {
    /// Parse the value as a finite decimal degree.
    ///
    /// Strings are trimmed and parsed strictly; trailing garbage is rejected.
    ///
    /// # Examples
    /// ```
    /// use yatra_core::RawCoordinate;
    ///
    /// assert_eq!(RawCoordinate::Text(" 17.68 ".into()).to_degrees(), Some(17.68));
    /// assert_eq!(RawCoordinate::Text("abc".into()).to_degrees(), None);
    /// assert_eq!(RawCoordinate::Number(f64::NAN).to_degrees(), None);
    /// ```
    #[must_use]
    pub fn to_degrees(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
            Self::Unsupported => None,
        };
        value.filter(|v| v.is_finite())
    }

    fn describe(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
            Self::Unsupported => "<unsupported>".to_owned(),
        }
    }
}

#[cfg(feature = "serde")]
mod raw_coordinate_serde {
    use std::fmt;

    use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::RawCoordinate;

    struct RawCoordinateVisitor;

    impl<'de> Visitor<'de> for RawCoordinateVisitor {
        type Value = RawCoordinate;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(RawCoordinate::Number(value))
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "integral degrees are far below the f64 mantissa limit"
        )]
        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(RawCoordinate::Number(value as f64))
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "integral degrees are far below the f64 mantissa limit"
        )]
        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(RawCoordinate::Number(value as f64))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(RawCoordinate::Text(value.to_owned()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(RawCoordinate::Text(value))
        }

        fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
            Ok(RawCoordinate::Unsupported)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(RawCoordinate::Unsupported)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(RawCoordinate::Unsupported)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(RawCoordinate::Unsupported)
        }
    }

    impl<'de> Deserialize<'de> for RawCoordinate {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(RawCoordinateVisitor)
        }
    }

    impl Serialize for RawCoordinate {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Number(value) => serializer.serialize_f64(*value),
                Self::Text(text) => serializer.serialize_str(text),
                Self::Unsupported => serializer.serialize_unit(),
            }
        }
    }
}

/// One row of the point catalog, before validation.
///
/// Field aliases accept the column names used by the temple catalog
/// (`dtname`, `god_categy`, `god_name`, `placepageu`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawWaypointRecord {
    /// Catalog primary key.
    pub id: u64,
    /// Display name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Latitude as received.
    #[cfg_attr(feature = "serde", serde(default))]
    pub latitude: Option<RawCoordinate>,
    /// Longitude as received.
    #[cfg_attr(feature = "serde", serde(default))]
    pub longitude: Option<RawCoordinate>,
    /// Administrative district.
    #[cfg_attr(feature = "serde", serde(default, alias = "dtname"))]
    pub district: Option<String>,
    /// Deity category used by catalog filters.
    #[cfg_attr(feature = "serde", serde(default, alias = "god_categy"))]
    pub deity_category: Option<String>,
    /// Name of the presiding deity.
    #[cfg_attr(feature = "serde", serde(default, alias = "god_name"))]
    pub deity_name: Option<String>,
    /// Free-text description.
    #[cfg_attr(feature = "serde", serde(default, alias = "placepageu"))]
    pub description: Option<String>,
}

impl RawWaypointRecord {
    /// Construct a record with numeric coordinates and no descriptive fields.
    ///
    /// # Examples
    /// ```
    /// use yatra_core::{RawWaypointRecord, Waypoint};
    ///
    /// let record = RawWaypointRecord::at(7, 17.7, 83.3);
    /// let waypoint = Waypoint::try_from(&record).expect("valid coordinates");
    /// assert_eq!(waypoint.latitude(), 17.7);
    /// ```
    #[must_use]
    pub fn at(id: u64, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude: Some(RawCoordinate::Number(latitude)),
            longitude: Some(RawCoordinate::Number(longitude)),
            ..Self::default()
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the district.
    #[must_use]
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    /// Set the deity category.
    #[must_use]
    pub fn with_deity_category(mut self, category: impl Into<String>) -> Self {
        self.deity_category = Some(category.into());
        self
    }
}

/// A validated, geocoded point eligible for route planning.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`, matching
/// [`geo::Coord`] conventions. Waypoints are immutable once built; identity
/// is by [`Waypoint::id`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    id: u64,
    name: String,
    location: Coord<f64>,
    district: String,
    deity_category: Option<String>,
    deity_name: Option<String>,
    description: Option<String>,
}

impl Waypoint {
    /// Build a waypoint from already-parsed coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WaypointError::InvalidCoordinate`] for non-finite values.
    /// Finite values are kept as given; no range is enforced.
    ///
    /// # Examples
    /// ```
    /// use yatra_core::Waypoint;
    ///
    /// let wp = Waypoint::new(1, "Simhachalam", 17.766, 83.250)?;
    /// assert_eq!(wp.location().x, 83.250);
    /// assert!(Waypoint::new(2, "Nowhere", f64::NAN, 0.0).is_err());
    /// # Ok::<(), yatra_core::WaypointError>(())
    /// ```
    pub fn new(
        id: u64,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, WaypointError> {
        let lat = check_axis(id, Axis::Latitude, latitude)?;
        let lon = check_axis(id, Axis::Longitude, longitude)?;
        Ok(Self {
            id,
            name: name.into(),
            location: Coord { x: lon, y: lat },
            district: String::new(),
            deity_category: None,
            deity_name: None,
            description: None,
        })
    }

    /// Attach the district name.
    #[must_use]
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = district.into();
        self
    }

    /// Catalog identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Display name; empty when the catalog had none.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position as a `geo` coordinate (`x = lon`, `y = lat`).
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Administrative district; empty when unknown.
    #[must_use]
    pub fn district(&self) -> &str {
        &self.district
    }

    /// Deity category, if the catalog supplied one.
    #[must_use]
    pub fn deity_category(&self) -> Option<&str> {
        self.deity_category.as_deref()
    }

    /// Presiding deity, if known.
    #[must_use]
    pub fn deity_name(&self) -> Option<&str> {
        self.deity_name.as_deref()
    }

    /// Free-text description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn check_axis(id: u64, axis: Axis, value: f64) -> Result<f64, WaypointError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WaypointError::InvalidCoordinate {
            id,
            axis,
            value: value.to_string(),
        })
    }
}

fn parse_axis(
    id: u64,
    axis: Axis,
    raw: Option<&RawCoordinate>,
) -> Result<f64, WaypointError> {
    let raw = raw.ok_or(WaypointError::MissingCoordinate { id, axis })?;
    let degrees = raw
        .to_degrees()
        .ok_or_else(|| WaypointError::InvalidCoordinate {
            id,
            axis,
            value: raw.describe(),
        })?;
    check_axis(id, axis, degrees)
}

impl TryFrom<&RawWaypointRecord> for Waypoint {
    type Error = WaypointError;

    fn try_from(record: &RawWaypointRecord) -> Result<Self, Self::Error> {
        let latitude = parse_axis(record.id, Axis::Latitude, record.latitude.as_ref())?;
        let longitude = parse_axis(record.id, Axis::Longitude, record.longitude.as_ref())?;
        Ok(Self {
            id: record.id,
            name: record.name.clone().unwrap_or_default(),
            location: Coord {
                x: longitude,
                y: latitude,
            },
            district: record.district.clone().unwrap_or_default(),
            deity_category: record.deity_category.clone(),
            deity_name: record.deity_name.clone(),
            description: record.description.clone(),
        })
    }
}
