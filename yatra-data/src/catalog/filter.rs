use serde::{Deserialize, Serialize};
use yatra_core::RawWaypointRecord;

/// Filter value meaning "do not filter on this field".
pub const ALL: &str = "All";

/// Deity and district constraints on a catalog query.
///
/// `None`, an empty string and [`ALL`] all mean "no constraint". Matching is
/// exact and case-sensitive.
///
/// # Examples
/// ```
/// use yatra_core::RawWaypointRecord;
/// use yatra_data::catalog::CatalogFilter;
///
/// let filter = CatalogFilter::new().with_district("Visakhapatnam");
/// let record = RawWaypointRecord::at(1, 17.7, 83.3).with_district("Visakhapatnam");
/// assert!(filter.matches(&record));
/// assert!(!CatalogFilter::new().with_district("Krishna").matches(&record));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Required deity category.
    #[serde(default)]
    pub deity: Option<String>,
    /// Required district.
    #[serde(default)]
    pub district: Option<String>,
}

impl CatalogFilter {
    /// A filter that matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one deity category.
    #[must_use]
    pub fn with_deity(mut self, deity: impl Into<String>) -> Self {
        self.deity = Some(deity.into());
        self
    }

    /// Restrict to one district.
    #[must_use]
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    /// The effective deity constraint, if any.
    #[must_use]
    pub fn deity(&self) -> Option<&str> {
        constraint(self.deity.as_deref())
    }

    /// The effective district constraint, if any.
    #[must_use]
    pub fn district(&self) -> Option<&str> {
        constraint(self.district.as_deref())
    }

    /// Whether the filter places no constraint at all.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.deity().is_none() && self.district().is_none()
    }

    /// Whether `record` satisfies every active constraint.
    #[must_use]
    pub fn matches(&self, record: &RawWaypointRecord) -> bool {
        field_matches(self.deity(), record.deity_category.as_deref())
            && field_matches(self.district(), record.district.as_deref())
    }

    /// Keep the matching records, preserving their order.
    #[must_use]
    pub fn apply(&self, mut records: Vec<RawWaypointRecord>) -> Vec<RawWaypointRecord> {
        records.retain(|record| self.matches(record));
        records
    }

    /// Query parameters as the catalog service expects them.
    pub(crate) fn query_pairs(&self) -> [(&'static str, &str); 2] {
        [
            ("deity", self.deity().unwrap_or(ALL)),
            ("district", self.district().unwrap_or(ALL)),
        ]
    }
}

fn constraint(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

fn field_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    wanted.is_none_or(|w| actual == Some(w))
}
