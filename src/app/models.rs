//! Data models for myvax_fetcher
//!
//! This module defines the dataset kinds served by the application, the views
//! that can be computed over them, and the sentinel-carrying integer used for
//! every numeric output field.

use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize, Serializer};

use crate::constants::feeds;

/// Geographic coverage of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// One row per date for the whole country
    National,
    /// One row per date and region
    State,
    /// One row per region, no date axis
    Static,
}

/// Output record family produced for a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    Vaccination,
    Registration,
    Population,
}

/// One output field of a delta view and the column it is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaField {
    /// Key in the `update` and `total` maps
    pub key: &'static str,
    /// Upstream column name
    pub column: &'static str,
}

impl DeltaField {
    const fn new(key: &'static str, column: &'static str) -> Self {
        Self { key, column }
    }
}

const VACCINATION_DELTA: [DeltaField; 3] = [
    DeltaField::new("dose1", "dose1_daily"),
    DeltaField::new("dose2", "dose2_daily"),
    DeltaField::new("total", "total_daily"),
];

const REGISTRATION_DELTA: [DeltaField; 9] = [
    DeltaField::new("total", "total"),
    DeltaField::new("phase2", "phase2"),
    DeltaField::new("mysj", "mysj"),
    DeltaField::new("call", "call"),
    DeltaField::new("web", "web"),
    DeltaField::new("children", "children"),
    DeltaField::new("elderly", "elderly"),
    DeltaField::new("comorb", "comorb"),
    DeltaField::new("oku", "oku"),
];

/// Upstream datasets served by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    NationalVaccination,
    StateVaccination,
    NationalRegistration,
    StateRegistration,
    Population,
}

impl DatasetKind {
    /// Every dataset kind, in listing order
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::NationalVaccination,
        DatasetKind::StateVaccination,
        DatasetKind::NationalRegistration,
        DatasetKind::StateRegistration,
        DatasetKind::Population,
    ];

    /// Record family produced by the projector for this kind
    pub fn shape(&self) -> RecordShape {
        match self {
            Self::NationalVaccination | Self::StateVaccination => RecordShape::Vaccination,
            Self::NationalRegistration | Self::StateRegistration => RecordShape::Registration,
            Self::Population => RecordShape::Population,
        }
    }

    /// Geographic coverage of the upstream file
    pub fn coverage(&self) -> Coverage {
        match self {
            Self::NationalVaccination | Self::NationalRegistration => Coverage::National,
            Self::StateVaccination | Self::StateRegistration => Coverage::State,
            Self::Population => Coverage::Static,
        }
    }

    /// Default path of the upstream file relative to the feed base URL
    pub fn default_path(&self) -> &'static str {
        match self {
            Self::NationalVaccination => feeds::NATIONAL_VACCINATION,
            Self::StateVaccination => feeds::STATE_VACCINATION,
            Self::NationalRegistration => feeds::NATIONAL_REGISTRATION,
            Self::StateRegistration => feeds::STATE_REGISTRATION,
            Self::Population => feeds::POPULATION,
        }
    }

    /// Fields compared by the latest-update view
    ///
    /// Empty for kinds without delta semantics.
    pub fn delta_fields(&self) -> &'static [DeltaField] {
        match self {
            Self::NationalVaccination => &VACCINATION_DELTA,
            Self::NationalRegistration => &REGISTRATION_DELTA,
            Self::StateVaccination | Self::StateRegistration | Self::Population => &[],
        }
    }

    /// Whether a view can be computed for this kind
    pub fn supports(&self, view: View) -> bool {
        match view {
            View::ListAll | View::Latest | View::Raw => true,
            View::ByRegion => self.coverage() != Coverage::National,
            View::ByRegionAll | View::LatestByRegionAll | View::LatestByRegion => {
                self.coverage() == Coverage::State
            }
        }
    }

    /// Views available for this kind, in listing order
    pub fn views(&self) -> Vec<View> {
        View::ALL
            .iter()
            .copied()
            .filter(|view| self.supports(*view))
            .collect()
    }

    /// Snake-case identifier used in configuration files
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::NationalVaccination => "national_vaccination",
            Self::StateVaccination => "state_vaccination",
            Self::NationalRegistration => "national_registration",
            Self::StateRegistration => "state_registration",
            Self::Population => "population",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NationalVaccination => "national vaccination",
            Self::StateVaccination => "state vaccination",
            Self::NationalRegistration => "national registration",
            Self::StateRegistration => "state registration",
            Self::Population => "population",
        };
        f.write_str(name)
    }
}

/// Views that can be computed over a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Every row projected, file order
    ListAll,
    /// Day-over-day delta, latest window, or final row depending on kind
    Latest,
    /// Rows grouped by date, then region
    ByRegionAll,
    /// Rows for one region, file order
    ByRegion,
    /// The last `REGION_COUNT` rows
    LatestByRegionAll,
    /// One region's rows within the last `REGION_COUNT` rows
    LatestByRegion,
    /// Upstream text unchanged
    Raw,
}

impl View {
    /// Every view, in listing order
    pub const ALL: [View; 7] = [
        View::ListAll,
        View::Latest,
        View::ByRegionAll,
        View::ByRegion,
        View::LatestByRegionAll,
        View::LatestByRegion,
        View::Raw,
    ];

    /// Whether the view takes a region slug
    pub fn takes_region(&self) -> bool {
        matches!(self, View::ByRegion | View::LatestByRegion)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::ListAll => "all",
            View::Latest => "latest",
            View::ByRegionAll => "states",
            View::ByRegion => "state",
            View::LatestByRegionAll => "states-latest",
            View::LatestByRegion => "state-latest",
            View::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// Integer count that may carry the not-a-number sentinel
///
/// The sentinel marks a value that failed to parse or a subtraction involving
/// such a value. It serializes as JSON `null` and is never equal to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Count(Option<i64>);

impl Count {
    /// The not-a-number sentinel
    pub const NAN: Count = Count(None);

    /// Wrap a known value
    pub const fn new(value: i64) -> Self {
        Self(Some(value))
    }

    /// Parse the leading integer of a string
    ///
    /// Leading whitespace and one sign character are accepted, then the
    /// longest run of ASCII digits is read and anything after it ignored
    /// (`"12abc"` is 12, `"1.5"` is 1). No digits, or a value outside the
    /// `i64` range, yields the sentinel.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digit_count = unsigned.bytes().take_while(u8::is_ascii_digit).count();
        if digit_count == 0 {
            return Self::NAN;
        }

        match unsigned[..digit_count].parse::<i64>() {
            Ok(value) if negative => Self(value.checked_neg()),
            Ok(value) => Self::new(value),
            Err(_) => Self::NAN,
        }
    }

    /// The value, or `None` for the sentinel
    pub fn value(&self) -> Option<i64> {
        self.0
    }

    /// Whether this is the sentinel
    pub fn is_nan(&self) -> bool {
        self.0.is_none()
    }
}

impl From<i64> for Count {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl Sub for Count {
    type Output = Count;

    fn sub(self, rhs: Count) -> Count {
        match (self.0, rhs.0) {
            (Some(lhs), Some(rhs)) => Count(lhs.checked_sub(rhs)),
            _ => Count::NAN,
        }
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(value) => serializer.serialize_i64(value),
            None => serializer.serialize_none(),
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str("NaN"),
        }
    }
}
