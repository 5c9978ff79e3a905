use serde::{Deserialize, Serialize};

use crate::RegionId;
use crate::SiteId;

/// Rank of a node in the political-region hierarchy, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionRank {
    Region,
    Country,
    StateProvince,
    County,
}

impl RegionRank {
    /// The rank name as stored with the region record.
    pub fn label(self) -> &'static str {
        match self {
            RegionRank::Region => "Region",
            RegionRank::Country => "Country",
            RegionRank::StateProvince => "State/Province",
            RegionRank::County => "County",
        }
    }
}

impl std::fmt::Display for RegionRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A node in the political-region hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub parent: Option<RegionId>,
    pub rank: RegionRank,
}

/// How a site's position fields are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateType {
    None,
    LatLong,
    Utm,
}

impl CoordinateType {
    pub fn code(self) -> i32 {
        match self {
            CoordinateType::None => 0,
            CoordinateType::LatLong => 1,
            CoordinateType::Utm => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(CoordinateType::None),
            1 => Some(CoordinateType::LatLong),
            2 => Some(CoordinateType::Utm),
            _ => None,
        }
    }
}

/// Geometry of a site's position: one point, a line between two points, or a
/// bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionAreaType {
    Point,
    Line,
    Box,
}

impl PositionAreaType {
    pub fn code(self) -> i32 {
        match self {
            PositionAreaType::Point => 1,
            PositionAreaType::Line => 2,
            PositionAreaType::Box => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(PositionAreaType::Point),
            2 => Some(PositionAreaType::Line),
            3 => Some(PositionAreaType::Box),
            _ => None,
        }
    }

    /// True when this geometry carries a second coordinate pair.
    pub fn two_points(self) -> bool {
        !matches!(self, PositionAreaType::Point)
    }
}

/// Whether the elevation figures measure height above or depth below a datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElevationType {
    Altitude,
    Depth,
}

impl ElevationType {
    pub fn code(self) -> i32 {
        match self {
            ElevationType::Altitude => 1,
            ElevationType::Depth => 2,
        }
    }
}

/// A collecting site. Free-text fields use the empty string for "not
/// supplied"; numeric fields use `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub political_region: RegionId,
    /// 0 = plain locality text, 1 = offset from a named place. Imports always
    /// produce 0.
    pub locality_type: i32,
    pub locality: String,
    pub distance_from_place: String,
    pub direction_from_place: String,
    pub informal_locality: String,
    pub coordinate_type: CoordinateType,
    pub position_area_type: PositionAreaType,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub xy_display_format: i32,
    pub position_source: String,
    pub position_error: String,
    pub generated_by: String,
    pub generated_on: String,
    pub original_position: String,
    pub utm_source: String,
    pub utm_map_projection: String,
    pub utm_map_name: String,
    pub utm_map_version: String,
    pub elevation_type: ElevationType,
    pub elevation_upper: Option<f64>,
    pub elevation_lower: Option<f64>,
    pub elevation_depth: Option<f64>,
    pub elevation_units: String,
    pub elevation_source: String,
    pub elevation_error: String,
    pub geo_era: String,
    pub geo_state: String,
    pub geo_plate: String,
    pub geo_formation: String,
    pub geo_member: String,
    pub geo_bed: String,
    pub geo_name: String,
    pub geo_age_bottom: String,
    pub geo_age_top: String,
    pub geo_notes: String,
}

/// Whether a visit's dates are compact numeric dates or free-form text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateType {
    Fixed,
    Casual,
}

impl DateType {
    pub fn code(self) -> i32 {
        match self {
            DateType::Fixed => 1,
            DateType::Casual => 2,
        }
    }
}

/// A dated collecting event at a site. Start/end dates are compact
/// `YYYYMMDD` integers (trailing zeros mark unknown day/month); times are
/// `HHMM` integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteVisit {
    pub site: SiteId,
    pub name: String,
    pub field_number: String,
    pub collector: String,
    pub date_type: DateType,
    pub start_date: Option<i32>,
    pub end_date: Option<i32>,
    pub start_time: Option<i32>,
    pub end_time: Option<i32>,
    pub casual_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_type_codes_round_trip() {
        for ct in [CoordinateType::None, CoordinateType::LatLong, CoordinateType::Utm] {
            assert_eq!(CoordinateType::from_code(ct.code()), Some(ct));
        }
        assert_eq!(CoordinateType::from_code(7), None);
    }

    #[test]
    fn area_type_codes_start_at_one() {
        assert_eq!(PositionAreaType::Point.code(), 1);
        assert_eq!(PositionAreaType::from_code(0), None);
        assert!(PositionAreaType::Box.two_points());
        assert!(!PositionAreaType::Point.two_points());
    }

    #[test]
    fn region_rank_labels_match_storage_names() {
        assert_eq!(RegionRank::StateProvince.label(), "State/Province");
        assert_eq!(RegionRank::County.to_string(), "County");
    }
}
