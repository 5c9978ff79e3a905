//! Spatial position resolution for a site row.
//!
//! Classifies the row's coordinates as none, latitude/longitude or UTM,
//! resolves one or two points depending on the position extent, and converts
//! UTM input to geographic coordinates. All failures carry the field pair
//! that could not be read.

use biorec_model::{CoordinateType, ImportError, PositionAreaType, Result};
use tracing::debug;

use crate::geo::{find_ellipsoid, parse_grid_zone, utm_to_lat_long};
use crate::normalization::{Axis, dms_to_decimal};
use crate::validator::ValueReader;

/// A fully resolved spatial position: the classified coordinate type, the
/// extent shape, and up to two points in decimal degrees.
///
/// `x` is longitude and `y` is latitude. The second point is populated only
/// for line and box extents.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPosition {
    pub coordinate_type: CoordinateType,
    pub position_area_type: PositionAreaType,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
}

impl ResolvedPosition {
    fn empty(position_area_type: PositionAreaType) -> Self {
        Self {
            coordinate_type: CoordinateType::None,
            position_area_type,
            x1: None,
            y1: None,
            x2: None,
            y2: None,
        }
    }
}

/// Resolves the current row's position fields into a [`ResolvedPosition`].
///
/// The coordinate type honours an explicitly mapped `Site.Coordinate type`
/// when zero or positive; a negative or unmapped value is classified from the
/// row content instead.
pub fn resolve_position(reader: &ValueReader<'_>) -> Result<ResolvedPosition> {
    let position_area_type = resolve_position_area_type(reader)?;

    let raw_type = reader.resolver().get_or("Site.Coordinate type", "-1");
    let explicit: i32 = raw_type
        .trim()
        .parse()
        .map_err(|_| ImportError::NotNumeric {
            field: "Site.Coordinate type".to_string(),
            value: raw_type.clone(),
        })?;

    let coordinate_type = if explicit < 0 {
        let guessed = guess_coordinate_type(reader)?;
        debug!(?guessed, "coordinate type classified from row content");
        guessed
    } else {
        CoordinateType::from_code(explicit)
            .ok_or(ImportError::UnknownCoordinateType { value: explicit })?
    };

    let two_points = position_area_type.two_points();
    let mut position = ResolvedPosition::empty(position_area_type);
    position.coordinate_type = coordinate_type;

    match coordinate_type {
        CoordinateType::None => {}
        CoordinateType::LatLong => {
            if let Some((x1, y1)) = resolve_point(reader, "Site.Longitude", "Site.Latitude")? {
                position.x1 = Some(x1);
                position.y1 = Some(y1);
                if two_points
                    && let Some((x2, y2)) =
                        resolve_point(reader, "Site.Longitude 2", "Site.Latitude 2")?
                {
                    position.x2 = Some(x2);
                    position.y2 = Some(y2);
                }
            }
        }
        CoordinateType::Utm => {
            let (x1, y1) = resolve_utm_point(reader, "Site.Longitude", "Site.Latitude")?;
            position.x1 = Some(x1);
            position.y1 = Some(y1);
            if two_points {
                let (x2, y2) = resolve_utm_point(reader, "Site.Longitude 2", "Site.Latitude 2")?;
                position.x2 = Some(x2);
                position.y2 = Some(y2);
            }
        }
    }

    Ok(position)
}

/// The extent shape: explicit when mapped, otherwise inferred from the
/// presence of a second latitude column.
fn resolve_position_area_type(reader: &ValueReader<'_>) -> Result<PositionAreaType> {
    let raw = reader.resolver().get_or("Site.Position area type", "-1");
    let code: i32 = raw.trim().parse().map_err(|_| ImportError::NotNumeric {
        field: "Site.Position area type".to_string(),
        value: raw.clone(),
    })?;

    if code != -1 {
        return PositionAreaType::from_code(code)
            .ok_or(ImportError::UnknownPositionType { value: code });
    }

    Ok(if reader.resolver().get_opt("Site.Latitude 2").is_none() {
        PositionAreaType::Point
    } else {
        PositionAreaType::Line
    })
}

/// Classifies the coordinate type from row content.
///
/// No longitude or latitude mapped means no coordinates at all. A mapped UTM
/// zone number and ellipsoid select UTM. Otherwise the pair is treated as
/// latitude/longitude, except that plainly numeric values outside the
/// latitude/longitude range cannot be geographic and fail the row.
fn guess_coordinate_type(reader: &ValueReader<'_>) -> Result<CoordinateType> {
    let resolver = reader.resolver();
    let (Some(x), Some(y)) = (
        resolver.get_opt("Site.Longitude"),
        resolver.get_opt("Site.Latitude"),
    ) else {
        return Ok(CoordinateType::None);
    };

    if !resolver.get("Site.UTM zone number").is_empty()
        && !resolver.get("Site.UTM ellipsoid").is_empty()
    {
        return Ok(CoordinateType::Utm);
    }

    if let (Ok(dbl_x), Ok(dbl_y)) = (x.trim().parse::<f64>(), y.trim().parse::<f64>())
        && (!(-180.0..=180.0).contains(&dbl_x) || !(-90.0..=90.0).contains(&dbl_y))
    {
        return Err(ImportError::CoordinatesOutOfRange {
            x_field: "Site.Longitude".to_string(),
            y_field: "Site.Latitude".to_string(),
        });
    }

    Ok(CoordinateType::LatLong)
}

/// Resolves one latitude/longitude point.
///
/// Decimal degrees are tried first; anything that is not a plain decimal
/// pair falls back to degree-minute-second parsing of the raw text. A blank
/// pair yields `None`; a non-blank pair that parses neither way fails.
fn resolve_point(
    reader: &ValueReader<'_>,
    x_field: &str,
    y_field: &str,
) -> Result<Option<(f64, f64)>> {
    let x_dec = reader.get_f64(x_field, None, false)?;
    let y_dec = reader.get_f64(y_field, None, false)?;
    if let (Some(x), Some(y)) = (x_dec, y_dec) {
        return Ok(Some((x, y)));
    }

    let resolver = reader.resolver();
    let x_raw = resolver.get(x_field);
    let y_raw = resolver.get(y_field);
    if x_raw.trim().is_empty() && y_raw.trim().is_empty() {
        return Ok(None);
    }

    let pair_error = |reason: String| ImportError::BadCoordinatePair {
        x_field: x_field.to_string(),
        y_field: y_field.to_string(),
        reason,
    };
    let x = dms_to_decimal(&x_raw, Axis::Longitude).map_err(&pair_error)?;
    let y = dms_to_decimal(&y_raw, Axis::Latitude).map_err(&pair_error)?;
    Ok(Some((x, y)))
}

/// Resolves one UTM point and converts it to decimal degrees.
fn resolve_utm_point(
    reader: &ValueReader<'_>,
    x_field: &str,
    y_field: &str,
) -> Result<(f64, f64)> {
    let easting = plain_number(reader, x_field)?;
    let northing = plain_number(reader, y_field)?;
    let (Some(easting), Some(northing)) = (easting, northing) else {
        return Err(ImportError::NonNumericEastingNorthing {
            x_field: x_field.to_string(),
            y_field: y_field.to_string(),
        });
    };

    let zone_text = reader.resolver().get("Site.UTM zone");
    if zone_text.trim().is_empty() {
        return Err(ImportError::MissingUtmZone);
    }
    let grid_zone = parse_grid_zone(&zone_text).map_err(|reason| ImportError::InvalidUtmZone {
        zone: zone_text.clone(),
        reason,
    })?;

    let ellipsoid_name = reader.resolver().get("Site.UTM ellipsoid");
    let ellipsoid =
        find_ellipsoid(&ellipsoid_name).ok_or_else(|| ImportError::UnknownEllipsoid {
            name: ellipsoid_name.clone(),
        })?;

    Ok(utm_to_lat_long(ellipsoid, easting, northing, grid_zone))
}

/// A blank field is absent; a non-blank field must be a plain number.
fn plain_number(reader: &ValueReader<'_>, field: &str) -> Result<Option<f64>> {
    let raw = reader.resolver().get(field);
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ImportError::NotNumeric {
            field: field.to_string(),
            value: raw.clone(),
        })
}

#[cfg(test)]
mod tests {
    use biorec_ingest::{CsvRowSource, RowSource};
    use biorec_map::{FieldResolver, MappingIndex};
    use biorec_model::FieldMapping;

    use crate::validator::StandardFieldValidator;

    use super::*;

    fn setup(fields: &[(&str, &str)]) -> (MappingIndex, CsvRowSource) {
        let columns: Vec<String> = (0..fields.len()).map(|i| format!("c{i}")).collect();
        let mappings: Vec<FieldMapping> = fields
            .iter()
            .enumerate()
            .map(|(i, (target, _))| FieldMapping {
                source_column: format!("c{i}"),
                target_column: target.to_string(),
                is_fixed: false,
                default_value: None,
            })
            .collect();
        let index = MappingIndex::build(&mappings, &columns);
        let row: Vec<String> = fields.iter().map(|(_, v)| v.to_string()).collect();
        let mut source = CsvRowSource::from_rows(columns, vec![row]);
        source.move_next();
        (index, source)
    }

    fn resolve(fields: &[(&str, &str)]) -> Result<ResolvedPosition> {
        let (index, source) = setup(fields);
        let resolver = FieldResolver::new(&index, &source);
        let validator = StandardFieldValidator::new();
        let reader = ValueReader::new(&resolver, &validator);
        resolve_position(&reader)
    }

    #[test]
    fn unmapped_coordinates_classify_as_none() {
        let position = resolve(&[("Site.Locality", "somewhere")]).unwrap();
        assert_eq!(position.coordinate_type, CoordinateType::None);
        assert_eq!(position.position_area_type, PositionAreaType::Point);
        assert_eq!(position.x1, None);
        assert_eq!(position.y1, None);
    }

    #[test]
    fn decimal_degrees_classify_as_lat_long() {
        let position =
            resolve(&[("Site.Longitude", "147.32"), ("Site.Latitude", "-42.88")]).unwrap();
        assert_eq!(position.coordinate_type, CoordinateType::LatLong);
        assert_eq!(position.x1, Some(147.32));
        assert_eq!(position.y1, Some(-42.88));
        assert_eq!(position.x2, None);
    }

    #[test]
    fn dms_text_falls_back_to_dms_parsing() {
        let position = resolve(&[
            ("Site.Longitude", "147 19 12 E"),
            ("Site.Latitude", "42 52 48 S"),
        ])
        .unwrap();
        assert_eq!(position.coordinate_type, CoordinateType::LatLong);
        let x = position.x1.unwrap();
        let y = position.y1.unwrap();
        assert!((x - 147.32).abs() < 1e-9);
        assert!((y + 42.88).abs() < 1e-9);
    }

    #[test]
    fn numeric_out_of_range_without_utm_fields_fails() {
        let err = resolve(&[
            ("Site.Longitude", "524593"),
            ("Site.Latitude", "5252353"),
        ])
        .unwrap_err();
        assert!(matches!(err, ImportError::CoordinatesOutOfRange { .. }));
    }

    #[test]
    fn utm_fields_classify_as_utm_and_convert() {
        let position = resolve(&[
            ("Site.Longitude", "524593"),
            ("Site.Latitude", "5252353"),
            ("Site.UTM zone number", "55"),
            ("Site.UTM ellipsoid", "WGS-84"),
            ("Site.UTM zone", "55G"),
        ])
        .unwrap();
        assert_eq!(position.coordinate_type, CoordinateType::Utm);
        let x = position.x1.unwrap();
        let y = position.y1.unwrap();
        assert!((x - 147.3011).abs() < 0.001, "longitude was {x}");
        assert!((y + 42.8810).abs() < 0.001, "latitude was {y}");
    }

    #[test]
    fn utm_without_grid_zone_fails() {
        let err = resolve(&[
            ("Site.Longitude", "524593"),
            ("Site.Latitude", "5252353"),
            ("Site.UTM zone number", "55"),
            ("Site.UTM ellipsoid", "WGS-84"),
        ])
        .unwrap_err();
        assert!(matches!(err, ImportError::MissingUtmZone));
    }

    #[test]
    fn unknown_ellipsoid_fails() {
        let err = resolve(&[
            ("Site.Longitude", "524593"),
            ("Site.Latitude", "5252353"),
            ("Site.UTM zone number", "55"),
            ("Site.UTM ellipsoid", "Flatland"),
            ("Site.UTM zone", "55G"),
        ])
        .unwrap_err();
        assert!(matches!(err, ImportError::UnknownEllipsoid { .. }));
    }

    #[test]
    fn explicit_coordinate_type_out_of_range_fails() {
        let err = resolve(&[
            ("Site.Coordinate type", "3"),
            ("Site.Longitude", "147.32"),
            ("Site.Latitude", "-42.88"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::UnknownCoordinateType { value: 3 }
        ));
    }

    #[test]
    fn second_latitude_column_infers_a_line_extent() {
        let position = resolve(&[
            ("Site.Longitude", "147.0"),
            ("Site.Latitude", "-42.0"),
            ("Site.Longitude 2", "148.0"),
            ("Site.Latitude 2", "-43.0"),
        ])
        .unwrap();
        assert_eq!(position.position_area_type, PositionAreaType::Line);
        assert_eq!(position.x2, Some(148.0));
        assert_eq!(position.y2, Some(-43.0));
    }

    #[test]
    fn explicit_position_area_type_out_of_range_fails() {
        let err = resolve(&[
            ("Site.Position area type", "4"),
            ("Site.Longitude", "147.0"),
            ("Site.Latitude", "-42.0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ImportError::UnknownPositionType { value: 4 }));
    }

    #[test]
    fn unreadable_pair_names_both_fields() {
        let err = resolve(&[
            ("Site.Longitude", "somewhere east"),
            ("Site.Latitude", "-42.88"),
        ])
        .unwrap_err();
        match err {
            ImportError::BadCoordinatePair { x_field, y_field, .. } => {
                assert_eq!(x_field, "Site.Longitude");
                assert_eq!(y_field, "Site.Latitude");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_pair_with_explicit_lat_long_type_yields_no_points() {
        let position = resolve(&[
            ("Site.Coordinate type", "1"),
            ("Site.Longitude", ""),
            ("Site.Latitude", ""),
        ])
        .unwrap();
        assert_eq!(position.coordinate_type, CoordinateType::LatLong);
        assert_eq!(position.x1, None);
        assert_eq!(position.y1, None);
    }
}
