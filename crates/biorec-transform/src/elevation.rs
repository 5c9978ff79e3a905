//! Elevation resolution for a site row.
//!
//! The upper, lower and depth fields each accept a single value or a range,
//! with optional units. Later fields refine earlier ones: a range in the
//! lower field replaces both bounds, and a range in the depth field collapses
//! to its larger bound.

use biorec_model::{ElevationType, Result};

use crate::validator::ValueReader;

/// Merged elevation data for a site: the classified type, the resolved
/// bounds, and the units that apply to all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedElevation {
    pub elevation_type: ElevationType,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    pub depth: Option<f64>,
    pub units: String,
}

/// Resolves the current row's elevation fields into a [`ResolvedElevation`].
///
/// Units inferred from any parsed range are kept unless an explicit
/// `Site.Elevation units` field resolves, in which case its text wins even
/// when blank.
pub fn resolve_elevation(reader: &ValueReader<'_>) -> Result<ResolvedElevation> {
    let mut upper: Option<f64> = None;
    let mut lower: Option<f64> = None;
    let mut depth: Option<f64> = None;
    let mut units: Option<String> = None;

    if let Some(range) = reader.get_unit_range("Site.Elevation upper")? {
        upper = Some(range.upper);
        if range.is_range() {
            lower = Some(range.lower);
        }
        if let Some(u) = range.units {
            units = Some(u);
        }
    }

    if let Some(range) = reader.get_unit_range("Site.Elevation lower")? {
        if range.is_range() {
            upper = Some(range.upper);
            lower = Some(range.lower);
        } else {
            lower = Some(range.upper);
        }
        if let Some(u) = range.units {
            units = Some(u);
        }
    }

    if let Some(range) = reader.get_unit_range("Site.Elevation depth")? {
        depth = Some(if range.is_range() {
            range.upper.max(range.lower)
        } else {
            range.upper
        });
        if let Some(u) = range.units {
            units = Some(u);
        }
    }

    if let Some(explicit) = reader.resolver().get_opt("Site.Elevation units") {
        units = Some(explicit);
    }

    Ok(ResolvedElevation {
        elevation_type: classify(reader),
        upper,
        lower,
        depth,
        units: units.unwrap_or_default(),
    })
}

/// A non-blank depth field always means depth. Without one, a plainly
/// numeric upper value classifies by sign, and anything else is altitude.
fn classify(reader: &ValueReader<'_>) -> ElevationType {
    let depth_raw = reader.resolver().get("Site.Elevation depth");
    if !depth_raw.trim().is_empty() {
        return ElevationType::Depth;
    }
    match reader
        .resolver()
        .get("Site.Elevation upper")
        .trim()
        .parse::<f64>()
    {
        Ok(value) if value <= 0.0 => ElevationType::Depth,
        _ => ElevationType::Altitude,
    }
}

#[cfg(test)]
mod tests {
    use biorec_ingest::{CsvRowSource, RowSource};
    use biorec_map::{FieldResolver, MappingIndex};
    use biorec_model::{FieldMapping, ImportError};

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

    fn resolve(fields: &[(&str, &str)]) -> Result<ResolvedElevation> {
        let (index, source) = setup(fields);
        let resolver = FieldResolver::new(&index, &source);
        let validator = StandardFieldValidator::new();
        let reader = ValueReader::new(&resolver, &validator);
        resolve_elevation(&reader)
    }

    #[test]
    fn positive_upper_without_depth_is_altitude() {
        let elevation = resolve(&[("Site.Elevation upper", "350")]).unwrap();
        assert_eq!(elevation.elevation_type, ElevationType::Altitude);
        assert_eq!(elevation.upper, Some(350.0));
        assert_eq!(elevation.lower, None);
        assert_eq!(elevation.depth, None);
        assert_eq!(elevation.units, "");
    }

    #[test]
    fn negative_upper_without_depth_is_depth() {
        let elevation = resolve(&[("Site.Elevation upper", "-5")]).unwrap();
        assert_eq!(elevation.elevation_type, ElevationType::Depth);
        assert_eq!(elevation.upper, Some(-5.0));
    }

    #[test]
    fn range_in_upper_field_fills_both_bounds_and_units() {
        let elevation = resolve(&[("Site.Elevation upper", "100-200 m")]).unwrap();
        assert_eq!(elevation.elevation_type, ElevationType::Altitude);
        assert_eq!(elevation.upper, Some(100.0));
        assert_eq!(elevation.lower, Some(200.0));
        assert_eq!(elevation.units, "m");
    }

    #[test]
    fn range_in_lower_field_replaces_both_bounds() {
        let elevation = resolve(&[
            ("Site.Elevation upper", "350"),
            ("Site.Elevation lower", "120-180 m"),
        ])
        .unwrap();
        assert_eq!(elevation.upper, Some(120.0));
        assert_eq!(elevation.lower, Some(180.0));
        assert_eq!(elevation.units, "m");
    }

    #[test]
    fn depth_field_alone_classifies_as_depth() {
        let elevation = resolve(&[("Site.Elevation depth", "15 m")]).unwrap();
        assert_eq!(elevation.elevation_type, ElevationType::Depth);
        assert_eq!(elevation.depth, Some(15.0));
        assert_eq!(elevation.upper, None);
        assert_eq!(elevation.units, "m");
    }

    #[test]
    fn depth_range_collapses_to_its_larger_bound() {
        let elevation = resolve(&[("Site.Elevation depth", "10-20")]).unwrap();
        assert_eq!(elevation.depth, Some(20.0));
    }

    #[test]
    fn explicit_units_override_inferred_units() {
        let elevation = resolve(&[
            ("Site.Elevation upper", "100-200 m"),
            ("Site.Elevation units", "ft"),
        ])
        .unwrap();
        assert_eq!(elevation.units, "ft");
    }

    #[test]
    fn blank_mapped_units_clear_inferred_units() {
        let elevation = resolve(&[
            ("Site.Elevation upper", "100-200 m"),
            ("Site.Elevation units", ""),
        ])
        .unwrap();
        assert_eq!(elevation.units, "");
    }

    #[test]
    fn unreadable_elevation_text_fails_the_row() {
        let err = resolve(&[("Site.Elevation upper", "quite high")]).unwrap_err();
        assert!(matches!(err, ImportError::InvalidValue { .. }));
    }
}
