use serde::{Deserialize, Serialize};

/// Shape of a decoded measurement field: one value or two, with or without a
/// trailing unit token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeType {
    SingleNoUnits,
    SingleWithUnits,
    RangeNoUnits,
    RangeWithUnits,
}

/// The decoded form of a free-text elevation or measurement field, e.g.
/// `"120"`, `"120 m"`, `"100-250"` or `"100 - 250 ft"`.
///
/// `lower` is meaningful only for the two range shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRange {
    pub upper: f64,
    pub lower: f64,
    pub units: Option<String>,
    pub range_type: RangeType,
}

impl UnitRange {
    pub fn single(value: f64) -> Self {
        Self {
            upper: value,
            lower: 0.0,
            units: None,
            range_type: RangeType::SingleNoUnits,
        }
    }

    pub fn single_with_units(value: f64, units: impl Into<String>) -> Self {
        Self {
            upper: value,
            lower: 0.0,
            units: Some(units.into()),
            range_type: RangeType::SingleWithUnits,
        }
    }

    pub fn range(upper: f64, lower: f64) -> Self {
        Self {
            upper,
            lower,
            units: None,
            range_type: RangeType::RangeNoUnits,
        }
    }

    pub fn range_with_units(upper: f64, lower: f64, units: impl Into<String>) -> Self {
        Self {
            upper,
            lower,
            units: Some(units.into()),
            range_type: RangeType::RangeWithUnits,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(
            self.range_type,
            RangeType::RangeNoUnits | RangeType::RangeWithUnits
        )
    }

    pub fn has_units(&self) -> bool {
        self.units.is_some()
    }
}
