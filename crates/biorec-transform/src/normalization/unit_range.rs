//! Free-text measurement parsing: `"120"`, `"120 m"`, `"100-250"`,
//! `"100 - 250 ft"` and the like.

use std::sync::LazyLock;

use biorec_model::UnitRange;
use regex::Regex;

static MEASUREMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(-?\d+(?:\.\d+)?)\s*(?:(?:-|\u{2013}|to)\s*(-?\d+(?:\.\d+)?))?\s*([A-Za-z][A-Za-z.']*)?\s*$",
    )
    .expect("Invalid measurement regex")
});

/// Decodes a measurement field into a [`UnitRange`].
///
/// The first number is the upper figure; an optional second number after a
/// dash or the word `to` is the lower figure; a trailing alphabetic token is
/// kept as the unit. The error string describes the problem.
pub fn parse_unit_range(text: &str) -> Result<UnitRange, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("empty value".to_string());
    }

    let captures = MEASUREMENT_REGEX
        .captures(trimmed)
        .ok_or_else(|| format!("\"{trimmed}\" is not a number, range or measurement"))?;

    let upper: f64 = captures[1]
        .parse()
        .map_err(|_| "bad numeric value".to_string())?;
    let lower: Option<f64> = match captures.get(2) {
        Some(m) => Some(m.as_str().parse().map_err(|_| "bad numeric value".to_string())?),
        None => None,
    };
    let units = captures.get(3).map(|m| m.as_str().to_string());

    Ok(match (lower, units) {
        (None, None) => UnitRange::single(upper),
        (None, Some(u)) => UnitRange::single_with_units(upper, u),
        (Some(l), None) => UnitRange::range(upper, l),
        (Some(l), Some(u)) => UnitRange::range_with_units(upper, l, u),
    })
}
