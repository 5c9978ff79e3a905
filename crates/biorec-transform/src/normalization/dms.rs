//! Degree-minute-second coordinate text parsing.

use std::sync::LazyLock;

use regex::Regex;

static NUMERIC_GROUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("Invalid numeric group regex"));

/// Which axis a coordinate string belongs to. Determines the legal
/// hemisphere letters and the magnitude limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }
}

/// Parses sexagesimal coordinate text like `36 43 17 S`, `136°43'17"E` or
/// `36.72 S` into signed decimal degrees.
///
/// Up to three numeric groups are read as degrees, minutes and seconds. The
/// hemisphere may be given as a letter anywhere in the string or as a leading
/// minus sign on the degrees. The error string describes the first problem
/// found.
pub fn dms_to_decimal(text: &str, axis: Axis) -> Result<f64, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(format!("no {} value supplied", axis.name()));
    }

    let mut hemisphere: Option<char> = None;
    for c in trimmed.chars() {
        if c.is_ascii_alphabetic() {
            let upper = c.to_ascii_uppercase();
            match upper {
                'N' | 'S' | 'E' | 'W' if hemisphere.is_none() => hemisphere = Some(upper),
                'N' | 'S' | 'E' | 'W' => {
                    return Err("more than one hemisphere letter".to_string());
                }
                _ => return Err(format!("unexpected character '{c}'")),
            }
        }
    }

    if let Some(h) = hemisphere {
        let legal = match axis {
            Axis::Latitude => matches!(h, 'N' | 'S'),
            Axis::Longitude => matches!(h, 'E' | 'W'),
        };
        if !legal {
            return Err(format!("'{h}' is not a {} hemisphere", axis.name()));
        }
    }

    let groups: Vec<f64> = NUMERIC_GROUP_REGEX
        .find_iter(trimmed)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    if groups.is_empty() {
        return Err(format!("no numeric {} value", axis.name()));
    }
    if groups.len() > 3 {
        return Err("too many numeric groups".to_string());
    }

    let degrees = groups[0];
    let minutes = groups.get(1).copied().unwrap_or(0.0);
    let seconds = groups.get(2).copied().unwrap_or(0.0);

    if degrees < 0.0 && hemisphere.is_some() {
        return Err("signed degrees cannot also carry a hemisphere letter".to_string());
    }
    if !(0.0..60.0).contains(&minutes) {
        return Err("minutes must be below 60".to_string());
    }
    if !(0.0..60.0).contains(&seconds) {
        return Err("seconds must be below 60".to_string());
    }

    let mut value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    if degrees < 0.0 || matches!(hemisphere, Some('S') | Some('W')) {
        value = -value;
    }

    if value.abs() > axis.limit() {
        return Err(format!(
            "{} magnitude exceeds {}",
            axis.name(),
            axis.limit()
        ));
    }

    Ok(value)
}
