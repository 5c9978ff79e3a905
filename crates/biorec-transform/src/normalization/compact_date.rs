//! Compact date handling.
//!
//! Dates are stored as `YYYYMMDD` integers where trailing zero components
//! mark unknown precision: `19990000` is "sometime in 1999", `19990300` is
//! "March 1999". Four- and six-digit inputs are padded with trailing zeros
//! before validation.

use chrono::{Datelike, NaiveDate};

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Validates `text` as a compact date and returns it as an integer.
///
/// Accepts 4, 6 or 8 digit strings (shorter forms are padded with trailing
/// zeros). The error describes why the value was rejected.
pub fn parse_compact_date(text: &str) -> Result<i32, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("empty value".to_string());
    }

    let mut digits = trimmed.to_string();
    if digits.len() == 4 || digits.len() == 6 {
        while digits.len() < 8 {
            digits.push('0');
        }
    }

    if digits.len() != 8 {
        return Err("compact dates must have 4, 6 or 8 digits".to_string());
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("all characters must be digits".to_string());
    }

    let year: i32 = digits[0..4].parse().map_err(|_| "bad year".to_string())?;
    let month: i32 = digits[4..6].parse().map_err(|_| "bad month".to_string())?;
    let day: i32 = digits[6..8].parse().map_err(|_| "bad day".to_string())?;

    if day > 31 {
        return Err("days must be between 00 and 31".to_string());
    }
    if month == 0 && day != 0 {
        return Err("if the month is 00 the day must also be 00".to_string());
    }
    if month > 12 {
        return Err("months must be between 00 and 12".to_string());
    }

    Ok(year * 10000 + month * 100 + day)
}

/// Renders a compact date for display, honouring partial precision:
/// `19990304` becomes `4 Mar, 1999`, `19990300` becomes `Mar, 1999` and
/// `19990000` becomes `1999`. Values that are not eight digits long render
/// as their plain digits.
pub fn compact_date_to_string(date: i32) -> String {
    let digits = date.to_string();
    if digits.len() != 8 || parse_compact_date(&digits).is_err() {
        return digits;
    }

    let year = date / 10000;
    let month = (date / 100) % 100;
    let day = date % 100;

    if month == 0 {
        format!("{year}")
    } else if day == 0 {
        format!("{}, {year:04}", MONTH_ABBREV[(month - 1) as usize])
    } else {
        format!("{day} {}, {year:04}", MONTH_ABBREV[(month - 1) as usize])
    }
}

/// Converts a compact date into a calendar date, clamping unknown month/day
/// components to 1. Returns `None` when the components do not form a real
/// date.
pub fn compact_date_to_calendar(date: i32) -> Option<NaiveDate> {
    let year = date / 10000;
    let month = ((date / 100) % 100).max(1) as u32;
    let day = (date % 100).max(1) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses free-form date text into a compact date integer.
///
/// Month-and-year forms yield a day of `00`; a bare four-digit year yields
/// `YYYY0000`. Returns `None` when no known format matches.
pub fn date_text_to_compact(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let full_formats = [
        "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%d %B %Y",
        "%d-%b-%Y", "%b %d, %Y", "%B %d, %Y",
    ];
    for fmt in &full_formats {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d.year() * 10000 + (d.month() as i32) * 100 + d.day() as i32);
        }
    }

    let month_year_formats = ["%b %Y", "%B %Y", "%m/%Y"];
    for fmt in &month_year_formats {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{trimmed} 1"), &format!("{fmt} %d")) {
            return Some(d.year() * 10000 + (d.month() as i32) * 100);
        }
    }

    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(year) = trimmed.parse::<i32>() {
            return Some(year * 10000);
        }
    }

    None
}
