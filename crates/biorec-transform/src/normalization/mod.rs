//! Normalization of raw field text into typed values:
//! - **compact_date**: `YYYYMMDD` integer dates with partial precision
//! - **dms**: degree-minute-second coordinate text
//! - **unit_range**: single figures and ranges with unit tokens

pub mod compact_date;
pub mod dms;
pub mod unit_range;

pub use compact_date::{
    compact_date_to_calendar, compact_date_to_string, date_text_to_compact, parse_compact_date,
};
pub use dms::{Axis, dms_to_decimal};
pub use unit_range::parse_unit_range;
