//! Domain validation of raw field text, and the typed field getters built on
//! top of it.

use biorec_map::FieldResolver;
use biorec_model::{ImportError, Result, UnitRange};

use crate::normalization::{date_text_to_compact, parse_compact_date, parse_unit_range};

/// Validates and converts raw field text for a given target field.
///
/// Implementations may apply per-field rules; the field key is always the
/// dotted target name. Errors are human-readable reasons, not exceptions:
/// the caller decides whether an invalid value fails the row or falls back
/// to a default.
pub trait FieldValidator {
    fn validate_f64(&self, field: &str, value: &str) -> std::result::Result<f64, String>;
    fn validate_i32(&self, field: &str, value: &str) -> std::result::Result<i32, String>;
    fn validate_bool(&self, field: &str, value: &str) -> std::result::Result<bool, String>;
    fn validate_compact_date(&self, field: &str, value: &str)
    -> std::result::Result<i32, String>;
    fn validate_unit_range(
        &self,
        field: &str,
        value: &str,
    ) -> std::result::Result<UnitRange, String>;
}

/// The default validator.
///
/// Dates accept compact digit strings or natural date text; time fields
/// additionally accept `HH:MM`, converted to an `HHMM` integer.
#[derive(Debug, Default)]
pub struct StandardFieldValidator;

impl StandardFieldValidator {
    pub fn new() -> Self {
        Self
    }
}

impl FieldValidator for StandardFieldValidator {
    fn validate_f64(&self, _field: &str, value: &str) -> std::result::Result<f64, String> {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| "not a number".to_string())
    }

    fn validate_i32(&self, field: &str, value: &str) -> std::result::Result<i32, String> {
        let trimmed = value.trim();
        if field.to_lowercase().contains("time") {
            if let Some((h, m)) = trimmed.split_once(':') {
                let hours: i32 = h.trim().parse().map_err(|_| "bad hour".to_string())?;
                let minutes: i32 = m.trim().parse().map_err(|_| "bad minutes".to_string())?;
                if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
                    return Err("time out of range".to_string());
                }
                return Ok(hours * 100 + minutes);
            }
        }
        trimmed
            .parse::<i32>()
            .map_err(|_| "not a whole number".to_string())
    }

    fn validate_bool(&self, _field: &str, value: &str) -> std::result::Result<bool, String> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(true),
            "false" | "no" | "n" | "0" => Ok(false),
            _ => Err("not a yes/no value".to_string()),
        }
    }

    fn validate_compact_date(
        &self,
        _field: &str,
        value: &str,
    ) -> std::result::Result<i32, String> {
        let trimmed = value.trim();
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            return parse_compact_date(trimmed);
        }
        date_text_to_compact(trimmed).ok_or_else(|| "not a recognisable date".to_string())
    }

    fn validate_unit_range(
        &self,
        _field: &str,
        value: &str,
    ) -> std::result::Result<UnitRange, String> {
        parse_unit_range(value)
    }
}

/// Typed field access over a [`FieldResolver`].
///
/// Each getter resolves the field as text first; a blank or unmapped field
/// yields the default. An invalid value either fails the row
/// (`throw_if_invalid`) or silently yields the default, depending on whether
/// the caller treats the field as best-effort or hard-required.
pub struct ValueReader<'a> {
    resolver: &'a FieldResolver<'a>,
    validator: &'a dyn FieldValidator,
}

impl<'a> ValueReader<'a> {
    pub fn new(resolver: &'a FieldResolver<'a>, validator: &'a dyn FieldValidator) -> Self {
        Self {
            resolver,
            validator,
        }
    }

    pub fn resolver(&self) -> &FieldResolver<'a> {
        self.resolver
    }

    pub fn get_f64(
        &self,
        field: &str,
        def: Option<f64>,
        throw_if_invalid: bool,
    ) -> Result<Option<f64>> {
        self.convert(field, def, throw_if_invalid, |v| {
            self.validator.validate_f64(field, v).map(Some)
        })
    }

    pub fn get_i32(
        &self,
        field: &str,
        def: Option<i32>,
        throw_if_invalid: bool,
    ) -> Result<Option<i32>> {
        self.convert(field, def, throw_if_invalid, |v| {
            self.validator.validate_i32(field, v).map(Some)
        })
    }

    pub fn get_bool(&self, field: &str, def: bool, throw_if_invalid: bool) -> Result<bool> {
        self.convert(field, def, throw_if_invalid, |v| {
            self.validator.validate_bool(field, v)
        })
    }

    pub fn get_compact_date(
        &self,
        field: &str,
        def: Option<i32>,
        throw_if_invalid: bool,
    ) -> Result<Option<i32>> {
        self.convert(field, def, throw_if_invalid, |v| {
            self.validator.validate_compact_date(field, v).map(Some)
        })
    }

    pub fn get_unit_range(&self, field: &str) -> Result<Option<UnitRange>> {
        self.convert(field, None, true, |v| {
            self.validator.validate_unit_range(field, v).map(Some)
        })
    }

    fn convert<T>(
        &self,
        field: &str,
        def: T,
        throw_if_invalid: bool,
        parse: impl Fn(&str) -> std::result::Result<T, String>,
    ) -> Result<T> {
        let raw = self.resolver.get(field);
        if raw.trim().is_empty() {
            return Ok(def);
        }
        match parse(&raw) {
            Ok(v) => Ok(v),
            Err(reason) if throw_if_invalid => Err(ImportError::InvalidValue {
                field: field.to_string(),
                value: raw,
                reason,
            }),
            Err(_) => Ok(def),
        }
    }
}

#[cfg(test)]
mod tests {
    use biorec_ingest::{CsvRowSource, RowSource};
    use biorec_map::MappingIndex;
    use biorec_model::FieldMapping;

    use super::*;

    fn mapping(source: &str, target: &str) -> FieldMapping {
        FieldMapping {
            source_column: source.to_string(),
            target_column: target.to_string(),
            is_fixed: false,
            default_value: None,
        }
    }

    fn setup(values: Vec<&str>) -> (MappingIndex, CsvRowSource) {
        let columns = vec![
            "num".to_string(),
            "date".to_string(),
            "time".to_string(),
            "flag".to_string(),
        ];
        let mappings = vec![
            mapping("num", "Site.Longitude"),
            mapping("date", "SiteVisit.Start Date"),
            mapping("time", "SiteVisit.Start Time"),
            mapping("flag", "Material.Create Label"),
        ];
        let index = MappingIndex::build(&mappings, &columns);
        let mut source = CsvRowSource::from_rows(
            columns,
            vec![values.into_iter().map(str::to_string).collect()],
        );
        source.move_next();
        (index, source)
    }

    #[test]
    fn blank_fields_yield_the_default() {
        let (index, source) = setup(vec!["", "", "", ""]);
        let resolver = FieldResolver::new(&index, &source);
        let validator = StandardFieldValidator::new();
        let reader = ValueReader::new(&resolver, &validator);

        assert_eq!(reader.get_f64("Site.Longitude", None, true).unwrap(), None);
        assert_eq!(
            reader.get_f64("Site.Longitude", Some(1.5), true).unwrap(),
            Some(1.5)
        );
        assert!(reader.get_bool("Material.Create Label", false, true).is_ok());
    }

    #[test]
    fn valid_values_convert() {
        let (index, source) = setup(vec!["147.32", "4 Mar 1999", "14:30", "yes"]);
        let resolver = FieldResolver::new(&index, &source);
        let validator = StandardFieldValidator::new();
        let reader = ValueReader::new(&resolver, &validator);

        assert_eq!(
            reader.get_f64("Site.Longitude", None, true).unwrap(),
            Some(147.32)
        );
        assert_eq!(
            reader
                .get_compact_date("SiteVisit.Start Date", None, true)
                .unwrap(),
            Some(19990304)
        );
        assert_eq!(
            reader.get_i32("SiteVisit.Start Time", None, true).unwrap(),
            Some(1430)
        );
        assert!(reader.get_bool("Material.Create Label", false, true).unwrap());
    }

    #[test]
    fn invalid_values_follow_the_policy() {
        let (index, source) = setup(vec!["east-ish", "someday", "25:99", "maybe"]);
        let resolver = FieldResolver::new(&index, &source);
        let validator = StandardFieldValidator::new();
        let reader = ValueReader::new(&resolver, &validator);

        // Lenient callers treat junk as absent.
        assert_eq!(reader.get_f64("Site.Longitude", None, false).unwrap(), None);
        assert_eq!(
            reader
                .get_compact_date("SiteVisit.Start Date", Some(0), false)
                .unwrap(),
            Some(0)
        );

        // Hard-required callers get a row error naming the field.
        let err = reader.get_f64("Site.Longitude", None, true).unwrap_err();
        assert!(err.to_string().contains("Site.Longitude"));
        assert!(reader.get_i32("SiteVisit.Start Time", None, true).is_err());
        assert!(reader.get_bool("Material.Create Label", false, true).is_err());
    }

    #[test]
    fn compact_digit_dates_validate_strictly() {
        let (index, source) = setup(vec!["", "19990399", "", ""]);
        let resolver = FieldResolver::new(&index, &source);
        let validator = StandardFieldValidator::new();
        let reader = ValueReader::new(&resolver, &validator);

        // 99 is not a day; digit strings must be real compact dates.
        assert!(
            reader
                .get_compact_date("SiteVisit.Start Date", None, true)
                .is_err()
        );
    }
}
