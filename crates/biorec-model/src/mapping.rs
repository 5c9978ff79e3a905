use serde::{Deserialize, Serialize};

/// A single source-column to target-field assignment.
///
/// `target_column` is a dotted `Category.Field` name, e.g. `Site.Locality`.
/// Fixed mappings carry no source column; their value is `default_value` for
/// every row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    pub source_column: String,
    pub target_column: String,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl FieldMapping {
    /// The `Category` part of the dotted target name, if any.
    pub fn category(&self) -> Option<&str> {
        self.target_column.split_once('.').map(|(cat, _)| cat)
    }

    /// The `Field` part of the dotted target name, if any.
    pub fn field(&self) -> Option<&str> {
        self.target_column.split_once('.').map(|(_, field)| field)
    }

    /// For `Category.Other` targets, the category this mapping contributes a
    /// free-form trait to. `None` for ordinary field targets.
    pub fn trait_category(&self) -> Option<&str> {
        match self.target_column.rsplit_once('.') {
            Some((cat, tail)) if tail.eq_ignore_ascii_case("other") => Some(cat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    pub profile_name: String,
    pub mappings: Vec<FieldMapping>,
}
